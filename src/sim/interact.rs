//! Interaction dispatch
//!
//! The interact key resolves against whatever the proximity pass found this
//! tick: chest first, then item, else nothing. Chest behavior is the one
//! thing that truly differs between levels, so it dispatches on the config's
//! `ChestEffect`.

use crate::consts::*;
use crate::level::{ChestEffect, SurvivalRule};

use super::state::{FallState, LevelPhase, LevelSession, SessionEvent};

/// Handle one press of the interact key
pub fn on_interact(session: &mut LevelSession) {
    if session.phase != LevelPhase::Active {
        return;
    }

    if let Some(index) = session.at_chest {
        open_chest(session, index);
    } else if let Some(index) = session.at_item {
        collect_item(session, index);
    }
}

fn open_chest(session: &mut LevelSession, index: usize) {
    let id = session.pois[index].id;
    match session.config.chest_effect {
        ChestEffect::RechargeLight => {
            session.timers.charge.set(CHARGE_FULL);
            session.timers.bounce.set(BOUNCE_FULL);
            session.pois[index].consumed = true;
            session.at_chest = None;
            session.events.push(SessionEvent::ChestOpened { id });
        }
        ChestEffect::RestoreHeart => {
            // hearts chests stay live; standing at one can be farmed,
            // so the counter saturates instead of wrapping
            session.hearts = session.hearts.saturating_add(1);
            if let Some(text) = session.config.chest_message.clone() {
                session.show_message(text, CHEST_MESSAGE_TICKS);
            }
            session.events.push(SessionEvent::ChestOpened { id });
        }
        ChestEffect::OpenFloor => {
            session.timers.darkness.set(0.0);
            session.fall = Some(FallState::new());
            session.pois[index].consumed = true;
            session.at_chest = None;
            session.events.push(SessionEvent::ChestOpened { id });
            session.events.push(SessionEvent::FloorOpened);
        }
    }
}

fn collect_item(session: &mut LevelSession, index: usize) {
    session.pois[index].consumed = true;
    session.collected += 1;
    let id = session.pois[index].id;
    let payload = session.pois[index].payload.clone();
    session.show_message(payload, ITEM_MESSAGE_TICKS);
    session.events.push(SessionEvent::ItemCollected { id });
    session.at_item = None;

    let total = session.config.items.len();
    if total > 0 && session.collected >= total {
        log::info!("level complete: {} ({} items)", session.config.name, total);
        session.phase = LevelPhase::Completed;
        session.pending_level = Some(session.config.next_level);
        session
            .events
            .push(SessionEvent::LevelCompleted { next_level: session.config.next_level });
    }
}

/// Darkness penalty or heart loss from hazard contact; cooldown handled by
/// the caller
pub fn apply_hazard_damage(session: &mut LevelSession, hazard: usize) {
    session.events.push(SessionEvent::HazardHit { hazard });
    match session.config.survival {
        SurvivalRule::Hearts { .. } => {
            session.hearts = session.hearts.saturating_sub(1);
            session
                .events
                .push(SessionEvent::HeartLost { hearts_left: session.hearts });
        }
        SurvivalRule::Flashlight => {
            // while the light is alive, darkness is pinned to full each
            // tick, so contact has to hit the charge instead
            if session.timers.charge.value() > CHARGE_THRESHOLD {
                let value = session.timers.charge.value();
                session.timers.charge.advance(-(HAZARD_CHARGE_PENALTY.min(value)));
            } else {
                let value = session.timers.darkness.value();
                session.timers.darkness.advance(-(HAZARD_DARKNESS_PENALTY.min(value.max(0.0))));
            }
        }
    }
}
