//! Per-tick orchestration
//!
//! One call to [`tick`] advances the whole session by a single frame-locked
//! step: deferred one-shots, survival timers, the death sequence, movement
//! and collision, proximity, interactions, hazards, and cosmetic spin, in
//! that order. The host drains `SessionEvent`s afterwards and reads
//! positions and `UiSignals` directly.

use crate::consts::*;
use crate::level::SurvivalRule;

use super::collision::{MoveDir, try_move};
use super::interact::{apply_hazard_damage, on_interact};
use super::proximity::{first_poi_index_in_range, within_radius};
use super::state::{LevelPhase, LevelSession, PoiKind, SessionEvent};
use super::timers::Deferred;

/// Input intents sampled by the host for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Interact key edge (pressed this tick)
    pub interact: bool,
    /// Manual restart key edge
    pub reset: bool,
    /// Pause key edge
    pub pause: bool,
    /// Mouse X movement in pixels since last tick
    pub aim_delta: f32,
    /// Debug: refill the flashlight
    pub recharge_light: bool,
    /// Debug: kill the flashlight and most of the darkness buffer
    pub drain_light: bool,
}

/// Advance the session by one tick
pub fn tick(session: &mut LevelSession, input: &TickInput) {
    if input.pause {
        match session.phase {
            LevelPhase::Active => {
                session.phase = LevelPhase::Paused;
                return;
            }
            LevelPhase::Paused => session.phase = LevelPhase::Active,
            _ => {}
        }
    }
    if session.phase == LevelPhase::Paused || session.phase == LevelPhase::Completed {
        return;
    }

    if input.reset {
        session.reset();
        session.events.push(SessionEvent::LevelReset);
    }

    session.time_ticks += 1;

    run_deferred(session);

    if session.phase == LevelPhase::Intro {
        if let Some(text) = session.config.intro_text.clone() {
            session.events.push(SessionEvent::IntroShown(text));
            session
                .scheduler
                .schedule(session.time_ticks, INTRO_TICKS, Deferred::HideIntro);
        }
        session.phase = LevelPhase::Active;
    }

    session.actor.aim += input.aim_delta * AIM_ROTATION_SPEED;

    if input.recharge_light {
        session.timers.charge.set(CHARGE_FULL);
        session.timers.bounce.set(BOUNCE_FULL);
    }
    if input.drain_light {
        session.timers.charge.set(CHARGE_THRESHOLD - 1.0);
        session.timers.darkness.set(10.0);
    }

    run_survival(session);

    if session.phase == LevelPhase::Active && survival_failed(session) {
        session.phase = LevelPhase::Dying;
        session.timers.reset.set(RESET_TICKS);
        session.timers.darkness.set(0.0);
    }

    match session.phase {
        LevelPhase::Dying => run_dying(session),
        LevelPhase::Active => run_active(session, input),
        _ => {}
    }
}

fn run_deferred(session: &mut LevelSession) {
    let mut due = Vec::new();
    session.scheduler.fire_due(session.time_ticks, &mut due);
    for deferred in due {
        match deferred {
            Deferred::HideMessage => {
                session.message = None;
                session.hide_message_token = None;
            }
            Deferred::HideIntro => session.events.push(SessionEvent::IntroHidden),
            Deferred::DeathPopup => session.events.push(SessionEvent::DeathPopup),
            Deferred::RearmItemHum => session.item_hum_armed = true,
        }
    }
}

fn run_survival(session: &mut LevelSession) {
    match session.config.survival {
        SurvivalRule::Flashlight => session.timers.tick_survival(&mut session.rng),
        SurvivalRule::Hearts { drain_interval_ticks, .. } => {
            if session.timers.heart_drain.value() <= 0.0 {
                session.timers.heart_drain.set(drain_interval_ticks as f32);
            }
            session.timers.heart_drain.advance(-1.0);
            if session.timers.heart_drain.crossed_zero() {
                session.hearts = session.hearts.saturating_sub(1);
                session
                    .events
                    .push(SessionEvent::HeartLost { hearts_left: session.hearts });
            }
        }
    }
}

fn survival_failed(session: &LevelSession) -> bool {
    match session.config.survival {
        SurvivalRule::Flashlight => session.timers.darkness.expired(),
        SurvivalRule::Hearts { .. } => session.hearts == 0 || session.timers.darkness.expired(),
    }
}

fn run_dying(session: &mut LevelSession) {
    if !session.death_sound_played {
        session.death_sound_played = true;
        session.events.push(SessionEvent::DeathStarted);
        log::info!("death in {} after {:.1}s", session.config.name, session.elapsed_secs());
    }
    if !session.death_popup_scheduled {
        session.death_popup_scheduled = true;
        session
            .scheduler
            .schedule(session.time_ticks, DEATH_POPUP_DELAY_TICKS, Deferred::DeathPopup);
    }
    session.timers.charge.set(0.0);
    session.timers.bounce.set(0.0);

    if let Some(fall) = session.fall.as_mut() {
        fall.advance(&mut session.actor.position);
    }

    session.timers.reset.advance(-RESET_DRAIN);
    if session.timers.reset.crossed_zero() {
        session.reset();
        session.events.push(SessionEvent::LevelReset);
    }
}

fn run_active(session: &mut LevelSession, input: &TickInput) {
    let attempts = [
        (input.forward, MoveDir::Forward),
        (input.backward, MoveDir::Backward),
        (input.left, MoveDir::Left),
        (input.right, MoveDir::Right),
    ];
    let mut moved = false;
    for (held, dir) in attempts {
        if !held {
            continue;
        }
        session.actor.facing = dir.facing();
        let outcome = try_move(
            &session.actor,
            dir,
            session.config.move_speed,
            &session.obstacles,
            session.config.safe_zone_half_extent,
        );
        if outcome.accepted {
            session.actor.position = outcome.position;
            session.trail.push(outcome.position / session.config.trail_scale);
            moved = true;
        } else {
            session.events.push(SessionEvent::WallBump);
        }
    }
    if moved != session.was_moving {
        session.events.push(if moved {
            SessionEvent::FootstepsStarted
        } else {
            SessionEvent::FootstepsStopped
        });
        session.was_moving = moved;
    }

    let pos = session.actor.position;
    session.at_chest = first_poi_index_in_range(pos, &session.pois, PoiKind::Chest);
    session.at_item = first_poi_index_in_range(pos, &session.pois, PoiKind::Item);

    run_ambience(session);

    if input.interact {
        on_interact(session);
    }

    for hazard in &mut session.hazards {
        hazard.advance();
    }
    let contact = session
        .hazards
        .iter()
        .position(|h| h.near(session.actor.position));
    if let Some(index) = contact {
        let off_cooldown = session
            .last_hazard_hit
            .is_none_or(|last| session.time_ticks - last >= HAZARD_COOLDOWN_TICKS);
        if off_cooldown {
            session.last_hazard_hit = Some(session.time_ticks);
            apply_hazard_damage(session, index);
        }
    }

    for poi in &mut session.pois {
        if !poi.consumed {
            poi.spin += POI_SPIN_RATE;
        }
    }
}

fn run_ambience(session: &mut LevelSession) {
    let pos = session.actor.position;

    if session.item_hum_armed {
        let near_item = session.pois.iter().any(|p| {
            p.kind == PoiKind::Item && !p.consumed && within_radius(pos, p.position, ITEM_HUM_RADIUS)
        });
        if near_item {
            session.item_hum_armed = false;
            session.events.push(SessionEvent::ItemHum);
            session
                .scheduler
                .schedule(session.time_ticks, ITEM_HUM_REARM_TICKS, Deferred::RearmItemHum);
        }
    }

    let mut cues = Vec::new();
    for poi in &mut session.pois {
        if poi.kind == PoiKind::Chest
            && !poi.hum_played
            && within_radius(pos, poi.position, CHEST_HUM_RADIUS)
        {
            poi.hum_played = true;
            cues.push(SessionEvent::ChestHum { id: poi.id });
        }
    }
    session.events.extend(cues);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{ChestDef, ChestEffect, HazardDef, ItemDef, LevelConfig, TimerDefaults};
    use glam::Vec3;

    fn open_field() -> LevelConfig {
        LevelConfig {
            name: "test".into(),
            spawn: Vec3::ZERO,
            move_speed: 0.75,
            actor_half_extents: Vec3::new(4.0, 10.0, 4.0),
            safe_zone_half_extent: 30.0,
            trail_scale: 20.0,
            item_radius: 30.0,
            chest_radius: 30.0,
            chest_effect: ChestEffect::RechargeLight,
            chest_message: None,
            survival: SurvivalRule::Flashlight,
            intro_text: None,
            items: vec![ItemDef { position: Vec3::new(500.0, 0.0, 0.0), description: "x".into() }],
            chests: vec![ChestDef { position: Vec3::new(-500.0, 0.0, 0.0) }],
            hazards: Vec::new(),
            timer_defaults: TimerDefaults::default(),
            next_level: 1,
        }
    }

    fn session() -> LevelSession {
        LevelSession::new(open_field(), 42)
    }

    #[test]
    fn test_forward_walk_accumulates() {
        let mut session = session();
        let input = TickInput { forward: true, ..TickInput::default() };
        for _ in 0..200 {
            tick(&mut session, &input);
        }
        assert!((session.actor.position.z - (-0.75 * 200.0)).abs() < 1e-3);
        assert_eq!(session.actor.position.x, 0.0);
        assert_eq!(session.trail.len(), 200);
        assert_eq!(session.actor.facing, 0.0);
    }

    #[test]
    fn test_footstep_edges() {
        let mut session = session();
        let walking = TickInput { forward: true, ..TickInput::default() };
        tick(&mut session, &walking);
        tick(&mut session, &walking);
        tick(&mut session, &TickInput::default());
        let events = session.take_events();
        let starts = events.iter().filter(|e| **e == SessionEvent::FootstepsStarted).count();
        let stops = events.iter().filter(|e| **e == SessionEvent::FootstepsStopped).count();
        assert_eq!(starts, 1);
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_item_collection_flow() {
        let mut session = session();
        session.actor.position = Vec3::new(500.0, 0.0, 0.0);
        tick(&mut session, &TickInput { interact: true, ..TickInput::default() });
        assert_eq!(session.collected, 1);
        assert!(session.pois[0].consumed);
        assert_eq!(session.message.as_deref(), Some("x"));
        // single item level completes immediately
        assert_eq!(session.phase, LevelPhase::Completed);
        let events = session.take_events();
        assert!(events.contains(&SessionEvent::ItemCollected { id: 0 }));
        assert!(events.contains(&SessionEvent::LevelCompleted { next_level: 1 }));
    }

    #[test]
    fn test_completed_freezes_movement() {
        let mut session = session();
        session.phase = LevelPhase::Completed;
        let before = session.actor.position;
        let ticks_before = session.time_ticks;
        tick(&mut session, &TickInput { forward: true, ..TickInput::default() });
        assert_eq!(session.actor.position, before);
        assert_eq!(session.time_ticks, ticks_before);
    }

    #[test]
    fn test_darkness_death_resets_once() {
        let mut session = session();
        session.timers.charge.set(0.0);
        session.timers.darkness.set(0.05);
        let input = TickInput::default();
        tick(&mut session, &input);
        assert_eq!(session.phase, LevelPhase::Dying);
        let expected = (RESET_TICKS / RESET_DRAIN).ceil() as usize;
        let mut resets = 0;
        for _ in 0..expected + 120 {
            tick(&mut session, &input);
            resets += session
                .take_events()
                .iter()
                .filter(|e| **e == SessionEvent::LevelReset)
                .count();
        }
        assert_eq!(resets, 1);
        assert_eq!(session.phase, LevelPhase::Active);
        assert_eq!(session.timers.darkness.value(), DARKNESS_FULL);
    }

    #[test]
    fn test_death_popup_after_delay() {
        let mut session = session();
        session.timers.charge.set(0.0);
        session.timers.darkness.set(0.05);
        let input = TickInput::default();
        tick(&mut session, &input);
        let mut popup_at = None;
        for i in 0..200u64 {
            tick(&mut session, &input);
            if session.take_events().contains(&SessionEvent::DeathPopup) {
                popup_at = Some(i + 1);
                break;
            }
        }
        assert_eq!(popup_at, Some(DEATH_POPUP_DELAY_TICKS));
    }

    #[test]
    fn test_pause_toggles() {
        let mut session = session();
        tick(&mut session, &TickInput::default());
        let ticks = session.time_ticks;
        tick(&mut session, &TickInput { pause: true, ..TickInput::default() });
        assert_eq!(session.phase, LevelPhase::Paused);
        tick(&mut session, &TickInput::default());
        assert_eq!(session.time_ticks, ticks);
        tick(&mut session, &TickInput { pause: true, ..TickInput::default() });
        assert_eq!(session.phase, LevelPhase::Active);
    }

    #[test]
    fn test_intro_emitted_once_then_hidden() {
        let mut session = LevelSession::new(LevelConfig::inferno(), 3);
        let input = TickInput::default();
        tick(&mut session, &input);
        let events = session.take_events();
        assert!(matches!(events.first(), Some(SessionEvent::IntroShown(_))));
        assert_eq!(session.phase, LevelPhase::Active);
        let mut hidden = false;
        for _ in 0..INTRO_TICKS + 1 {
            tick(&mut session, &input);
            if session.take_events().contains(&SessionEvent::IntroHidden) {
                hidden = true;
                break;
            }
        }
        assert!(hidden);
    }

    #[test]
    fn test_heart_drain_interval() {
        let mut config = open_field();
        config.survival = SurvivalRule::Hearts { start: 5, drain_interval_ticks: 100 };
        let mut session = LevelSession::new(config, 0);
        let input = TickInput::default();
        for _ in 0..100 {
            tick(&mut session, &input);
        }
        assert_eq!(session.hearts, 4);
        for _ in 0..100 {
            tick(&mut session, &input);
        }
        assert_eq!(session.hearts, 3);
    }

    #[test]
    fn test_hazard_contact_cooldown() {
        let mut config = open_field();
        config.survival = SurvivalRule::Hearts { start: 5, drain_interval_ticks: 1_000_000 };
        // degenerate patrol pinned to the spawn point
        config.hazards = vec![HazardDef {
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            radius: 10.0,
            min_speed: 0.1,
            max_speed: 2.0,
            acceleration: 0.05,
        }];
        let mut session = LevelSession::new(config, 0);
        let input = TickInput::default();
        for _ in 0..HAZARD_COOLDOWN_TICKS as usize {
            tick(&mut session, &input);
        }
        assert_eq!(session.hearts, 4);
        tick(&mut session, &input);
        assert_eq!(session.hearts, 3);
    }

    #[test]
    fn test_item_message_hides_after_window() {
        let mut session = session();
        session.actor.position = Vec3::new(500.0, 0.0, 0.0);
        // keep the session out of Completed so the message window runs
        session.config.items.push(ItemDef {
            position: Vec3::new(900.0, 0.0, 900.0),
            description: "y".into(),
        });
        tick(&mut session, &TickInput { interact: true, ..TickInput::default() });
        assert!(session.message.is_some());
        for _ in 0..ITEM_MESSAGE_TICKS {
            tick(&mut session, &TickInput::default());
        }
        assert!(session.message.is_none());
    }

    #[test]
    fn test_manual_reset_restores_spawn() {
        let mut session = session();
        let walk = TickInput { forward: true, ..TickInput::default() };
        for _ in 0..50 {
            tick(&mut session, &walk);
        }
        tick(&mut session, &TickInput { reset: true, ..TickInput::default() });
        assert_eq!(session.actor.position, Vec3::ZERO);
        assert!(session.trail.is_empty());
        assert!(session.take_events().contains(&SessionEvent::LevelReset));
    }

    #[test]
    fn test_chest_hum_once_per_run() {
        let mut session = session();
        session.actor.position = Vec3::new(-500.0, 0.0, 0.0);
        let input = TickInput::default();
        tick(&mut session, &input);
        tick(&mut session, &input);
        let hums = session
            .take_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::ChestHum { .. }))
            .count();
        assert_eq!(hums, 1);
        session.reset();
        session.actor.position = Vec3::new(-500.0, 0.0, 0.0);
        tick(&mut session, &input);
        assert!(session
            .take_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::ChestHum { .. })));
    }

    #[test]
    fn test_ui_signals_reflect_proximity_and_message() {
        let mut session = session();
        let input = TickInput::default();
        tick(&mut session, &input);
        let signals = session.ui_signals();
        assert!(!signals.interact_prompt);
        assert_eq!(signals.vignette, 0.0);

        session.actor.position = Vec3::new(500.0, 0.0, 0.0);
        tick(&mut session, &input);
        assert!(session.ui_signals().interact_prompt);

        tick(&mut session, &TickInput { interact: true, ..TickInput::default() });
        assert_eq!(session.ui_signals().message.as_deref(), Some("x"));
    }

    #[test]
    fn test_poi_spin_stops_when_consumed() {
        let mut session = session();
        session.pois[0].consumed = true;
        let input = TickInput::default();
        tick(&mut session, &input);
        assert_eq!(session.pois[0].spin, 0.0);
        assert!(session.pois[1].spin > 0.0);
    }
}
