//! Frame-locked timers, the flashlight/darkness bank, and deferred one-shots
//!
//! Every gameplay countdown is a scalar advanced by a per-tick delta. Timers
//! may run negative for a tick; consumers clamp at the point of use. The
//! `Scheduler` replaces ad-hoc timeout chains with explicit tick deadlines
//! and cancellation tokens.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// A scalar countdown with edge detection across zero
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    value: f32,
    prev: f32,
}

impl Timer {
    pub fn new(value: f32) -> Self {
        Self { value, prev: value }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Hard set; does not produce a crossed-zero edge
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.prev = value;
    }

    pub fn advance(&mut self, delta: f32) {
        self.prev = self.value;
        self.value += delta;
    }

    /// True on the tick the value first reached or passed zero
    pub fn crossed_zero(&self) -> bool {
        self.prev > 0.0 && self.value <= 0.0
    }

    pub fn expired(&self) -> bool {
        self.value <= 0.0
    }
}

/// The coupled flashlight survival timers
///
/// While `charge` is above the dead threshold the light is alive: darkness
/// holds at full, charge and bounce drain, and each tick has a small chance
/// to arm a flicker. Once the charge dies, darkness drains instead.
#[derive(Debug, Clone)]
pub struct TimerBank {
    pub charge: Timer,
    pub bounce: Timer,
    pub darkness: Timer,
    pub flicker: Timer,
    pub reset: Timer,
    pub heart_drain: Timer,
}

impl TimerBank {
    pub fn from_defaults(defaults: &crate::level::TimerDefaults) -> Self {
        Self {
            charge: Timer::new(defaults.charge),
            bounce: Timer::new(defaults.bounce),
            darkness: Timer::new(defaults.darkness),
            flicker: Timer::new(0.0),
            reset: Timer::new(RESET_TICKS),
            heart_drain: Timer::new(0.0),
        }
    }

    /// One tick of the flashlight rule
    pub fn tick_survival(&mut self, rng: &mut Pcg32) {
        if self.charge.value() > CHARGE_THRESHOLD {
            self.darkness.set(DARKNESS_FULL);
            if self.flicker.value() <= 0.0 && rng.random::<f32>() < FLICKER_CHANCE {
                self.flicker.set(FLICKER_TICKS);
            }
            self.charge.advance(-CHARGE_DRAIN);
            self.bounce.advance(-BOUNCE_DRAIN);
        } else {
            self.darkness.advance(-DARKNESS_DRAIN);
        }
        if self.flicker.value() > 0.0 {
            self.flicker.advance(-1.0);
        }
    }

    /// Spot and bounce light intensities for the renderer
    ///
    /// The flicker waveform is latched: full / off phases play out from the
    /// armed countdown regardless of charge level.
    pub fn light_intensity(&self) -> (f32, f32) {
        let f = self.flicker.value();
        if f > 0.0 {
            if f > 25.0 {
                (self.charge.value().max(0.0), self.bounce.value().max(0.0))
            } else if f > 15.0 {
                (CHARGE_FULL, BOUNCE_FULL)
            } else if f > 5.0 {
                (LIGHT_OFF, LIGHT_OFF)
            } else if f > 1.0 {
                (CHARGE_FULL, BOUNCE_FULL)
            } else {
                (LIGHT_OFF, LIGHT_OFF)
            }
        } else {
            (self.charge.value().max(0.0), self.bounce.value().max(0.0))
        }
    }
}

/// Handle for cancelling a scheduled one-shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventToken(u64);

/// What a scheduled one-shot does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    HideMessage,
    HideIntro,
    DeathPopup,
    RearmItemHum,
}

#[derive(Debug, Clone)]
struct Pending {
    token: EventToken,
    due_tick: u64,
    kind: Deferred,
}

/// One-shot events scheduled against the tick counter
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
    next_token: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, kind: Deferred) -> EventToken {
        let token = EventToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Pending {
            token,
            due_tick: now + delay_ticks,
            kind,
        });
        token
    }

    /// Returns false if the one-shot already fired or was cancelled
    pub fn cancel(&mut self, token: EventToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drain everything due at or before `now`, in scheduling order
    pub fn fire_due(&mut self, now: u64, out: &mut Vec<Deferred>) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_tick <= now {
                out.push(self.pending.remove(i).kind);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn bank() -> TimerBank {
        TimerBank::from_defaults(&crate::level::TimerDefaults::default())
    }

    #[test]
    fn test_crossed_zero_fires_once() {
        let mut t = Timer::new(0.05);
        t.advance(-0.03);
        assert!(!t.crossed_zero());
        t.advance(-0.03);
        assert!(t.crossed_zero());
        t.advance(-0.03);
        assert!(!t.crossed_zero());
        assert!(t.expired());
    }

    #[test]
    fn test_set_suppresses_edge() {
        let mut t = Timer::new(5.0);
        t.set(-1.0);
        assert!(!t.crossed_zero());
    }

    #[test]
    fn test_charged_tick_holds_darkness() {
        let mut bank = bank();
        let mut rng = Pcg32::seed_from_u64(1);
        bank.tick_survival(&mut rng);
        assert_eq!(bank.darkness.value(), DARKNESS_FULL);
        assert!((bank.charge.value() - (CHARGE_FULL - CHARGE_DRAIN)).abs() < 1e-3);
    }

    #[test]
    fn test_dead_charge_drains_darkness() {
        let mut bank = bank();
        let mut rng = Pcg32::seed_from_u64(1);
        bank.charge.set(CHARGE_THRESHOLD - 1.0);
        bank.tick_survival(&mut rng);
        assert!((bank.darkness.value() - (DARKNESS_FULL - DARKNESS_DRAIN)).abs() < 1e-4);
        // charge does not drain further once dead
        assert_eq!(bank.charge.value(), CHARGE_THRESHOLD - 1.0);
    }

    #[test]
    fn test_flicker_waveform_phases() {
        let mut bank = bank();
        bank.flicker.set(FLICKER_TICKS);
        let mut saw_full = false;
        let mut saw_off = false;
        while bank.flicker.value() > 0.0 {
            let f = bank.flicker.value();
            let (spot, _) = bank.light_intensity();
            if f > 15.0 && f <= 25.0 {
                assert_eq!(spot, CHARGE_FULL);
                saw_full = true;
            }
            if f > 5.0 && f <= 15.0 {
                assert_eq!(spot, LIGHT_OFF);
                saw_off = true;
            }
            bank.flicker.advance(-1.0);
        }
        assert!(saw_full && saw_off);
        // back to charge-driven output
        let (spot, bounce) = bank.light_intensity();
        assert_eq!(spot, bank.charge.value());
        assert_eq!(bounce, bank.bounce.value());
    }

    #[test]
    fn test_light_intensity_clamps_negative() {
        let mut bank = bank();
        bank.charge.set(-50.0);
        bank.bounce.set(-1.0);
        assert_eq!(bank.light_intensity(), (0.0, 0.0));
    }

    #[test]
    fn test_scheduler_fires_in_order() {
        let mut sched = Scheduler::default();
        sched.schedule(0, 10, Deferred::HideIntro);
        sched.schedule(0, 5, Deferred::HideMessage);
        let mut out = Vec::new();
        sched.fire_due(4, &mut out);
        assert!(out.is_empty());
        sched.fire_due(10, &mut out);
        assert_eq!(out, vec![Deferred::HideIntro, Deferred::HideMessage]);
        out.clear();
        sched.fire_due(100, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_scheduler_cancel() {
        let mut sched = Scheduler::default();
        let a = sched.schedule(0, 5, Deferred::HideMessage);
        let b = sched.schedule(0, 5, Deferred::DeathPopup);
        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        let mut out = Vec::new();
        sched.fire_due(5, &mut out);
        assert_eq!(out, vec![Deferred::DeathPopup]);
        assert!(!sched.cancel(b));
    }
}
