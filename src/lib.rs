//! Commedia - simulation core for an afterlife-themed narrative walking game
//!
//! Core modules:
//! - `sim`: Deterministic fixed-tick simulation (movement, timers, interactions)
//! - `level`: Data-driven level configuration (Inferno / Purgatorio / Paradiso)
//!
//! Rendering, asset loading, audio playback, and page navigation live in the
//! embedding host. The core consumes movement intents and obstacle geometry,
//! and exposes positions, UI signals, and one-shot events each tick.

pub mod level;
pub mod sim;

pub use level::{ChestEffect, LevelConfig, SurvivalRule};
pub use sim::{LevelSession, SessionEvent, TickInput, UiSignals, tick};

use glam::Vec3;

/// Game pacing constants
///
/// All deltas are per-tick values: the simulation is frame-locked against a
/// nominal 60 Hz loop, and wall-clock durations convert at `TICK_HZ`.
pub mod consts {
    /// Nominal tick rate the timings were authored against
    pub const TICK_HZ: u32 = 60;

    /// Mouse X pixels to aim-angle radians
    pub const AIM_ROTATION_SPEED: f32 = 0.006;

    /// Flashlight charge (also the spotlight intensity while not flickering)
    pub const CHARGE_FULL: f32 = 5000.0;
    /// Below this the light counts as dead and darkness starts to accrue
    pub const CHARGE_THRESHOLD: f32 = 100.0;
    pub const CHARGE_DRAIN: f32 = 0.9;
    /// Bounce (fill) light intensity
    pub const BOUNCE_FULL: f32 = 100.0;
    pub const BOUNCE_DRAIN: f32 = 0.00018;
    /// Intensity output while a flicker phase has the light off
    pub const LIGHT_OFF: f32 = 1.0;

    /// Darkness / survival resource
    pub const DARKNESS_FULL: f32 = 100.0;
    pub const DARKNESS_DRAIN: f32 = 0.1;

    /// Flicker: armed with this many ticks, small chance per charged tick
    pub const FLICKER_TICKS: f32 = 30.0;
    pub const FLICKER_CHANCE: f32 = 0.006;

    /// Death sequence: reset countdown armed at 10, drained 0.03/tick
    pub const RESET_TICKS: f32 = 10.0;
    pub const RESET_DRAIN: f32 = 0.03;
    /// "You died" popup lands 1.8 s after the death sound
    pub const DEATH_POPUP_DELAY_TICKS: u64 = 108;

    /// Scripted fall when the trapped floor opens
    pub const FALL_JUMP_SPEED: f32 = 1.0;
    pub const FALL_GRAVITY: f32 = 0.05;

    /// Message display windows
    pub const ITEM_MESSAGE_TICKS: u64 = 600;
    pub const CHEST_MESSAGE_TICKS: u64 = 300;
    pub const INTRO_TICKS: u64 = 1500;

    /// Proximity ambience cues
    pub const ITEM_HUM_RADIUS: f32 = 100.0;
    pub const ITEM_HUM_REARM_TICKS: u64 = 1800;
    pub const CHEST_HUM_RADIUS: f32 = 70.0;

    /// Hazard contact
    pub const HAZARD_COOLDOWN_TICKS: u64 = 180;
    pub const HAZARD_SLOWDOWN_RANGE: f32 = 50.0;
    /// Charge drained per hazard contact while the light is alive
    pub const HAZARD_CHARGE_PENALTY: f32 = 500.0;
    /// Darkness drained per hazard contact once the light is dead
    pub const HAZARD_DARKNESS_PENALTY: f32 = 10.0;

    /// Obstacle volume pools stop growing past these counts
    pub const WALL_VOLUME_CAP: usize = 5000;
    pub const CHEST_VOLUME_CAP: usize = 1000;

    /// Cosmetic POI spin (radians per tick)
    pub const POI_SPIN_RATE: f32 = 0.025;
}

/// Planar distance between two points; the y axis is ignored
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Elapsed play time in seconds for a tick counter
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 / consts::TICK_HZ as f32
}
