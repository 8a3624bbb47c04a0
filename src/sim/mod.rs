//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (frame-locked per-tick deltas)
//! - Seeded RNG only
//! - Stable iteration order (by POI/hazard seeding order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod hazard;
pub mod interact;
pub mod proximity;
pub mod state;
pub mod tick;
pub mod timers;

pub use aabb::Aabb;
pub use collision::{MoveDir, MoveOutcome, try_move};
pub use hazard::Hazard;
pub use interact::on_interact;
pub use proximity::{first_poi_in_range, within_radius};
pub use state::{
    Actor, FallState, LevelPhase, LevelSession, ObstacleSet, Poi, PoiKind, SessionEvent, UiSignals,
};
pub use tick::{TickInput, tick};
pub use timers::{Deferred, EventToken, Scheduler, Timer, TimerBank};
