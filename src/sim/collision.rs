//! Tentative-move collision resolution
//!
//! Movement is resolved per held direction: apply the delta, rebuild the
//! player hull, test it against every obstacle volume, and either commit the
//! new position or roll back. Inside the spawn safe zone collisions are
//! ignored so the player can never be wedged at spawn by streamed-in
//! geometry.

use std::f32::consts::PI;

use glam::Vec3;

use super::state::{Actor, ObstacleSet};

/// One of the four held movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveDir {
    /// World-space delta for one tick at `speed`
    pub fn delta(self, speed: f32) -> Vec3 {
        match self {
            MoveDir::Forward => Vec3::new(0.0, 0.0, -speed),
            MoveDir::Backward => Vec3::new(0.0, 0.0, speed),
            MoveDir::Left => Vec3::new(-speed, 0.0, 0.0),
            MoveDir::Right => Vec3::new(speed, 0.0, 0.0),
        }
    }

    /// Facing snap angle for this direction
    pub fn facing(self) -> f32 {
        match self {
            MoveDir::Forward => 0.0,
            MoveDir::Backward => PI,
            MoveDir::Left => -PI / 2.0,
            MoveDir::Right => PI / 2.0,
        }
    }
}

/// Outcome of a single movement attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub position: Vec3,
}

/// Attempt one direction of movement for this tick
///
/// Does not mutate the actor; the caller commits `position` on accept.
pub fn try_move(
    actor: &Actor,
    dir: MoveDir,
    speed: f32,
    obstacles: &ObstacleSet,
    safe_zone_half_extent: f32,
) -> MoveOutcome {
    let candidate = actor.position + dir.delta(speed);

    let in_safe_zone =
        candidate.x.abs() <= safe_zone_half_extent && candidate.z.abs() <= safe_zone_half_extent;
    if in_safe_zone {
        return MoveOutcome { accepted: true, position: candidate };
    }

    let hull = actor.bounding_box_at(candidate);
    let blocked = obstacles.iter().any(|volume| hull.intersects(volume));
    if blocked {
        MoveOutcome { accepted: false, position: actor.position }
    } else {
        MoveOutcome { accepted: true, position: candidate }
    }
}
