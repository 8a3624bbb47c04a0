//! Patrolling hazards
//!
//! Ghosts and angels shuttle between two endpoints: accelerate on the open
//! stretch, slow down proportionally inside the approach range, flip at the
//! endpoint and start over at minimum speed. Contact damage is applied by the
//! tick loop, gated by a shared cooldown.

use glam::Vec3;

use crate::consts::HAZARD_SLOWDOWN_RANGE;
use crate::level::HazardDef;
use crate::planar_distance;

use super::proximity::within_radius;

#[derive(Debug, Clone)]
pub struct Hazard {
    pub position: Vec3,
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// True while heading toward `end`
    pub toward_end: bool,
}

impl Hazard {
    pub fn from_def(def: &HazardDef) -> Self {
        Self {
            position: def.start,
            start: def.start,
            end: def.end,
            radius: def.radius,
            speed: def.min_speed,
            min_speed: def.min_speed,
            max_speed: def.max_speed,
            acceleration: def.acceleration,
            toward_end: true,
        }
    }

    /// One tick of patrol motion
    pub fn advance(&mut self) {
        let target = if self.toward_end { self.end } else { self.start };
        let remaining = planar_distance(self.position, target);

        if remaining < self.speed {
            // arrival: flip and restart slow, exactly once per approach
            self.position = target;
            self.toward_end = !self.toward_end;
            self.speed = self.min_speed;
            return;
        }

        if remaining < HAZARD_SLOWDOWN_RANGE {
            self.speed = self.min_speed
                + (self.max_speed - self.min_speed) * (remaining / HAZARD_SLOWDOWN_RANGE);
        } else {
            self.speed = (self.speed + self.acceleration).clamp(self.min_speed, self.max_speed);
        }

        let step = (target - self.position).normalize_or_zero() * self.speed;
        self.position += step;
    }

    pub fn near(&self, pos: Vec3) -> bool {
        within_radius(self.position, pos, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patrol() -> Hazard {
        Hazard::from_def(&HazardDef {
            start: Vec3::ZERO,
            end: Vec3::new(0.0, 0.0, 120.0),
            radius: 10.0,
            min_speed: 0.1,
            max_speed: 2.0,
            acceleration: 0.05,
        })
    }

    #[test]
    fn test_accelerates_on_open_stretch() {
        let mut hazard = patrol();
        let before = hazard.speed;
        hazard.advance();
        assert!(hazard.speed > before);
        assert!(hazard.position.z > 0.0);
    }

    #[test]
    fn test_speed_clamped_to_max() {
        let mut hazard = patrol();
        // long enough run to exceed max without the clamp
        for _ in 0..60 {
            hazard.advance();
            assert!(hazard.speed <= hazard.max_speed + 1e-6);
        }
    }

    #[test]
    fn test_slows_inside_approach_range() {
        let mut hazard = patrol();
        hazard.position = Vec3::new(0.0, 0.0, 100.0);
        hazard.speed = 2.0;
        hazard.advance();
        // 20 units out of 50: speed lerps well below max
        assert!(hazard.speed < 1.0);
        assert!(hazard.speed >= hazard.min_speed);
    }

    #[test]
    fn test_flip_resets_to_min_exactly_once() {
        let mut hazard = patrol();
        let mut flips = 0;
        for _ in 0..2000 {
            let was_toward_end = hazard.toward_end;
            hazard.advance();
            if hazard.toward_end != was_toward_end {
                flips += 1;
                assert_eq!(hazard.speed, hazard.min_speed);
            }
        }
        assert!(flips >= 2, "patrol never completed a lap");
    }

    #[test]
    fn test_contact_radius_is_planar() {
        let hazard = patrol();
        assert!(hazard.near(Vec3::new(5.0, 300.0, 5.0)));
        assert!(!hazard.near(Vec3::new(11.0, 0.0, 0.0)));
    }
}
