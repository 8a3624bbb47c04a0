//! Planar proximity queries
//!
//! Everything in the world stands on (or hovers near) the ground plane, so
//! range checks ignore the y axis entirely.

use glam::Vec3;

use crate::planar_distance;

use super::state::{Poi, PoiKind};

/// True when `b` is within `radius` of `a` in the x/z plane
#[inline]
pub fn within_radius(a: Vec3, b: Vec3, radius: f32) -> bool {
    planar_distance(a, b) <= radius
}

/// Index of the first unconsumed POI of `kind` in range of `pos`
///
/// Scans in seeding order and returns the first hit, not the nearest. With
/// overlapping radii the earlier-seeded POI always wins; callers rely on
/// this tie-break being stable.
pub fn first_poi_index_in_range(pos: Vec3, pois: &[Poi], kind: PoiKind) -> Option<usize> {
    pois.iter()
        .position(|p| p.kind == kind && !p.consumed && within_radius(pos, p.position, p.radius))
}

/// Reference variant of [`first_poi_index_in_range`]
pub fn first_poi_in_range(pos: Vec3, pois: &[Poi], kind: PoiKind) -> Option<&Poi> {
    first_poi_index_in_range(pos, pois, kind).map(|i| &pois[i])
}
