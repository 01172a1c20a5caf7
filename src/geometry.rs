//! Geometric helpers for collision detection and stacking support.
//!
//! These functions operate on placed items and candidate boxes inside one
//! container and are the building blocks of the placement engine.

use crate::model::PlacedItem;
use crate::types::{BoundingBox, Vec3};

/// Checks whether a candidate box strictly overlaps any placed item.
///
/// Uses Axis-Aligned Bounding Box (AABB) collision detection. Boxes that
/// merely touch are not considered overlapping.
///
/// # Parameters
/// * `candidate` - Box to test
/// * `placed` - Items already in the container
/// * `epsilon` - Numerical tolerance for touching faces
pub fn overlaps_any(candidate: &BoundingBox, placed: &[PlacedItem], epsilon: f64) -> bool {
    placed
        .iter()
        .any(|p| p.bounding_box().intersects(candidate, epsilon))
}

/// Checks whether two placed items overlap in 3D.
pub fn intersects(a: &PlacedItem, b: &PlacedItem, epsilon: f64) -> bool {
    a.bounding_box().intersects(&b.bounding_box(), epsilon)
}

/// Calculates the overlap of two intervals in one dimension.
///
/// # Returns
/// Length of the overlap, at least 0.0
///
/// # Example
/// ```
/// use load_planner::geometry::overlap_1d;
///
/// assert_eq!(overlap_1d(0.0, 5.0, 3.0, 8.0), 2.0);
/// ```
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// Footprint area of `candidate` resting on top faces of placed items.
///
/// Only items whose top face lies at the candidate's bottom height (within
/// `height_epsilon`) contribute.
pub fn supported_area(candidate: &BoundingBox, placed: &[PlacedItem], height_epsilon: f64) -> f64 {
    let bottom = candidate.min.y;
    placed
        .iter()
        .filter(|p| (p.top_y() - bottom).abs() <= height_epsilon)
        .map(|p| p.bounding_box().overlap_area_xz(candidate))
        .sum()
}

/// Fraction of the candidate footprint supported from below.
///
/// A box resting on the floor is fully supported.
pub fn support_ratio(candidate: &BoundingBox, placed: &[PlacedItem], height_epsilon: f64) -> f64 {
    if candidate.min.y <= height_epsilon {
        return 1.0;
    }
    let footprint = candidate.dimensions().footprint_area();
    if footprint <= 0.0 {
        return 0.0;
    }
    supported_area(candidate, placed, height_epsilon) / footprint
}

/// Checks whether a point lies strictly inside any placed item.
///
/// Points on faces, edges or corners of an item are not inside.
pub fn point_inside_any(point: &Vec3, placed: &[PlacedItem], epsilon: f64) -> bool {
    placed
        .iter()
        .any(|p| p.bounding_box().contains_point_strictly(point, epsilon))
}
