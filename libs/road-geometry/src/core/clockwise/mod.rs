//! Angular ordering of points around an origin.
//!
//! Points are ordered by `atan2(x, z)` of their planar offset from the
//! origin (angle measured from the forward axis toward the right axis).
//! Equal angles fall back to squared distance, closer first. The order is
//! total, so it can drive `sort_by` directly.

use crate::config::GroundPlane;
use glam::{DVec2, DVec3};
use std::cmp::Ordering;

/// Comparator over points around a fixed origin.
///
/// # Examples
/// ```
/// use road_geometry::config::GroundPlane;
/// use road_geometry::core::clockwise::ClockwiseOrder;
/// use glam::DVec3;
/// use std::cmp::Ordering;
///
/// let order = ClockwiseOrder::new(DVec3::ZERO, GroundPlane::default());
/// let forward = DVec3::new(0.0, 0.0, 1.0);
/// let right = DVec3::new(1.0, 0.0, 0.0);
/// assert_eq!(order.compare(forward, right), Ordering::Less);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockwiseOrder {
    origin: DVec2,
    plane: GroundPlane,
}

impl ClockwiseOrder {
    /// Creates a comparator around `origin`.
    pub fn new(origin: DVec3, plane: GroundPlane) -> Self {
        Self {
            origin: plane.project(origin),
            plane,
        }
    }

    /// Planar offset of `point` from the origin.
    #[inline]
    fn offset(&self, point: DVec3) -> DVec2 {
        self.plane.project(point) - self.origin
    }

    /// Angle of `point` in `[−π, π]`.
    #[inline]
    pub fn angle(&self, point: DVec3) -> f64 {
        let offset = self.offset(point);
        offset.x.atan2(offset.y)
    }

    /// Compares two points by angle, then by distance from the origin.
    pub fn compare(&self, first: DVec3, second: DVec3) -> Ordering {
        if first == second {
            return Ordering::Equal;
        }

        let first_offset = self.offset(first);
        let second_offset = self.offset(second);

        let first_angle = first_offset.x.atan2(first_offset.y);
        let second_angle = second_offset.x.atan2(second_offset.y);

        first_angle
            .total_cmp(&second_angle)
            .then_with(|| first_offset.length_squared().total_cmp(&second_offset.length_squared()))
    }
}

/// Sorts points clockwise around `origin`.
pub fn sort_clockwise(points: &mut [DVec3], origin: DVec3, plane: GroundPlane) {
    let order = ClockwiseOrder::new(origin, plane);
    points.sort_by(|a, b| order.compare(*a, *b));
}

/// Indices of `points` in clockwise order around `origin`.
///
/// Used to order the outer nodes of a junction without moving the
/// segments they belong to.
pub fn clockwise_indices(points: &[DVec3], origin: DVec3, plane: GroundPlane) -> Vec<usize> {
    let order = ClockwiseOrder::new(origin, plane);
    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.sort_by(|&a, &b| order.compare(points[a], points[b]));
    indices
}
