//! Boundary lines in the ground plane.
//!
//! A [`Bound`] is the finite offset line of one side of one segment. The
//! solver intersects the infinite lines through two bounds; parallel lines
//! yield [`Intersection::Parallel`] instead of a point.

use crate::config::GroundPlane;
use glam::{DVec2, DVec3};

// =============================================================================
// BOUND
// =============================================================================

/// Finite boundary line from `start` to `end`.
///
/// At a junction `start` is the far endpoint (at the outer node) and `end`
/// sits at the junction node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// Far endpoint, "A" in the on-segment test.
    pub start: DVec3,
    /// Near endpoint, "B" in the on-segment test.
    pub end: DVec3,
}

impl Bound {
    /// Creates a bound.
    pub fn new(start: DVec3, end: DVec3) -> Self {
        Self { start, end }
    }

    /// Whether `point` lies strictly between `start` and `end`.
    ///
    /// Accepts when `|p − A| / |B − A| < 1` and `(B − A) · (p − A) > 0`,
    /// so both endpoints, points behind `start` and points past `end` are
    /// rejected. A bound shorter than `tolerance` accepts nothing.
    pub fn contains(&self, point: DVec3, plane: &GroundPlane, tolerance: f64) -> bool {
        let a = plane.project(self.start);
        let ab = plane.project(self.end) - a;
        let ap = plane.project(point) - a;
        let length = ab.length();
        if length <= tolerance {
            return false;
        }
        ap.length() / length < 1.0 && ab.dot(ap) > 0.0
    }

    /// Planar direction from `start` to `end` (not normalized).
    #[inline]
    pub fn direction(&self, plane: &GroundPlane) -> DVec2 {
        plane.project(self.end) - plane.project(self.start)
    }
}

// =============================================================================
// INTERSECTION
// =============================================================================

/// Result of intersecting two infinite lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection {
    /// Lines cross at this point (lifted to the requested height).
    Point(DVec3),
    /// Lines are parallel or one of them is degenerate.
    Parallel,
}

impl Intersection {
    /// The crossing point, if any.
    #[inline]
    pub fn point(self) -> Option<DVec3> {
        match self {
            Intersection::Point(p) => Some(p),
            Intersection::Parallel => None,
        }
    }

    /// Whether the lines were parallel.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Intersection::Parallel)
    }
}

/// Intersects the infinite lines through `first` and `second`.
///
/// Each line is written as `a·x + b·z = c` in planar coordinates and the
/// 2×2 system is solved by Cramer's rule. The determinant `a1·b2 − a2·b1`
/// is compared against `tolerance` scaled by both line lengths, which makes
/// the parallel test independent of segment length. The result is lifted
/// back to `height` along the plane's up axis.
///
/// # Examples
/// ```
/// use road_geometry::config::GroundPlane;
/// use road_geometry::core::line::{intersect_lines, Bound, Intersection};
/// use glam::DVec3;
///
/// let plane = GroundPlane::default();
/// let a = Bound::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0));
/// let b = Bound::new(DVec3::new(0.0, 0.0, -1.0), DVec3::new(0.0, 0.0, 1.0));
/// assert_eq!(intersect_lines(&a, &b, &plane, 1e-9, 0.0), Intersection::Point(DVec3::ZERO));
/// ```
pub fn intersect_lines(
    first: &Bound,
    second: &Bound,
    plane: &GroundPlane,
    tolerance: f64,
    height: f64,
) -> Intersection {
    let (a, b) = (plane.project(first.start), plane.project(first.end));
    let (c, d) = (plane.project(second.start), plane.project(second.end));

    // Line AB as a1·x + b1·z = c1
    let a1 = b.y - a.y;
    let b1 = a.x - b.x;
    let c1 = a1 * a.x + b1 * a.y;

    // Line CD as a2·x + b2·z = c2
    let a2 = d.y - c.y;
    let b2 = c.x - d.x;
    let c2 = a2 * c.x + b2 * c.y;

    let determinant = a1 * b2 - a2 * b1;
    let scale = (b - a).length() * (d - c).length();
    if determinant.abs() <= tolerance * scale || scale <= tolerance {
        return Intersection::Parallel;
    }

    let x = (b2 * c1 - b1 * c2) / determinant;
    let z = (a1 * c2 - a2 * c1) / determinant;
    Intersection::Point(plane.lift(DVec2::new(x, z), height))
}

/// Line through `anchor` perpendicular to `direction` within the plane.
///
/// Used to trim a boundary square to its segment when no pairwise
/// intersection exists on that side.
pub fn perpendicular_through(anchor: DVec3, direction: DVec2, plane: &GroundPlane) -> Bound {
    let normal = DVec2::new(-direction.y, direction.x);
    let height = plane.height(anchor);
    let end = plane.lift(plane.project(anchor) + normal, height);
    Bound::new(anchor, end)
}
