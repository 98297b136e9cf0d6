//! Road strips.
//!
//! A strip interleaves the left and right boundary point of every node:
//!
//! ```text
//! l0 ── l1 ── l2        vertices: l0 r0 l1 r1 l2 r2
//! │  ╲  │  ╲  │         quad i:   [l_i, l_i+1, r_i]
//! r0 ── r1 ── r2                  [r_i, l_i+1, r_i+1]
//! ```
//!
//! `u` is 0 on the left and 1 on the right. `v = 1 − |2t − 1|` with `t` the
//! arc-length fraction along the centerline, so `v` peaks at 1 mid-span.

use super::MeshBuffer;
use crate::config::RoadConfig;
use crate::offset::offset_polyline;
use glam::{DVec2, DVec3};

/// Arc-length fraction of each center point, falling back to the index
/// fraction when the span has no planar length.
fn arc_fractions(centers: &[DVec3], config: &RoadConfig) -> Vec<f64> {
    let plane = &config.plane;
    let mut cumulative = Vec::with_capacity(centers.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in centers.windows(2) {
        total += (plane.project(pair[1]) - plane.project(pair[0])).length();
        cumulative.push(total);
    }

    if total <= config.tolerance {
        let last = (centers.len() - 1) as f64;
        return (0..centers.len()).map(|i| i as f64 / last).collect();
    }
    cumulative.into_iter().map(|d| d / total).collect()
}

/// Builds a strip over `centers` with the given boundary points.
///
/// All three slices must have the same length of at least 2; anything
/// else yields an empty mesh.
pub fn build_strip(centers: &[DVec3], lefts: &[DVec3], rights: &[DVec3], config: &RoadConfig) -> MeshBuffer {
    let count = centers.len();
    if count < 2 || lefts.len() != count || rights.len() != count {
        return MeshBuffer::new();
    }

    let mut mesh = MeshBuffer::with_capacity(count * 2, (count - 1) * 2);
    for ((&left, &right), t) in lefts.iter().zip(rights).zip(arc_fractions(centers, config)) {
        let v = 1.0 - (2.0 * t - 1.0).abs();
        mesh.add_vertex(left, DVec2::new(0.0, v));
        mesh.add_vertex(right, DVec2::new(1.0, v));
    }

    for i in 0..(count as u32 - 1) {
        let (l0, r0) = (2 * i, 2 * i + 1);
        let (l1, r1) = (l0 + 2, r0 + 2);
        mesh.add_triangle(l0, l1, r0);
        mesh.add_triangle(r0, l1, r1);
    }
    mesh
}

/// Offsets and triangulates a free polyline as one strip.
///
/// # Examples
/// ```
/// use road_geometry::config::RoadConfig;
/// use road_geometry::mesh::road_mesh_from_polyline;
/// use glam::DVec3;
///
/// let points = [DVec3::ZERO, DVec3::new(0.0, 0.0, 5.0), DVec3::new(5.0, 0.0, 10.0)];
/// let mesh = road_mesh_from_polyline(&points, 3.0, &RoadConfig::default());
/// assert_eq!(mesh.vertex_count(), 6);
/// assert_eq!(mesh.triangle_count(), 4);
/// ```
pub fn road_mesh_from_polyline(points: &[DVec3], width: f64, config: &RoadConfig) -> MeshBuffer {
    let offsets = offset_polyline(points, width, config);
    let lefts: Vec<DVec3> = offsets.iter().map(|o| o.left).collect();
    let rights: Vec<DVec3> = offsets.iter().map(|o| o.right).collect();
    build_strip(points, &lefts, &rights, config)
}
