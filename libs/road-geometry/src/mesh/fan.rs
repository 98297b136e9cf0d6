//! Junction caps.

use super::MeshBuffer;
use crate::config::GroundPlane;
use config::constants::DEGENERATE_UV;
use glam::{DVec2, DVec3};

/// Fans a clockwise-sorted polygon from `center`.
///
/// The center is vertex 0; triangle `i` is `[0, i, i + 1]` with the last one
/// wrapping back to vertex 1. UVs map the polygon's planar bounding box to
/// the unit square; an axis with zero extent maps to 0.5. Polygons with
/// fewer than three points produce an empty mesh.
pub fn build_fan(center: DVec3, polygon: &[DVec3], plane: &GroundPlane) -> MeshBuffer {
    let count = polygon.len();
    if count < 3 {
        return MeshBuffer::new();
    }

    let planar: Vec<DVec2> = polygon.iter().map(|&p| plane.project(p)).collect();
    let (min, max) = planar
        .iter()
        .fold((planar[0], planar[0]), |(min, max), &p| (min.min(p), max.max(p)));
    let extent = max - min;
    let normalize = |value: f64, low: f64, size: f64| {
        if size > 0.0 {
            (value - low) / size
        } else {
            DEGENERATE_UV
        }
    };
    let uv = |p: DVec2| DVec2::new(normalize(p.x, min.x, extent.x), normalize(p.y, min.y, extent.y));

    let mut mesh = MeshBuffer::with_capacity(count + 1, count);
    mesh.add_vertex(center, uv(plane.project(center)));
    for (&point, &flat) in polygon.iter().zip(&planar) {
        mesh.add_vertex(point, uv(flat));
    }

    let count = count as u32;
    for i in 1..=count {
        let next = if i == count { 1 } else { i + 1 };
        mesh.add_triangle(0, i, next);
    }
    mesh
}
