//! # Boundary Offsetter
//!
//! Computes the left and right boundary points of every node of every road.
//!
//! ## Algorithm
//!
//! Walking the node sequence, `prev_perp` and `next_perp` are the unit
//! perpendiculars `cross(direction, up)` of the incoming and outgoing
//! segments (zero where the segment is missing). At each node:
//!
//! ```text
//! avg   = normalize(prev_perp + next_perp)
//! cos   = avg · next_perp          (avg · prev_perp at the last node)
//! left  = p + avg * (w / 2) / cos
//! right = p − avg * (w / 2) / cos
//! ```
//!
//! Endpoints have one zero perpendicular, so `avg` is the single available
//! one and `cos = 1`: a square cut. When `cos` drops under
//! `RoadConfig::min_miter_cos` (or the perpendiculars cancel out) the node
//! is square cut along `prev_perp` instead and a `DegenerateMiter`
//! diagnostic is recorded.

use crate::config::RoadConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{NodeIndex, RoadGraph, RoadIndex, SegmentKey};
use glam::DVec3;

// =============================================================================
// BOUNDARY RECORDS
// =============================================================================

/// Left and right boundary points at one node's end of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBoundary {
    /// Adjacent node the segment leads to.
    pub neighbor: NodeIndex,
    /// Point on the `cross(direction, up)` side.
    pub left: DVec3,
    /// Point on the opposite side.
    pub right: DVec3,
}

/// Result of offsetting one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeOffset {
    /// Left boundary point.
    pub left: DVec3,
    /// Right boundary point.
    pub right: DVec3,
    /// Whether the miter guard replaced the mitered offset.
    pub degenerate: bool,
}

/// Raw per-segment boundaries, written once by the offsetter.
///
/// Stored as a small list per node, one entry per incident segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOffsets {
    per_node: Vec<Vec<(RoadIndex, SegmentBoundary)>>,
}

impl RawOffsets {
    /// Creates an empty buffer for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            per_node: vec![Vec::new(); node_count],
        }
    }

    /// Stores the boundary of `road` at `node`, replacing any previous
    /// entry for the same segment key.
    pub fn insert(&mut self, road: RoadIndex, node: NodeIndex, boundary: SegmentBoundary) {
        let entries = &mut self.per_node[node];
        match entries
            .iter_mut()
            .find(|(r, b)| *r == road && b.neighbor == boundary.neighbor)
        {
            Some(entry) => entry.1 = boundary,
            None => entries.push((road, boundary)),
        }
    }

    /// Looks up a segment boundary.
    pub fn get(&self, key: SegmentKey) -> Option<&SegmentBoundary> {
        self.per_node
            .get(key.node)?
            .iter()
            .find(|(road, b)| *road == key.road && b.neighbor == key.neighbor)
            .map(|(_, b)| b)
    }

    /// Removes a segment boundary, returning it.
    pub fn remove(&mut self, key: SegmentKey) -> Option<SegmentBoundary> {
        let entries = self.per_node.get_mut(key.node)?;
        let position = entries
            .iter()
            .position(|(road, b)| *road == key.road && b.neighbor == key.neighbor)?;
        Some(entries.swap_remove(position).1)
    }

    /// Every boundary stored at `node`.
    pub fn at_node(&self, node: NodeIndex) -> &[(RoadIndex, SegmentBoundary)] {
        self.per_node.get(node).map_or(&[], Vec::as_slice)
    }

    /// Total number of stored boundaries.
    pub fn len(&self) -> usize {
        self.per_node.iter().map(Vec::len).sum()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.per_node.iter().all(Vec::is_empty)
    }
}

// =============================================================================
// OFFSETTING
// =============================================================================

/// Unit horizontal perpendicular `cross(direction, up)`, zero for a
/// zero-length segment.
fn perpendicular(from: DVec3, to: DVec3, config: &RoadConfig) -> DVec3 {
    let direction = config.plane.flatten(to - from);
    if direction.length() <= config.tolerance {
        return DVec3::ZERO;
    }
    direction.cross(config.plane.up()).normalize_or_zero()
}

/// Miter offsets for a polyline of positions.
///
/// Returns one [`NodeOffset`] per position. Fewer than two positions yield
/// an empty result.
///
/// # Examples
/// ```
/// use road_geometry::config::RoadConfig;
/// use road_geometry::offset::offset_polyline;
/// use glam::DVec3;
///
/// let points = [DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -10.0)];
/// let offsets = offset_polyline(&points, 4.0, &RoadConfig::default());
/// assert_eq!(offsets[0].left, DVec3::new(2.0, 0.0, 0.0));
/// ```
pub fn offset_polyline(positions: &[DVec3], width: f64, config: &RoadConfig) -> Vec<NodeOffset> {
    if positions.len() < 2 {
        return Vec::new();
    }

    let half_width = width * 0.5;
    let last = positions.len() - 1;
    let mut offsets = Vec::with_capacity(positions.len());
    let mut prev_perp = DVec3::ZERO;

    for (i, &point) in positions.iter().enumerate() {
        let next_perp = if i < last {
            perpendicular(point, positions[i + 1], config)
        } else {
            DVec3::ZERO
        };

        let reference = if next_perp != DVec3::ZERO { next_perp } else { prev_perp };
        let mitered = (prev_perp + next_perp)
            .try_normalize()
            .map(|avg| (avg, avg.dot(reference)))
            .filter(|&(_, cos)| cos >= config.min_miter_cos);

        let offset = match mitered {
            Some((avg, cos)) => {
                let shift = avg * half_width / cos;
                NodeOffset {
                    left: point + shift,
                    right: point - shift,
                    degenerate: false,
                }
            }
            None => {
                // Square cut along the incoming side; collapses to the
                // centerline when neither side has a direction.
                let square = if prev_perp != DVec3::ZERO { prev_perp } else { next_perp };
                NodeOffset {
                    left: point + square * half_width,
                    right: point - square * half_width,
                    degenerate: true,
                }
            }
        };

        offsets.push(offset);
        prev_perp = next_perp;
    }

    offsets
}

/// Offsets every road of the graph.
///
/// Each node gets one [`SegmentBoundary`] per incident segment of each
/// road (predecessor side and successor side carry the same mitered pair).
pub fn offset_roads(graph: &RoadGraph, config: &RoadConfig, diagnostics: &mut Diagnostics) -> RawOffsets {
    let mut raw = RawOffsets::new(graph.nodes().len());

    for (road_index, road) in graph.roads().iter().enumerate() {
        if !road.is_drivable() {
            diagnostics.push(Diagnostic::InsufficientNodes {
                road: road.id,
                node_count: road.nodes.len(),
            });
            continue;
        }

        let positions: Vec<DVec3> = road.nodes.iter().map(|&n| graph.node(n).position).collect();
        let offsets = offset_polyline(&positions, road.width, config);
        let last = road.nodes.len() - 1;

        for (slot, offset) in offsets.iter().enumerate() {
            let node = road.nodes[slot];
            if offset.degenerate {
                diagnostics.push(Diagnostic::DegenerateMiter {
                    road: road.id,
                    node: graph.node(node).id,
                });
            }

            let neighbors = [
                (slot > 0).then(|| road.nodes[slot - 1]),
                (slot < last).then(|| road.nodes[slot + 1]),
            ];
            for neighbor in neighbors.into_iter().flatten() {
                raw.insert(
                    road_index,
                    node,
                    SegmentBoundary {
                        neighbor,
                        left: offset.left,
                        right: offset.right,
                    },
                );
            }
        }
    }

    raw
}

#[cfg(test)]
mod tests;
