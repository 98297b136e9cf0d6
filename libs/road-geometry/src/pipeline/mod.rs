//! # Rebuild Pipeline
//!
//! Runs the phases in order over one graph snapshot:
//!
//! ```text
//! RoadGraph ─▶ offset_roads ─▶ RawOffsets
//!                                  │
//!              resolve_junctions ◀─┘──▶ Junctions + ResolvedBoundaries
//!                                              │
//!              build_road_meshes ◀─────────────┤ (strips per span)
//!              build_junction_meshes ◀─────────┘ (caps per junction)
//! ```
//!
//! Each rebuild is a pure function of the graph and the configuration;
//! nothing carries over between calls.

use crate::config::RoadConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{NodeId, Road, RoadGraph, RoadId, RoadIndex, SegmentKey};
use crate::junction::{resolve_junctions, Junction, ResolvedBoundaries};
use crate::mesh::{build_fan, build_strip, MeshBuffer};
use crate::offset::offset_roads;
use serde::Serialize;
use tracing::debug;

// =============================================================================
// OUTPUT
// =============================================================================

/// Strip mesh of one road between two junctions (or road ends).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanMesh {
    /// Road the span belongs to.
    pub road: RoadId,
    /// First node of the span in travel order.
    pub first_node: NodeId,
    /// Last node of the span.
    pub last_node: NodeId,
    /// Triangulated strip.
    pub mesh: MeshBuffer,
}

/// Cap mesh of one junction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionMesh {
    /// Junction node.
    pub node: NodeId,
    /// Triangulated fan.
    pub mesh: MeshBuffer,
}

/// Everything one rebuild produces.
#[derive(Debug, Clone, Default)]
pub struct RoadGeometry {
    /// Strips, in road order then span order.
    pub road_meshes: Vec<SpanMesh>,
    /// Caps, in node order.
    pub junction_meshes: Vec<JunctionMesh>,
    /// Resolved junctions, including ones too small for a cap.
    pub junctions: Vec<Junction>,
    /// Non-fatal events raised along the way.
    pub diagnostics: Diagnostics,
}

impl RoadGeometry {
    /// All strips and caps merged into one buffer.
    #[must_use]
    pub fn combined(&self) -> MeshBuffer {
        let mut combined = MeshBuffer::new();
        for span in &self.road_meshes {
            combined.merge(&span.mesh);
        }
        for cap in &self.junction_meshes {
            combined.merge(&cap.mesh);
        }
        combined
    }

    /// Spans built for `road`.
    pub fn spans_of(&self, road: RoadId) -> impl Iterator<Item = &SpanMesh> + '_ {
        self.road_meshes.iter().filter(move |s| s.road == road)
    }

    /// Cap built for `node`, if any.
    pub fn cap_at(&self, node: NodeId) -> Option<&JunctionMesh> {
        self.junction_meshes.iter().find(|m| m.node == node)
    }

    /// Total triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        let strips: usize = self.road_meshes.iter().map(|s| s.mesh.triangle_count()).sum();
        let caps: usize = self.junction_meshes.iter().map(|m| m.mesh.triangle_count()).sum();
        strips + caps
    }
}

// =============================================================================
// PHASES
// =============================================================================

/// Slot ranges `[start, end]` of a road split at interior junctions.
fn span_ranges(graph: &RoadGraph, road: &Road) -> Vec<(usize, usize)> {
    let last = road.nodes.len().saturating_sub(1);
    let mut ranges = Vec::new();
    let mut start = 0;
    for slot in 1..last {
        if graph.is_junction(road.nodes[slot]) {
            ranges.push((start, slot));
            start = slot;
        }
    }
    if last > start {
        ranges.push((start, last));
    }
    ranges
}

/// Boundary key pointing into the span from `slot`.
fn span_key(road_index: RoadIndex, road: &Road, start: usize, slot: usize) -> SegmentKey {
    let neighbor = if slot == start { slot + 1 } else { slot - 1 };
    SegmentKey::new(road_index, road.nodes[slot], road.nodes[neighbor])
}

fn build_span(
    graph: &RoadGraph,
    road_index: RoadIndex,
    (start, end): (usize, usize),
    resolved: &ResolvedBoundaries<'_>,
    config: &RoadConfig,
    diagnostics: &mut Diagnostics,
) -> Option<SpanMesh> {
    let road = graph.road(road_index);
    let count = end - start + 1;
    let mut centers = Vec::with_capacity(count);
    let mut lefts = Vec::with_capacity(count);
    let mut rights = Vec::with_capacity(count);

    for slot in start..=end {
        let key = span_key(road_index, road, start, slot);
        let Some(boundary) = resolved.lookup(key) else {
            diagnostics.push(Diagnostic::MissingSegmentBoundary {
                road: road.id,
                node: graph.node(key.node).id,
                neighbor: graph.node(key.neighbor).id,
            });
            return None;
        };
        centers.push(graph.node(road.nodes[slot]).position);
        lefts.push(boundary.left);
        rights.push(boundary.right);
    }

    Some(SpanMesh {
        road: road.id,
        first_node: graph.node(road.nodes[start]).id,
        last_node: graph.node(road.nodes[end]).id,
        mesh: build_strip(&centers, &lefts, &rights, config),
    })
}

/// Builds one strip per span of every drivable road.
pub fn build_road_meshes(
    graph: &RoadGraph,
    resolved: &ResolvedBoundaries<'_>,
    config: &RoadConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<SpanMesh> {
    let mut meshes = Vec::new();
    for (road_index, road) in graph.roads().iter().enumerate() {
        if !road.is_drivable() {
            continue;
        }
        for range in span_ranges(graph, road) {
            if let Some(span) = build_span(graph, road_index, range, resolved, config, diagnostics) {
                meshes.push(span);
            }
        }
    }
    meshes
}

/// Fans every junction polygon with at least three points.
pub fn build_junction_meshes(graph: &RoadGraph, junctions: &[Junction], config: &RoadConfig) -> Vec<JunctionMesh> {
    junctions
        .iter()
        .filter(|j| j.polygon.len() >= 3)
        .map(|j| JunctionMesh {
            node: graph.node(j.node).id,
            mesh: build_fan(j.center, &j.polygon, &config.plane),
        })
        .collect()
}

/// Rebuilds all road and junction meshes from scratch.
///
/// # Examples
/// ```
/// use road_geometry::{rebuild, NodeId, RoadConfig, RoadGraph, RoadId};
/// use glam::DVec3;
///
/// let mut graph = RoadGraph::new();
/// graph.add_node(NodeId(0), DVec3::ZERO).unwrap();
/// graph.add_node(NodeId(1), DVec3::new(0.0, 0.0, 20.0)).unwrap();
/// graph.add_road(RoadId(0), &[NodeId(0), NodeId(1)], 6.0).unwrap();
///
/// let geometry = rebuild(&graph, &RoadConfig::default());
/// assert_eq!(geometry.road_meshes.len(), 1);
/// assert!(geometry.junction_meshes.is_empty());
/// assert!(geometry.diagnostics.is_empty());
/// ```
pub fn rebuild(graph: &RoadGraph, config: &RoadConfig) -> RoadGeometry {
    let mut diagnostics = Diagnostics::new();

    let raw = offset_roads(graph, config, &mut diagnostics);
    let (junctions, resolved) = resolve_junctions(graph, &raw, config, &mut diagnostics);
    let road_meshes = build_road_meshes(graph, &resolved, config, &mut diagnostics);
    let junction_meshes = build_junction_meshes(graph, &junctions, config);

    let geometry = RoadGeometry {
        road_meshes,
        junction_meshes,
        junctions,
        diagnostics,
    };

    debug!(
        roads = graph.roads().len(),
        spans = geometry.road_meshes.len(),
        caps = geometry.junction_meshes.len(),
        triangles = geometry.triangle_count(),
        diagnostics = geometry.diagnostics.len(),
        "road geometry rebuilt"
    );
    geometry
}
