//! # Road Graph
//!
//! Plain-data road network: nodes with positions, roads as ordered node
//! index sequences with a width. Nodes are shared between roads by index;
//! roads never own them.
//!
//! The graph keeps an incidence list per node (one record per segment that
//! touches the node) so junction detection and boundary lookups never need
//! to scan every road.
//!
//! ## Example
//!
//! ```rust
//! use road_geometry::{RoadGraph, NodeId, RoadId};
//! use glam::DVec3;
//!
//! let mut graph = RoadGraph::new();
//! graph.add_node(NodeId(0), DVec3::new(0.0, 0.0, 0.0)).unwrap();
//! graph.add_node(NodeId(1), DVec3::new(0.0, 0.0, 10.0)).unwrap();
//! graph.add_road(RoadId(0), &[NodeId(0), NodeId(1)], 4.0).unwrap();
//! assert_eq!(graph.road(0).segment_count(), 1);
//! ```

use crate::error::{Result, RoadError};
use glam::DVec3;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Caller-supplied stable node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// Caller-supplied stable road identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoadId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Dense index into [`RoadGraph::nodes`].
pub type NodeIndex = usize;

/// Dense index into [`RoadGraph::roads`].
pub type RoadIndex = usize;

// =============================================================================
// NODE / ROAD
// =============================================================================

/// A point on the road centerline graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Stable identifier.
    pub id: NodeId,
    /// World position; the up component is carried through to the output.
    pub position: DVec3,
}

/// An ordered chain of nodes with a uniform width.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Stable identifier.
    pub id: RoadId,
    /// Node indices in travel order.
    pub nodes: Vec<NodeIndex>,
    /// Full drivable width.
    pub width: f64,
}

impl Road {
    /// Number of node-to-node segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Consecutive node pairs in travel order.
    pub fn segments(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    /// Whether the road has enough nodes to produce geometry.
    #[inline]
    pub fn is_drivable(&self) -> bool {
        self.nodes.len() >= 2
    }
}

// =============================================================================
// SEGMENT KEYS
// =============================================================================

/// A directed segment of one road, seen from `node`'s end.
///
/// Roads are part of the key so two roads over the same node pair keep
/// separate boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    /// Road the segment belongs to.
    pub road: RoadIndex,
    /// Node whose end of the segment is described.
    pub node: NodeIndex,
    /// Adjacent node along the road.
    pub neighbor: NodeIndex,
}

impl SegmentKey {
    /// Creates a key.
    pub fn new(road: RoadIndex, node: NodeIndex, neighbor: NodeIndex) -> Self {
        Self { road, node, neighbor }
    }

    /// Same segment seen from the other end.
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            road: self.road,
            node: self.neighbor,
            neighbor: self.node,
        }
    }
}

/// Where the neighbor sits relative to the road's travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentSide {
    /// Neighbor comes before the node.
    Predecessor,
    /// Neighbor comes after the node.
    Successor,
}

/// One segment touching a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncidentSegment {
    /// Road the segment belongs to.
    pub road: RoadIndex,
    /// Position of the node within the road.
    pub slot: usize,
    /// Adjacent node.
    pub neighbor: NodeIndex,
    /// Direction of the neighbor along the road.
    pub side: SegmentSide,
}

impl IncidentSegment {
    /// Key of this segment at `node`'s end.
    #[inline]
    pub fn key(&self, node: NodeIndex) -> SegmentKey {
        SegmentKey::new(self.road, node, self.neighbor)
    }
}

// =============================================================================
// ROAD GRAPH
// =============================================================================

/// Immutable-per-rebuild road network snapshot.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: Vec<Node>,
    roads: Vec<Road>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    road_lookup: HashMap<RoadId, RoadIndex>,
    /// Per node: every segment touching it.
    incidence: Vec<Vec<IncidentSegment>>,
    /// Per node: number of (road, slot) references, drivable or not.
    slot_counts: Vec<usize>,
}

impl RoadGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, id: NodeId, position: DVec3) -> Result<NodeIndex> {
        if self.node_lookup.contains_key(&id) {
            return Err(RoadError::DuplicateNode(id));
        }
        if !position.is_finite() {
            return Err(RoadError::NonFinitePosition(id));
        }
        let index = self.nodes.len();
        self.nodes.push(Node { id, position });
        self.node_lookup.insert(id, index);
        self.incidence.push(Vec::new());
        self.slot_counts.push(0);
        Ok(index)
    }

    /// Adds a road through the given node ids and returns its index.
    ///
    /// Roads with fewer than two nodes are accepted here; the rebuild reports
    /// them as a diagnostic and skips them.
    pub fn add_road(&mut self, id: RoadId, node_ids: &[NodeId], width: f64) -> Result<RoadIndex> {
        if self.road_lookup.contains_key(&id) {
            return Err(RoadError::DuplicateRoad(id));
        }
        if !(width > 0.0) || !width.is_finite() {
            return Err(RoadError::InvalidWidth { road: id, width });
        }

        let mut nodes = Vec::with_capacity(node_ids.len());
        for &node in node_ids {
            let index = self
                .node_lookup
                .get(&node)
                .copied()
                .ok_or(RoadError::UnknownNode { road: id, node })?;
            if nodes.last() == Some(&index) {
                return Err(RoadError::RepeatedNode { road: id, node });
            }
            nodes.push(index);
        }

        let road_index = self.roads.len();
        let last = nodes.len().saturating_sub(1);
        for (slot, &node) in nodes.iter().enumerate() {
            self.slot_counts[node] += 1;
            if nodes.len() < 2 {
                continue;
            }
            if slot > 0 {
                self.incidence[node].push(IncidentSegment {
                    road: road_index,
                    slot,
                    neighbor: nodes[slot - 1],
                    side: SegmentSide::Predecessor,
                });
            }
            if slot < last {
                self.incidence[node].push(IncidentSegment {
                    road: road_index,
                    slot,
                    neighbor: nodes[slot + 1],
                    side: SegmentSide::Successor,
                });
            }
        }

        self.road_lookup.insert(id, road_index);
        self.roads.push(Road { id, nodes, width });
        Ok(road_index)
    }

    /// All nodes, indexed by [`NodeIndex`].
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All roads, indexed by [`RoadIndex`].
    #[inline]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Node at `index`. Panics on an index not produced by this graph.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    /// Road at `index`. Panics on an index not produced by this graph.
    #[inline]
    pub fn road(&self, index: RoadIndex) -> &Road {
        &self.roads[index]
    }

    /// Looks up a node index by id.
    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    /// Looks up a road index by id.
    pub fn road_index(&self, id: RoadId) -> Option<RoadIndex> {
        self.road_lookup.get(&id).copied()
    }

    /// Segments of drivable roads touching `node`.
    #[inline]
    pub fn incident_segments(&self, node: NodeIndex) -> &[IncidentSegment] {
        &self.incidence[node]
    }

    /// Whether `node` needs junction resolution.
    ///
    /// A node is a junction when two or more road slots reference it, or when
    /// three or more segments meet there, and at least two segments exist to
    /// be resolved against each other.
    pub fn is_junction(&self, node: NodeIndex) -> bool {
        let segments = self.incidence[node].len();
        (self.slot_counts[node] >= 2 || segments >= 3) && segments >= 2
    }

    /// Every junction node, in index order.
    pub fn junction_nodes(&self) -> Vec<NodeIndex> {
        (0..self.nodes.len()).filter(|&n| self.is_junction(n)).collect()
    }
}
