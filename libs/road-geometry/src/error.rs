//! # Error Types
//!
//! Errors raised while assembling a road graph or a configuration.
//!
//! ## Error Policy
//!
//! - Construction-time misuse (unknown ids, bad widths) returns `RoadError`
//! - Geometry-time problems never fail a rebuild; they are reported as
//!   [`Diagnostic`](crate::diagnostics::Diagnostic) values instead

use crate::config::RoadConfigError;
use crate::graph::{NodeId, RoadId};
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building the inputs of a rebuild.
///
/// ## Example
///
/// ```rust
/// use road_geometry::{RoadError, RoadGraph, NodeId, RoadId};
///
/// let mut graph = RoadGraph::new();
/// match graph.add_road(RoadId(1), &[NodeId(7)], 4.0) {
///     Err(RoadError::UnknownNode { node, .. }) => assert_eq!(node, NodeId(7)),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoadError {
    /// A node with the same id was already added.
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A road with the same id was already added.
    #[error("Duplicate road id {0}")]
    DuplicateRoad(RoadId),

    /// A road references a node id that is not in the graph.
    #[error("Road {road} references unknown node {node}")]
    UnknownNode {
        /// Road being added
        road: RoadId,
        /// Missing node id
        node: NodeId,
    },

    /// A road lists the same node twice in a row.
    #[error("Road {road} repeats node {node} consecutively")]
    RepeatedNode {
        /// Road being added
        road: RoadId,
        /// Repeated node id
        node: NodeId,
    },

    /// Road width is zero, negative or not finite.
    #[error("Road {road} has invalid width {width}")]
    InvalidWidth {
        /// Road being added
        road: RoadId,
        /// Rejected width
        width: f64,
    },

    /// Node position contains NaN or infinite components.
    #[error("Node {0} has a non-finite position")]
    NonFinitePosition(NodeId),

    /// Invalid configuration values.
    #[error("Invalid configuration: {0}")]
    Config(#[from] RoadConfigError),
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for road graph operations.
pub type Result<T> = std::result::Result<T, RoadError>;

// =============================================================================
// TESTS
// =============================================================================
