//! # Diagnostics
//!
//! Non-fatal events raised during a rebuild. Each one names the offending
//! road, node or segment; the affected span or junction is dropped and the
//! rest of the rebuild continues.
//!
//! Recording a diagnostic also logs it through `tracing`: graph
//! inconsistencies at `warn`, degenerate geometry at `debug`, parallel
//! intersections at `trace`.

use crate::graph::{NodeId, RoadId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// A non-fatal rebuild event.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    /// Road has fewer than two nodes and contributes no mesh.
    #[error("Road {road} has {node_count} node(s), at least 2 are required")]
    InsufficientNodes {
        /// Offending road
        road: RoadId,
        /// Nodes it has
        node_count: usize,
    },

    /// Expected boundary data was not found for a segment.
    #[error("Missing segment boundary for road {road} at {node} toward {neighbor}")]
    MissingSegmentBoundary {
        /// Road owning the segment
        road: RoadId,
        /// Node whose end was looked up
        node: NodeId,
        /// Adjacent node
        neighbor: NodeId,
    },

    /// Junction left/right bound counts disagree; the junction is skipped.
    #[error("Junction {node} has {left} left bounds and {right} right bounds")]
    JunctionBoundMismatch {
        /// Junction node
        node: NodeId,
        /// Left bounds collected
        left: usize,
        /// Right bounds collected
        right: usize,
    },

    /// Some boundary line pairs at a junction were parallel and skipped.
    #[error("Junction {node}: {pairs} parallel boundary pair(s)")]
    ParallelLines {
        /// Junction node
        node: NodeId,
        /// Number of parallel pairs
        pairs: usize,
    },

    /// Miter cosine fell under the limit; the node was square cut.
    #[error("Road {road} bends too sharply at {node}, square cut used")]
    DegenerateMiter {
        /// Road being offset
        road: RoadId,
        /// Node at the bend
        node: NodeId,
    },
}

/// Discriminant of a [`Diagnostic`], for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// See [`Diagnostic::InsufficientNodes`].
    InsufficientNodes,
    /// See [`Diagnostic::MissingSegmentBoundary`].
    MissingSegmentBoundary,
    /// See [`Diagnostic::JunctionBoundMismatch`].
    JunctionBoundMismatch,
    /// See [`Diagnostic::ParallelLines`].
    ParallelLines,
    /// See [`Diagnostic::DegenerateMiter`].
    DegenerateMiter,
}

impl Diagnostic {
    /// Kind of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::InsufficientNodes { .. } => DiagnosticKind::InsufficientNodes,
            Diagnostic::MissingSegmentBoundary { .. } => DiagnosticKind::MissingSegmentBoundary,
            Diagnostic::JunctionBoundMismatch { .. } => DiagnosticKind::JunctionBoundMismatch,
            Diagnostic::ParallelLines { .. } => DiagnosticKind::ParallelLines,
            Diagnostic::DegenerateMiter { .. } => DiagnosticKind::DegenerateMiter,
        }
    }

    /// Whether the event points at inconsistent input rather than awkward geometry.
    pub fn is_inconsistency(&self) -> bool {
        matches!(
            self.kind(),
            DiagnosticKind::InsufficientNodes
                | DiagnosticKind::MissingSegmentBoundary
                | DiagnosticKind::JunctionBoundMismatch
        )
    }
}

/// Ordered collection of diagnostics from one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records and logs a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind() {
            DiagnosticKind::ParallelLines => trace!(%diagnostic, "parallel boundary lines"),
            DiagnosticKind::DegenerateMiter => debug!(%diagnostic, "degenerate geometry"),
            _ => warn!(%diagnostic, "road graph inconsistency"),
        }
        self.entries.push(diagnostic);
    }

    /// All recorded diagnostics, in order.
    #[inline]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterates recorded diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |d| d.kind() == kind)
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Number of recorded diagnostics.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
