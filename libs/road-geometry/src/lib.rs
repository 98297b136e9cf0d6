//! Road surface geometry for procedural road networks.
//!
//! This crate turns a sparse graph of centerline nodes into drivable
//! surfaces: mitered boundary offsets, trimmed junction polygons and
//! triangle buffers ready for upload.
//!
//! ```rust
//! use road_geometry::{rebuild, NodeId, RoadConfig, RoadGraph, RoadId};
//! use glam::DVec3;
//!
//! let mut graph = RoadGraph::new();
//! for (id, p) in [(0, DVec3::new(0.0, 0.0, -10.0)), (1, DVec3::ZERO), (2, DVec3::new(10.0, 0.0, 0.0))] {
//!     graph.add_node(NodeId(id), p).unwrap();
//! }
//! graph.add_road(RoadId(0), &[NodeId(0), NodeId(1)], 4.0).unwrap();
//! graph.add_road(RoadId(1), &[NodeId(1), NodeId(2)], 4.0).unwrap();
//!
//! let geometry = rebuild(&graph, &RoadConfig::default());
//! assert_eq!(geometry.road_meshes.len(), 2);
//! assert_eq!(geometry.junction_meshes.len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod junction;
pub mod mesh;
pub mod offset;
pub mod pipeline;

pub use config::{GroundPlane, RoadConfig, RoadConfigError};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Result, RoadError};
pub use graph::{NodeId, NodeIndex, RoadGraph, RoadId, RoadIndex, SegmentKey};
pub use junction::{find_junctions, resolve_junctions, Junction, ResolvedBoundaries};
pub use mesh::MeshBuffer;
pub use offset::{offset_polyline, offset_roads, RawOffsets};
pub use pipeline::{build_junction_meshes, build_road_meshes, rebuild, JunctionMesh, RoadGeometry, SpanMesh};
