use super::*;
use crate::config::GroundPlane;
use crate::graph::{NodeId, RoadId};
use crate::DiagnosticKind;
use approx::assert_relative_eq;

fn straight_graph() -> RoadGraph {
    let mut graph = RoadGraph::new();
    graph.add_node(NodeId(0), DVec3::new(0.0, 0.0, 0.0)).unwrap();
    graph.add_node(NodeId(1), DVec3::new(0.0, 0.0, -10.0)).unwrap();
    graph.add_node(NodeId(2), DVec3::new(0.0, 0.0, -20.0)).unwrap();
    graph
        .add_road(RoadId(0), &[NodeId(0), NodeId(1), NodeId(2)], 4.0)
        .unwrap();
    graph
}

#[test]
fn test_straight_road_offsets() {
    let graph = straight_graph();
    let mut diagnostics = Diagnostics::new();
    let raw = offset_roads(&graph, &RoadConfig::default(), &mut diagnostics);

    assert!(diagnostics.is_empty());
    // Middle node carries both segments, endpoints one each
    assert_eq!(raw.len(), 4);

    for node in 0..3 {
        for (_, boundary) in raw.at_node(node) {
            assert_relative_eq!(boundary.left.x, 2.0, epsilon = 1e-12);
            assert_relative_eq!(boundary.right.x, -2.0, epsilon = 1e-12);
            assert_relative_eq!(boundary.left.z, graph.node(node).position.z, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_width_preserved_on_bend() {
    let points = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(10.0, 0.0, 10.0),
    ];
    let offsets = offset_polyline(&points, 4.0, &RoadConfig::default());
    let bend = offsets[1];

    // Distance from each offset point to both adjacent segment lines is w/2
    let left = bend.left;
    assert_relative_eq!(left.x.abs(), 2.0, epsilon = 1e-9);
    assert_relative_eq!((left.z - 10.0).abs(), 2.0, epsilon = 1e-9);
    assert!(!bend.degenerate);
}

#[test]
fn test_endpoints_are_square_cut() {
    let points = [DVec3::new(0.0, 0.0, 0.0), DVec3::new(3.0, 0.0, 4.0)];
    let offsets = offset_polyline(&points, 2.0, &RoadConfig::default());
    let direction = (points[1] - points[0]).normalize();

    for (offset, point) in offsets.iter().zip(points) {
        let half = offset.left - point;
        assert_relative_eq!(half.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(half.dot(direction), 0.0, epsilon = 1e-12);
        assert_relative_eq!((offset.right - point).length(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_height_carried_through() {
    let points = [DVec3::new(0.0, 2.5, 0.0), DVec3::new(0.0, 7.0, 10.0)];
    let offsets = offset_polyline(&points, 4.0, &RoadConfig::default());
    assert_eq!(offsets[0].left.y, 2.5);
    assert_eq!(offsets[1].right.y, 7.0);
    // Slope does not shrink the horizontal offset
    assert_relative_eq!(offsets[1].left.x.abs(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_hairpin_uses_square_cut() {
    let points = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(0.5, 0.0, 0.0),
    ];
    let offsets = offset_polyline(&points, 4.0, &RoadConfig::default());
    let bend = offsets[1];
    assert!(bend.degenerate);
    // Square cut along the incoming segment
    assert_relative_eq!((bend.left - points[1]).length(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(bend.left.z, 10.0, epsilon = 1e-12);
}

#[test]
fn test_reversal_cancels_to_square_cut() {
    let points = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(0.0, 0.0, 0.0),
    ];
    let offsets = offset_polyline(&points, 4.0, &RoadConfig::default());
    assert!(offsets[1].degenerate);
    assert!(offsets.iter().all(|o| o.left.is_finite() && o.right.is_finite()));
}

#[test]
fn test_degenerate_miter_diagnostic() {
    let mut graph = RoadGraph::new();
    graph.add_node(NodeId(0), DVec3::new(0.0, 0.0, 0.0)).unwrap();
    graph.add_node(NodeId(1), DVec3::new(0.0, 0.0, 10.0)).unwrap();
    graph.add_node(NodeId(2), DVec3::new(0.2, 0.0, 0.0)).unwrap();
    graph
        .add_road(RoadId(5), &[NodeId(0), NodeId(1), NodeId(2)], 4.0)
        .unwrap();

    let mut diagnostics = Diagnostics::new();
    offset_roads(&graph, &RoadConfig::default(), &mut diagnostics);
    assert_eq!(
        diagnostics.entries(),
        &[Diagnostic::DegenerateMiter {
            road: RoadId(5),
            node: NodeId(1)
        }]
    );
}

#[test]
fn test_single_node_road_reported_once() {
    let mut graph = RoadGraph::new();
    graph.add_node(NodeId(0), DVec3::ZERO).unwrap();
    graph.add_road(RoadId(9), &[NodeId(0)], 4.0).unwrap();

    let mut diagnostics = Diagnostics::new();
    let raw = offset_roads(&graph, &RoadConfig::default(), &mut diagnostics);
    assert!(raw.is_empty());
    assert_eq!(diagnostics.count(DiagnosticKind::InsufficientNodes), 1);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_raw_insert_replaces_same_key() {
    let mut raw = RawOffsets::new(2);
    let boundary = SegmentBoundary {
        neighbor: 1,
        left: DVec3::X,
        right: -DVec3::X,
    };
    raw.insert(0, 0, boundary);
    raw.insert(
        0,
        0,
        SegmentBoundary {
            left: DVec3::Z,
            ..boundary
        },
    );
    assert_eq!(raw.len(), 1);
    assert_eq!(raw.get(SegmentKey::new(0, 0, 1)).map(|b| b.left), Some(DVec3::Z));

    // A different road over the same node pair is a separate key
    raw.insert(1, 0, boundary);
    assert_eq!(raw.len(), 2);

    assert!(raw.remove(SegmentKey::new(0, 0, 1)).is_some());
    assert!(raw.get(SegmentKey::new(0, 0, 1)).is_none());
    assert!(raw.get(SegmentKey::new(1, 0, 1)).is_some());
}

#[test]
fn test_synthetic_plane_offsets() {
    // Z-up, forward along Y: right = Z × Y = −X
    let plane = GroundPlane::new(DVec3::Z, DVec3::Y).unwrap();
    let config = RoadConfig::default().with_plane(plane);
    let points = [DVec3::new(0.0, 0.0, 1.0), DVec3::new(0.0, 10.0, 1.0)];
    let offsets = offset_polyline(&points, 4.0, &config);

    // cross(+Y, +Z) = +X
    assert_relative_eq!(offsets[0].left.x, 2.0, epsilon = 1e-12);
    assert_relative_eq!(offsets[0].right.x, -2.0, epsilon = 1e-12);
    assert_eq!(offsets[0].left.z, 1.0);
}
