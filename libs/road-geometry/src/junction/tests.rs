use super::*;
use crate::config::GroundPlane;
use crate::graph::{NodeId, RoadId};
use crate::offset::offset_roads;
use crate::DiagnosticKind;
use approx::assert_relative_eq;

const J: NodeIndex = 1;

fn graph(nodes: &[(u32, DVec3)], roads: &[(u32, &[u32])]) -> RoadGraph {
    let mut graph = RoadGraph::new();
    for &(id, p) in nodes {
        graph.add_node(NodeId(id), p).unwrap();
    }
    for &(id, chain) in roads {
        let ids: Vec<NodeId> = chain.iter().map(|&n| NodeId(n)).collect();
        graph.add_road(RoadId(id), &ids, 4.0).unwrap();
    }
    graph
}

fn cardinal_nodes(height: f64) -> Vec<(u32, DVec3)> {
    vec![
        (0, DVec3::new(0.0, height, -10.0)),
        (1, DVec3::new(0.0, height, 0.0)),
        (2, DVec3::new(0.0, height, 10.0)),
        (3, DVec3::new(-10.0, height, 0.0)),
        (4, DVec3::new(10.0, height, 0.0)),
    ]
}

fn crossing() -> RoadGraph {
    graph(&cardinal_nodes(0.0), &[(0, &[0, 1, 2]), (1, &[3, 1, 4])])
}

fn t_junction() -> RoadGraph {
    graph(&cardinal_nodes(0.0), &[(0, &[0, 1, 2]), (1, &[1, 4])])
}

fn resolve(graph: &RoadGraph) -> (Option<Junction>, Diagnostics) {
    let config = RoadConfig::default();
    let mut diagnostics = Diagnostics::new();
    let raw = offset_roads(graph, &config, &mut diagnostics);
    let junction = resolve_junction(graph, &raw, J, &config, &mut diagnostics);
    (junction, diagnostics)
}

fn assert_point(actual: DVec3, x: f64, z: f64) {
    assert_relative_eq!(actual.x, x, epsilon = 1e-9);
    assert_relative_eq!(actual.z, z, epsilon = 1e-9);
}

fn flat(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

#[test]
fn test_crossing_resolves_by_intersection_only() {
    let (junction, diagnostics) = resolve(&crossing());
    let junction = junction.unwrap();

    assert_eq!(junction.segments.len(), 4);
    assert_eq!(junction.fallback_count(), 0);
    assert_eq!(junction.polygon.len(), 4);

    // Clockwise from the back-left corner
    assert_point(junction.polygon[0], -2.0, -2.0);
    assert_point(junction.polygon[1], -2.0, 2.0);
    assert_point(junction.polygon[2], 2.0, 2.0);
    assert_point(junction.polygon[3], 2.0, -2.0);

    // Opposite arms are parallel on all four side pairs
    assert_eq!(
        diagnostics.entries(),
        &[Diagnostic::ParallelLines {
            node: NodeId(1),
            pairs: 8
        }]
    );
}

#[test]
fn test_t_junction_trims_through_side() {
    let (junction, _) = resolve(&t_junction());
    let junction = junction.unwrap();

    assert_eq!(junction.segments.len(), 3);
    assert_eq!(junction.fallback_count(), 2);
    assert_eq!(junction.polygon.len(), 4);

    let north = junction.segments.iter().find(|s| s.outer == 2).unwrap();
    assert_eq!(north.right.resolution, SideResolution::Intersection);
    assert_eq!(north.left.resolution, SideResolution::PerpendicularTrim);
    assert_point(north.right.point, 2.0, 2.0);
    assert_point(north.left.point, -2.0, 2.0);
}

#[test]
fn test_polygon_is_closed_and_simple() {
    for graph in [crossing(), t_junction()] {
        let (junction, _) = resolve(&graph);
        let junction = junction.unwrap();
        let polygon = &junction.polygon;

        // No duplicate vertices
        for i in 0..polygon.len() {
            for j in (i + 1)..polygon.len() {
                assert!((polygon[i] - polygon[j]).length_squared() > 1e-6);
            }
        }

        // Star-shaped around the center: every edge turns the same way
        let c = junction.center;
        for (a, b) in junction.edges() {
            let cross = (a - c).cross(b - c).y;
            assert!(cross > 0.0, "edge {a} -> {b} folds back");
        }
        assert_eq!(junction.edges().count(), polygon.len());
    }
}

#[test]
fn test_corner_closes_outer_gap() {
    // Road 0 ends at the junction, road 1 leaves it at a right angle
    let graph = graph(
        &[(2, flat(0.0, 10.0)), (1, flat(0.0, 0.0)), (4, flat(10.0, 0.0))],
        &[(0, &[2, 1]), (1, &[1, 4])],
    );
    let junction = resolve_junction(
        &graph,
        &offset_roads(&graph, &RoadConfig::default(), &mut Diagnostics::new()),
        J,
        &RoadConfig::default(),
        &mut Diagnostics::new(),
    )
    .unwrap();

    assert_eq!(junction.polygon.len(), 4);
    assert!(junction.polygon.iter().any(|&p| (p - flat(-2.0, -2.0)).length() < 1e-9));
    assert!(junction.polygon.iter().any(|&p| (p - flat(2.0, 2.0)).length() < 1e-9));
}

#[test]
fn test_straight_continuation_has_no_cap() {
    let graph = graph(
        &[(0, flat(0.0, -10.0)), (1, flat(0.0, 0.0)), (2, flat(0.0, 10.0))],
        &[(0, &[0, 1]), (1, &[1, 2])],
    );
    let (junction, _) = resolve(&graph);
    let junction = junction.unwrap();
    assert_eq!(junction.polygon.len(), 2);
}

#[test]
fn test_nearest_pick_keeps_point_closest_to_far_end() {
    let bounds = [
        (Bound::new(flat(0.0, 10.0), flat(0.0, 0.0)), Bound::new(flat(1.0, 10.0), flat(1.0, 0.0))),
        (Bound::new(flat(-5.0, 6.0), flat(5.0, 6.0)), Bound::new(flat(-5.0, 100.0), flat(5.0, 100.0))),
        (Bound::new(flat(-5.0, 3.0), flat(5.0, 3.0)), Bound::new(flat(-5.0, 200.0), flat(5.0, 200.0))),
    ];
    let left: Vec<Bound> = bounds.iter().map(|b| b.0).collect();
    let right: Vec<Bound> = bounds.iter().map(|b| b.1).collect();

    let resolution = resolve_bounds(DVec3::ZERO, &left, &right, &RoadConfig::default()).unwrap();
    assert_eq!(resolution.parallel_pairs, 4);

    let (l0, r0) = resolution.sides[0];
    assert_point(l0.point, 0.0, 6.0);
    assert_point(r0.point, 1.0, 6.0);

    // Unresolved side trimmed through its partner's point
    let (l1, r1) = resolution.sides[1];
    assert_point(l1.point, 0.0, 6.0);
    assert_eq!(r1.resolution, SideResolution::PerpendicularTrim);
    assert_point(r1.point, 0.0, 100.0);
}

#[test]
fn test_unresolved_segment_anchors_on_nearer_end() {
    let left = [Bound::new(flat(-2.0, 10.0), flat(-2.0, 1.0))];
    let right = [Bound::new(flat(2.0, 10.0), flat(2.0, 0.0))];
    let resolution = resolve_bounds(DVec3::ZERO, &left, &right, &RoadConfig::default()).unwrap();

    let (l, r) = resolution.sides[0];
    assert_eq!(r.resolution, SideResolution::RawEndpoint);
    assert_point(r.point, 2.0, 0.0);
    assert_eq!(l.resolution, SideResolution::PerpendicularTrim);
    assert_point(l.point, -2.0, 0.0);
}

#[test]
fn test_bound_count_mismatch_is_error() {
    let b = Bound::new(flat(0.0, 10.0), flat(0.0, 0.0));
    let result = resolve_bounds(DVec3::ZERO, &[b, b], &[b], &RoadConfig::default());
    assert_eq!(result, Err(BoundMismatch { left: 2, right: 1 }));
}

#[test]
fn test_missing_boundary_drops_segment() {
    let graph = crossing();
    let config = RoadConfig::default();
    let mut diagnostics = Diagnostics::new();
    let mut raw = offset_roads(&graph, &config, &mut diagnostics);
    raw.remove(SegmentKey::new(0, J, 2)).unwrap();

    let junction = resolve_junction(&graph, &raw, J, &config, &mut diagnostics).unwrap();
    assert_eq!(junction.segments.len(), 3);
    assert_eq!(
        diagnostics.of_kind(DiagnosticKind::MissingSegmentBoundary).next(),
        Some(&Diagnostic::MissingSegmentBoundary {
            road: RoadId(0),
            node: NodeId(1),
            neighbor: NodeId(2)
        })
    );
}

#[test]
fn test_one_sided_bound_loss_skips_junction() {
    let graph = crossing();
    let config = RoadConfig::default();
    let mut diagnostics = Diagnostics::new();
    let mut raw = offset_roads(&graph, &config, &mut diagnostics);

    let far = raw.get(SegmentKey::new(0, 2, J)).copied().unwrap();
    raw.insert(
        0,
        2,
        SegmentBoundary {
            left: DVec3::splat(f64::NAN),
            ..far
        },
    );

    let (junctions, resolved) = resolve_junctions(&graph, &raw, &config, &mut diagnostics);
    assert!(junctions.is_empty());
    assert_eq!(resolved.trimmed_count(), 0);
    assert_eq!(
        diagnostics.of_kind(DiagnosticKind::JunctionBoundMismatch).next(),
        Some(&Diagnostic::JunctionBoundMismatch {
            node: NodeId(1),
            left: 3,
            right: 4
        })
    );
}

#[test]
fn test_overlay_written_in_road_frame() {
    let graph = t_junction();
    let config = RoadConfig::default();
    let mut diagnostics = Diagnostics::new();
    let raw = offset_roads(&graph, &config, &mut diagnostics);
    let (junctions, resolved) = resolve_junctions(&graph, &raw, &config, &mut diagnostics);

    assert_eq!(junctions.len(), 1);
    assert_eq!(resolved.trimmed_count(), 3);

    // Road 0 leaves the junction northward: road left is −X
    let leaving = resolved.lookup(SegmentKey::new(0, J, 2)).unwrap();
    assert_point(leaving.left, -2.0, 2.0);
    assert_point(leaving.right, 2.0, 2.0);

    // Road 0 arrives from the south: still road left on −X
    let arriving = resolved.lookup(SegmentKey::new(0, J, 0)).unwrap();
    assert_point(arriving.left, -2.0, -2.0);
    assert_point(arriving.right, 2.0, -2.0);

    // Ends away from the junction fall through to raw
    let outer = SegmentKey::new(0, 2, J);
    assert!(!resolved.is_trimmed(outer));
    assert_eq!(resolved.lookup(outer), raw.get(outer).copied());
}

#[test]
fn test_polygon_keeps_junction_height() {
    let graph = graph(&cardinal_nodes(3.5), &[(0, &[0, 1, 2]), (1, &[3, 1, 4])]);
    let (junction, _) = resolve(&graph);
    assert!(junction.unwrap().polygon.iter().all(|p| p.y == 3.5));
}

#[test]
fn test_synthetic_plane_crossing() {
    // Z-up plane: the same crossing laid out in X/Y
    let plane = GroundPlane::new(DVec3::Z, DVec3::Y).unwrap();
    let config = RoadConfig::default().with_plane(plane);
    let graph = graph(
        &[
            (0, DVec3::new(0.0, -10.0, 0.0)),
            (1, DVec3::ZERO),
            (2, DVec3::new(0.0, 10.0, 0.0)),
            (3, DVec3::new(-10.0, 0.0, 0.0)),
            (4, DVec3::new(10.0, 0.0, 0.0)),
        ],
        &[(0, &[0, 1, 2]), (1, &[3, 1, 4])],
    );

    let mut diagnostics = Diagnostics::new();
    let raw = offset_roads(&graph, &config, &mut diagnostics);
    let junction = resolve_junction(&graph, &raw, J, &config, &mut diagnostics).unwrap();

    assert_eq!(junction.fallback_count(), 0);
    assert_eq!(junction.polygon.len(), 4);
    for p in &junction.polygon {
        assert_relative_eq!(p.x.abs(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(p.y.abs(), 2.0, epsilon = 1e-9);
        assert_eq!(p.z, 0.0);
    }
}
