//! # Junction Resolver
//!
//! Replaces the raw boundary ends of every segment meeting at a junction
//! node with trimmed points that close into one polygon.
//!
//! ## Outward frame
//!
//! Every incident segment is viewed from the junction J toward its outer
//! node O. Outward-left is `cross(outward, up)`; a segment whose road
//! arrives at J (its neighbor is a predecessor) swaps the road's left and
//! right to get there. Each side becomes a [`Bound`] from the raw offset at
//! O to the raw offset at J.
//!
//! ## Resolution
//!
//! 1. Every side pair of every unordered segment pair is intersected.
//! 2. A point is kept for both sides only when it lies strictly inside
//!    both bounds.
//! 3. Each side keeps the kept point nearest to its far endpoint.
//! 4. Sides with no point are trimmed perpendicular to the segment.
//! 5. Points are merged, ordered clockwise and the gaps between adjacent
//!    segments are closed with extra corner points.
//!
//! The trimmed points are written to a [`ResolvedBoundaries`] overlay; raw
//! offsets are never touched.

use crate::config::RoadConfig;
use crate::core::clockwise::{clockwise_indices, sort_clockwise};
use crate::core::line::{intersect_lines, perpendicular_through, Bound, Intersection};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{NodeIndex, RoadGraph, RoadIndex, SegmentKey, SegmentSide};
use crate::offset::{RawOffsets, SegmentBoundary};
use glam::DVec3;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// RESOLVED DATA
// =============================================================================

/// How one side of one segment got its junction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SideResolution {
    /// Crossing with another segment's boundary.
    Intersection,
    /// Perpendicular dropped from an anchor point.
    PerpendicularTrim,
    /// Raw junction-end offset kept as is.
    RawEndpoint,
}

/// Resolved junction point of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSide {
    /// Point on the bound (or its extension).
    pub point: DVec3,
    /// How it was found.
    pub resolution: SideResolution,
}

/// Left and right bounds of one segment in the outward frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionBounds {
    /// Outward-left side.
    pub left: Bound,
    /// Outward-right side.
    pub right: Bound,
}

/// One segment incident to a resolved junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionSegment {
    /// Road owning the segment.
    pub road: RoadIndex,
    /// Far node of the segment.
    pub outer: NodeIndex,
    /// Whether the road arrives at (Predecessor) or leaves (Successor) the junction.
    pub side: SegmentSide,
    /// Bounds in the outward frame.
    pub bounds: JunctionBounds,
    /// Resolved outward-left point.
    pub left: ResolvedSide,
    /// Resolved outward-right point.
    pub right: ResolvedSide,
}

impl JunctionSegment {
    /// Resolved points in the road's own left/right frame.
    pub fn road_frame(&self) -> (DVec3, DVec3) {
        match self.side {
            SegmentSide::Successor => (self.left.point, self.right.point),
            SegmentSide::Predecessor => (self.right.point, self.left.point),
        }
    }
}

/// A resolved junction.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Junction node.
    pub node: NodeIndex,
    /// Node position, the fan center.
    pub center: DVec3,
    /// Incident segments in incidence order.
    pub segments: Vec<JunctionSegment>,
    /// Closed clockwise polygon, without a repeated first point.
    pub polygon: Vec<DVec3>,
}

impl Junction {
    /// Number of sides that did not resolve by intersection.
    pub fn fallback_count(&self) -> usize {
        self.segments
            .iter()
            .flat_map(|s| [s.left.resolution, s.right.resolution])
            .filter(|r| *r != SideResolution::Intersection)
            .count()
    }

    /// Polygon edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        let n = self.polygon.len();
        (0..n).map(move |i| (self.polygon[i], self.polygon[(i + 1) % n]))
    }
}

// =============================================================================
// RESOLVED BOUNDARIES
// =============================================================================

/// Raw offsets plus the junction-trimmed overlay.
#[derive(Debug, Clone)]
pub struct ResolvedBoundaries<'a> {
    raw: &'a RawOffsets,
    overlay: HashMap<SegmentKey, SegmentBoundary>,
}

impl<'a> ResolvedBoundaries<'a> {
    /// Overlay with no junction entries.
    pub fn new(raw: &'a RawOffsets) -> Self {
        Self {
            raw,
            overlay: HashMap::new(),
        }
    }

    /// Overlay entry if the segment end was trimmed, raw entry otherwise.
    pub fn lookup(&self, key: SegmentKey) -> Option<SegmentBoundary> {
        self.overlay.get(&key).or_else(|| self.raw.get(key)).copied()
    }

    /// Whether the segment end was rewritten by a junction.
    pub fn is_trimmed(&self, key: SegmentKey) -> bool {
        self.overlay.contains_key(&key)
    }

    /// Number of rewritten segment ends.
    pub fn trimmed_count(&self) -> usize {
        self.overlay.len()
    }

    /// The untouched raw offsets.
    pub fn raw(&self) -> &'a RawOffsets {
        self.raw
    }

    fn write(&mut self, key: SegmentKey, boundary: SegmentBoundary) {
        self.overlay.insert(key, boundary);
    }
}

// =============================================================================
// BOUND RESOLUTION
// =============================================================================

/// Left and right bound lists of different length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundMismatch {
    /// Left bounds given.
    pub left: usize,
    /// Right bounds given.
    pub right: usize,
}

/// Output of [`resolve_bounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoundResolution {
    /// `(left, right)` per segment, in input order.
    pub sides: Vec<(ResolvedSide, ResolvedSide)>,
    /// Side pairs skipped as parallel.
    pub parallel_pairs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hand {
    Left,
    Right,
}

#[inline]
fn pick<'b>(left: &'b [Bound], right: &'b [Bound], index: usize, hand: Hand) -> &'b Bound {
    match hand {
        Hand::Left => &left[index],
        Hand::Right => &right[index],
    }
}

/// Best accepted point per side, nearest to the bound's far endpoint.
#[derive(Debug, Default, Clone, Copy)]
struct Candidate {
    point: Option<DVec3>,
    distance_sq: f64,
}

impl Candidate {
    fn offer(&mut self, point: DVec3, bound: &Bound, config: &RoadConfig) {
        let distance_sq = planar_distance_sq(point, bound.start, config);
        if self.point.is_none() || distance_sq < self.distance_sq {
            self.point = Some(point);
            self.distance_sq = distance_sq;
        }
    }
}

#[inline]
fn planar_distance_sq(a: DVec3, b: DVec3, config: &RoadConfig) -> f64 {
    (config.plane.project(a) - config.plane.project(b)).length_squared()
}

/// Resolves the junction-end points of segments meeting at `center`.
///
/// `left[i]` and `right[i]` are the outward-frame bounds of segment `i`.
/// Every segment comes back with exactly two points.
pub fn resolve_bounds(
    center: DVec3,
    left: &[Bound],
    right: &[Bound],
    config: &RoadConfig,
) -> Result<BoundResolution, BoundMismatch> {
    if left.len() != right.len() {
        return Err(BoundMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let plane = &config.plane;
    let height = plane.height(center);
    let count = left.len();

    let mut candidates = vec![[Candidate::default(); 2]; count];
    let mut parallel_pairs = 0;

    for i in 0..count {
        for j in (i + 1)..count {
            for (first, second) in [
                (Hand::Left, Hand::Right),
                (Hand::Right, Hand::Left),
                (Hand::Left, Hand::Left),
                (Hand::Right, Hand::Right),
            ] {
                let (a, b) = (pick(left, right, i, first), pick(left, right, j, second));
                match intersect_lines(a, b, plane, config.tolerance, height) {
                    Intersection::Parallel => parallel_pairs += 1,
                    Intersection::Point(p) => {
                        if a.contains(p, plane, config.tolerance) && b.contains(p, plane, config.tolerance) {
                            candidates[i][first as usize].offer(p, a, config);
                            candidates[j][second as usize].offer(p, b, config);
                        }
                    }
                }
            }
        }
    }

    let sides = (0..count)
        .map(|i| {
            let [l, r] = candidates[i];
            trim_segment(center, &left[i], &right[i], l.point, r.point, config)
        })
        .collect();

    Ok(BoundResolution { sides, parallel_pairs })
}

/// Fills unresolved sides of one segment by perpendicular trimming.
fn trim_segment(
    center: DVec3,
    left: &Bound,
    right: &Bound,
    left_hit: Option<DVec3>,
    right_hit: Option<DVec3>,
    config: &RoadConfig,
) -> (ResolvedSide, ResolvedSide) {
    let hit = |point| ResolvedSide {
        point,
        resolution: SideResolution::Intersection,
    };
    let raw = |bound: &Bound| ResolvedSide {
        point: bound.end,
        resolution: SideResolution::RawEndpoint,
    };

    match (left_hit, right_hit) {
        (Some(l), Some(r)) => (hit(l), hit(r)),
        (Some(l), None) => (hit(l), perpendicular_trim(l, left, right, config)),
        (None, Some(r)) => (perpendicular_trim(r, right, left, config), hit(r)),
        (None, None) => {
            let left_near = planar_distance_sq(left.end, center, config);
            let right_near = planar_distance_sq(right.end, center, config);
            if left_near <= right_near {
                (raw(left), perpendicular_trim(left.end, left, right, config))
            } else {
                (perpendicular_trim(right.end, right, left, config), raw(right))
            }
        }
    }
}

/// Trims `target` with the perpendicular to `reference` through `anchor`.
fn perpendicular_trim(anchor: DVec3, reference: &Bound, target: &Bound, config: &RoadConfig) -> ResolvedSide {
    let plane = &config.plane;
    // Bounds run outer → junction; the segment direction is the same either way.
    let cut = perpendicular_through(anchor, reference.direction(plane), plane);
    match intersect_lines(&cut, target, plane, config.tolerance, plane.height(anchor)) {
        Intersection::Point(point) => ResolvedSide {
            point,
            resolution: SideResolution::PerpendicularTrim,
        },
        Intersection::Parallel => ResolvedSide {
            point: target.end,
            resolution: SideResolution::RawEndpoint,
        },
    }
}

// =============================================================================
// POLYGON
// =============================================================================

fn push_unique(points: &mut Vec<DVec3>, candidate: DVec3, config: &RoadConfig) {
    if points
        .iter()
        .all(|&p| planar_distance_sq(p, candidate, config) > config.merge_epsilon_sq)
    {
        points.push(candidate);
    }
}

/// Builds the closed clockwise polygon around `center`.
///
/// `outer[i]` is the outer node position of segment `i`, used to order the
/// segments when closing the gaps between neighbors.
pub fn assemble_polygon(
    center: DVec3,
    bounds: &[JunctionBounds],
    sides: &[(ResolvedSide, ResolvedSide)],
    outer: &[DVec3],
    config: &RoadConfig,
) -> Vec<DVec3> {
    let plane = config.plane;
    let mut polygon = Vec::with_capacity(sides.len() * 3);
    for (left, right) in sides {
        push_unique(&mut polygon, left.point, config);
        push_unique(&mut polygon, right.point, config);
    }

    if bounds.len() >= 2 && bounds.len() == outer.len() {
        let max_radius_sq = polygon
            .iter()
            .map(|&p| planar_distance_sq(p, center, config))
            .fold(0.0_f64, f64::max);
        let limit_sq = max_radius_sq / (config.min_miter_cos * config.min_miter_cos);

        let order = clockwise_indices(outer, center, plane);
        let height = plane.height(center);
        for (k, &a) in order.iter().enumerate() {
            let b = order[(k + 1) % order.len()];
            // a.right faces b.left across the gap
            if let Intersection::Point(corner) =
                intersect_lines(&bounds[a].right, &bounds[b].left, &plane, config.tolerance, height)
            {
                if corner.is_finite() && planar_distance_sq(corner, center, config) <= limit_sq {
                    push_unique(&mut polygon, corner, config);
                }
            }
        }
    }

    sort_clockwise(&mut polygon, center, plane);
    polygon
}

// =============================================================================
// JUNCTION PASS
// =============================================================================

/// Every junction node of the graph.
pub fn find_junctions(graph: &RoadGraph) -> Vec<NodeIndex> {
    graph.junction_nodes()
}

/// Segment gathered at a junction before resolution.
struct Gathered {
    road: RoadIndex,
    outer: NodeIndex,
    side: SegmentSide,
    bounds: JunctionBounds,
}

fn gather(graph: &RoadGraph, raw: &RawOffsets, node: NodeIndex, diagnostics: &mut Diagnostics) -> Vec<Gathered> {
    let mut gathered = Vec::new();
    for incident in graph.incident_segments(node) {
        let key = incident.key(node);
        let (near, far) = match (raw.get(key), raw.get(key.reversed())) {
            (Some(near), Some(far)) => (near, far),
            (near, _) => {
                let missing = if near.is_none() { key } else { key.reversed() };
                diagnostics.push(Diagnostic::MissingSegmentBoundary {
                    road: graph.road(missing.road).id,
                    node: graph.node(missing.node).id,
                    neighbor: graph.node(missing.neighbor).id,
                });
                continue;
            }
        };

        let bounds = match incident.side {
            SegmentSide::Successor => JunctionBounds {
                left: Bound::new(far.left, near.left),
                right: Bound::new(far.right, near.right),
            },
            SegmentSide::Predecessor => JunctionBounds {
                left: Bound::new(far.right, near.right),
                right: Bound::new(far.left, near.left),
            },
        };

        gathered.push(Gathered {
            road: incident.road,
            outer: incident.neighbor,
            side: incident.side,
            bounds,
        });
    }
    gathered
}

fn is_finite_bound(bound: &Bound) -> bool {
    bound.start.is_finite() && bound.end.is_finite()
}

/// Resolves one junction node, or `None` when it has to be skipped.
pub fn resolve_junction(
    graph: &RoadGraph,
    raw: &RawOffsets,
    node: NodeIndex,
    config: &RoadConfig,
    diagnostics: &mut Diagnostics,
) -> Option<Junction> {
    let center = graph.node(node).position;
    let node_id = graph.node(node).id;
    let gathered = gather(graph, raw, node, diagnostics);

    let finite_left = gathered.iter().filter(|g| is_finite_bound(&g.bounds.left)).count();
    let finite_right = gathered.iter().filter(|g| is_finite_bound(&g.bounds.right)).count();
    if finite_left != finite_right {
        diagnostics.push(Diagnostic::JunctionBoundMismatch {
            node: node_id,
            left: finite_left,
            right: finite_right,
        });
        return None;
    }

    let complete: Vec<&Gathered> = gathered
        .iter()
        .filter(|g| is_finite_bound(&g.bounds.left) && is_finite_bound(&g.bounds.right))
        .collect();
    let lefts: Vec<Bound> = complete.iter().map(|g| g.bounds.left).collect();
    let rights: Vec<Bound> = complete.iter().map(|g| g.bounds.right).collect();

    let resolution = match resolve_bounds(center, &lefts, &rights, config) {
        Ok(resolution) => resolution,
        Err(BoundMismatch { left, right }) => {
            diagnostics.push(Diagnostic::JunctionBoundMismatch {
                node: node_id,
                left,
                right,
            });
            return None;
        }
    };

    if resolution.parallel_pairs > 0 {
        diagnostics.push(Diagnostic::ParallelLines {
            node: node_id,
            pairs: resolution.parallel_pairs,
        });
    }

    let mut segments = Vec::with_capacity(complete.len());
    for (g, (left, right)) in complete.iter().zip(resolution.sides) {
        if left.point.is_finite() && right.point.is_finite() {
            segments.push(JunctionSegment {
                road: g.road,
                outer: g.outer,
                side: g.side,
                bounds: g.bounds,
                left,
                right,
            });
        }
    }

    if segments.len() < 2 {
        debug!(node = %node_id, segments = segments.len(), "junction skipped, too few segments");
        return None;
    }

    let bounds: Vec<JunctionBounds> = segments.iter().map(|s| s.bounds).collect();
    let sides: Vec<(ResolvedSide, ResolvedSide)> = segments.iter().map(|s| (s.left, s.right)).collect();
    let outer: Vec<DVec3> = segments.iter().map(|s| graph.node(s.outer).position).collect();
    let polygon = assemble_polygon(center, &bounds, &sides, &outer, config);

    Some(Junction {
        node,
        center,
        segments,
        polygon,
    })
}

/// Resolves every junction and returns them with the trimmed overlay.
pub fn resolve_junctions<'a>(
    graph: &RoadGraph,
    raw: &'a RawOffsets,
    config: &RoadConfig,
    diagnostics: &mut Diagnostics,
) -> (Vec<Junction>, ResolvedBoundaries<'a>) {
    let mut resolved = ResolvedBoundaries::new(raw);
    let mut junctions = Vec::new();

    for node in find_junctions(graph) {
        let Some(junction) = resolve_junction(graph, raw, node, config, diagnostics) else {
            continue;
        };

        for segment in &junction.segments {
            let (left, right) = segment.road_frame();
            resolved.write(
                SegmentKey::new(segment.road, node, segment.outer),
                SegmentBoundary {
                    neighbor: segment.outer,
                    left,
                    right,
                },
            );
        }
        junctions.push(junction);
    }

    debug!(
        junctions = junctions.len(),
        trimmed = resolved.trimmed_count(),
        "junctions resolved"
    );
    (junctions, resolved)
}

#[cfg(test)]
mod tests;
