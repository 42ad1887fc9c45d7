//! Intersection crossing rules.
//!
//! Each tick the simulation collects, per node, the vehicles waiting at a
//! stop line and asks that node's [`CrossingLogic`] which of them may cross.
//! The default [`PriorityCrossingLogic`] reads its switches from the node's
//! own [`CrossingLogicConfig`](mts_core::CrossingLogicConfig).

use std::cmp::Reverse;
use std::f32::consts::TAU;

use mts_core::{EdgeId, GeoPoint, VehicleId};
use mts_graph::{Node, StreetGraph};

/// A vehicle at the stop line of `from_edge` that wants to turn into
/// `to_edge`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CrossingRequest {
    pub vehicle:       VehicleId,
    pub from_edge:     EdgeId,
    pub to_edge:       EdgeId,
    pub waiting_ticks: u32,
}

/// Decides which queued vehicles cross a node this tick.
pub trait CrossingLogic: Send + Sync {
    /// Vehicles allowed to cross, in the order they should be moved.
    /// Must be a subset of `requests`.
    fn admit(&self, graph: &StreetGraph, node: &Node, requests: &[CrossingRequest]) -> Vec<VehicleId>;
}

/// Priority rules for unsignalled intersections.
///
/// 1. With `edge_priority_enabled`, a vehicle on a higher street class goes
///    before one on a lower class.
/// 2. Otherwise, with `priority_to_the_right_enabled`, a vehicle yields to
///    one approaching from its right (its left when
///    `driving_on_the_right == false`).
///
/// Every request is ranked by how many others it must yield to.  Requests
/// are then admitted greedily by rank (ties: longer wait first, then lower
/// vehicle id) as long as they do not conflict with an admitted one.  Two
/// requests conflict when they enter the same edge or their paths cross
/// inside the intersection.  With `only_one_vehicle_enabled` at most one
/// request is admitted.
///
/// Because ranks are totally ordered with a tie-break, the best-ranked
/// request is always admitted: four vehicles each yielding to its right
/// neighbour cannot deadlock.
#[derive(Copy, Clone, Debug, Default)]
pub struct PriorityCrossingLogic;

impl CrossingLogic for PriorityCrossingLogic {
    fn admit(&self, graph: &StreetGraph, node: &Node, requests: &[CrossingRequest]) -> Vec<VehicleId> {
        let approaches: Vec<Approach> = requests
            .iter()
            .filter_map(|r| Approach::new(graph, node, *r))
            .collect();

        let cfg = node.crossing;
        let mut ranked: Vec<(usize, &Approach)> = approaches
            .iter()
            .map(|a| {
                let rank = approaches
                    .iter()
                    .filter(|b| b.req.vehicle != a.req.vehicle && b.has_priority_over(a, &cfg))
                    .count();
                (rank, a)
            })
            .collect();
        ranked.sort_by_key(|&(rank, a)| (rank, Reverse(a.req.waiting_ticks), a.req.vehicle));

        let mut admitted: Vec<&Approach> = Vec::new();
        for (_, a) in ranked {
            if admitted.iter().any(|b| a.conflicts_with(b)) {
                continue;
            }
            admitted.push(a);
            if cfg.only_one_vehicle_enabled {
                break;
            }
        }
        admitted.into_iter().map(|a| a.req.vehicle).collect()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A request with the geometry needed to compare it against others.
struct Approach {
    req:         CrossingRequest,
    street_rank: u8,
    /// Vector from the arrival edge's origin to the node (lon = x, lat = y).
    heading:     (f32, f32),
    /// Vector from the node back to the arrival edge's origin.
    from_dir:    (f32, f32),
    /// Bearings around the node of where the vehicle comes from and goes to.
    enter_angle: f32,
    exit_angle:  f32,
}

impl Approach {
    fn new(graph: &StreetGraph, node: &Node, req: CrossingRequest) -> Option<Self> {
        let from = graph.edge(req.from_edge)?;
        let to = graph.edge(req.to_edge)?;
        let origin = graph.node(from.origin)?.position;
        let target = graph.node(to.destination)?.position;
        let here = node.position;
        Some(Self {
            req,
            street_rank: from.street_type.priority(),
            heading: delta(origin, here),
            from_dir: delta(here, origin),
            enter_angle: here.bearing_to(origin),
            exit_angle: here.bearing_to(target),
        })
    }

    /// `true` if `self` may go before `other` under `cfg`.
    fn has_priority_over(&self, other: &Approach, cfg: &mts_core::CrossingLogicConfig) -> bool {
        if cfg.edge_priority_enabled && self.street_rank != other.street_rank {
            return self.street_rank > other.street_rank;
        }
        if cfg.priority_to_the_right_enabled {
            // Sign of the cross product tells on which side of `other`'s
            // heading `self` arrives: negative is to the right.
            let (hx, hy) = other.heading;
            let (rx, ry) = self.from_dir;
            let cross = hx * ry - hy * rx;
            return if cfg.driving_on_the_right { cross < 0.0 } else { cross > 0.0 };
        }
        false
    }

    fn conflicts_with(&self, other: &Approach) -> bool {
        if self.req.to_edge == other.req.to_edge {
            return true;
        }
        chords_cross((self.enter_angle, self.exit_angle), (other.enter_angle, other.exit_angle))
    }
}

fn delta(from: GeoPoint, to: GeoPoint) -> (f32, f32) {
    (to.lon - from.lon, to.lat - from.lat)
}

/// `x` lies strictly inside the counter-clockwise arc from `a` to `b`.
fn strictly_between(a: f32, b: f32, x: f32) -> bool {
    let span = (b - a).rem_euclid(TAU);
    let off = (x - a).rem_euclid(TAU);
    off > 0.0 && off < span
}

/// Two paths through a node, each given by entry and exit bearing, cross iff
/// exactly one endpoint of the second lies inside the arc spanned by the
/// first.  Paths sharing an endpoint do not cross.
fn chords_cross(a: (f32, f32), b: (f32, f32)) -> bool {
    strictly_between(a.0, a.1, b.0) != strictly_between(a.0, a.1, b.1)
        && !shares_endpoint(a, b)
}

fn shares_endpoint(a: (f32, f32), b: (f32, f32)) -> bool {
    const EPS: f32 = 1e-6;
    [b.0, b.1].iter().any(|&x| (x - a.0).abs() < EPS || (x - a.1).abs() < EPS)
}
