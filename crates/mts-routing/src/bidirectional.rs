//! Bidirectional A*.
//!
//! Two edge-labelled searches run towards each other:
//!
//! - **forward** from `start`: label `g(e)` is the cost of a route from
//!   `start` that ends by driving `e` (weight of `e` included);
//! - **backward** from `end`: label `d(e)` is the cost still ahead *after*
//!   driving `e`.  Every edge into `end` starts with `d = 0`, and a label on
//!   `e` is extended to each incoming edge `p` whose turn `p -> e` the
//!   connector table permits, with `d(p) = d(e) + w(e)`.
//!
//! Both labels on an edge describe the same point (the destination of `e`),
//! so `g(e) + d(e)` is the cost of a complete route through `e`.  The best
//! such sum is the meeting value μ.  The search stops once the smaller key
//! of either frontier reaches μ: no undiscovered route can then be cheaper.

use std::fmt;
use std::sync::Arc;

use log::debug;

use mts_core::{EdgeId, Metrics, NodeId};
use mts_graph::{DirectedEdge, Node, StreetGraph};

use crate::label::Frontier;
use crate::{EdgeWeight, Heuristic, Route, ShortestPathAlgorithm};

/// Bidirectional variant of [`AStar`](crate::AStar) with the same weight and
/// heuristic contract.  Returns routes of the same cost; the edges may
/// differ when several optima exist.
pub struct BidirectionalAStar {
    weight:    EdgeWeight,
    heuristic: Heuristic,
    metrics:   Option<Arc<Metrics>>,
}

impl BidirectionalAStar {
    pub fn new<W, H>(weight: W, heuristic: H) -> Self
    where
        W: Fn(&DirectedEdge) -> f64 + Send + Sync + 'static,
        H: Fn(&Node, &Node) -> f64 + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(weight), Arc::new(heuristic))
    }

    pub fn from_parts(weight: EdgeWeight, heuristic: Heuristic) -> Self {
        Self { weight, heuristic, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl fmt::Debug for BidirectionalAStar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidirectionalAStar")
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Best complete route seen so far.
struct Meeting {
    cost: f64,
    edge: Option<EdgeId>,
}

impl Meeting {
    fn offer(&mut self, edge: EdgeId, forward: Option<f64>, backward: Option<f64>) {
        if let (Some(g), Some(d)) = (forward, backward) {
            if g + d < self.cost {
                self.cost = g + d;
                self.edge = Some(edge);
            }
        }
    }
}

impl ShortestPathAlgorithm for BidirectionalAStar {
    fn find_shortest_path(&self, graph: &StreetGraph, start: NodeId, end: NodeId) -> Route {
        if start == end {
            return Route::empty();
        }
        let (Some(start_node), Some(end_node)) = (graph.node(start), graph.node(end)) else {
            return Route::empty();
        };

        let h = |from: NodeId, to: &Node| graph.node(from).map_or(0.0, |n| (self.heuristic)(n, to));
        let h_to_end = |e: &DirectedEdge| h(e.destination, end_node);
        let h_from_start = |e: &DirectedEdge| {
            graph.node(e.destination).map_or(0.0, |n| (self.heuristic)(start_node, n))
        };

        let mut fwd = Frontier::new();
        let mut bwd = Frontier::new();
        let mut best = Meeting { cost: f64::INFINITY, edge: None };

        for &e in &end_node.incoming {
            if let Some(edge) = graph.edge(e) {
                bwd.relax(e, 0.0, None, h_from_start(edge));
            }
        }
        for e in start_node.leaving_edges_from(None) {
            if let Some(edge) = graph.edge(e) {
                let g = (self.weight)(edge);
                if fwd.relax(e, g, None, h_to_end(edge)) {
                    best.offer(e, Some(g), bwd.cost(e));
                }
            }
        }

        loop {
            let (Some(kf), Some(kb)) = (fwd.min_key(), bwd.min_key()) else { break };
            if kf >= best.cost || kb >= best.cost {
                break;
            }

            if kf <= kb {
                let Some((e, g)) = fwd.pop() else { break };
                let Some(edge) = graph.edge(e) else { continue };
                let Some(via) = graph.node(edge.destination) else { continue };
                for next in via.leaving_edges_from(Some(e)) {
                    let Some(next_edge) = graph.edge(next) else { continue };
                    let ng = g + (self.weight)(next_edge);
                    if fwd.relax(next, ng, Some(e), h_to_end(next_edge)) {
                        best.offer(next, Some(ng), bwd.cost(next));
                    }
                }
            } else {
                let Some((e, d)) = bwd.pop() else { break };
                let Some(edge) = graph.edge(e) else { continue };
                let Some(via) = graph.node(edge.origin) else { continue };
                let nd = d + (self.weight)(edge);
                for prev in via.incoming_edges_to(e) {
                    let Some(prev_edge) = graph.edge(prev) else { continue };
                    if bwd.relax(prev, nd, Some(e), h_from_start(prev_edge)) {
                        best.offer(prev, fwd.cost(prev), Some(nd));
                    }
                }
            }
        }

        let settled = fwd.settled() + bwd.settled();
        if let Some(m) = &self.metrics {
            m.record_route(settled);
        }

        let Some(meet) = best.edge else {
            debug!("bidirectional A* {start} -> {end}: no path ({settled} labels settled)");
            return Route::empty();
        };

        // Forward links point back towards `start`, backward links point on
        // towards `end`; the meeting edge belongs to both chains.
        let mut edges = fwd.chain(meet);
        edges.reverse();
        edges.extend(bwd.chain(meet).into_iter().skip(1));

        debug!(
            "bidirectional A* {start} -> {end}: {} edges, cost {:.3}, {settled} labels settled",
            edges.len(),
            best.cost
        );
        Route::new(edges, best.cost)
    }
}
