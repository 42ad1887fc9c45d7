//! Unidirectional A* with pluggable weight and heuristic.

use std::fmt;
use std::sync::Arc;

use log::debug;

use mts_core::{Metrics, NodeId};
use mts_graph::{DirectedEdge, Node, StreetGraph};

use crate::label::Frontier;
use crate::{EdgeWeight, Heuristic, Route, ShortestPathAlgorithm};

/// A* over edge labels.
///
/// A label is "the cheapest known way to have just driven along edge `e`".
/// Expanding it only considers the edges the connector table of `e`'s
/// destination permits after `e`; at the start node every leaving edge is
/// open.  With a zero heuristic this is Dijkstra's algorithm.
///
/// Labels may be reopened when a cheaper cost turns up later, so the result
/// stays optimal for heuristics that are admissible but not consistent.
pub struct AStar {
    weight:    EdgeWeight,
    heuristic: Heuristic,
    metrics:   Option<Arc<Metrics>>,
}

impl AStar {
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

    /// Report `routes_computed` / `labels_settled` to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn weight(&self) -> &EdgeWeight {
        &self.weight
    }

    pub fn heuristic(&self) -> &Heuristic {
        &self.heuristic
    }
}

impl fmt::Debug for AStar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AStar").field("metrics", &self.metrics.is_some()).finish_non_exhaustive()
    }
}

impl ShortestPathAlgorithm for AStar {
    fn find_shortest_path(&self, graph: &StreetGraph, start: NodeId, end: NodeId) -> Route {
        if start == end {
            return Route::empty();
        }
        let (Some(start_node), Some(end_node)) = (graph.node(start), graph.node(end)) else {
            return Route::empty();
        };

        let estimate = |e: &DirectedEdge| {
            graph.node(e.destination).map_or(0.0, |n| (self.heuristic)(n, end_node))
        };

        let mut open = Frontier::new();
        for e in start_node.leaving_edges_from(None) {
            if let Some(edge) = graph.edge(e) {
                open.relax(e, (self.weight)(edge), None, estimate(edge));
            }
        }

        let mut found = None;
        while let Some((e, cost)) = open.pop() {
            let Some(edge) = graph.edge(e) else { continue };
            if edge.destination == end {
                found = Some((e, cost));
                break;
            }
            let Some(via) = graph.node(edge.destination) else { continue };
            for next in via.leaving_edges_from(Some(e)) {
                if let Some(next_edge) = graph.edge(next) {
                    let g = cost + (self.weight)(next_edge);
                    open.relax(next, g, Some(e), estimate(next_edge));
                }
            }
        }

        if let Some(m) = &self.metrics {
            m.record_route(open.settled());
        }

        match found {
            Some((last, cost)) => {
                let mut edges = open.chain(last);
                edges.reverse();
                debug!(
                    "A* {start} -> {end}: {} edges, cost {cost:.3}, {} labels settled",
                    edges.len(),
                    open.settled()
                );
                Route::new(edges, cost)
            }
            None => {
                debug!("A* {start} -> {end}: no path ({} labels settled)", open.settled());
                Route::empty()
            }
        }
    }
}
