//! Routing results.

use mts_core::{EdgeId, NodeId};
use mts_graph::StreetGraph;

/// An ordered list of edges from a start node to an end node, plus the
/// cost the producing algorithm assigned to it.
///
/// Immutable once built.  An empty route means "nothing to drive": either
/// start and end coincide or no path exists.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    edges: Vec<EdgeId>,
    cost:  f64,
}

impl Route {
    pub fn new(edges: Vec<EdgeId>, cost: f64) -> Self {
        Self { edges, cost }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Edges to traverse in order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Total weight under the edge-weight function that found this route.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<EdgeId> {
        self.edges.get(index).copied()
    }

    /// Origin of the first edge.
    pub fn start(&self, graph: &StreetGraph) -> Option<NodeId> {
        self.edges.first().and_then(|&e| graph.edge(e)).map(|e| e.origin)
    }

    /// Destination of the last edge.
    pub fn end(&self, graph: &StreetGraph) -> Option<NodeId> {
        self.edges.last().and_then(|&e| graph.edge(e)).map(|e| e.destination)
    }

    /// Sum of physical edge lengths in metres.
    pub fn length_m(&self, graph: &StreetGraph) -> f64 {
        self.edges
            .iter()
            .filter_map(|&e| graph.edge(e))
            .map(|e| e.length_m as f64)
            .sum()
    }

    /// `true` if consecutive edges meet and every turn is permitted by the
    /// connector table of the node between them.
    pub fn is_drivable(&self, graph: &StreetGraph) -> bool {
        self.edges.windows(2).all(|pair| {
            let (Some(a), Some(b)) = (graph.edge(pair[0]), graph.edge(pair[1])) else {
                return false;
            };
            a.destination == b.origin
                && graph
                    .node(a.destination)
                    .is_some_and(|n| n.permits_turn(a.id, b.id))
        }) && self.edges.iter().all(|&e| graph.edge(e).is_some())
    }
}
