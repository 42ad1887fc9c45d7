//! The routing trait and the cost closures algorithms are built from.

use std::sync::Arc;

use mts_core::NodeId;
use mts_graph::{DirectedEdge, Node, StreetGraph};

use crate::Route;

/// Cost of traversing one edge.  Must be non-negative and finite.
pub type EdgeWeight = Arc<dyn Fn(&DirectedEdge) -> f64 + Send + Sync>;

/// Lower bound on the cost from the first node to the second.
///
/// Must never overestimate (admissible) and never be negative, or the
/// returned routes may not be optimal.
pub type Heuristic = Arc<dyn Fn(&Node, &Node) -> f64 + Send + Sync>;

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: the simulation and the scenario
/// generator share one algorithm across Rayon workers.  Queries only read
/// the graph.
pub trait ShortestPathAlgorithm: Send + Sync {
    /// One-off preparation against a frozen graph.  The default does nothing.
    fn preprocess(&mut self, _graph: &StreetGraph) {}

    /// Cheapest drivable route from `start` to `end`.
    ///
    /// Empty if `start == end`, if either node is not in the graph, or if
    /// no path exists.
    fn find_shortest_path(&self, graph: &StreetGraph, start: NodeId, end: NodeId) -> Route;
}
