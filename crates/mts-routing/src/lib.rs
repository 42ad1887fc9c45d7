//! `mts-routing` — shortest and fastest paths over a [`StreetGraph`].
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`route`]         | `Route`                                                   |
//! | [`algorithm`]     | `ShortestPathAlgorithm` trait, `EdgeWeight`, `Heuristic`  |
//! | [`astar`]         | `AStar` (unidirectional, edge-labelled)                   |
//! | [`bidirectional`] | `BidirectionalAStar`                                      |
//! | [`factory`]       | `AStars`, `BidirectionalAStars` preset constructors       |
//!
//! # Turn restrictions
//!
//! Which edge a vehicle may take next depends on the edge it arrived on
//! (see [`Node::leaving_edges_from`]).  Both searches therefore label
//! *edges*, not nodes: a node reached over two different edges is two
//! different search states.
//!
//! # Failure
//!
//! Routing has no error type.  `start == end`, an unknown node, or an
//! unreachable target all produce an empty [`Route`].
//!
//! [`StreetGraph`]: mts_graph::StreetGraph
//! [`Node::leaving_edges_from`]: mts_graph::Node::leaving_edges_from

pub mod algorithm;
pub mod astar;
pub mod bidirectional;
pub mod factory;
pub mod route;

mod label;

#[cfg(test)]
mod tests;

pub use algorithm::{EdgeWeight, Heuristic, ShortestPathAlgorithm};
pub use astar::AStar;
pub use bidirectional::BidirectionalAStar;
pub use factory::{AStars, BidirectionalAStars};
pub use route::Route;
