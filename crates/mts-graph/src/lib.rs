//! `mts-graph` — the street graph every other subsystem reads.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`edge`]  | `DirectedEdge`, `EdgeSpec`, `Lane`, `StreetType`              |
//! | [`node`]  | `Node` with incident edges and its connector (turn) table     |
//! | [`graph`] | `StreetGraph` arena, mutation API, `validate`, `bounds`       |
//! | [`guid`]  | `GraphGuid` content fingerprint                               |
//! | [`index`] | `NodeIndex` R-tree for nearest-node and area queries          |
//! | [`error`] | `GraphError`, `GraphResult<T>`                                |
//!
//! # Lifecycle
//!
//! A graph is filled through `&mut StreetGraph` (`add_node`, `add_edge`,
//! `add_connector`) and then shared read-only, usually as
//! `Arc<StreetGraph>`.  Routing, simulation and persistence only ever take
//! `&StreetGraph`, so a graph cannot change underneath them.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod edge;
pub mod error;
pub mod graph;
pub mod guid;
pub mod index;
pub mod node;

#[cfg(test)]
mod tests;

pub use edge::{DirectedEdge, EdgeSpec, Lane, StreetType};
pub use error::{GraphError, GraphResult};
pub use graph::StreetGraph;
pub use guid::GraphGuid;
pub use index::NodeIndex;
pub use node::Node;
