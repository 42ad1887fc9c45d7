//! Graph-subsystem error type.

use thiserror::Error;

use mts_core::{EdgeId, NodeId};

use crate::Lane;

/// Errors produced by `mts-graph`.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found in graph")]
    EdgeNotFound(EdgeId),

    #[error("graph cannot hold another {0}: ids exhausted")]
    CapacityExceeded(&'static str),

    #[error("edge from {origin} to {destination} must have at least one lane")]
    NoLanes { origin: NodeId, destination: NodeId },

    #[error("lane {lane} out of range: edge has {lanes} lane(s)")]
    LaneOutOfRange { lane: Lane, lanes: u8 },

    #[error("connector {from} -> {to} at {node} does not join edges incident to that node")]
    ConnectorNotIncident { node: NodeId, from: Lane, to: Lane },

    #[error("edge {edge} is listed at {node} but does not touch it")]
    InconsistentIncidence { node: NodeId, edge: EdgeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
