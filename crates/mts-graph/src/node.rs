//! Intersections and way joints.

use std::collections::{BTreeMap, BTreeSet};

use mts_core::{CrossingLogicConfig, EdgeId, GeoPoint, NodeId};

use crate::Lane;

/// A graph node together with its turn table.
///
/// `connectors` maps an incoming lane to the leaving lanes a vehicle on it
/// may turn into.  A pair that is absent is a forbidden turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id:       NodeId,
    pub position: GeoPoint,
    pub crossing: CrossingLogicConfig,

    /// Edges whose destination is this node, in insertion order.
    pub incoming: Vec<EdgeId>,

    /// Edges whose origin is this node, in insertion order.
    pub leaving: Vec<EdgeId>,

    pub connectors: BTreeMap<Lane, BTreeSet<Lane>>,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: GeoPoint, crossing: CrossingLogicConfig) -> Self {
        Self {
            id,
            position,
            crossing,
            incoming: Vec::new(),
            leaving: Vec::new(),
            connectors: BTreeMap::new(),
        }
    }

    /// Leaving edges a vehicle may take after arriving via `entered`.
    ///
    /// With `None` (the vehicle starts here) every leaving edge is eligible.
    /// Otherwise the result is the union over all lanes of `entered` of the
    /// edges their connectors lead to.  Sorted, without duplicates.
    pub fn leaving_edges_from(&self, entered: Option<EdgeId>) -> Vec<EdgeId> {
        let Some(edge) = entered else {
            return self.leaving.clone();
        };
        let mut out: Vec<EdgeId> = self
            .connectors
            .range(Lane::new(edge, 0)..=Lane::new(edge, u8::MAX))
            .flat_map(|(_, targets)| targets.iter().map(|l| l.edge))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Incoming edges from which a vehicle may turn into `leaving`.
    ///
    /// The reverse of [`leaving_edges_from`](Self::leaving_edges_from);
    /// backward search walks the graph with it.
    pub fn incoming_edges_to(&self, leaving: EdgeId) -> Vec<EdgeId> {
        let mut out: Vec<EdgeId> = self
            .connectors
            .iter()
            .filter(|(_, targets)| targets.iter().any(|l| l.edge == leaving))
            .map(|(from, _)| from.edge)
            .collect();
        out.dedup();
        out
    }

    /// `true` if some lane of `from` connects to some lane of `to`.
    pub fn permits_turn(&self, from: EdgeId, to: EdgeId) -> bool {
        self.connectors
            .range(Lane::new(from, 0)..=Lane::new(from, u8::MAX))
            .any(|(_, targets)| targets.iter().any(|l| l.edge == to))
    }

    /// Total number of (from, to) lane pairs in the turn table.
    pub fn connector_count(&self) -> usize {
        self.connectors.values().map(BTreeSet::len).sum()
    }
}
