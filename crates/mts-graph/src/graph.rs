//! The street graph arena.
//!
//! # Data layout
//!
//! Nodes and edges live in two flat `Vec`s indexed by `NodeId` / `EdgeId`.
//! Ids are dense and assigned in insertion order, so `nodes[i].id == i`
//! always holds.  Relationships are id references; nothing owns anything
//! else and the graph has no reference cycles.
//!
//! The content fingerprint ([`GraphGuid`]) is computed lazily and cached.
//! Every `&mut self` mutator clears the cache.

use std::sync::OnceLock;

use log::debug;

use mts_core::{Bounds, CrossingLogicConfig, EdgeId, GeoPoint, NodeId};

use crate::{DirectedEdge, EdgeSpec, GraphError, GraphGuid, GraphResult, Lane, Node, guid};

/// Directed multigraph of the road network.
///
/// # Example
///
/// ```
/// use mts_core::{CrossingLogicConfig, GeoPoint};
/// use mts_graph::{EdgeSpec, Lane, StreetGraph};
///
/// let mut g = StreetGraph::new();
/// let a = g.add_node(GeoPoint::new(48.70, 9.10), CrossingLogicConfig::default()).unwrap();
/// let b = g.add_node(GeoPoint::new(48.71, 9.10), CrossingLogicConfig::default()).unwrap();
/// let ab = g.add_edge(EdgeSpec::new(a, b, 1_100.0)).unwrap();
/// let ba = g.add_edge(EdgeSpec::new(b, a, 1_100.0)).unwrap();
/// g.add_connector(Lane::new(ab, 0), Lane::new(ba, 0)).unwrap(); // U-turn at b
///
/// assert_eq!(g.edge(ab).unwrap().reverse, Some(ba));
/// assert!(g.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StreetGraph {
    nodes: Vec<Node>,
    edges: Vec<DirectedEdge>,
    guid:  OnceLock<GraphGuid>,
}

impl PartialEq for StreetGraph {
    /// Structural equality; the cached fingerprint is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            guid:  OnceLock::new(),
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Add a node and return its id (sequential from 0).
    ///
    /// Fails with [`GraphError::CapacityExceeded`] once every `NodeId` is
    /// taken.
    pub fn add_node(&mut self, position: GeoPoint, crossing: CrossingLogicConfig) -> GraphResult<NodeId> {
        let id = next_id::<NodeId>(self.nodes.len(), "node")?;
        self.nodes.push(Node::new(id, position, crossing));
        self.guid.take();
        Ok(id)
    }

    /// Add a directed edge and return its id (sequential from 0).
    ///
    /// The edge is appended to `origin.leaving` and `destination.incoming`.
    /// If an edge running the opposite way already exists and has no reverse
    /// yet, the two are linked to each other.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> GraphResult<EdgeId> {
        if spec.origin.index() >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(spec.origin));
        }
        if spec.destination.index() >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(spec.destination));
        }
        if spec.lanes == 0 {
            return Err(GraphError::NoLanes {
                origin:      spec.origin,
                destination: spec.destination,
            });
        }

        let id = next_id::<EdgeId>(self.edges.len(), "edge")?;

        let reverse = self.nodes[spec.destination.index()]
            .leaving
            .iter()
            .copied()
            .find(|&e| {
                let cand = &self.edges[e.index()];
                cand.destination == spec.origin && cand.reverse.is_none()
            });
        if let Some(rev) = reverse {
            self.edges[rev.index()].reverse = Some(id);
        }

        self.edges.push(DirectedEdge {
            id,
            origin: spec.origin,
            destination: spec.destination,
            length_m: spec.length_m,
            lanes: spec.lanes,
            street_type: spec.street_type,
            max_velocity: spec.max_velocity,
            reverse,
        });
        self.nodes[spec.origin.index()].leaving.push(id);
        self.nodes[spec.destination.index()].incoming.push(id);
        self.guid.take();
        Ok(id)
    }

    /// Permit the turn `from` → `to` at the node joining the two edges.
    ///
    /// Only the edge ids are checked here.  Whether the edges actually meet
    /// and whether the lane indices exist is left to [`validate`](Self::validate)
    /// (and a `debug_assert!`), so bulk loading stays cheap.
    pub fn add_connector(&mut self, from: Lane, to: Lane) -> GraphResult<()> {
        let node = self.edge(from.edge).ok_or(GraphError::EdgeNotFound(from.edge))?.destination;
        let to_origin = self.edge(to.edge).ok_or(GraphError::EdgeNotFound(to.edge))?.origin;
        debug_assert_eq!(node, to_origin, "connector {from} -> {to} joins edges that do not meet");

        self.nodes[node.index()].connectors.entry(from).or_default().insert(to);
        self.guid.take();
        Ok(())
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&DirectedEdge> {
        self.edges.get(id.index())
    }

    /// All nodes, indexed by `NodeId`.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, indexed by `EdgeId`.
    pub fn edges(&self) -> &[DirectedEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content fingerprint; computed on first use after the last mutation.
    pub fn guid(&self) -> GraphGuid {
        *self.guid.get_or_init(|| guid::compute(&self.nodes, &self.edges))
    }

    /// Smallest box around every node position.
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.nodes.iter().map(|n| n.position))
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check the structural invariants `add_connector` does not enforce.
    ///
    /// - every edge listed at a node actually starts or ends there,
    /// - every connector joins an incoming lane to a leaving lane of its node,
    /// - every connector lane index is below its edge's lane count.
    pub fn validate(&self) -> GraphResult<()> {
        for node in &self.nodes {
            for &e in &node.incoming {
                let edge = self.edge(e).ok_or(GraphError::EdgeNotFound(e))?;
                if edge.destination != node.id {
                    return Err(GraphError::InconsistentIncidence { node: node.id, edge: e });
                }
            }
            for &e in &node.leaving {
                let edge = self.edge(e).ok_or(GraphError::EdgeNotFound(e))?;
                if edge.origin != node.id {
                    return Err(GraphError::InconsistentIncidence { node: node.id, edge: e });
                }
            }
            for (&from, targets) in &node.connectors {
                for &to in targets {
                    self.check_lane(from)?;
                    self.check_lane(to)?;
                    if self.edges[from.edge.index()].destination != node.id
                        || self.edges[to.edge.index()].origin != node.id
                    {
                        return Err(GraphError::ConnectorNotIncident { node: node.id, from, to });
                    }
                }
            }
        }
        debug!(
            "street graph validated: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(())
    }

    fn check_lane(&self, lane: Lane) -> GraphResult<()> {
        let edge = self.edge(lane.edge).ok_or(GraphError::EdgeNotFound(lane.edge))?;
        if lane.index >= edge.lanes {
            return Err(GraphError::LaneOutOfRange { lane, lanes: edge.lanes });
        }
        Ok(())
    }
}

/// The id of the `len`-th arena entry.  Both id types are `u32`-backed and
/// reserve `u32::MAX` as their `INVALID` sentinel.
pub(crate) fn next_id<I: TryFrom<usize>>(len: usize, what: &'static str) -> GraphResult<I> {
    match I::try_from(len) {
        Ok(id) if len != u32::MAX as usize => Ok(id),
        _ => Err(GraphError::CapacityExceeded(what)),
    }
}
