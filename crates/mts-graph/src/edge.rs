//! Directed edges, their lanes, and street classes.

use std::fmt;

use mts_core::{EdgeId, NodeId};

// ── StreetType ────────────────────────────────────────────────────────────────

/// Street class of an edge.  Doubles as its priority at intersections:
/// a larger value means a more important road.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetType(pub u8);

impl StreetType {
    pub const UNCLASSIFIED: StreetType = StreetType(0);
    pub const RESIDENTIAL:  StreetType = StreetType(1);
    pub const TERTIARY:     StreetType = StreetType(2);
    pub const SECONDARY:    StreetType = StreetType(3);
    pub const PRIMARY:      StreetType = StreetType(4);
    pub const TRUNK:        StreetType = StreetType(5);
    pub const MOTORWAY:     StreetType = StreetType(6);

    #[inline]
    pub fn priority(self) -> u8 {
        self.0
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

/// One lane of a directed edge.  A plain value: lanes are never stored on
/// their own, only referenced from connector tables.
///
/// Ordered by edge first, then lane index, so all lanes of one edge form a
/// contiguous range in a `BTreeMap<Lane, _>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    pub edge:  EdgeId,
    pub index: u8,
}

impl Lane {
    #[inline]
    pub fn new(edge: EdgeId, index: u8) -> Self {
        Self { edge, index }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.edge, self.index)
    }
}

// ── DirectedEdge ──────────────────────────────────────────────────────────────

/// A one-way road segment between two nodes.
///
/// Created through [`StreetGraph::add_edge`](crate::StreetGraph::add_edge),
/// which assigns `id` and fills in `reverse`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectedEdge {
    pub id:          EdgeId,
    pub origin:      NodeId,
    pub destination: NodeId,

    /// Physical length in metres.
    pub length_m: f32,

    /// Number of lanes, at least one.
    pub lanes: u8,

    pub street_type: StreetType,

    /// Speed limit in cells per tick.
    pub max_velocity: u32,

    /// The edge running destination → origin along the same road, if any.
    pub reverse: Option<EdgeId>,
}

impl DirectedEdge {
    /// Length in simulation cells, rounded up, never zero.
    #[inline]
    pub fn length_cells(&self, meters_per_cell: f32) -> u32 {
        ((self.length_m / meters_per_cell).ceil() as u32).max(1)
    }

    /// Lane `index` of this edge, or `None` if the edge is narrower.
    pub fn lane(&self, index: u8) -> Option<Lane> {
        (index < self.lanes).then(|| Lane::new(self.id, index))
    }

    /// Every lane of this edge, rightmost (index 0) first.
    pub fn all_lanes(&self) -> impl Iterator<Item = Lane> + '_ {
        (0..self.lanes).map(move |i| Lane::new(self.id, i))
    }
}

// ── EdgeSpec ──────────────────────────────────────────────────────────────────

/// Everything needed to add an edge; the graph assigns the id.
///
/// ```
/// use mts_core::NodeId;
/// use mts_graph::{EdgeSpec, StreetType};
///
/// let spec = EdgeSpec::new(NodeId(0), NodeId(1), 75.0)
///     .lanes(2)
///     .street_type(StreetType::PRIMARY)
///     .max_velocity(3);
/// assert_eq!(spec.lanes, 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpec {
    pub origin:       NodeId,
    pub destination:  NodeId,
    pub length_m:     f32,
    pub lanes:        u8,
    pub street_type:  StreetType,
    pub max_velocity: u32,
}

impl EdgeSpec {
    /// A single-lane unclassified edge with speed limit 1 cell/tick.
    pub fn new(origin: NodeId, destination: NodeId, length_m: f32) -> Self {
        Self {
            origin,
            destination,
            length_m,
            lanes: 1,
            street_type: StreetType::UNCLASSIFIED,
            max_velocity: 1,
        }
    }

    pub fn lanes(mut self, lanes: u8) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn street_type(mut self, street_type: StreetType) -> Self {
        self.street_type = street_type;
        self
    }

    pub fn max_velocity(mut self, max_velocity: u32) -> Self {
        self.max_velocity = max_velocity;
        self
    }
}
