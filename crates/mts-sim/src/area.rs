//! Polygonal origin and destination areas.

use std::fmt;

use mts_core::{Bounds, GeoPoint, NodeId, point_in_polygon};
use mts_graph::NodeIndex;

/// What vehicles do in an area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaKind {
    /// Routes start at nodes inside the area.
    Origin,
    /// Routes end at nodes inside the area.
    Destination,
}

impl AreaKind {
    /// Stable one-byte code used by the exchange format.
    pub fn code(self) -> u8 {
        match self {
            AreaKind::Origin => 0,
            AreaKind::Destination => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AreaKind::Origin),
            1 => Some(AreaKind::Destination),
            _ => None,
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AreaKind::Origin => "origin",
            AreaKind::Destination => "destination",
        })
    }
}

/// A closed polygon (last vertex joins the first) tagged with its role.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub kind:    AreaKind,
    pub polygon: Vec<GeoPoint>,
}

impl Area {
    pub fn new(kind: AreaKind, polygon: Vec<GeoPoint>) -> Self {
        Self { kind, polygon }
    }

    /// Even-odd point-in-polygon test.  Degenerate polygons contain nothing.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        point_in_polygon(p, &self.polygon)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.polygon.iter().copied())
    }

    /// Graph nodes inside the area, ascending.
    pub fn nodes(&self, index: &NodeIndex) -> Vec<NodeId> {
        index.nodes_in_area(&self.polygon)
    }
}
