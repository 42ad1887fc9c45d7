//! Flat records describing a complete street graph.

use std::io::{Read, Write};

use mts_core::{CrossingLogicConfig, EdgeId, GeoPoint, NodeId};
use mts_graph::{GraphGuid, Lane, StreetType};

use crate::codec::*;
use crate::{ExfmtResult, Section};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id:       NodeId,
    pub position: GeoPoint,
    pub crossing: CrossingLogicConfig,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub id:           EdgeId,
    pub origin:       NodeId,
    pub destination:  NodeId,
    pub length_m:     f32,
    pub lanes:        u8,
    pub street_type:  StreetType,
    pub max_velocity: u32,
    pub reverse:      Option<EdgeId>,
}

/// One permitted turn `from` → `to` at `node`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConnectorRecord {
    pub node: NodeId,
    pub from: Lane,
    pub to:   Lane,
}

/// A street graph as id-ordered records plus the GUID it had when stored.
///
/// Incoming and leaving lists are not stored: replaying the edges in id
/// order rebuilds them exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetGraphSection {
    pub guid:       GraphGuid,
    pub nodes:      Vec<NodeRecord>,
    pub edges:      Vec<EdgeRecord>,
    pub connectors: Vec<ConnectorRecord>,
}

impl Section for StreetGraphSection {
    const TAG: u16 = 0x0020;
    const NAME: &'static str = "street graph";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        write_u64(w, self.guid.0)?;

        write_len(w, self.nodes.len(), Self::NAME)?;
        for n in &self.nodes {
            write_u32(w, n.id.0)?;
            write_point(w, n.position)?;
            write_u8(w, n.crossing.to_bits())?;
        }

        write_len(w, self.edges.len(), Self::NAME)?;
        for e in &self.edges {
            write_u32(w, e.id.0)?;
            write_u32(w, e.origin.0)?;
            write_u32(w, e.destination.0)?;
            write_f32(w, e.length_m)?;
            write_u8(w, e.lanes)?;
            write_u8(w, e.street_type.0)?;
            write_u32(w, e.max_velocity)?;
            write_u32(w, e.reverse.unwrap_or(EdgeId::INVALID).0)?;
        }

        write_len(w, self.connectors.len(), Self::NAME)?;
        for c in &self.connectors {
            write_u32(w, c.node.0)?;
            write_u32(w, c.from.edge.0)?;
            write_u8(w, c.from.index)?;
            write_u32(w, c.to.edge.0)?;
            write_u8(w, c.to.index)?;
        }
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        let guid = GraphGuid(read_u64(r)?);

        let n = read_len(r)?;
        let mut nodes = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            nodes.push(NodeRecord {
                id:       NodeId(read_u32(r)?),
                position: read_point(r)?,
                crossing: CrossingLogicConfig::from_bits(read_u8(r)?),
            });
        }

        let n = read_len(r)?;
        let mut edges = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            edges.push(EdgeRecord {
                id:           EdgeId(read_u32(r)?),
                origin:       NodeId(read_u32(r)?),
                destination:  NodeId(read_u32(r)?),
                length_m:     read_f32(r)?,
                lanes:        read_u8(r)?,
                street_type:  StreetType(read_u8(r)?),
                max_velocity: read_u32(r)?,
                reverse:      Some(EdgeId(read_u32(r)?)).filter(|e| e.is_valid()),
            });
        }

        let n = read_len(r)?;
        let mut connectors = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            let node = NodeId(read_u32(r)?);
            let from = Lane::new(EdgeId(read_u32(r)?), read_u8(r)?);
            let to = Lane::new(EdgeId(read_u32(r)?), read_u8(r)?);
            connectors.push(ConnectorRecord { node, from, to });
        }

        Ok(Self { guid, nodes, edges, connectors })
    }
}
