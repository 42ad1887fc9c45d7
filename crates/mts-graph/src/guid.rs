//! Content fingerprint of a street graph.
//!
//! Uses 64-bit FNV-1a over every node, edge and connector in id order.
//! Two graphs with the same ids and the same content always share a GUID;
//! any change to that content changes it (up to hash collisions).  This is
//! an identity check for persisted scenarios, not a cryptographic hash.

use std::fmt;

use crate::{DirectedEdge, Node};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fingerprint of a graph's node, edge and connector content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphGuid(pub u64);

impl fmt::Display for GraphGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// ── Hasher ────────────────────────────────────────────────────────────────────

struct Fnv1a(u64);

impl Fnv1a {
    #[inline]
    fn byte(&mut self, b: u8) {
        self.0 = (self.0 ^ b as u64).wrapping_mul(FNV_PRIME);
    }

    #[inline]
    fn bytes(&mut self, bs: &[u8]) {
        for &b in bs {
            self.byte(b);
        }
    }

    #[inline]
    fn u32(&mut self, v: u32) {
        self.bytes(&v.to_le_bytes());
    }

    #[inline]
    fn f32(&mut self, v: f32) {
        self.u32(v.to_bits());
    }
}

/// Hash the graph content.  `nodes` and `edges` must be in id order, which
/// is how `StreetGraph` stores them.
pub(crate) fn compute(nodes: &[Node], edges: &[DirectedEdge]) -> GraphGuid {
    let mut h = Fnv1a(FNV_OFFSET);

    h.u32(nodes.len() as u32);
    for node in nodes {
        h.f32(node.position.lat);
        h.f32(node.position.lon);
        h.byte(node.crossing.to_bits());
    }

    h.u32(edges.len() as u32);
    for edge in edges {
        h.u32(edge.origin.0);
        h.u32(edge.destination.0);
        h.f32(edge.length_m);
        h.byte(edge.lanes);
        h.byte(edge.street_type.0);
        h.u32(edge.max_velocity);
    }

    // BTreeMap / BTreeSet iteration is sorted, so insertion order of
    // connectors does not leak into the fingerprint.
    for node in nodes {
        h.u32(node.connector_count() as u32);
        for (from, targets) in &node.connectors {
            for to in targets {
                h.u32(from.edge.0);
                h.byte(from.index);
                h.u32(to.edge.0);
                h.byte(to.index);
            }
        }
    }

    GraphGuid(h.0)
}
