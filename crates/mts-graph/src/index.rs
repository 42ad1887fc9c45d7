//! R-tree spatial index over node positions.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use mts_core::{Bounds, GeoPoint, NodeId, point_in_polygon};

use crate::StreetGraph;

/// Entry stored in the R-tree: a `[lat, lon]` point and its node.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// Snapshot of a graph's node positions for spatial queries.
///
/// Built once from a frozen graph; it does not follow later mutations.
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load the index, O(N log N).
    pub fn build(graph: &StreetGraph) -> Self {
        let entries: Vec<NodeEntry> = graph
            .nodes()
            .iter()
            .map(|n| NodeEntry { point: [n.position.lat, n.position.lon], id: n.id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node to `pos`; `None` only for an empty graph.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }

    /// Up to `k` nearest nodes, closest first.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }

    /// Nodes inside `bounds` (inclusive), sorted by id.
    pub fn nodes_in_bounds(&self, bounds: Bounds) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.entries_in(bounds).into_iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Nodes inside the closed ring `polygon`, sorted by id.
    ///
    /// Narrows the candidates with the polygon's bounding box first, then
    /// runs the exact point-in-polygon test.
    pub fn nodes_in_area(&self, polygon: &[GeoPoint]) -> Vec<NodeId> {
        let bbox = Bounds::from_points(polygon.iter().copied());
        let mut ids: Vec<NodeId> = self
            .entries_in(bbox)
            .into_iter()
            .filter(|e| point_in_polygon(GeoPoint::new(e.point[0], e.point[1]), polygon))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn entries_in(&self, bounds: Bounds) -> Vec<&NodeEntry> {
        // An inverted box would make the envelope meaningless.
        if bounds.is_empty() {
            return Vec::new();
        }
        let envelope = AABB::from_corners(
            [bounds.min_lat, bounds.min_lon],
            [bounds.max_lat, bounds.max_lon],
        );
        self.tree.locate_in_envelope(&envelope).collect()
    }
}
