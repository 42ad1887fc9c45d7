//! Unit tests for mts-graph.

#[cfg(test)]
mod helpers {
    use mts_core::{CrossingLogicConfig, EdgeId, GeoPoint};

    use crate::{EdgeSpec, Lane, StreetGraph};

    /// A T-junction around node 1.
    ///
    /// ```text
    ///   0 ──── 1 ──── 2
    ///          │
    ///          3
    /// ```
    ///
    /// Every segment is two-way.  At node 1 traffic from 0 may go straight
    /// to 2 or turn down to 3; traffic from 2 may only go straight to 0.
    pub fn t_junction() -> (StreetGraph, Edges) {
        let cfg = CrossingLogicConfig::default();
        let mut g = StreetGraph::new();
        let n0 = g.add_node(GeoPoint::new(0.0, 0.0), cfg).unwrap();
        let n1 = g.add_node(GeoPoint::new(0.0, 0.001), cfg).unwrap();
        let n2 = g.add_node(GeoPoint::new(0.0, 0.002), cfg).unwrap();
        let n3 = g.add_node(GeoPoint::new(-0.001, 0.001), cfg).unwrap();

        let e01 = g.add_edge(EdgeSpec::new(n0, n1, 111.0).lanes(2)).unwrap();
        let e10 = g.add_edge(EdgeSpec::new(n1, n0, 111.0)).unwrap();
        let e12 = g.add_edge(EdgeSpec::new(n1, n2, 111.0)).unwrap();
        let e21 = g.add_edge(EdgeSpec::new(n2, n1, 111.0)).unwrap();
        let e13 = g.add_edge(EdgeSpec::new(n1, n3, 111.0)).unwrap();
        let e31 = g.add_edge(EdgeSpec::new(n3, n1, 111.0)).unwrap();

        // Lane 0 of e01 goes straight, lane 1 turns right.
        g.add_connector(Lane::new(e01, 0), Lane::new(e12, 0)).unwrap();
        g.add_connector(Lane::new(e01, 1), Lane::new(e13, 0)).unwrap();
        g.add_connector(Lane::new(e21, 0), Lane::new(e10, 0)).unwrap();

        (g, Edges { e01, e10, e12, e21, e13, e31 })
    }

    pub struct Edges {
        pub e01: EdgeId,
        pub e10: EdgeId,
        pub e12: EdgeId,
        pub e21: EdgeId,
        pub e13: EdgeId,
        pub e31: EdgeId,
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod building {
    use mts_core::{CrossingLogicConfig, EdgeId, GeoPoint, NodeId};

    use crate::{EdgeSpec, GraphError, StreetGraph};

    #[test]
    fn empty_graph() {
        let g = StreetGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn ids_are_sequential() {
        let (g, e) = super::helpers::t_junction();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 6);
        for (i, n) in g.nodes().iter().enumerate() {
            assert_eq!(n.id.index(), i);
        }
        assert_eq!(e.e01, EdgeId(0));
        assert_eq!(e.e31, EdgeId(5));
    }

    #[test]
    fn incidence_lists() {
        let (g, e) = super::helpers::t_junction();
        let n1 = g.node(NodeId(1)).unwrap();
        assert_eq!(n1.incoming, vec![e.e01, e.e21, e.e31]);
        assert_eq!(n1.leaving, vec![e.e10, e.e12, e.e13]);
    }

    #[test]
    fn reverse_edges_linked_both_ways() {
        let (g, e) = super::helpers::t_junction();
        assert_eq!(g.edge(e.e01).unwrap().reverse, Some(e.e10));
        assert_eq!(g.edge(e.e10).unwrap().reverse, Some(e.e01));
        assert_eq!(g.edge(e.e13).unwrap().reverse, Some(e.e31));
    }

    #[test]
    fn one_way_edge_has_no_reverse() {
        let cfg = CrossingLogicConfig::default();
        let mut g = StreetGraph::new();
        let a = g.add_node(GeoPoint::default(), cfg).unwrap();
        let b = g.add_node(GeoPoint::default(), cfg).unwrap();
        let ab = g.add_edge(EdgeSpec::new(a, b, 10.0)).unwrap();
        assert_eq!(g.edge(ab).unwrap().reverse, None);
    }

    #[test]
    fn unknown_endpoint_rejected() {
        let mut g = StreetGraph::new();
        let a = g.add_node(GeoPoint::default(), CrossingLogicConfig::default()).unwrap();
        let err = g.add_edge(EdgeSpec::new(a, NodeId(9), 10.0)).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(NodeId(9)));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn zero_lanes_rejected() {
        let cfg = CrossingLogicConfig::default();
        let mut g = StreetGraph::new();
        let a = g.add_node(GeoPoint::default(), cfg).unwrap();
        let b = g.add_node(GeoPoint::default(), cfg).unwrap();
        assert!(matches!(
            g.add_edge(EdgeSpec::new(a, b, 10.0).lanes(0)),
            Err(GraphError::NoLanes { .. })
        ));
    }

    #[test]
    fn ids_stop_short_of_the_sentinel() {
        use crate::graph::next_id;

        assert_eq!(next_id::<NodeId>(7, "node"), Ok(NodeId(7)));
        assert_eq!(next_id::<EdgeId>(u32::MAX as usize - 1, "edge"), Ok(EdgeId(u32::MAX - 1)));
        assert_eq!(next_id::<NodeId>(u32::MAX as usize, "node"), Err(GraphError::CapacityExceeded("node")));
        assert_eq!(next_id::<EdgeId>(usize::MAX, "edge"), Err(GraphError::CapacityExceeded("edge")));
    }

    #[test]
    fn length_in_cells() {
        let (g, e) = super::helpers::t_junction();
        // 111 m / 7.5 m = 14.8 → 15 cells
        assert_eq!(g.edge(e.e01).unwrap().length_cells(7.5), 15);
    }

    #[test]
    fn lanes_of_edge() {
        let (g, e) = super::helpers::t_junction();
        let edge = g.edge(e.e01).unwrap();
        assert_eq!(edge.all_lanes().count(), 2);
        assert!(edge.lane(1).is_some());
        assert!(edge.lane(2).is_none());
    }
}

// ── Connectors ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod connectors {
    use mts_core::{EdgeId, NodeId};

    use crate::{GraphError, Lane};

    #[test]
    fn leaving_edges_union_over_lanes() {
        let (g, e) = super::helpers::t_junction();
        let n1 = g.node(NodeId(1)).unwrap();
        assert_eq!(n1.leaving_edges_from(Some(e.e01)), vec![e.e12, e.e13]);
        assert_eq!(n1.leaving_edges_from(Some(e.e21)), vec![e.e10]);
    }

    #[test]
    fn no_connector_means_no_turn() {
        let (g, e) = super::helpers::t_junction();
        let n1 = g.node(NodeId(1)).unwrap();
        assert!(n1.leaving_edges_from(Some(e.e31)).is_empty());
        assert!(!n1.permits_turn(e.e01, e.e10));
        assert!(n1.permits_turn(e.e01, e.e13));
    }

    #[test]
    fn starting_node_allows_every_leaving_edge() {
        let (g, e) = super::helpers::t_junction();
        let n1 = g.node(NodeId(1)).unwrap();
        assert_eq!(n1.leaving_edges_from(None), vec![e.e10, e.e12, e.e13]);
    }

    #[test]
    fn incoming_edges_to_is_the_reverse_query() {
        let (g, e) = super::helpers::t_junction();
        let n1 = g.node(NodeId(1)).unwrap();
        assert_eq!(n1.incoming_edges_to(e.e12), vec![e.e01]);
        assert_eq!(n1.incoming_edges_to(e.e10), vec![e.e21]);
        assert!(n1.incoming_edges_to(e.e31).is_empty());
    }

    #[test]
    fn duplicate_connector_is_idempotent() {
        let (mut g, e) = super::helpers::t_junction();
        let before = g.node(NodeId(1)).unwrap().connector_count();
        g.add_connector(Lane::new(e.e01, 0), Lane::new(e.e12, 0)).unwrap();
        assert_eq!(g.node(NodeId(1)).unwrap().connector_count(), before);
    }

    #[test]
    fn unknown_edge_rejected() {
        let (mut g, e) = super::helpers::t_junction();
        let err = g.add_connector(Lane::new(EdgeId(99), 0), Lane::new(e.e12, 0)).unwrap_err();
        assert_eq!(err, GraphError::EdgeNotFound(EdgeId(99)));
    }

    #[test]
    fn validate_catches_bad_lane_index() {
        let (mut g, e) = super::helpers::t_junction();
        g.add_connector(Lane::new(e.e21, 3), Lane::new(e.e13, 0)).unwrap();
        assert!(matches!(g.validate(), Err(GraphError::LaneOutOfRange { .. })));
    }
}

// ── GUID ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod guid {
    use mts_core::{CrossingLogicConfig, GeoPoint};

    use crate::{EdgeSpec, Lane, StreetGraph};

    #[test]
    fn identical_builds_share_guid() {
        let (a, _) = super::helpers::t_junction();
        let (b, _) = super::helpers::t_junction();
        assert_eq!(a.guid(), b.guid());
        assert_eq!(a, b);
    }

    #[test]
    fn guid_is_cached_and_stable() {
        let (g, _) = super::helpers::t_junction();
        assert_eq!(g.guid(), g.guid());
    }

    #[test]
    fn every_mutation_changes_guid() {
        let (mut g, e) = super::helpers::t_junction();
        let g0 = g.guid();

        let n = g.add_node(GeoPoint::new(1.0, 1.0), CrossingLogicConfig::default()).unwrap();
        let g1 = g.guid();
        assert_ne!(g0, g1);

        g.add_edge(EdgeSpec::new(n, n, 5.0)).unwrap();
        let g2 = g.guid();
        assert_ne!(g1, g2);

        g.add_connector(Lane::new(e.e31, 0), Lane::new(e.e12, 0)).unwrap();
        assert_ne!(g2, g.guid());
    }

    #[test]
    fn connector_insertion_order_does_not_matter() {
        let build = |flip: bool| {
            let cfg = CrossingLogicConfig::default();
            let mut g = StreetGraph::new();
            let a = g.add_node(GeoPoint::new(0.0, 0.0), cfg).unwrap();
            let b = g.add_node(GeoPoint::new(0.0, 1.0), cfg).unwrap();
            let c = g.add_node(GeoPoint::new(1.0, 1.0), cfg).unwrap();
            let ab = g.add_edge(EdgeSpec::new(a, b, 10.0)).unwrap();
            let bc = g.add_edge(EdgeSpec::new(b, c, 10.0)).unwrap();
            let ba = g.add_edge(EdgeSpec::new(b, a, 10.0)).unwrap();
            let pairs = [(ab, bc), (ab, ba)];
            let order: Vec<_> = if flip { pairs.iter().rev().collect() } else { pairs.iter().collect() };
            for &(from, to) in order {
                g.add_connector(Lane::new(from, 0), Lane::new(to, 0)).unwrap();
            }
            g.guid()
        };
        assert_eq!(build(false), build(true));
    }

    #[test]
    fn crossing_config_is_content() {
        let mut left = CrossingLogicConfig::default();
        left.driving_on_the_right = false;
        let mut a = StreetGraph::new();
        a.add_node(GeoPoint::default(), CrossingLogicConfig::default()).unwrap();
        let mut b = StreetGraph::new();
        b.add_node(GeoPoint::default(), left).unwrap();
        assert_ne!(a.guid(), b.guid());
    }

    #[test]
    fn display_is_hex() {
        let g = StreetGraph::new();
        assert_eq!(g.guid().to_string().len(), 16);
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use mts_core::{Bounds, GeoPoint, NodeId};

    use crate::{NodeIndex, StreetGraph};

    #[test]
    fn nearest_node() {
        let (g, _) = super::helpers::t_junction();
        let idx = NodeIndex::build(&g);
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.nearest(GeoPoint::new(0.0, 0.0019)), Some(NodeId(2)));
        assert_eq!(idx.k_nearest(GeoPoint::new(0.0, 0.0), 2), vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn empty_index() {
        let idx = NodeIndex::build(&StreetGraph::new());
        assert!(idx.is_empty());
        assert_eq!(idx.nearest(GeoPoint::default()), None);
        assert!(idx.nodes_in_bounds(Bounds::EMPTY).is_empty());
    }

    #[test]
    fn nodes_in_area_and_bounds() {
        let (g, _) = super::helpers::t_junction();
        let idx = NodeIndex::build(&g);

        // Triangle around nodes 0 and 1 only.
        let area = [
            GeoPoint::new(0.001, -0.001),
            GeoPoint::new(0.001, 0.0025),
            GeoPoint::new(-0.001, 0.0005),
        ];
        assert_eq!(idx.nodes_in_area(&area), vec![NodeId(0), NodeId(1)]);

        let everything = g.bounds();
        assert_eq!(idx.nodes_in_bounds(everything).len(), 4);
    }
}
