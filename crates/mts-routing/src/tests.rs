//! Unit and property tests for mts-routing.
//!
//! The hand-built graphs put every node at the same position, so the
//! straight-line heuristics are zero there and all six presets must agree.
//! The property tests use spread-out positions to exercise the heuristics.

#[cfg(test)]
mod helpers {
    use mts_core::{CrossingLogicConfig, EdgeId, GeoPoint, NodeId};
    use mts_graph::{EdgeSpec, Lane, StreetGraph};

    use crate::{AStars, BidirectionalAStars, ShortestPathAlgorithm};

    pub const MPC: f32 = 7.5;
    pub const VMAX: u32 = 5;

    pub fn boxed<A: ShortestPathAlgorithm + 'static>(alg: A) -> Box<dyn ShortestPathAlgorithm> {
        Box::new(alg)
    }

    /// Every preset, labelled for assertion messages.
    pub fn all_algorithms() -> Vec<(&'static str, Box<dyn ShortestPathAlgorithm>)> {
        vec![
            ("dijkstra", boxed(AStars::shortest_path_dijkstra())),
            ("astar", boxed(AStars::shortest_path_astar(MPC))),
            ("fastest", boxed(AStars::fastest_path_astar(MPC, VMAX))),
            ("bi-dijkstra", boxed(BidirectionalAStars::shortest_path_dijkstra())),
            ("bi-astar", boxed(BidirectionalAStars::shortest_path_astar(MPC))),
            ("bi-fastest", boxed(BidirectionalAStars::fastest_path_astar(MPC, VMAX))),
        ]
    }

    /// Builds graphs edge by edge, with lengths given in cells.
    pub struct Builder {
        pub g: StreetGraph,
    }

    impl Builder {
        pub fn new() -> Self {
            Self { g: StreetGraph::new() }
        }

        pub fn node(&mut self) -> NodeId {
            self.g.add_node(GeoPoint::new(0.0, 0.0), CrossingLogicConfig::default()).unwrap()
        }

        pub fn edge(&mut self, cells: u32, from: NodeId, to: NodeId, lanes: u8) -> EdgeId {
            self.g
                .add_edge(EdgeSpec::new(from, to, cells as f32 * MPC).lanes(lanes).max_velocity(1))
                .unwrap()
        }

        pub fn turn(&mut self, from: EdgeId, to: EdgeId) {
            self.g.add_connector(Lane::new(from, 0), Lane::new(to, 0)).unwrap();
        }
    }

    /// Five nodes where the direct-looking turn b→d is long and the cheap
    /// way round goes through c.  Node f is isolated.
    ///
    /// ```text
    ///   a ─1→ b ─2→ c ─1→ d ─1→ e
    ///          └───5────→┘      │
    ///               c ←──1──────┘
    /// ```
    pub struct Detour {
        pub g: StreetGraph,
        pub a: NodeId,
        pub e: NodeId,
        pub f: NodeId,
        pub ab: EdgeId,
        pub bc: EdgeId,
        pub cd: EdgeId,
        pub de: EdgeId,
    }

    pub fn detour() -> Detour {
        let mut b = Builder::new();
        let (na, nb, nc, nd, ne) = (b.node(), b.node(), b.node(), b.node(), b.node());
        let ab = b.edge(1, na, nb, 1);
        let bc = b.edge(2, nb, nc, 1);
        let bd = b.edge(5, nb, nd, 1);
        let cd = b.edge(1, nc, nd, 1);
        let de = b.edge(1, nd, ne, 1);
        let ec = b.edge(1, ne, nc, 1);
        b.turn(ab, bc);
        b.turn(ab, bd);
        b.turn(bc, cd);
        b.turn(ec, cd);
        b.turn(bd, de);
        b.turn(cd, de);
        b.turn(de, ec);
        let nf = b.node();
        Detour { g: b.g, a: na, e: ne, f: nf, ab, bc, cd, de }
    }

    /// Eight nodes with two cycles; only g-d-e-a-c reaches c cheaply.
    /// With `with_eb` an extra edge e→b is added that has no connector
    /// from d→e, so it must never be used on the way from g.
    pub struct Circles {
        pub g: StreetGraph,
        pub start: NodeId,
        pub end: NodeId,
        pub b: NodeId,
        pub route: Vec<EdgeId>,
    }

    pub fn circles(with_eb: bool) -> Circles {
        let mut b = Builder::new();
        let n: Vec<NodeId> = (0..8).map(|_| b.node()).collect();
        let (a, nb, c, d, e, f, g, h) = (n[0], n[1], n[2], n[3], n[4], n[5], n[6], n[7]);

        let ab = b.edge(1, a, nb, 1);
        let ac = b.edge(1, a, c, 3);
        let _ba = b.edge(1, nb, a, 1);
        let bc = b.edge(if with_eb { 1 } else { 2 }, nb, c, 3);
        let de = b.edge(1, d, e, 1);
        let df = b.edge(1, d, f, 3);
        let ea = b.edge(1, e, a, 1);
        if with_eb {
            b.edge(1, e, nb, 1);
        }
        let fh = b.edge(1, f, h, 2);
        let gd = b.edge(1, g, d, 3);
        let gf = b.edge(1, g, f, 2);
        let he = b.edge(1, h, e, 4);
        let hg = b.edge(1, h, g, 4);

        b.turn(ea, ab);
        b.turn(ea, ac);
        b.turn(ab, bc);
        b.turn(gd, de);
        b.turn(de, ea);
        b.turn(he, ea);
        b.turn(df, fh);
        b.turn(gf, fh);
        b.turn(hg, gd);
        b.turn(hg, gf);
        b.turn(fh, he);
        b.turn(fh, hg);

        Circles { g: b.g, start: g, end: c, b: nb, route: vec![gd, de, ea, ac] }
    }

    /// Expected cost of a route under a named preset when every edge has
    /// `max_velocity == 1` and every node sits at the same position.
    pub fn cost_for(name: &str, cells: f64) -> f64 {
        if name.ends_with("dijkstra") { cells * MPC as f64 } else { cells }
    }
}

// ── Turn restrictions ─────────────────────────────────────────────────────────

#[cfg(test)]
mod restrictions {
    use super::helpers::{all_algorithms, cost_for, detour};

    #[test]
    fn detour_is_taken() {
        let d = detour();
        for (name, alg) in all_algorithms() {
            let route = alg.find_shortest_path(&d.g, d.a, d.e);
            assert_eq!(route.edges(), &[d.ab, d.bc, d.cd, d.de], "{name}");
            assert!((route.cost() - cost_for(name, 5.0)).abs() < 1e-9, "{name}: {}", route.cost());
            assert!(route.is_drivable(&d.g), "{name}");
        }
    }

    #[test]
    fn disconnected_target_gives_empty_route() {
        let d = detour();
        for (name, alg) in all_algorithms() {
            assert!(alg.find_shortest_path(&d.g, d.a, d.f).is_empty(), "{name}");
        }
    }

    #[test]
    fn forbidden_turn_forces_longer_route() {
        // g-d-e-b would be three cells, but d→e may not turn into e→b.
        let c = super::helpers::circles(true);
        for (name, alg) in all_algorithms() {
            let route = alg.find_shortest_path(&c.g, c.start, c.b);
            assert_eq!(route.len(), 4, "{name}");
            assert!((route.cost() - cost_for(name, 4.0)).abs() < 1e-9, "{name}");
            assert!(route.is_drivable(&c.g), "{name}");
        }
    }

    #[test]
    fn start_equals_end_is_empty() {
        let d = detour();
        for (name, alg) in all_algorithms() {
            let r = alg.find_shortest_path(&d.g, d.a, d.a);
            assert!(r.is_empty(), "{name}");
            assert_eq!(r.cost(), 0.0);
        }
    }

    #[test]
    fn unknown_nodes_are_empty() {
        let d = detour();
        for (name, alg) in all_algorithms() {
            assert!(alg.find_shortest_path(&d.g, d.a, mts_core::NodeId(99)).is_empty(), "{name}");
            assert!(alg.find_shortest_path(&d.g, mts_core::NodeId(99), d.e).is_empty(), "{name}");
        }
    }

    #[test]
    fn routing_leaves_graph_untouched() {
        let d = detour();
        let before = d.g.clone();
        let guid = d.g.guid();
        for (_, alg) in all_algorithms() {
            alg.find_shortest_path(&d.g, d.a, d.e);
            alg.find_shortest_path(&d.g, d.a, d.f);
        }
        assert_eq!(d.g, before);
        assert_eq!(d.g.guid(), guid);
    }
}

// ── Cyclic graphs ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod cycles {
    use super::helpers::{all_algorithms, circles, cost_for};

    #[test]
    fn shortest_path_through_cycles() {
        let c = circles(false);
        for (name, alg) in all_algorithms() {
            let route = alg.find_shortest_path(&c.g, c.start, c.end);
            assert_eq!(route.edges(), c.route.as_slice(), "{name}");
            assert_eq!(route.start(&c.g), Some(c.start));
            assert_eq!(route.end(&c.g), Some(c.end));
        }
    }

    #[test]
    fn edge_without_connector_is_ignored() {
        // e→b would tie with e→a, but nothing may turn into it from d→e.
        let c = circles(true);
        for (name, alg) in all_algorithms() {
            let route = alg.find_shortest_path(&c.g, c.start, c.end);
            assert!((route.cost() - cost_for(name, 4.0)).abs() < 1e-9, "{name}: {}", route.cost());
            assert!(route.is_drivable(&c.g), "{name}");
            assert_eq!(route.len(), 4, "{name}");
        }
    }

    #[test]
    fn metrics_are_recorded() {
        use std::sync::Arc;

        use mts_core::Metrics;

        use crate::{AStars, BidirectionalAStars, ShortestPathAlgorithm};

        let c = circles(false);
        let m = Arc::new(Metrics::new());
        let uni = AStars::shortest_path_dijkstra().with_metrics(m.clone());
        let bi = BidirectionalAStars::shortest_path_dijkstra().with_metrics(m.clone());
        uni.find_shortest_path(&c.g, c.start, c.end);
        bi.find_shortest_path(&c.g, c.start, c.end);

        let s = m.snapshot();
        assert_eq!(s.routes_computed, 2);
        assert!(s.labels_settled > 0);
    }
}

// ── Heuristics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heuristics {
    use mts_core::{CrossingLogicConfig, GeoPoint, NodeId};
    use mts_graph::{EdgeSpec, Lane, StreetGraph};

    use crate::{AStars, BidirectionalAStars, ShortestPathAlgorithm};

    /// 4×4 grid, ~111 m spacing, all turns allowed, mixed speed limits.
    fn grid() -> StreetGraph {
        let cfg = CrossingLogicConfig::default();
        let mut g = StreetGraph::new();
        for r in 0..4 {
            for c in 0..4 {
                g.add_node(GeoPoint::new(r as f32 * 0.001, c as f32 * 0.001), cfg).unwrap();
            }
        }
        let id = |r: u32, c: u32| NodeId(r * 4 + c);
        let add = |g: &mut StreetGraph, a: NodeId, b: NodeId, v: u32| {
            let len = g.node(a).unwrap().position.distance_m(g.node(b).unwrap().position) * 1.05;
            g.add_edge(EdgeSpec::new(a, b, len).max_velocity(v)).unwrap();
            g.add_edge(EdgeSpec::new(b, a, len).max_velocity(v)).unwrap();
        };
        for r in 0..4 {
            for c in 0..4 {
                let v = 1 + (r + c) % 5;
                if c < 3 {
                    add(&mut g, id(r, c), id(r, c + 1), v);
                }
                if r < 3 {
                    add(&mut g, id(r, c), id(r + 1, c), v);
                }
            }
        }
        let turns: Vec<(Lane, Lane)> = g
            .nodes()
            .iter()
            .flat_map(|n| {
                n.incoming.iter().flat_map(move |&i| {
                    n.leaving.iter().map(move |&o| (Lane::new(i, 0), Lane::new(o, 0)))
                })
            })
            .collect();
        for (from, to) in turns {
            g.add_connector(from, to).unwrap();
        }
        g
    }

    #[test]
    fn astar_matches_dijkstra_on_grid() {
        let g = grid();
        let dijkstra = AStars::shortest_path_dijkstra();
        let astar = AStars::shortest_path_astar(7.5);
        for (s, t) in [(0, 15), (3, 12), (5, 10), (15, 0)] {
            let (s, t) = (NodeId(s), NodeId(t));
            let d = dijkstra.find_shortest_path(&g, s, t);
            let a = astar.find_shortest_path(&g, s, t);
            assert!((d.cost() / 7.5 - a.cost()).abs() < 1e-6, "{s} -> {t}");
            assert!((a.length_m(&g) - d.length_m(&g)).abs() < 1e-3);
        }
    }

    #[test]
    fn fastest_uni_and_bi_agree() {
        let g = grid();
        let uni = AStars::fastest_path_astar(7.5, 4);
        let bi = BidirectionalAStars::fastest_path_astar(7.5, 4);
        for s in 0..16 {
            for t in 0..16 {
                let (s, t) = (NodeId(s), NodeId(t));
                let u = uni.find_shortest_path(&g, s, t);
                let b = bi.find_shortest_path(&g, s, t);
                assert!((u.cost() - b.cost()).abs() < 1e-9, "{s} -> {t}: {} vs {}", u.cost(), b.cost());
                assert_eq!(u.is_empty(), b.is_empty());
                assert!(b.is_drivable(&g));
            }
        }
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use mts_core::{CrossingLogicConfig, GeoPoint, NodeId};
    use mts_graph::{DirectedEdge, EdgeSpec, Lane, StreetGraph};

    use super::helpers::boxed;
    use crate::{AStars, BidirectionalAStars, ShortestPathAlgorithm};

    const MAX_EDGES: usize = 24;

    /// Bellman-Ford over edge labels: exact, slow, obviously correct.
    fn brute_force(
        g: &StreetGraph,
        start: NodeId,
        end: NodeId,
        w: impl Fn(&DirectedEdge) -> f64,
    ) -> Option<f64> {
        if start == end {
            return None;
        }
        let mut dist = vec![f64::INFINITY; g.edge_count()];
        for &e in &g.node(start)?.leaving {
            dist[e.index()] = w(&g.edges()[e.index()]);
        }
        for _ in 0..g.edge_count() {
            for edge in g.edges() {
                let d = dist[edge.id.index()];
                if !d.is_finite() {
                    continue;
                }
                for next in g.nodes()[edge.destination.index()].leaving_edges_from(Some(edge.id)) {
                    let nd = d + w(&g.edges()[next.index()]);
                    if nd < dist[next.index()] {
                        dist[next.index()] = nd;
                    }
                }
            }
        }
        g.edges()
            .iter()
            .filter(|e| e.destination == end)
            .map(|e| dist[e.id.index()])
            .filter(|d| d.is_finite())
            .min_by(|a, b| a.total_cmp(b))
    }

    fn build(
        n: usize,
        positions: &[(u8, u8)],
        edges: &[(usize, usize, u32)],
        turns: &[bool],
    ) -> StreetGraph {
        let mut g = StreetGraph::new();
        for &(lat, lon) in &positions[..n] {
            g.add_node(
                GeoPoint::new(lat as f32 * 0.0005, lon as f32 * 0.0005),
                CrossingLogicConfig::default(),
            )
            .unwrap();
        }
        for &(a, b, cells) in edges {
            let (a, b) = (NodeId(a as u32), NodeId(b as u32));
            let straight = g.node(a).unwrap().position.distance_m(g.node(b).unwrap().position);
            let len = straight * 1.01 + cells as f32 * 7.5;
            g.add_edge(EdgeSpec::new(a, b, len).max_velocity(cells % 4 + 1)).unwrap();
        }
        let pairs: Vec<(Lane, Lane)> = g
            .edges()
            .iter()
            .flat_map(|x| g.edges().iter().map(move |y| (x, y)))
            .filter(|(x, y)| x.destination == y.origin)
            .filter(|(x, y)| turns[x.id.index() * MAX_EDGES + y.id.index()])
            .map(|(x, y)| (Lane::new(x.id, 0), Lane::new(y.id, 0)))
            .collect();
        for (from, to) in pairs {
            g.add_connector(from, to).unwrap();
        }
        g
    }

    fn arb_graph() -> impl Strategy<Value = (StreetGraph, NodeId, NodeId)> {
        (2usize..8).prop_flat_map(|n| {
            (
                prop::collection::vec((0u8..6, 0u8..6), n),
                prop::collection::vec((0..n, 0..n, 0u32..6), 0..MAX_EDGES),
                prop::collection::vec(prop::bool::weighted(0.7), MAX_EDGES * MAX_EDGES),
                0..n,
                0..n,
            )
                .prop_map(move |(pos, edges, turns, s, t)| {
                    (build(n, &pos, &edges, &turns), NodeId(s as u32), NodeId(t as u32))
                })
        })
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(1.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn dijkstra_is_optimal((g, s, t) in arb_graph()) {
            let expected = brute_force(&g, s, t, |e| e.length_m as f64);
            for alg in [
                boxed(AStars::shortest_path_dijkstra()),
                boxed(BidirectionalAStars::shortest_path_dijkstra()),
            ] {
                let r = alg.find_shortest_path(&g, s, t);
                match expected {
                    Some(c) => {
                        prop_assert!(close(r.cost(), c), "got {} want {}", r.cost(), c);
                        prop_assert!(r.is_drivable(&g));
                        prop_assert_eq!(r.start(&g), Some(s));
                        prop_assert_eq!(r.end(&g), Some(t));
                    }
                    None => prop_assert!(r.is_empty()),
                }
            }
        }

        #[test]
        fn astar_is_optimal((g, s, t) in arb_graph()) {
            let expected = brute_force(&g, s, t, |e| e.length_m as f64 / 7.5);
            for alg in [
                boxed(AStars::shortest_path_astar(7.5)),
                boxed(BidirectionalAStars::shortest_path_astar(7.5)),
            ] {
                let r = alg.find_shortest_path(&g, s, t);
                match expected {
                    Some(c) => prop_assert!(close(r.cost(), c), "got {} want {}", r.cost(), c),
                    None => prop_assert!(r.is_empty()),
                }
            }
        }

        #[test]
        fn fastest_uni_equals_bi((g, s, t) in arb_graph()) {
            let uni = AStars::fastest_path_astar(7.5, 3).find_shortest_path(&g, s, t);
            let bi = BidirectionalAStars::fastest_path_astar(7.5, 3).find_shortest_path(&g, s, t);
            prop_assert!(close(uni.cost(), bi.cost()), "{} vs {}", uni.cost(), bi.cost());
            prop_assert_eq!(uni.is_empty(), bi.is_empty());
        }

        #[test]
        fn routing_never_mutates((g, s, t) in arb_graph()) {
            let before = g.clone();
            let guid = g.guid();
            BidirectionalAStars::shortest_path_astar(7.5).find_shortest_path(&g, s, t);
            AStars::shortest_path_astar(7.5).find_shortest_path(&g, s, t);
            prop_assert_eq!(&g, &before);
            prop_assert_eq!(g.guid(), guid);
        }
    }
}
