//! Preset weight/heuristic pairs.
//!
//! | Preset                   | Edge weight                    | Heuristic                     |
//! |--------------------------|--------------------------------|-------------------------------|
//! | `shortest_path_dijkstra` | length (m)                     | 0                             |
//! | `shortest_path_astar`    | length (cells)                 | straight-line distance (cells)|
//! | `fastest_path_astar`     | cells / min(edge, global) vmax | distance / global vmax (ticks)|
//!
//! Straight-line distance never exceeds the length of a road between the
//! same two points, so both heuristics are admissible as long as edge
//! lengths are at least the great-circle distance between their endpoints.

use mts_graph::{DirectedEdge, Node};

use crate::{AStar, BidirectionalAStar};

fn length_m(edge: &DirectedEdge) -> f64 {
    edge.length_m as f64
}

fn cells(edge: &DirectedEdge, meters_per_cell: f32) -> f64 {
    edge.length_m as f64 / meters_per_cell as f64
}

fn distance_cells(a: &Node, b: &Node, meters_per_cell: f32) -> f64 {
    a.position.distance_m(b.position) as f64 / meters_per_cell as f64
}

fn ticks(edge: &DirectedEdge, meters_per_cell: f32, global_max_velocity: u32) -> f64 {
    let v = edge.max_velocity.min(global_max_velocity).max(1);
    cells(edge, meters_per_cell) / v as f64
}

/// Unidirectional presets.
pub struct AStars;

impl AStars {
    /// Plain Dijkstra on physical length.
    pub fn shortest_path_dijkstra() -> AStar {
        AStar::new(length_m, |_: &Node, _: &Node| 0.0)
    }

    /// Shortest route in cells, guided by straight-line distance.
    pub fn shortest_path_astar(meters_per_cell: f32) -> AStar {
        AStar::new(
            move |e: &DirectedEdge| cells(e, meters_per_cell),
            move |a: &Node, b: &Node| distance_cells(a, b, meters_per_cell),
        )
    }

    /// Fastest route in ticks at free flow, each edge driven at its own
    /// limit capped by `global_max_velocity`.
    pub fn fastest_path_astar(meters_per_cell: f32, global_max_velocity: u32) -> AStar {
        let vmax = global_max_velocity.max(1) as f64;
        AStar::new(
            move |e: &DirectedEdge| ticks(e, meters_per_cell, global_max_velocity),
            move |a: &Node, b: &Node| distance_cells(a, b, meters_per_cell) / vmax,
        )
    }
}

/// Bidirectional presets with the same costs as [`AStars`].
pub struct BidirectionalAStars;

impl BidirectionalAStars {
    pub fn shortest_path_dijkstra() -> BidirectionalAStar {
        BidirectionalAStar::new(length_m, |_: &Node, _: &Node| 0.0)
    }

    pub fn shortest_path_astar(meters_per_cell: f32) -> BidirectionalAStar {
        BidirectionalAStar::new(
            move |e: &DirectedEdge| cells(e, meters_per_cell),
            move |a: &Node, b: &Node| distance_cells(a, b, meters_per_cell),
        )
    }

    pub fn fastest_path_astar(meters_per_cell: f32, global_max_velocity: u32) -> BidirectionalAStar {
        let vmax = global_max_velocity.max(1) as f64;
        BidirectionalAStar::new(
            move |e: &DirectedEdge| ticks(e, meters_per_cell, global_max_velocity),
            move |a: &Node, b: &Node| distance_cells(a, b, meters_per_cell) / vmax,
        )
    }
}
