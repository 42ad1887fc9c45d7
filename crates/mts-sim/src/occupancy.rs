//! Which cells of which edges hold a vehicle.

use mts_core::EdgeId;
use mts_vehicle::{Vehicle, VehicleState};

/// Occupied cells per edge, each list sorted ascending.
pub(crate) struct Occupancy {
    cells: Vec<Vec<u32>>,
}

impl Occupancy {
    pub(crate) fn build(edge_count: usize, vehicles: &[Vehicle]) -> Self {
        let mut cells = vec![Vec::new(); edge_count];
        for v in vehicles.iter().filter(|v| v.state() == VehicleState::Spawned) {
            if let Some(list) = v.current_edge().and_then(|e| cells.get_mut(e.index())) {
                list.push(v.cell());
            }
        }
        for list in &mut cells {
            list.sort_unstable();
        }
        Self { cells }
    }

    pub(crate) fn is_free(&self, edge: EdgeId, cell: u32) -> bool {
        self.cells
            .get(edge.index())
            .is_none_or(|list| list.binary_search(&cell).is_err())
    }

    pub(crate) fn insert(&mut self, edge: EdgeId, cell: u32) {
        if let Some(list) = self.cells.get_mut(edge.index()) {
            if let Err(at) = list.binary_search(&cell) {
                list.insert(at, cell);
            }
        }
    }

    pub(crate) fn remove(&mut self, edge: EdgeId, cell: u32) {
        if let Some(list) = self.cells.get_mut(edge.index()) {
            if let Ok(at) = list.binary_search(&cell) {
                list.remove(at);
            }
        }
    }

    /// Closest occupied cell strictly ahead of `cell` on `edge`.
    pub(crate) fn next_ahead(&self, edge: EdgeId, cell: u32) -> Option<u32> {
        let list = self.cells.get(edge.index())?;
        list.get(list.partition_point(|&c| c <= cell)).copied()
    }
}
