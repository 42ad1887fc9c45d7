//! The `Simulation` struct and its tick loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use mts_core::{EdgeId, GeoPoint, Metrics, NodeId, ScenarioConfig, Tick, VehicleId};
use mts_graph::StreetGraph;
use mts_vehicle::{CrossingLogic, CrossingRequest, Vehicle, VehiclePopulation, VehicleState};

use crate::occupancy::Occupancy;
use crate::{SimObserver, SimResult};

// ── Reports ───────────────────────────────────────────────────────────────────

/// What happened during one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub spawned:   usize,
    /// Vehicles that moved onto their next edge at an intersection.
    pub crossed:   usize,
    pub despawned: usize,
    /// Spawned vehicles left on the road after the tick.
    pub on_road:   usize,
}

/// Read-only view of a spawned vehicle for visualization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VehicleSnapshot {
    pub id:       VehicleId,
    pub state:    VehicleState,
    pub edge:     EdgeId,
    pub cell:     u32,
    pub velocity: u32,
    /// Centre of the occupied cell, interpolated along the edge.
    pub position: GeoPoint,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds the shared graph, the vehicle arena (sorted by id, despawned
/// vehicles removed) and the population that mirrors their lifecycle.
/// Each [`step`](Self::step) runs the spawn, intersection and movement
/// phases described in the crate docs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    pub(crate) config:     ScenarioConfig,
    pub(crate) graph:      Arc<StreetGraph>,
    pub(crate) tick:       Tick,
    pub(crate) vehicles:   Vec<Vehicle>,
    pub(crate) population: Arc<VehiclePopulation>,
    pub(crate) crossing:   Arc<dyn CrossingLogic>,
    pub(crate) metrics:    Option<Arc<Metrics>>,
    /// Length in cells of every edge, indexed by `EdgeId`.
    pub(crate) edge_cells: Vec<u32>,
    #[cfg(feature = "parallel")]
    pub(crate) pool:       Option<rayon::ThreadPool>,
}

impl Simulation {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run exactly `n` ticks from the current one.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.tick;
            observer.on_tick_start(now);
            let summary = self.step()?;
            observer.on_tick_end(now, &summary);
        }
        Ok(())
    }

    /// Run until every vehicle has despawned or `max_ticks` ticks have
    /// passed, whichever comes first.
    pub fn run<O: SimObserver>(&mut self, max_ticks: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..max_ticks {
            if self.is_finished() {
                break;
            }
            let now = self.tick;
            observer.on_tick_start(now);
            let summary = self.step()?;
            observer.on_tick_end(now, &summary);
        }
        observer.on_sim_end(self.tick);
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        let now = self.tick;
        let mut occupancy = Occupancy::build(self.edge_cells.len(), &self.vehicles);

        let spawned = self.spawn_phase(now, &mut occupancy)?;
        let (crossed, handled) = self.intersection_phase(&mut occupancy);
        self.movement_phase(&occupancy, &handled)?;

        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.state() != VehicleState::Despawned);
        let despawned = before - self.vehicles.len();

        if let Some(m) = &self.metrics {
            m.record_crossings(crossed as u64);
        }
        let summary = TickSummary {
            spawned,
            crossed,
            despawned,
            on_road: self.population.spawned_count(),
        };
        debug!(
            "{now}: {} spawned, {} crossed, {} despawned, {} on the road",
            summary.spawned, summary.crossed, summary.despawned, summary.on_road
        );
        self.tick.advance();
        Ok(summary)
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// The next tick to be simulated.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<StreetGraph> {
        &self.graph
    }

    pub fn population(&self) -> &Arc<VehiclePopulation> {
        &self.population
    }

    pub fn metrics(&self) -> Option<&Arc<Metrics>> {
        self.metrics.as_ref()
    }

    /// Live vehicles (not yet spawned or on the road), ascending by id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.slot(id).map(|i| &self.vehicles[i])
    }

    /// `true` once every vehicle has left the simulation.
    pub fn is_finished(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Where every spawned vehicle is right now.
    pub fn vehicle_snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles
            .iter()
            .filter(|v| v.state() == VehicleState::Spawned)
            .filter_map(|v| {
                let edge = self.graph.edge(v.current_edge()?)?;
                let from = self.graph.node(edge.origin)?.position;
                let to = self.graph.node(edge.destination)?.position;
                let cells = self.cells(edge.id) as f32;
                Some(VehicleSnapshot {
                    id:       v.id(),
                    state:    v.state(),
                    edge:     edge.id,
                    cell:     v.cell(),
                    velocity: v.velocity(),
                    position: from.lerp(to, (v.cell() as f32 + 0.5) / cells),
                })
            })
            .collect()
    }

    fn cells(&self, edge: EdgeId) -> u32 {
        self.edge_cells.get(edge.index()).copied().unwrap_or(1)
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// Put due vehicles onto cell 0 of their first edge if it is free.
    /// Vehicles blocked by traffic try again next tick.
    fn spawn_phase(&mut self, now: Tick, occupancy: &mut Occupancy) -> SimResult<usize> {
        let mut spawned = 0;
        for v in self.vehicles.iter_mut().filter(|v| v.is_due(now)) {
            let Some(edge) = v.current_edge() else { continue };
            if !occupancy.is_free(edge, 0) {
                continue;
            }
            if let Some(t) = v.spawn() {
                self.population.apply(&t)?;
                occupancy.insert(edge, 0);
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    /// Resolve every node's queue of stop-line vehicles.
    ///
    /// Returns the number of crossings and, per arena slot, whether the
    /// vehicle took part (crossed or waited) and so must not move again.
    fn intersection_phase(&mut self, occupancy: &mut Occupancy) -> (usize, Vec<bool>) {
        let mut queues: BTreeMap<NodeId, Vec<CrossingRequest>> = BTreeMap::new();
        for v in self.vehicles.iter().filter(|v| v.state() == VehicleState::Spawned) {
            let (Some(from), Some(to)) = (v.current_edge(), v.next_edge()) else { continue };
            if !v.at_stop_line(self.cells(from)) {
                continue;
            }
            let Some(edge) = self.graph.edge(from) else { continue };
            queues.entry(edge.destination).or_default().push(CrossingRequest {
                vehicle:       v.id(),
                from_edge:     from,
                to_edge:       to,
                waiting_ticks: v.waiting_ticks(),
            });
        }

        let mut handled = vec![false; self.vehicles.len()];
        let mut crossed = 0;
        for (node_id, requests) in queues {
            let Some(node) = self.graph.node(node_id) else { continue };

            // Nobody may enter a junction it cannot leave.
            let eligible: Vec<CrossingRequest> = if node.crossing.friendly_standing_in_jam_enabled {
                requests.iter().copied().filter(|r| occupancy.is_free(r.to_edge, 0)).collect()
            } else {
                requests.clone()
            };
            let admitted = if eligible.is_empty() {
                Vec::new()
            } else {
                self.crossing.admit(&self.graph, node, &eligible)
            };

            // Admitted vehicles move in the order the logic returned them;
            // everyone left over waits.
            let mut pending: BTreeMap<VehicleId, CrossingRequest> =
                requests.into_iter().map(|r| (r.vehicle, r)).collect();
            for id in admitted {
                let Some(r) = pending.remove(&id) else { continue };
                let Some(i) = self.slot(id) else { continue };
                handled[i] = true;
                let v = &mut self.vehicles[i];
                if occupancy.is_free(r.to_edge, 0) {
                    occupancy.remove(r.from_edge, v.cell());
                    v.enter_next_edge();
                    occupancy.insert(r.to_edge, 0);
                    crossed += 1;
                } else {
                    v.wait();
                }
            }
            for id in pending.into_keys() {
                let Some(i) = self.slot(id) else { continue };
                handled[i] = true;
                self.vehicles[i].wait();
            }
        }
        (crossed, handled)
    }

    fn slot(&self, id: VehicleId) -> Option<usize> {
        self.vehicles.binary_search_by_key(&id, Vehicle::id).ok()
    }

    /// Move every spawned vehicle not handled at an intersection.
    fn movement_phase(&mut self, occupancy: &Occupancy, handled: &[bool]) -> SimResult<()> {
        let ctx = MoveContext {
            graph: &self.graph,
            edge_cells: &self.edge_cells,
            occupancy,
            population: &self.population,
        };
        let vehicles = &mut self.vehicles;

        #[cfg(not(feature = "parallel"))]
        {
            vehicles
                .iter_mut()
                .zip(handled)
                .try_for_each(|(v, &h)| ctx.move_vehicle(v, h))
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut run = move || {
                vehicles
                    .par_iter_mut()
                    .zip(handled.par_iter())
                    .try_for_each(|(v, &h)| ctx.move_vehicle(v, h))
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// Everything a worker needs to move one vehicle.  Read-only apart from the
/// population, which does its own locking.
struct MoveContext<'a> {
    graph:      &'a StreetGraph,
    edge_cells: &'a [u32],
    occupancy:  &'a Occupancy,
    population: &'a VehiclePopulation,
}

impl MoveContext<'_> {
    fn move_vehicle(&self, v: &mut Vehicle, handled: bool) -> SimResult<()> {
        if handled || v.state() != VehicleState::Spawned {
            return Ok(());
        }
        let Some(edge) = v.current_edge() else { return Ok(()) };
        let cells = self.edge_cells.get(edge.index()).copied().unwrap_or(1);

        if !v.has_arrived(cells) {
            let stop_line = cells - 1;
            let limit = self
                .occupancy
                .next_ahead(edge, v.cell())
                .map_or(stop_line, |ahead| (ahead - 1).min(stop_line));
            let gap = limit.saturating_sub(v.cell());
            let edge_limit = self.graph.edge(edge).map_or(0, |e| e.max_velocity);
            v.plan_velocity(gap, edge_limit);
            v.advance();
        }

        if v.has_arrived(cells) {
            if let Some(t) = v.despawn() {
                self.population.apply(&t)?;
            }
        }
        Ok(())
    }
}
