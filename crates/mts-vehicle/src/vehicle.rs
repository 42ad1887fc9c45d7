//! A single vehicle agent.

use mts_core::{EdgeId, Tick, VehicleId, VehicleRng};
use mts_routing::Route;

use crate::{Transition, VehicleDynamics, VehicleState};

/// One vehicle: its route, where it is on that route, and how it drives.
///
/// Position is `(route_index, cell)`: the vehicle is on edge
/// `route.edges()[route_index]`, in cell `cell` counted from the edge's
/// origin.  The last cell of an edge is the stop line where the vehicle
/// waits to cross the next intersection.
///
/// A vehicle never touches shared state.  Methods that change its lifecycle
/// return the [`Transition`] for the owner to report.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id:          VehicleId,
    state:       VehicleState,
    route:       Route,
    route_index: usize,
    cell:        u32,
    velocity:    u32,
    spawn_delay: u64,
    waiting:     u32,
    dynamics:    VehicleDynamics,
    rng:         VehicleRng,
}

impl Vehicle {
    /// A not-yet-spawned vehicle that becomes due at tick `spawn_delay`.
    pub fn new(
        id: VehicleId,
        route: Route,
        spawn_delay: u64,
        dynamics: VehicleDynamics,
        rng: VehicleRng,
    ) -> Self {
        Self {
            id,
            state: VehicleState::NotSpawned,
            route,
            route_index: 0,
            cell: 0,
            velocity: 0,
            spawn_delay,
            waiting: 0,
            dynamics,
            rng,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    #[inline]
    pub fn route_index(&self) -> usize {
        self.route_index
    }

    /// Edge the vehicle is on (or will enter when it spawns).
    #[inline]
    pub fn current_edge(&self) -> Option<EdgeId> {
        self.route.get(self.route_index)
    }

    /// Edge after the current one, if the route continues.
    #[inline]
    pub fn next_edge(&self) -> Option<EdgeId> {
        self.route.get(self.route_index + 1)
    }

    #[inline]
    pub fn cell(&self) -> u32 {
        self.cell
    }

    #[inline]
    pub fn velocity(&self) -> u32 {
        self.velocity
    }

    pub fn spawn_delay(&self) -> u64 {
        self.spawn_delay
    }

    /// Consecutive ticks spent at a stop line without being let through.
    pub fn waiting_ticks(&self) -> u32 {
        self.waiting
    }

    pub fn dynamics(&self) -> &VehicleDynamics {
        &self.dynamics
    }

    /// Not spawned yet and its spawn tick has come.
    #[inline]
    pub fn is_due(&self, now: Tick) -> bool {
        self.state == VehicleState::NotSpawned && now.0 >= self.spawn_delay
    }

    /// Standing on the last cell of an edge `edge_cells` long.
    #[inline]
    pub fn at_stop_line(&self, edge_cells: u32) -> bool {
        self.cell + 1 >= edge_cells
    }

    /// At the stop line of the final route edge.
    #[inline]
    pub fn has_arrived(&self, edge_cells: u32) -> bool {
        self.next_edge().is_none() && self.at_stop_line(edge_cells)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    fn transition(&mut self, to: VehicleState) -> Option<Transition> {
        if !self.state.can_transition_to(to) {
            return None;
        }
        let from = self.state;
        self.state = to;
        Some(Transition { vehicle: self.id, from, to })
    }

    /// Enter the first cell of the first route edge.
    ///
    /// `None` if the vehicle is not waiting to spawn or its route is empty.
    pub fn spawn(&mut self) -> Option<Transition> {
        if self.route.is_empty() {
            return None;
        }
        let t = self.transition(VehicleState::Spawned)?;
        self.route_index = 0;
        self.cell = 0;
        self.velocity = 0;
        Some(t)
    }

    /// Leave the simulation.  `None` if already despawned.
    pub fn despawn(&mut self) -> Option<Transition> {
        let t = self.transition(VehicleState::Despawned)?;
        self.velocity = 0;
        Some(t)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    /// Choose this tick's velocity.
    ///
    /// `gap` is the number of free cells ahead on the current edge (up to
    /// the next vehicle or the stop line), `edge_limit` the edge's speed
    /// limit.  Steps: accelerate, cap by personal / edge limit, brake to
    /// `gap`, then dawdle at random.
    pub fn plan_velocity(&mut self, gap: u32, edge_limit: u32) -> u32 {
        let d = &self.dynamics;
        let mut v = (d.accelerate)(self.velocity).min(d.max_velocity).min(edge_limit);
        v = v.min(gap);
        if v > 0 && self.rng.gen_bool(d.dawdle_factor as f64) {
            v = (d.dawdle)(v).min(v);
        }
        self.velocity = v;
        v
    }

    /// Move forward by the planned velocity.
    pub fn advance(&mut self) {
        self.cell += self.velocity;
    }

    /// Cross the intersection onto the next route edge, landing in its
    /// first cell.  Returns the edge entered.
    pub fn enter_next_edge(&mut self) -> Option<EdgeId> {
        let next = self.next_edge()?;
        self.route_index += 1;
        self.cell = 0;
        self.velocity = 1;
        self.waiting = 0;
        Some(next)
    }

    /// Stay at the stop line for another tick.
    pub fn wait(&mut self) {
        self.velocity = 0;
        self.waiting = self.waiting.saturating_add(1);
    }
}
