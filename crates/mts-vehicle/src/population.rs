//! Thread-safe lifecycle bookkeeping for all vehicles of a run.
//!
//! # Locking
//!
//! One `Mutex` guards three id sets.  Every public method takes the lock
//! exactly once, finishes its mutation, and releases it; nothing else
//! (I/O, callbacks, logging) happens while it is held.  A poisoned lock is
//! recovered with [`PoisonError::into_inner`]: the sets are only ever
//! mutated in short, panic-free sections, so they are consistent.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mts_core::{Metrics, VehicleId};

use crate::{PopulationError, PopulationResult, Transition, VehicleState};

#[derive(Default)]
struct Sets {
    all:         BTreeSet<VehicleId>,
    not_spawned: BTreeSet<VehicleId>,
    spawned:     BTreeSet<VehicleId>,
}

/// Which live vehicles exist and which of them are on the road.
///
/// Invariant: `all` is the disjoint union of `not_spawned` and `spawned`.
/// Despawned vehicles are in none of the sets.
///
/// Safe to share as `Arc<VehiclePopulation>` and call from Rayon workers.
#[derive(Default)]
pub struct VehiclePopulation {
    sets:    Mutex<Sets>,
    metrics: Option<Arc<Metrics>>,
}

impl VehiclePopulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count spawns and despawns into `metrics`.
    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self { sets: Mutex::default(), metrics: Some(metrics) }
    }

    fn lock(&self) -> MutexGuard<'_, Sets> {
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Register a new, not-yet-spawned vehicle.
    pub fn add_vehicle(&self, id: VehicleId) -> PopulationResult<()> {
        let mut sets = self.lock();
        if !sets.all.insert(id) {
            return Err(PopulationError::Duplicate(id));
        }
        sets.not_spawned.insert(id);
        Ok(())
    }

    /// Record that `id` moved to `new_state`.
    ///
    /// `Spawned` moves it from the not-spawned to the spawned set;
    /// `Despawned` removes it entirely.  Anything that is not a forward move
    /// from the vehicle's current state is rejected and changes nothing.
    pub fn state_changed(&self, id: VehicleId, new_state: VehicleState) -> PopulationResult<()> {
        let mut sets = self.lock();
        let current = if sets.spawned.contains(&id) {
            VehicleState::Spawned
        } else if sets.not_spawned.contains(&id) {
            VehicleState::NotSpawned
        } else {
            return Err(PopulationError::UnknownVehicle(id));
        };
        if !current.can_transition_to(new_state) {
            return Err(PopulationError::InvalidTransition { vehicle: id, from: current, to: new_state });
        }

        match new_state {
            VehicleState::Spawned => {
                sets.not_spawned.remove(&id);
                sets.spawned.insert(id);
            }
            VehicleState::Despawned => {
                sets.not_spawned.remove(&id);
                sets.spawned.remove(&id);
                sets.all.remove(&id);
            }
            // `can_transition_to` never allows a move into the first state.
            VehicleState::NotSpawned => {}
        }
        drop(sets);

        if let Some(m) = &self.metrics {
            match new_state {
                VehicleState::Spawned => m.record_spawn(),
                VehicleState::Despawned => m.record_despawn(),
                VehicleState::NotSpawned => {}
            }
        }
        Ok(())
    }

    /// Apply a transition returned by a [`Vehicle`](crate::Vehicle) step.
    pub fn apply(&self, transition: &Transition) -> PopulationResult<()> {
        self.state_changed(transition.vehicle, transition.to)
    }

    /// Forget every vehicle.
    pub fn clear_all(&self) {
        let mut sets = self.lock();
        sets.all.clear();
        sets.not_spawned.clear();
        sets.spawned.clear();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Live vehicles, spawned or not.
    pub fn vehicle_count(&self) -> usize {
        self.lock().all.len()
    }

    pub fn spawned_count(&self) -> usize {
        self.lock().spawned.len()
    }

    pub fn not_spawned_count(&self) -> usize {
        self.lock().not_spawned.len()
    }

    /// Current state of `id`; `None` once despawned or if never added.
    pub fn state_of(&self, id: VehicleId) -> Option<VehicleState> {
        let sets = self.lock();
        if sets.spawned.contains(&id) {
            Some(VehicleState::Spawned)
        } else if sets.not_spawned.contains(&id) {
            Some(VehicleState::NotSpawned)
        } else {
            None
        }
    }

    /// Snapshot of every live vehicle id, ascending.  Later changes to the
    /// population do not affect the returned `Vec`.
    pub fn vehicles(&self) -> Vec<VehicleId> {
        self.lock().all.iter().copied().collect()
    }

    /// Snapshot of the spawned ids, ascending.
    pub fn spawned_vehicles(&self) -> Vec<VehicleId> {
        self.lock().spawned.iter().copied().collect()
    }

    /// Snapshot of the not-yet-spawned ids, ascending.
    pub fn not_spawned_vehicles(&self) -> Vec<VehicleId> {
        self.lock().not_spawned.iter().copied().collect()
    }
}

impl std::fmt::Debug for VehiclePopulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sets = self.lock();
        f.debug_struct("VehiclePopulation")
            .field("all", &sets.all.len())
            .field("not_spawned", &sets.not_spawned.len())
            .field("spawned", &sets.spawned.len())
            .finish()
    }
}
