//! Vehicle lifecycle states.

use mts_core::VehicleId;

/// Where a vehicle is in its life.  Ordered: a vehicle only ever moves to a
/// later state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleState {
    /// Created, waiting for its spawn tick and a free entry cell.
    NotSpawned,
    /// On the road.
    Spawned,
    /// Finished its route (or was never able to start) and left the
    /// simulation.  Terminal.
    Despawned,
}

impl VehicleState {
    /// `true` if `next` is strictly later than `self`.
    #[inline]
    pub fn can_transition_to(self, next: VehicleState) -> bool {
        next > self
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self != VehicleState::Despawned
    }
}

/// A state change one vehicle just went through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub vehicle: VehicleId,
    pub from:    VehicleState,
    pub to:      VehicleState,
}
