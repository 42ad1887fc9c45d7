//! Population error type.

use thiserror::Error;

use mts_core::VehicleId;

use crate::VehicleState;

/// Errors produced by [`VehiclePopulation`](crate::VehiclePopulation).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopulationError {
    #[error("vehicle {0} is not in the population")]
    UnknownVehicle(VehicleId),

    #[error("vehicle {0} is already in the population")]
    Duplicate(VehicleId),

    #[error("vehicle {vehicle} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        vehicle: VehicleId,
        from:    VehicleState,
        to:      VehicleState,
    },
}

pub type PopulationResult<T> = Result<T, PopulationError>;
