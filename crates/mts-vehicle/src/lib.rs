//! `mts-vehicle` — vehicle agents and everything that decides how they move.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`state`]      | `VehicleState` (closed lifecycle enum), `Transition`        |
//! | [`dynamics`]   | `VehicleDynamics` — acceleration / dawdling as data         |
//! | [`vehicle`]    | `Vehicle` — route, position, velocity, per-vehicle RNG      |
//! | [`population`] | `VehiclePopulation` — thread-safe lifecycle bookkeeping     |
//! | [`crossing`]   | `CrossingLogic` trait, `PriorityCrossingLogic`              |
//! | [`error`]      | `PopulationError`, `PopulationResult<T>`                    |
//!
//! # Lifecycle
//!
//! ```text
//!   NotSpawned ──spawn──▶ Spawned ──finish──▶ Despawned
//!        └──────────────────────────────────────▲
//! ```
//!
//! Vehicles never go back.  Each step that changes a vehicle's state returns
//! a [`Transition`]; whoever owns the vehicle feeds it to
//! [`VehiclePopulation::apply`].  There are no listener callbacks.

pub mod crossing;
pub mod dynamics;
pub mod error;
pub mod population;
pub mod state;
pub mod vehicle;


pub use crossing::{CrossingLogic, CrossingRequest, PriorityCrossingLogic};
pub use dynamics::{VehicleDynamics, VelocityFn};
pub use error::{PopulationError, PopulationResult};
pub use population::VehiclePopulation;
pub use state::{Transition, VehicleState};
pub use vehicle::Vehicle;
