//! `mts-sim` — area scenarios and the tick driver.
//!
//! # Tick loop
//!
//! ```text
//! for each tick:
//!   ① Spawn         — vehicles whose spawn delay has elapsed enter the first
//!                     cell of their route if that cell is free.
//!   ② Intersections — vehicles at a stop line ask the node's CrossingLogic;
//!                     admitted ones move to cell 0 of their next edge,
//!                     the rest wait.
//!   ③ Movement      — every other spawned vehicle plans its velocity against
//!                     a read-only occupancy snapshot and advances
//!                     (parallel with the `parallel` feature).  Vehicles that
//!                     reach the end of their route despawn and report to the
//!                     population from the worker thread.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                             |
//! |--------------|------------------------------------------------------|
//! | [`area`]     | `Area`, `AreaKind`                                   |
//! | [`scenario`] | `AreaScenario` and route generation                  |
//! | [`builder`]  | `SimBuilder`                                         |
//! | [`sim`]      | `Simulation`, `TickSummary`, `VehicleSnapshot`       |
//! | [`observer`] | `SimObserver`, `NoopObserver`                        |
//! | [`error`]    | `SimError`, `SimResult`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the movement phase on Rayon (default on).         |
//! | `serde`    | Serde derives on `Area` and `AreaKind`.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut scenario = AreaScenario::new(Arc::new(graph), ScenarioConfig::default())
//!     .with_area(Area::new(AreaKind::Origin, west))
//!     .with_area(Area::new(AreaKind::Destination, east));
//! // One route per `config.max_vehicle_count`.
//! scenario.generate_routes_from_config(&AStars::fastest_path_astar(7.5, 5), &mut SimRng::new(1))?;
//! let mut sim = SimBuilder::new(scenario).build()?;
//! sim.run_ticks(1_000, &mut NoopObserver)?;
//! ```

pub mod area;
pub mod builder;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;

mod occupancy;


pub use area::{Area, AreaKind};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use scenario::AreaScenario;
pub use sim::{Simulation, TickSummary, VehicleSnapshot};
