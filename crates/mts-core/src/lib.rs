//! `mts-core` — foundational types for the microtraffic simulation workspace.
//!
//! This crate is a dependency of every other `mts-*` crate.  It has no
//! `mts-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `VehicleId`                       |
//! | [`geo`]         | `GeoPoint`, `Bounds`, haversine, point-in-polygon     |
//! | [`config`]      | `ScenarioConfig`, `CrossingLogicConfig`               |
//! | [`time`]        | `Tick`                                                |
//! | [`rng`]         | `VehicleRng` (per-vehicle), `SimRng` (global)         |
//! | [`metrics`]     | `Metrics` counters shared by routing and simulation   |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod metrics;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CrossingLogicConfig, ScenarioConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Bounds, GeoPoint, point_in_polygon};
pub use ids::{EdgeId, NodeId, VehicleId};
pub use metrics::{Metrics, MetricsSnapshot};
pub use rng::{SimRng, VehicleRng};
pub use time::Tick;
