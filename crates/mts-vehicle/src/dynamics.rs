//! Longitudinal vehicle behaviour as plain data.
//!
//! The cellular-automaton rules (Nagel–Schreckenberg by default) are held as
//! closures, so alternative driver models are values passed to the builder
//! rather than subclasses.

use std::fmt;
use std::sync::Arc;

use mts_core::ScenarioConfig;

/// Maps a velocity (cells/tick) to a new velocity.
pub type VelocityFn = Arc<dyn Fn(u32) -> u32 + Send + Sync>;

/// How a vehicle speeds up and dawdles.
#[derive(Clone)]
pub struct VehicleDynamics {
    /// Applied once per tick before any limit.
    pub accelerate: VelocityFn,

    /// Applied with probability `dawdle_factor` after all limits.
    pub dawdle: VelocityFn,

    /// Personal top speed in cells/tick.
    pub max_velocity: u32,

    pub dawdle_factor: f32,
}

impl VehicleDynamics {
    pub fn new(
        accelerate: impl Fn(u32) -> u32 + Send + Sync + 'static,
        dawdle: impl Fn(u32) -> u32 + Send + Sync + 'static,
        max_velocity: u32,
        dawdle_factor: f32,
    ) -> Self {
        Self {
            accelerate: Arc::new(accelerate),
            dawdle: Arc::new(dawdle),
            max_velocity,
            dawdle_factor,
        }
    }

    /// Classic rules: +1 per tick, −1 when dawdling, capped by the
    /// scenario's global limit.
    pub fn nagel_schreckenberg(config: &ScenarioConfig) -> Self {
        Self::new(
            |v| v.saturating_add(1),
            |v| v.saturating_sub(1),
            config.global_max_velocity,
            config.dawdle_factor,
        )
    }

    /// Deterministic variant that never dawdles.
    pub fn without_dawdling(mut self) -> Self {
        self.dawdle_factor = 0.0;
        self
    }
}

impl fmt::Debug for VehicleDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleDynamics")
            .field("max_velocity", &self.max_velocity)
            .field("dawdle_factor", &self.dawdle_factor)
            .finish_non_exhaustive()
    }
}
