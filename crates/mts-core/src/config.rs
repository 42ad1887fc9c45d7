//! Scenario and intersection configuration.
//!
//! Typically built in code or loaded from a file by the application crate
//! (enable the `serde` feature) and handed to the scenario / simulation
//! builders.  Every field has a documented default.

use crate::{CoreError, CoreResult};

// ── CrossingLogicConfig ───────────────────────────────────────────────────────

/// Switches for the intersection crossing rules.
///
/// | Field                               | Default |
/// |-------------------------------------|---------|
/// | `driving_on_the_right`              | `true`  |
/// | `edge_priority_enabled`             | `true`  |
/// | `priority_to_the_right_enabled`     | `true`  |
/// | `friendly_standing_in_jam_enabled`  | `true`  |
/// | `only_one_vehicle_enabled`          | `false` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingLogicConfig {
    /// Right-hand traffic.  With `false`, "priority to the right" yields to
    /// the left instead.
    pub driving_on_the_right: bool,

    /// Vehicles arriving on a higher-priority street class go first.
    pub edge_priority_enabled: bool,

    /// Among equal street classes, yield to vehicles approaching from the
    /// right (left for left-hand traffic).
    pub priority_to_the_right_enabled: bool,

    /// A vehicle whose next edge has no free entry cell does not claim the
    /// intersection, so it cannot block crossing traffic.
    pub friendly_standing_in_jam_enabled: bool,

    /// At most one vehicle crosses each intersection per tick.
    pub only_one_vehicle_enabled: bool,
}

impl Default for CrossingLogicConfig {
    fn default() -> Self {
        Self {
            driving_on_the_right:             true,
            edge_priority_enabled:            true,
            priority_to_the_right_enabled:    true,
            friendly_standing_in_jam_enabled: true,
            only_one_vehicle_enabled:         false,
        }
    }
}

impl CrossingLogicConfig {
    /// Pack the switches into one byte, field order from bit 0 upwards.
    pub fn to_bits(&self) -> u8 {
        (self.driving_on_the_right as u8)
            | (self.edge_priority_enabled as u8) << 1
            | (self.priority_to_the_right_enabled as u8) << 2
            | (self.friendly_standing_in_jam_enabled as u8) << 3
            | (self.only_one_vehicle_enabled as u8) << 4
    }

    /// Inverse of [`to_bits`](Self::to_bits).  Unused high bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            driving_on_the_right:             bits & 1 != 0,
            edge_priority_enabled:            bits & 1 << 1 != 0,
            priority_to_the_right_enabled:    bits & 1 << 2 != 0,
            friendly_standing_in_jam_enabled: bits & 1 << 3 != 0,
            only_one_vehicle_enabled:         bits & 1 << 4 != 0,
        }
    }
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Top-level scenario configuration.
///
/// | Field                 | Default | Unit                 |
/// |-----------------------|---------|----------------------|
/// | `seed`                | `0`     | —                    |
/// | `meters_per_cell`     | `7.5`   | metres               |
/// | `global_max_velocity` | `5`     | cells / tick         |
/// | `max_vehicle_count`   | `100`   | vehicles             |
/// | `spawn_window_ticks`  | `10`    | ticks                |
/// | `dawdle_factor`       | `0.2`   | probability          |
/// | `num_threads`         | `None`  | all logical cores    |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Physical length of one cellular-automaton cell.
    pub meters_per_cell: f32,

    /// Upper bound on any vehicle's velocity, regardless of street limits.
    pub global_max_velocity: u32,

    /// Number of routes, and so vehicles, `AreaScenario::generate_routes_from_config`
    /// draws.
    pub max_vehicle_count: usize,

    /// Spawn delays are spread uniformly over `0..spawn_window_ticks`.
    pub spawn_window_ticks: u64,

    /// Probability that a vehicle dawdles (slows by one) in a tick.
    pub dawdle_factor: f32,

    /// Worker thread count for the parallel movement phase.  `None` uses the
    /// global Rayon pool.
    pub num_threads: Option<usize>,

    pub crossing: CrossingLogicConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed:                0,
            meters_per_cell:     7.5,
            global_max_velocity: 5,
            max_vehicle_count:   100,
            spawn_window_ticks:  10,
            dawdle_factor:       0.2,
            num_threads:         None,
            crossing:            CrossingLogicConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.meters_per_cell.is_finite() && self.meters_per_cell > 0.0) {
            return Err(CoreError::Config(format!(
                "meters_per_cell must be positive, got {}",
                self.meters_per_cell
            )));
        }
        if self.global_max_velocity == 0 {
            return Err(CoreError::Config("global_max_velocity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.dawdle_factor) {
            return Err(CoreError::Config(format!(
                "dawdle_factor must lie in [0, 1], got {}",
                self.dawdle_factor
            )));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Number of cells covering `length_m` metres (at least one).
    #[inline]
    pub fn cells_for(&self, length_m: f32) -> u32 {
        ((length_m / self.meters_per_cell).ceil() as u32).max(1)
    }
}
