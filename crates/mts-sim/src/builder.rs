//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use log::{debug, warn};
use mts_core::{Metrics, SimRng, Tick, VehicleId, VehicleRng};
use mts_vehicle::{CrossingLogic, PriorityCrossingLogic, Vehicle, VehicleDynamics, VehiclePopulation};

use crate::{AreaScenario, SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                          |
/// |------------------------|--------------------------------------------------|
/// | `.crossing_logic(l)`   | [`PriorityCrossingLogic`] at every node          |
/// | `.dynamics(d)`         | `VehicleDynamics::nagel_schreckenberg(&config)`  |
/// | `.metrics(m)`          | none                                             |
///
/// # Example
///
/// ```rust,ignore
/// let metrics = Arc::new(Metrics::new());
/// let mut sim = SimBuilder::new(scenario)
///     .metrics(metrics.clone())
///     .build()?;
/// sim.run_ticks(500, &mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    scenario: AreaScenario,
    crossing: Option<Arc<dyn CrossingLogic>>,
    dynamics: Option<VehicleDynamics>,
    metrics:  Option<Arc<Metrics>>,
}

impl SimBuilder {
    pub fn new(scenario: AreaScenario) -> Self {
        Self { scenario, crossing: None, dynamics: None, metrics: None }
    }

    /// Crossing rules used at every node.  The rules still read each node's
    /// own `CrossingLogicConfig`.
    pub fn crossing_logic(mut self, logic: impl CrossingLogic + 'static) -> Self {
        self.crossing = Some(Arc::new(logic));
        self
    }

    /// Driver model shared by all vehicles.  Its `dawdle_factor` is checked
    /// by [`build`](Self::build) like the scenario's.
    pub fn dynamics(mut self, dynamics: VehicleDynamics) -> Self {
        self.dynamics = Some(dynamics);
        self
    }

    /// Counters for spawns, despawns and granted crossings.
    pub fn metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validate the configuration and graph, create one vehicle per
    /// non-empty scenario route, and register each in a fresh population.
    ///
    /// Vehicle ids are dense in route order; spawn delays are drawn
    /// uniformly from `0..spawn_window_ticks` with the scenario seed.
    pub fn build(self) -> SimResult<Simulation> {
        let AreaScenario { graph, config, routes, .. } = self.scenario;
        config.validate()?;
        graph.validate()?;

        let population = Arc::new(match &self.metrics {
            Some(m) => VehiclePopulation::with_metrics(m.clone()),
            None => VehiclePopulation::new(),
        });
        let dynamics = self
            .dynamics
            .unwrap_or_else(|| VehicleDynamics::nagel_schreckenberg(&config));
        if !(0.0..=1.0).contains(&dynamics.dawdle_factor) {
            return Err(SimError::DawdleFactor(dynamics.dawdle_factor));
        }

        let mut rng = SimRng::new(config.seed);
        let mut vehicles = Vec::with_capacity(routes.len());
        for (i, route) in routes.into_iter().enumerate() {
            if route.is_empty() || !route.is_drivable(&graph) {
                warn!("scenario route {i} is not drivable; no vehicle created");
                continue;
            }
            let id = VehicleId(vehicles.len() as u32);
            let delay = if config.spawn_window_ticks > 0 {
                rng.gen_range(0..config.spawn_window_ticks)
            } else {
                0
            };
            population.add_vehicle(id)?;
            vehicles.push(Vehicle::new(
                id,
                route,
                delay,
                dynamics.clone(),
                VehicleRng::new(config.seed, id),
            ));
        }
        debug!("built simulation with {} vehicles", vehicles.len());

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        let edge_cells = graph
            .edges()
            .iter()
            .map(|e| e.length_cells(config.meters_per_cell))
            .collect();

        Ok(Simulation {
            config,
            graph,
            tick: Tick::ZERO,
            vehicles,
            population,
            crossing: self.crossing.unwrap_or_else(|| Arc::new(PriorityCrossingLogic)),
            metrics: self.metrics,
            edge_cells,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
