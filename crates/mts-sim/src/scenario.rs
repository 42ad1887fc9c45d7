//! Scenarios whose trips run between polygonal areas.

use std::sync::Arc;

use log::{debug, warn};
use mts_core::{NodeId, ScenarioConfig, SimRng};
use mts_graph::{NodeIndex, StreetGraph};
use mts_routing::{Route, ShortestPathAlgorithm};

use crate::{Area, AreaKind, SimError, SimResult};

/// Route generation gives up after this many failed draws per requested
/// route, so a graph with few reachable pairs cannot loop forever.
const ATTEMPTS_PER_ROUTE: usize = 8;

/// A graph, a configuration, the origin / destination areas and one route
/// per vehicle.
///
/// The graph is shared read-only; building a [`Simulation`](crate::Simulation)
/// from the scenario clones the `Arc`, not the graph.
#[derive(Clone, Debug)]
pub struct AreaScenario {
    pub graph:  Arc<StreetGraph>,
    pub config: ScenarioConfig,
    pub areas:  Vec<Area>,
    pub routes: Vec<Route>,
}

impl AreaScenario {
    pub fn new(graph: Arc<StreetGraph>, config: ScenarioConfig) -> Self {
        Self { graph, config, areas: Vec::new(), routes: Vec::new() }
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.areas.push(area);
        self
    }

    pub fn add_area(&mut self, area: Area) {
        self.areas.push(area);
    }

    pub fn areas_of(&self, kind: AreaKind) -> impl Iterator<Item = &Area> + '_ {
        self.areas.iter().filter(move |a| a.kind == kind)
    }

    /// Nodes inside any area of `kind`, ascending and without duplicates.
    pub fn nodes_of(&self, kind: AreaKind, index: &NodeIndex) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.areas_of(kind).flat_map(|a| a.nodes(index)).collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Draw up to `count` random origin/destination pairs and append the
    /// routes `algorithm` finds for them.
    ///
    /// Pairs with identical endpoints are redrawn silently; unreachable pairs
    /// are skipped with a warning.  Returns the number of routes added, which
    /// is less than `count` only if too many draws failed.
    ///
    /// # Errors
    ///
    /// [`SimError::MissingArea`] if the scenario lacks an origin or a
    /// destination area, [`SimError::EmptyArea`] if no node lies inside them.
    pub fn generate_routes(
        &mut self,
        count: usize,
        algorithm: &dyn ShortestPathAlgorithm,
        rng: &mut SimRng,
    ) -> SimResult<usize> {
        let index = NodeIndex::build(&self.graph);
        let origins = self.endpoints(AreaKind::Origin, &index)?;
        let destinations = self.endpoints(AreaKind::Destination, &index)?;

        let mut added = 0;
        let mut attempts = 0;
        while added < count && attempts < count.saturating_mul(ATTEMPTS_PER_ROUTE) {
            attempts += 1;
            let (Some(&from), Some(&to)) = (rng.choose(&origins), rng.choose(&destinations)) else {
                break;
            };
            if from == to {
                continue;
            }
            let route = algorithm.find_shortest_path(&self.graph, from, to);
            if route.is_empty() {
                warn!("no route from {from} to {to}; pair skipped");
                continue;
            }
            self.routes.push(route);
            added += 1;
        }

        if added < count {
            warn!("generated {added} of {count} routes after {attempts} draws");
        } else {
            debug!("generated {added} routes in {attempts} draws");
        }
        Ok(added)
    }

    /// [`generate_routes`](Self::generate_routes) for the scenario's own
    /// `config.max_vehicle_count`, i.e. one route per vehicle it should carry.
    pub fn generate_routes_from_config(
        &mut self,
        algorithm: &dyn ShortestPathAlgorithm,
        rng: &mut SimRng,
    ) -> SimResult<usize> {
        self.generate_routes(self.config.max_vehicle_count, algorithm, rng)
    }

    fn endpoints(&self, kind: AreaKind, index: &NodeIndex) -> SimResult<Vec<NodeId>> {
        if self.areas_of(kind).next().is_none() {
            return Err(SimError::MissingArea(kind));
        }
        let nodes = self.nodes_of(kind, index);
        if nodes.is_empty() {
            return Err(SimError::EmptyArea { kind });
        }
        Ok(nodes)
    }
}
