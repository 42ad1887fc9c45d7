//! `AreaScenario` ⇄ scenario sections.

use std::sync::Arc;

use log::{debug, warn};
use mts_graph::StreetGraph;
use mts_sim::AreaScenario;

use crate::format::{Context, ExchangeFormat, Extractor, Injector};
use crate::sections::{ScenarioAreaSet, ScenarioConfigInfo, ScenarioMetaInfo, ScenarioRouteSet};
use crate::{Container, ExfmtError, ExfmtResult, Section};

/// Value of [`ScenarioMetaInfo::scenario_type`] for area scenarios.
pub const AREA_SCENARIO_TYPE: &str = "AreaScenario";

/// Options for [`AreaScenarioInjector`].
#[derive(Clone, Debug, Default)]
pub struct AreaScenarioInjectorConfig {
    /// Also write the scenario's precomputed routes.
    pub store_routes: bool,
}

// ── Injector ──────────────────────────────────────────────────────────────────

/// Writes meta info, configuration, areas and (optionally) routes.
///
/// The graph itself is not written; inject the `StreetGraph` separately if
/// the file should be self-contained.
pub struct AreaScenarioInjector;

impl Injector<AreaScenario> for AreaScenarioInjector {
    fn inject(&self, fmt: &ExchangeFormat, _ctx: &mut Context, dst: &mut Container, src: &AreaScenario) -> ExfmtResult<()> {
        let cfg = fmt.config().get_or_default::<AreaScenarioInjectorConfig>();

        dst.set(ScenarioMetaInfo {
            graph_guid:    src.graph.guid(),
            scenario_type: AREA_SCENARIO_TYPE.to_owned(),
        });
        dst.set(ScenarioConfigInfo { config: src.config.clone() });
        dst.set(ScenarioAreaSet { areas: src.areas.clone() });
        if cfg.store_routes {
            dst.set(ScenarioRouteSet { routes: src.routes.clone() });
        }
        Ok(())
    }
}

// ── Extractor ─────────────────────────────────────────────────────────────────

/// Rebuilds an [`AreaScenario`].
///
/// The graph is taken from an `Arc<StreetGraph>` in the context if there is
/// one; otherwise it is extracted from the container and left in the
/// context for later extractions.  Either way its GUID must match the one
/// recorded in the meta info.
pub struct AreaScenarioExtractor;

impl Extractor<AreaScenario> for AreaScenarioExtractor {
    fn extract(&self, fmt: &ExchangeFormat, ctx: &mut Context, src: &Container) -> ExfmtResult<AreaScenario> {
        let meta = src
            .get::<ScenarioMetaInfo>()
            .ok_or(ExfmtError::MissingSection(ScenarioMetaInfo::NAME))?;
        if meta.scenario_type != AREA_SCENARIO_TYPE {
            return Err(ExfmtError::malformed(
                ScenarioMetaInfo::NAME,
                format!("expected scenario type {AREA_SCENARIO_TYPE:?}, found {:?}", meta.scenario_type),
            ));
        }

        let cached = ctx.get::<Arc<StreetGraph>>().cloned();
        let graph = match cached {
            Some(g) => g,
            None => {
                let g = Arc::new(fmt.extract::<StreetGraph>(ctx, src)?);
                ctx.set(Arc::clone(&g));
                g
            }
        };
        if graph.guid() != meta.graph_guid {
            return Err(ExfmtError::GuidMismatch { expected: meta.graph_guid, found: graph.guid() });
        }

        let config = src
            .get::<ScenarioConfigInfo>()
            .ok_or(ExfmtError::MissingSection(ScenarioConfigInfo::NAME))?
            .config
            .clone();
        let areas = src
            .get::<ScenarioAreaSet>()
            .ok_or(ExfmtError::MissingSection(ScenarioAreaSet::NAME))?
            .areas
            .clone();

        let routes = match src.get::<ScenarioRouteSet>() {
            Some(set) => {
                if let Some(i) = set.routes.iter().position(|r| !r.is_drivable(&graph)) {
                    return Err(ExfmtError::malformed(
                        ScenarioRouteSet::NAME,
                        format!("route {i} is not drivable on graph {}", graph.guid()),
                    ));
                }
                set.routes.clone()
            }
            None => Vec::new(),
        };
        if routes.iter().any(|r| r.is_empty()) {
            warn!("stored scenario contains empty routes; they will be skipped by the simulation");
        }

        debug!("extracted scenario: {} areas, {} routes", areas.len(), routes.len());
        Ok(AreaScenario { graph, config, areas, routes })
    }
}
