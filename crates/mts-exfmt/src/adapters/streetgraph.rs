//! `StreetGraph` ⇄ [`StreetGraphSection`].

use log::debug;
use mts_core::{CrossingLogicConfig, ScenarioConfig};
use mts_graph::{EdgeSpec, StreetGraph};

use crate::format::{Context, ExchangeFormat, Extractor, Injector};
use crate::sections::{ConnectorRecord, EdgeRecord, NodeRecord, StreetGraphSection};
use crate::{Container, ExfmtError, ExfmtResult, Section};

/// Options for [`StreetGraphExtractor`].
#[derive(Clone, Debug)]
pub struct StreetGraphExtractorConfig {
    /// Supplies the crossing configuration when `use_stored_crossing` is off.
    pub scenario: ScenarioConfig,
    /// Keep each node's stored crossing configuration.  When off, every node
    /// gets `scenario.crossing` and the GUID check is skipped, since the
    /// rebuilt graph is then a different graph.
    pub use_stored_crossing: bool,
}

impl Default for StreetGraphExtractorConfig {
    fn default() -> Self {
        Self { scenario: ScenarioConfig::default(), use_stored_crossing: true }
    }
}

// ── Injector ──────────────────────────────────────────────────────────────────

pub struct StreetGraphInjector;

impl Injector<StreetGraph> for StreetGraphInjector {
    fn inject(&self, _fmt: &ExchangeFormat, _ctx: &mut Context, dst: &mut Container, src: &StreetGraph) -> ExfmtResult<()> {
        dst.set(section_from_graph(src));
        Ok(())
    }
}

fn section_from_graph(g: &StreetGraph) -> StreetGraphSection {
    let nodes = g
        .nodes()
        .iter()
        .map(|n| NodeRecord { id: n.id, position: n.position, crossing: n.crossing })
        .collect();

    let edges = g
        .edges()
        .iter()
        .map(|e| EdgeRecord {
            id:           e.id,
            origin:       e.origin,
            destination:  e.destination,
            length_m:     e.length_m,
            lanes:        e.lanes,
            street_type:  e.street_type,
            max_velocity: e.max_velocity,
            reverse:      e.reverse,
        })
        .collect();

    let connectors = g
        .nodes()
        .iter()
        .flat_map(|n| {
            n.connectors
                .iter()
                .flat_map(move |(&from, targets)| targets.iter().map(move |&to| ConnectorRecord { node: n.id, from, to }))
        })
        .collect();

    StreetGraphSection { guid: g.guid(), nodes, edges, connectors }
}

// ── Extractor ─────────────────────────────────────────────────────────────────

/// Rebuilds the graph by replaying nodes, edges and connectors through the
/// normal mutation API, then checks it against the stored GUID.
pub struct StreetGraphExtractor;

impl Extractor<StreetGraph> for StreetGraphExtractor {
    fn extract(&self, fmt: &ExchangeFormat, _ctx: &mut Context, src: &Container) -> ExfmtResult<StreetGraph> {
        let cfg = fmt.config().get_or_default::<StreetGraphExtractorConfig>();
        let section = src
            .get::<StreetGraphSection>()
            .ok_or(ExfmtError::MissingSection(StreetGraphSection::NAME))?;

        let crossing = (!cfg.use_stored_crossing).then_some(cfg.scenario.crossing);
        let graph = rebuild(section, crossing)?;

        if crossing.is_none() && graph.guid() != section.guid {
            return Err(ExfmtError::GuidMismatch { expected: section.guid, found: graph.guid() });
        }
        debug!(
            "extracted graph {} ({} nodes, {} edges)",
            graph.guid(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn rebuild(section: &StreetGraphSection, crossing: Option<CrossingLogicConfig>) -> ExfmtResult<StreetGraph> {
    const NAME: &str = StreetGraphSection::NAME;
    let mut g = StreetGraph::with_capacity(section.nodes.len(), section.edges.len());

    for (i, n) in section.nodes.iter().enumerate() {
        if n.id.index() != i {
            return Err(ExfmtError::malformed(NAME, format!("node record {i} has id {}", n.id)));
        }
        g.add_node(n.position, crossing.unwrap_or(n.crossing))?;
    }

    for (i, e) in section.edges.iter().enumerate() {
        if e.id.index() != i {
            return Err(ExfmtError::malformed(NAME, format!("edge record {i} has id {}", e.id)));
        }
        g.add_edge(
            EdgeSpec::new(e.origin, e.destination, e.length_m)
                .lanes(e.lanes)
                .street_type(e.street_type)
                .max_velocity(e.max_velocity),
        )?;
    }
    // Reverse links are derived while replaying; they must come out as stored.
    for e in &section.edges {
        let rebuilt = g.edge(e.id).and_then(|edge| edge.reverse);
        if rebuilt != e.reverse {
            return Err(ExfmtError::malformed(NAME, format!("reverse link of {} does not replay", e.id)));
        }
    }

    for c in &section.connectors {
        let meets = match (g.edge(c.from.edge), g.edge(c.to.edge)) {
            (Some(from), Some(to)) => from.destination == c.node && to.origin == c.node,
            _ => false,
        };
        if !meets {
            return Err(ExfmtError::malformed(
                NAME,
                format!("connector {} -> {} does not meet at {}", c.from, c.to, c.node),
            ));
        }
        g.add_connector(c.from, c.to)?;
    }

    g.validate()?;
    Ok(g)
}
