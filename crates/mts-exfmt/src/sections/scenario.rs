//! Scenario description sections.

use std::io::{Read, Write};

use mts_core::{CrossingLogicConfig, EdgeId, ScenarioConfig};
use mts_graph::GraphGuid;
use mts_routing::Route;
use mts_sim::{Area, AreaKind};

use crate::codec::*;
use crate::{ExfmtError, ExfmtResult, Section};

// ── ScenarioMetaInfo ──────────────────────────────────────────────────────────

/// Which graph a scenario was made for, and what kind of scenario it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioMetaInfo {
    pub graph_guid:    GraphGuid,
    pub scenario_type: String,
}

impl Section for ScenarioMetaInfo {
    const TAG: u16 = 0x0001;
    const NAME: &'static str = "scenario meta info";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        write_u64(w, self.graph_guid.0)?;
        write_str(w, &self.scenario_type, Self::NAME)
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        Ok(Self {
            graph_guid:    GraphGuid(read_u64(r)?),
            scenario_type: read_str(r, Self::NAME)?,
        })
    }
}

// ── ScenarioConfigInfo ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfigInfo {
    pub config: ScenarioConfig,
}

impl Section for ScenarioConfigInfo {
    const TAG: u16 = 0x0002;
    const NAME: &'static str = "scenario config";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        let c = &self.config;
        write_u64(w, c.seed)?;
        write_f32(w, c.meters_per_cell)?;
        write_u32(w, c.global_max_velocity)?;
        write_u64(w, c.max_vehicle_count as u64)?;
        write_u64(w, c.spawn_window_ticks)?;
        write_f32(w, c.dawdle_factor)?;
        // 0 means "use the global pool".
        let threads = match c.num_threads {
            Some(n) => u32::try_from(n)
                .map_err(|_| ExfmtError::malformed(Self::NAME, format!("{n} worker threads exceed u32")))?,
            None => 0,
        };
        write_u32(w, threads)?;
        write_u8(w, c.crossing.to_bits())
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        let config = ScenarioConfig {
            seed:                read_u64(r)?,
            meters_per_cell:     read_f32(r)?,
            global_max_velocity: read_u32(r)?,
            max_vehicle_count:   read_count(r)?,
            spawn_window_ticks:  read_u64(r)?,
            dawdle_factor:       read_f32(r)?,
            num_threads:         match read_u32(r)? {
                0 => None,
                n => Some(n as usize),
            },
            crossing:            CrossingLogicConfig::from_bits(read_u8(r)?),
        };
        Ok(Self { config })
    }
}

fn read_count(r: &mut dyn Read) -> ExfmtResult<usize> {
    let n = read_u64(r)?;
    usize::try_from(n)
        .map_err(|_| ExfmtError::malformed(ScenarioConfigInfo::NAME, format!("vehicle count {n} exceeds usize")))
}

// ── ScenarioAreaSet ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioAreaSet {
    pub areas: Vec<Area>,
}

impl Section for ScenarioAreaSet {
    const TAG: u16 = 0x0003;
    const NAME: &'static str = "scenario areas";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        write_len(w, self.areas.len(), Self::NAME)?;
        for area in &self.areas {
            write_u8(w, area.kind.code())?;
            write_points(w, &area.polygon, Self::NAME)?;
        }
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        let n = read_len(r)?;
        let mut areas = Vec::with_capacity(n.min(1024));
        for _ in 0..n {
            let code = read_u8(r)?;
            let kind = AreaKind::from_code(code)
                .ok_or_else(|| ExfmtError::malformed(Self::NAME, format!("unknown area kind {code}")))?;
            areas.push(Area::new(kind, read_points(r)?));
        }
        Ok(Self { areas })
    }
}

// ── ScenarioRouteSet ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioRouteSet {
    pub routes: Vec<Route>,
}

impl Section for ScenarioRouteSet {
    const TAG: u16 = 0x0004;
    const NAME: &'static str = "scenario routes";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        write_len(w, self.routes.len(), Self::NAME)?;
        for route in &self.routes {
            write_f64(w, route.cost())?;
            write_len(w, route.len(), Self::NAME)?;
            for e in route.edges() {
                write_u32(w, e.0)?;
            }
        }
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        let n = read_len(r)?;
        let mut routes = Vec::with_capacity(n.min(1024));
        for _ in 0..n {
            let cost = read_f64(r)?;
            let len = read_len(r)?;
            let mut edges = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                edges.push(EdgeId(read_u32(r)?));
            }
            routes.push(Route::new(edges, cost));
        }
        Ok(Self { routes })
    }
}
