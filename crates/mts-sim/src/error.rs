use mts_core::CoreError;
use mts_graph::GraphError;
use mts_vehicle::PopulationError;
use thiserror::Error;

use crate::AreaKind;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("invalid street graph: {0}")]
    Graph(#[from] GraphError),

    #[error("vehicle dynamics: dawdle_factor must lie in [0, 1], got {0}")]
    DawdleFactor(f32),

    #[error("scenario has no {0} area")]
    MissingArea(AreaKind),

    #[error("{kind} areas contain no graph nodes")]
    EmptyArea { kind: AreaKind },

    #[error("population error: {0}")]
    Population(#[from] PopulationError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
