//! Exchange-format error type.

use std::io;

use mts_graph::{GraphError, GraphGuid};
use thiserror::Error;

/// Errors produced while building, writing or reading a container.
///
/// A failed read never yields a partial [`Container`](crate::Container).
#[derive(Debug, Error)]
pub enum ExfmtError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid magic bytes (expected b\"MTSX\")")]
    InvalidMagic,

    #[error("unsupported format version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u16, supported: u16 },

    #[error("unknown section tag {tag:#06x}")]
    UnknownSection { tag: u16 },

    #[error("malformed {section} section: {detail}")]
    Malformed { section: &'static str, detail: String },

    #[error("container has no {0} section")]
    MissingSection(&'static str),

    #[error("graph GUID mismatch: scenario expects {expected}, graph is {found}")]
    GuidMismatch { expected: GraphGuid, found: GraphGuid },

    #[error("no injector registered for {0}")]
    MissingInjector(&'static str),

    #[error("no extractor registered for {0}")]
    MissingExtractor(&'static str),

    #[error("stored graph is invalid: {0}")]
    Graph(#[from] GraphError),
}

impl ExfmtError {
    pub(crate) fn malformed(section: &'static str, detail: impl Into<String>) -> Self {
        Self::Malformed { section, detail: detail.into() }
    }
}

pub type ExfmtResult<T> = Result<T, ExfmtError>;
