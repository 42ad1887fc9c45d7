//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where configuration validation can fail.

use thiserror::Error;

/// Errors produced by `mts-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `mts-core`.
pub type CoreResult<T> = Result<T, CoreError>;
