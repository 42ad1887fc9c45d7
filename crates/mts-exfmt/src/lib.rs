//! `mts-exfmt` — a versioned, section-tagged binary format for street graphs
//! and scenarios.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`section`]    | `Section` trait and its object-safe form `AnySection`     |
//! | [`sections`]   | Built-in section types and their tags                     |
//! | [`container`]  | `Container`: version plus one section per type            |
//! | [`serializer`] | `Serializer`: stream framing and the tag → decoder table  |
//! | [`format`]     | `ExchangeFormat`, `Injector`, `Extractor`, `Manipulator`  |
//! | [`adapters`]   | Built-in adapters for `StreetGraph` and `AreaScenario`    |
//! | [`codec`]      | Little-endian primitives for writing custom sections      |
//! | [`error`]      | `ExfmtError`, `ExfmtResult<T>`                            |
//!
//! # Data flow
//!
//! ```text
//!   domain value ──Injector──▶ Container ──Serializer::write──▶ bytes
//!   bytes ──Serializer::read──▶ Container ──Extractor──▶ domain value
//! ```
//!
//! Reading is all-or-nothing: a stream with the wrong version, an unknown
//! tag or a damaged section produces an error and no container.

pub mod adapters;
pub mod codec;
pub mod container;
pub mod error;
pub mod format;
pub mod section;
pub mod sections;
pub mod serializer;


pub use adapters::{
    AREA_SCENARIO_TYPE, AreaScenarioExtractor, AreaScenarioInjector, AreaScenarioInjectorConfig, StreetGraphExtractor,
    StreetGraphExtractorConfig, StreetGraphInjector,
};
pub use container::Container;
pub use error::{ExfmtError, ExfmtResult};
pub use format::{Context, ExchangeFormat, ExfmtConfig, Extractor, Injector, Manipulator};
pub use section::{AnySection, Section};
pub use sections::*;
pub use serializer::Serializer;

/// First four bytes of every stream.
pub const MAGIC: [u8; 4] = *b"MTSX";

/// The only version this build reads or writes.
pub const FORMAT_VERSION: u16 = 1;
