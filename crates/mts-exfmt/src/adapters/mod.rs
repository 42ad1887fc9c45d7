//! Built-in injectors and extractors.

mod scenario;
mod streetgraph;

pub use scenario::{AREA_SCENARIO_TYPE, AreaScenarioExtractor, AreaScenarioInjector, AreaScenarioInjectorConfig};
pub use streetgraph::{StreetGraphExtractor, StreetGraphExtractorConfig, StreetGraphInjector};
