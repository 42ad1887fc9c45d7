//! Built-in section types.
//!
//! | Tag      | Section               | Payload                                  |
//! |----------|-----------------------|------------------------------------------|
//! | `0x0001` | `ScenarioMetaInfo`    | graph GUID, scenario type name           |
//! | `0x0002` | `ScenarioConfigInfo`  | `ScenarioConfig`                         |
//! | `0x0003` | `ScenarioAreaSet`     | origin / destination polygons            |
//! | `0x0004` | `ScenarioRouteSet`    | one edge list + cost per vehicle         |
//! | `0x0010` | `MapSegment`          | bounds + named polylines                 |
//! | `0x0020` | `StreetGraphSection`  | node, edge and connector records         |

pub mod graph;
pub mod map;
pub mod scenario;

pub use graph::{ConnectorRecord, EdgeRecord, NodeRecord, StreetGraphSection};
pub use map::{MapFeature, MapSegment};
pub use scenario::{ScenarioAreaSet, ScenarioConfigInfo, ScenarioMetaInfo, ScenarioRouteSet};
