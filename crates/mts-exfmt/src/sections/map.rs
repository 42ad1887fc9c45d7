//! Map geometry for display: bounds and named polylines.

use std::io::{Read, Write};

use mts_core::Bounds;
use mts_core::GeoPoint;

use crate::codec::*;
use crate::{ExfmtResult, Section};

/// A named polyline, e.g. a street's centre line.
#[derive(Clone, Debug, PartialEq)]
pub struct MapFeature {
    pub name:   String,
    pub points: Vec<GeoPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSegment {
    pub bounds:   Bounds,
    pub features: Vec<MapFeature>,
}

impl Section for MapSegment {
    const TAG: u16 = 0x0010;
    const NAME: &'static str = "map segment";

    fn encode(&self, w: &mut dyn Write) -> ExfmtResult<()> {
        let b = &self.bounds;
        write_f32(w, b.min_lat)?;
        write_f32(w, b.min_lon)?;
        write_f32(w, b.max_lat)?;
        write_f32(w, b.max_lon)?;
        write_len(w, self.features.len(), Self::NAME)?;
        for f in &self.features {
            write_str(w, &f.name, Self::NAME)?;
            write_points(w, &f.points, Self::NAME)?;
        }
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> ExfmtResult<Self> {
        let bounds = Bounds::new(read_f32(r)?, read_f32(r)?, read_f32(r)?, read_f32(r)?);
        let n = read_len(r)?;
        let mut features = Vec::with_capacity(n.min(1024));
        for _ in 0..n {
            features.push(MapFeature {
                name:   read_str(r, Self::NAME)?,
                points: read_points(r)?,
            });
        }
        Ok(Self { bounds, features })
    }
}
