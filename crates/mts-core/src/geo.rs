//! Geographic coordinate types and spatial utilities.
//!
//! `GeoPoint` uses `f32` latitude/longitude.  At the equator this gives ~1 m
//! precision, which is plenty for cell-based traffic simulation at city scale.

/// A WGS-84 geographic coordinate stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accuracy: ±0.5 % (f32 rounding).  Never larger than the length of a
    /// road that actually connects the two points, which is what makes it an
    /// admissible A* heuristic.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Planar bearing from `self` to `other` in radians, with longitude as
    /// the x axis and latitude as the y axis.  Only used for angular ordering
    /// of roads around an intersection, never for distances.
    #[inline]
    pub fn bearing_to(self, other: GeoPoint) -> f32 {
        (other.lat - self.lat).atan2(other.lon - self.lon)
    }

    /// Linear interpolation between two points; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f32) -> GeoPoint {
        let t = t.clamp(0.0, 1.0);
        GeoPoint::new(
            self.lat + (other.lat - self.lat) * t,
            self.lon + (other.lon - self.lon) * t,
        )
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Axis-aligned lat/lon bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f32,
    pub min_lon: f32,
    pub max_lat: f32,
    pub max_lon: f32,
}

impl Bounds {
    /// An inverted box that any `extend` call will overwrite.
    pub const EMPTY: Bounds = Bounds {
        min_lat: f32::INFINITY,
        min_lon: f32::INFINITY,
        max_lat: f32::NEG_INFINITY,
        max_lon: f32::NEG_INFINITY,
    };

    pub fn new(min_lat: f32, min_lon: f32, max_lat: f32, max_lon: f32) -> Self {
        Self { min_lat, min_lon, max_lat, max_lon }
    }

    /// Smallest box covering every point in `points`; `EMPTY` if there are none.
    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Self {
        points.into_iter().fold(Bounds::EMPTY, |mut b, p| {
            b.extend(p);
            b
        })
    }

    pub fn extend(&mut self, p: GeoPoint) {
        self.min_lat = self.min_lat.min(p.lat);
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lat = self.max_lat.max(p.lat);
        self.max_lon = self.max_lon.max(p.lon);
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lon..=self.max_lon).contains(&p.lon)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

/// Even-odd ray-casting test in planar lat/lon space.
///
/// `polygon` is an implicitly closed ring; fewer than three vertices never
/// contain anything.  Points exactly on an edge may land on either side.
pub fn point_in_polygon(p: GeoPoint, polygon: &[GeoPoint]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let lon_at = (b.lon - a.lon) * (p.lat - a.lat) / (b.lat - a.lat) + a.lon;
            if p.lon < lon_at {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
