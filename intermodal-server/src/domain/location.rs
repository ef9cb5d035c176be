//! Geographic locations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Error returned when constructing a location from invalid coordinates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location: {reason}")]
pub struct InvalidLocation {
    reason: &'static str,
}

/// A WGS84 coordinate pair in degrees.
///
/// Two locations are considered the same place when their milli-degree
/// quantizations match; see [`Location::lat_e3`] and [`Location::source_key`].
///
/// # Examples
///
/// ```
/// use intermodal_server::domain::Location;
///
/// let a = Location::new(50.0871, 14.4210).unwrap();
/// let b = Location::new(50.0874, 14.4207).unwrap();
/// assert_eq!(a.source_key(), b.source_key());
///
/// assert!(Location::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = InvalidLocation;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.lat, raw.lon)
    }
}

impl Location {
    /// Create a location, validating that both coordinates are in range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidLocation> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidLocation {
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidLocation {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidLocation {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in whole milli-degrees.
    pub fn lat_e3(&self) -> i32 {
        (self.lat * 1000.0).round() as i32
    }

    /// Longitude in whole milli-degrees.
    pub fn lon_e3(&self) -> i32 {
        (self.lon * 1000.0).round() as i32
    }

    /// Deterministic identity of the quantized location.
    ///
    /// Folds both milli-degree components onto the naturals and combines
    /// them with Szudzik's pairing function, so distinct quantized
    /// coordinates never share a key.
    pub fn source_key(&self) -> u64 {
        szudzik_pair(fold(self.lat_e3()), fold(self.lon_e3()))
    }

    /// The `[lat, lon]` point used by the spatial index.
    pub fn to_point(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// Great-circle (haversine) distance in metres.
    pub fn distance_meters(&self, other: &Location) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Maps a signed integer onto the naturals: 0, -1, 1, -2, 2 ... → 0, 1, 2, 3, 4 ...
fn fold(value: i32) -> u64 {
    let value = i64::from(value);
    if value >= 0 {
        (2 * value) as u64
    } else {
        (-2 * value - 1) as u64
    }
}

fn szudzik_pair(a: u64, b: u64) -> u64 {
    if a >= b { a * a + a + b } else { a + b * b }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Locations in the same milli-degree cell share a key.
        #[test]
        fn same_cell_same_key(
            lat in -89_000i32..89_000,
            lon in -179_000i32..179_000,
            dlat in -0.4f64..0.4,
            dlon in -0.4f64..0.4,
        ) {
            let a = Location::new(f64::from(lat) / 1000.0, f64::from(lon) / 1000.0).unwrap();
            let b = Location::new(
                (f64::from(lat) + dlat) / 1000.0,
                (f64::from(lon) + dlon) / 1000.0,
            ).unwrap();
            prop_assert_eq!(a.source_key(), b.source_key());
        }

        /// Distinct quantized coordinates never collide.
        #[test]
        fn distinct_cells_distinct_keys(
            a in (-90_000i32..=90_000, -180_000i32..=180_000),
            b in (-90_000i32..=90_000, -180_000i32..=180_000),
        ) {
            prop_assume!(a != b);
            let la = Location::new(f64::from(a.0) / 1000.0, f64::from(a.1) / 1000.0).unwrap();
            let lb = Location::new(f64::from(b.0) / 1000.0, f64::from(b.1) / 1000.0).unwrap();
            prop_assert_ne!(la.source_key(), lb.source_key());
        }
    }
}
