//! Rectangular regions

use std::fmt::{self, Display, Formatter};
use std::num::ParseFloatError;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Coordinate;

/// A `RectangularRegion` is a bounding box for a geographic region, specified by the
/// coordinates of its southwest and northeast corners in decimal degrees.
///
/// The region may not span the antimeridian. To restrict a query to a region that does, such as
/// the one that encompasses Fiji, perform one query on either side of the antimeridian and
/// combine the results.
///
/// The Geocoding API writes a region as `[west, south, east, north]`, which is also the
/// serialized form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectangularRegion {
    /// Longitude of the west side of the region.
    pub west_longitude: f64,
    /// Latitude of the south side of the region.
    pub south_latitude: f64,
    /// Longitude of the east side of the region.
    pub east_longitude: f64,
    /// Latitude of the north side of the region.
    pub north_latitude: f64,
}

/// The error returned when parsing a `RectangularRegion` from a string fails.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseRegionError {
    #[error("expected 4 comma-separated numbers, found {0}")]
    Length(usize),
    #[error(transparent)]
    Float(#[from] ParseFloatError),
}

impl RectangularRegion {
    /// Creates a region with the given corners.
    ///
    /// `south_west` must lie to the southwest of `north_east`; this is not checked.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mapbox_geocoder::{Coordinate, RectangularRegion};
    ///
    /// let region = RectangularRegion::new(Coordinate::new(38.0, -96.0), Coordinate::new(38.5, -95.5));
    /// assert!(region.contains(Coordinate::new(38.2, -95.8)));
    /// assert_eq!(region.to_string(), "-96,38,-95.5,38.5");
    /// ```
    pub const fn new(south_west: Coordinate, north_east: Coordinate) -> Self {
        RectangularRegion {
            west_longitude: south_west.longitude,
            south_latitude: south_west.latitude,
            east_longitude: north_east.longitude,
            north_latitude: north_east.latitude,
        }
    }

    /// The coordinate at the southwest corner.
    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.south_latitude, self.west_longitude)
    }

    /// The coordinate at the northeast corner.
    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.north_latitude, self.east_longitude)
    }

    /// Returns whether the region contains `coordinate`, edges included.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.latitude >= self.south_latitude
            && coordinate.latitude <= self.north_latitude
            && coordinate.longitude >= self.west_longitude
            && coordinate.longitude <= self.east_longitude
    }
}

impl From<[f64; 4]> for RectangularRegion {
    fn from([west_longitude, south_latitude, east_longitude, north_latitude]: [f64; 4]) -> Self {
        RectangularRegion {
            west_longitude,
            south_latitude,
            east_longitude,
            north_latitude,
        }
    }
}

impl From<RectangularRegion> for [f64; 4] {
    fn from(region: RectangularRegion) -> Self {
        [
            region.west_longitude,
            region.south_latitude,
            region.east_longitude,
            region.north_latitude,
        ]
    }
}

impl Display for RectangularRegion {
    /// Writes `west,south,east,north`, the form of the `bbox` request parameter.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.west_longitude, self.south_latitude, self.east_longitude, self.north_latitude,
        )
    }
}

impl FromStr for RectangularRegion {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, ParseRegionError> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;
        match *values {
            [w, s, e, n] => Ok(RectangularRegion::from([w, s, e, n])),
            _ => Err(ParseRegionError::Length(values.len())),
        }
    }
}

impl Serialize for RectangularRegion {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        <[f64; 4]>::from(*self).serialize(s)
    }
}

impl<'de> Deserialize<'de> for RectangularRegion {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        <[f64; 4]>::deserialize(d).map(RectangularRegion::from)
    }
}
