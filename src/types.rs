//! Common types used across the crate.

pub use http::StatusCode;
pub use http::Uri;

use serde::{Deserialize, Serialize};

str_enum! {
    /// An indication of a placemark's precision.
    ///
    /// A placemark's [`PlacemarkScope`](crate::PlacemarkScope) indicates a feature's size or
    /// importance, whereas its precision indicates how far the reported location may be from the
    /// actual real-world location.
    #[derive(Clone, Copy, Debug, PartialEq, Hash, Eq)]
    pub enum PlacemarkPrecision {
        /// The placemark represents a specific building with a location on the building's
        /// rooftop or at one of its entrances.
        Building = "rooftop",
        /// The placemark represents a tract or parcel of land with a location at the centroid.
        Parcel = "parcel",
        /// The placemark represents an address that has been interpolated from an address range.
        Interpolated = "interpolated",
        /// The placemark represents a block along a street or an intersection between two or
        /// more streets.
        Intersection = "intersection",
        /// The placemark represents an entire street with a location at its midpoint.
        Street = "street",
    }
}

/// A geographic coordinate in decimal degrees.
///
/// GeoJSON writes positions as `[longitude, latitude]`; use [`Coordinate::from_geojson`] when
/// reading such arrays rather than indexing them by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Reads a GeoJSON position. Returns `None` unless `position` has exactly two elements.
    pub fn from_geojson(position: &[f64]) -> Option<Self> {
        match *position {
            [longitude, latitude] => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Returns the coordinate as a GeoJSON position, `[longitude, latitude]`.
    pub fn to_geojson(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl From<(f64, f64)> for Coordinate {
    /// Creates a `Coordinate` from a `(latitude, longitude)` pair.
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Coordinate::new(latitude, longitude)
    }
}
