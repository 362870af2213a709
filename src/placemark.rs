//! Placemarks

mod address;
mod hierarchy;

pub use self::address::{keys, AddressDictionary, AddressValue, PostalAddress};
pub use self::hierarchy::{
    administrative_region, country, district, neighborhood, place, postal_code,
};

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value as JsonValue;

use crate::error::DecodeError;
use crate::region::RectangularRegion;
use crate::scope::PlacemarkScope;
use crate::types::{Coordinate, PlacemarkPrecision};

/// A `Placemark` associates identifiers, geographic data, and contact information with a
/// particular location.
///
/// Placemarks returned directly by a geocoding request are [`PlacemarkKind::Geocoded`]; the
/// entries of their [`superior_placemarks`](Placemark::superior_placemarks) are
/// [`PlacemarkKind::Qualifying`] placemarks, which lack location information in practice.
///
/// Two placemarks are equal when their identifiers are equal.
#[derive(Clone, Debug)]
pub struct Placemark {
    identifier: String,
    name: String,
    address: Option<String>,
    qualified_name: Option<String>,
    code: Option<String>,
    wikidata: Option<String>,
    location: Option<Coordinate>,
    region: Option<RectangularRegion>,
    superior_placemarks: Option<Vec<Placemark>>,
    properties: Option<Properties>,
    kind: PlacemarkKind,
}

/// Distinguishes top-level results from the entries of their hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacemarkKind {
    /// A result of a geocoding request.
    Geocoded(Geocoded),
    /// An administrative area in a result's hierarchy.
    Qualifying,
}

/// Attributes only carried by geocoding results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geocoded {
    relevance: Option<f64>,
    routable_locations: Option<Vec<Coordinate>>,
}

/// A subset of the `properties` object on a Carmen GeoJSON feature.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct Properties {
    short_code: Option<String>,
    maki: Option<String>,
    #[serde(rename = "tel")]
    phone_number: Option<String>,
    address: Option<String>,
    #[serde(rename = "accuracy")]
    precision: Option<String>,
    category: Option<String>,
    wikidata: Option<String>,
}

/// A Carmen GeoJSON feature as it appears on the wire.
#[derive(serde::Deserialize)]
pub(crate) struct Feature {
    id: Option<String>,
    text: Option<String>,
    address: Option<String>,
    place_name: Option<String>,
    // Decoded entry by entry so that one bad entry does not discard the others.
    context: Option<Vec<JsonValue>>,
    center: Option<Vec<f64>>,
    bbox: Option<Vec<f64>>,
    short_code: Option<String>,
    wikidata: Option<String>,
    properties: Option<Properties>,
    relevance: Option<f64>,
    routable_points: Option<RoutablePoints>,
}

#[derive(serde::Deserialize)]
struct RoutablePoints {
    points: Option<Vec<RoutablePoint>>,
}

#[derive(serde::Deserialize)]
struct RoutablePoint {
    coordinates: Vec<f64>,
}

impl Properties {
    pub fn short_code(&self) -> Option<&str> {
        self.short_code.as_deref()
    }

    /// Name of the [Maki](https://labs.mapbox.com/maki-icons/) icon for the feature.
    pub fn maki(&self) -> Option<&str> {
        self.maki.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// The street address of a point of interest.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// The raw `accuracy` value; see [`Placemark::precision`].
    pub fn precision(&self) -> Option<&str> {
        self.precision.as_deref()
    }

    /// Comma-separated category keywords.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn wikidata(&self) -> Option<&str> {
        self.wikidata.as_deref()
    }
}

impl Geocoded {
    pub fn relevance(&self) -> Option<f64> {
        self.relevance
    }

    pub fn routable_locations(&self) -> Option<&[Coordinate]> {
        self.routable_locations.as_deref()
    }
}

impl Placemark {
    /// Creates a qualifying placemark with the given identifier and name.
    ///
    /// Placemarks are normally obtained by decoding a Geocoding API response; this constructor
    /// exists for building hierarchies by hand.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Result<Self, DecodeError> {
        let identifier = identifier.into();
        PlacemarkScope::from_identifier(&identifier)?;
        Ok(Placemark {
            identifier,
            name: name.into(),
            address: None,
            qualified_name: None,
            code: None,
            wikidata: None,
            location: None,
            region: None,
            superior_placemarks: None,
            properties: None,
            kind: PlacemarkKind::Qualifying,
        })
    }

    /// Decodes a top-level feature.
    pub(crate) fn from_feature(feature: Feature) -> Result<Self, DecodeError> {
        let relevance = feature.relevance;
        let routable_locations = feature
            .routable_points
            .as_ref()
            .and_then(|r| r.points.as_ref())
            .map(|points| {
                points
                    .iter()
                    .filter_map(|p| match *p.coordinates {
                        [longitude, latitude, ..] => Some(Coordinate::new(latitude, longitude)),
                        _ => None,
                    })
                    .collect()
            });
        let kind = PlacemarkKind::Geocoded(Geocoded {
            relevance,
            routable_locations,
        });
        Self::from_feature_as(feature, kind)
    }

    fn from_feature_as(feature: Feature, kind: PlacemarkKind) -> Result<Self, DecodeError> {
        let identifier = feature
            .id
            .ok_or_else(|| DecodeError::MalformedFeature("feature is missing `id`".to_owned()))?;
        let name = feature.text.ok_or_else(|| {
            DecodeError::MalformedFeature(format!("feature `{}` is missing `text`", identifier))
        })?;
        PlacemarkScope::from_identifier(&identifier)?;

        let location = match feature.center {
            Some(center) => Some(Coordinate::from_geojson(&center).ok_or_else(|| {
                DecodeError::MalformedFeature(format!(
                    "feature `{}` has a `center` of {} elements",
                    identifier,
                    center.len(),
                ))
            })?),
            None => None,
        };

        let region = match feature.bbox.as_deref() {
            Some(&[west, south, east, north]) => {
                Some(RectangularRegion::from([west, south, east, north]))
            }
            Some(bbox) => {
                return Err(DecodeError::MalformedFeature(format!(
                    "feature `{}` has a `bbox` of {} elements",
                    identifier,
                    bbox.len(),
                )));
            }
            None => None,
        };

        let properties = &feature.properties;
        let code = feature
            .short_code
            .as_deref()
            .or_else(|| properties.as_ref().and_then(Properties::short_code))
            .map(str::to_uppercase);

        let superior_placemarks = feature.context.map(decode_context);

        Ok(Placemark {
            identifier,
            name,
            address: feature.address,
            qualified_name: feature.place_name,
            code,
            wikidata: feature.wikidata,
            location,
            region,
            superior_placemarks,
            properties: feature.properties,
            kind,
        })
    }

    // Identifying the placemark

    /// A string that uniquely identifies the feature, in the form `<scope>.<id>`.
    ///
    /// The `<id>` part is unique to the feature but may change when the data source is updated.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The common name of the placemark.
    ///
    /// For an address this is only the street name; for any other place it is the name without
    /// any containing administrative areas.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The house number of an address, as reported by the feature.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// The fully qualified name of the placemark, including containing administrative areas.
    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    /// The ISO 3166-1 alpha-2 code of a country or the ISO 3166-2 code of a top-level
    /// subdivision, uppercased.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The placemark's scope, derived from its identifier.
    pub fn scope(&self) -> PlacemarkScope {
        // The identifier was validated when the placemark was created.
        PlacemarkScope::from_identifier(&self.identifier).unwrap_or_else(|_| PlacemarkScope::empty())
    }

    /// The identifier of the placemark's [Wikidata](https://www.wikidata.org/) item, such as
    /// `Q30`.
    pub fn wikidata_item_identifier(&self) -> Option<&str> {
        self.wikidata
            .as_deref()
            .or_else(|| self.properties.as_ref().and_then(Properties::wikidata))
            .filter(|id| id.starts_with('Q'))
    }

    pub fn kind(&self) -> &PlacemarkKind {
        &self.kind
    }

    pub fn is_geocoded(&self) -> bool {
        matches!(self.kind, PlacemarkKind::Geocoded(_))
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    /// Keywords describing the genre of a point of interest.
    pub fn genres(&self) -> Option<Vec<&str>> {
        self.properties
            .as_ref()
            .and_then(Properties::category)
            .map(|category| category.split(", ").collect())
    }

    /// Name of the [Maki](https://labs.mapbox.com/maki-icons/) icon that most precisely
    /// identifies the placemark.
    pub fn image_name(&self) -> Option<&str> {
        self.properties.as_ref().and_then(Properties::maki)
    }

    /// The phone number of the business represented by the placemark.
    pub fn phone_number(&self) -> Option<&str> {
        self.properties.as_ref().and_then(Properties::phone_number)
    }

    // Location

    /// The placemark's geographic center.
    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    /// The geographic extents of the placemark.
    pub fn region(&self) -> Option<&RectangularRegion> {
        self.region.as_ref()
    }

    /// A score from 0 (least relevant) to 0.99 (most relevant) measuring how well the result
    /// matches the query. `None` for qualifying placemarks and unscored results.
    pub fn relevance(&self) -> Option<f64> {
        match self.kind {
            PlacemarkKind::Geocoded(ref g) => g.relevance(),
            PlacemarkKind::Qualifying => None,
        }
    }

    /// Locations suitable as routing waypoints for reaching the placemark.
    ///
    /// Only present when the request asked for them through
    /// [`GeocodeOptions::includes_routable_locations`](crate::GeocodeOptions::includes_routable_locations).
    pub fn routable_locations(&self) -> Option<&[Coordinate]> {
        match self.kind {
            PlacemarkKind::Geocoded(ref g) => g.routable_locations(),
            PlacemarkKind::Qualifying => None,
        }
    }

    /// The placemark's precision, if the API reported a known one.
    pub fn precision(&self) -> Option<PlacemarkPrecision> {
        self.properties
            .as_ref()
            .and_then(Properties::precision)
            .and_then(PlacemarkPrecision::from_name)
    }

    // Containing placemarks

    /// The administrative areas containing this placemark, from the most local to the broadest.
    pub fn superior_placemarks(&self) -> Option<&[Placemark]> {
        self.superior_placemarks.as_deref()
    }

    fn ancestors(&self) -> &[Placemark] {
        self.superior_placemarks().unwrap_or(&[])
    }

    /// The country containing the placemark.
    pub fn country(&self) -> Option<&Placemark> {
        hierarchy::country(self.ancestors())
    }

    /// The postal code area containing the placemark.
    pub fn postal_code(&self) -> Option<&Placemark> {
        hierarchy::postal_code(self.ancestors())
    }

    /// The region, such as a state or province, containing the placemark.
    pub fn administrative_region(&self) -> Option<&Placemark> {
        hierarchy::administrative_region(self.ancestors())
    }

    /// The district containing the placemark.
    pub fn district(&self) -> Option<&Placemark> {
        hierarchy::district(self.ancestors())
    }

    /// The municipality containing the placemark.
    pub fn place(&self) -> Option<&Placemark> {
        hierarchy::place(self.ancestors())
    }

    /// The neighborhood containing the placemark.
    pub fn neighborhood(&self) -> Option<&Placemark> {
        hierarchy::neighborhood(self.ancestors())
    }

    /// The street name of an address.
    pub fn thoroughfare(&self) -> Option<&str> {
        if self.scope() == PlacemarkScope::ADDRESS {
            Some(&self.name)
        } else {
            None
        }
    }

    /// The house number and/or unit number of a business or residence.
    pub fn sub_thoroughfare(&self) -> Option<&str> {
        self.address()
    }
}

fn decode_context(entries: Vec<JsonValue>) -> Vec<Placemark> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let result = serde_json::from_value::<Feature>(entry)
                .map_err(DecodeError::from)
                .and_then(|f| Placemark::from_feature_as(f, PlacemarkKind::Qualifying));
            match result {
                Ok(placemark) => Some(placemark),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed context entry");
                    None
                }
            }
        })
        .collect()
}

impl<'de> Deserialize<'de> for Placemark {
    /// Decodes a Carmen GeoJSON feature as a geocoded placemark.
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let feature = Feature::deserialize(d)?;
        Placemark::from_feature(feature).map_err(D::Error::custom)
    }
}

static_assertions::assert_impl_all!(Placemark: Send, Sync);

impl PartialEq for Placemark {
    fn eq(&self, other: &Placemark) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Placemark {}

impl Hash for Placemark {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl Display for Placemark {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Placemark, DecodeError> {
        let feature: Feature = serde_json::from_str(json)?;
        Placemark::from_feature(feature)
    }

    const WASAGA: &str = r#"{
        "id": "address.3071712398431400",
        "type": "Feature",
        "place_type": ["address"],
        "relevance": 0.39,
        "properties": {},
        "text": "Pennsylvania Ave",
        "place_name": "Pennsylvania Ave, Wasaga Beach, Ontario L9Z 3A8, Canada",
        "center": [-79.9850737, 44.5047077],
        "geometry": {"type": "Point", "coordinates": [-79.9850737, 44.5047077]},
        "routable_points": {"points": [{"coordinates": [138.995284, -34.470403]}]},
        "context": [
            {"id": "place.10113", "text": "Wasaga Beach", "wikidata": "Q3047"},
            {"id": "postcode.11389478101000210", "text": "L9Z 3A8"},
            {"id": "region.3165", "text": "Ontario", "short_code": "ca-on", "wikidata": "Q1904"},
            {"id": "country.3145", "text": "Canada", "short_code": "ca", "wikidata": "Q16"}
        ]
    }"#;

    #[test]
    fn decode_feature() {
        let p = decode(WASAGA).unwrap();

        assert_eq!(p.identifier(), "address.3071712398431400");
        assert_eq!(p.name(), "Pennsylvania Ave");
        assert_eq!(p.to_string(), "Pennsylvania Ave");
        assert_eq!(
            p.qualified_name(),
            Some("Pennsylvania Ave, Wasaga Beach, Ontario L9Z 3A8, Canada"),
        );
        assert_eq!(p.scope(), PlacemarkScope::ADDRESS);
        assert!(p.is_geocoded());
        assert_eq!(p.relevance(), Some(0.39));
        assert_eq!(p.location(), Some(Coordinate::new(44.5047077, -79.9850737)));
        assert_eq!(p.routable_locations(), Some(&[Coordinate::new(-34.470403, 138.995284)][..]));
        assert_eq!(p.region(), None);
        assert_eq!(p.superior_placemarks().map(<[_]>::len), Some(4));
        assert!(p.superior_placemarks().unwrap().iter().all(|s| !s.is_geocoded()));

        assert_eq!(p.country().map(Placemark::name), Some("Canada"));
        assert_eq!(p.country().and_then(Placemark::code), Some("CA"));
        assert_eq!(p.country().and_then(Placemark::wikidata_item_identifier), Some("Q16"));
        assert_eq!(p.postal_code().map(Placemark::name), Some("L9Z 3A8"));
        assert_eq!(p.administrative_region().map(Placemark::name), Some("Ontario"));
        assert_eq!(p.administrative_region().and_then(Placemark::code), Some("CA-ON"));
        assert_eq!(p.district(), None);
        assert_eq!(p.place().map(Placemark::name), Some("Wasaga Beach"));
        assert_eq!(p.neighborhood(), None);
        assert_eq!(p.thoroughfare(), Some("Pennsylvania Ave"));
        assert_eq!(p.sub_thoroughfare(), None);
        assert_eq!(p.precision(), None);
    }

    #[test]
    fn center_is_longitude_first() {
        let p = decode(r#"{"id": "place.1", "text": "Coffeyville", "center": [-95.78558, 37.13284]}"#)
            .unwrap();
        let location = p.location().unwrap();
        assert_eq!(location.longitude, -95.78558);
        assert_eq!(location.latitude, 37.13284);
    }

    #[test]
    fn bbox() {
        let p = decode(
            r#"{"id": "place.1", "text": "Somewhere", "bbox": [-96.0, 38.0, -95.5, 38.5]}"#,
        )
        .unwrap();
        let region = p.region().unwrap();
        assert_eq!(region.south_west(), Coordinate::new(38.0, -96.0));
        assert_eq!(region.north_east(), Coordinate::new(38.5, -95.5));
    }

    #[test]
    fn properties() {
        let p = decode(
            r#"{
                "id": "poi.1",
                "text": "Blue Bottle Coffee",
                "address": "66 Mint St",
                "properties": {
                    "tel": "(510) 653-3394",
                    "maki": "cafe",
                    "category": "coffee, cafe, tea",
                    "address": "66 Mint St",
                    "accuracy": "rooftop",
                    "wikidata": "Q4928726",
                    "landmark": true
                }
            }"#,
        )
        .unwrap();

        assert_eq!(p.scope(), PlacemarkScope::POINT_OF_INTEREST);
        assert_eq!(p.phone_number(), Some("(510) 653-3394"));
        assert_eq!(p.image_name(), Some("cafe"));
        assert_eq!(p.genres(), Some(vec!["coffee", "cafe", "tea"]));
        assert_eq!(p.precision(), Some(PlacemarkPrecision::Building));
        assert_eq!(p.wikidata_item_identifier(), Some("Q4928726"));
        assert_eq!(p.relevance(), None);
        assert_eq!(p.code(), None);
    }

    #[test]
    fn short_code_from_properties() {
        let p = decode(
            r#"{"id": "country.3145", "text": "Canada", "properties": {"short_code": "ca"}}"#,
        )
        .unwrap();
        assert_eq!(p.code(), Some("CA"));

        let p = decode(
            r#"{
                "id": "region.3165",
                "text": "Ontario",
                "short_code": "ca-on",
                "properties": {"short_code": "ca-qc"}
            }"#,
        )
        .unwrap();
        assert_eq!(p.code(), Some("CA-ON"));
    }

    #[test]
    fn unknown_precision_is_absent() {
        let p = decode(r#"{"id": "address.1", "text": "Main St", "properties": {"accuracy": "approximate"}}"#)
            .unwrap();
        assert_eq!(p.precision(), None);
    }

    #[test]
    fn wikidata_requires_q_prefix() {
        let p = decode(r#"{"id": "country.1", "text": "X", "wikidata": "12345"}"#).unwrap();
        assert_eq!(p.wikidata_item_identifier(), None);
    }

    #[test]
    fn malformed() {
        macro_rules! assert_malformed {
            ($json:expr) => {
                match decode($json) {
                    Err(DecodeError::MalformedFeature(_)) => {}
                    r => panic!("{}: {:?}", $json, r),
                }
            };
        }

        assert_malformed!(r#"{"id": "place.1"}"#);
        assert_malformed!(r#"{"text": "Nowhere"}"#);
        assert_malformed!(r#"{"id": "place.1", "text": "Nowhere", "center": [1.0]}"#);
        assert_malformed!(r#"{"id": "place.1", "text": "Nowhere", "center": [1.0, 2.0, 3.0]}"#);
        assert_malformed!(r#"{"id": "place.1", "text": "Nowhere", "bbox": [1.0, 2.0, 3.0]}"#);

        match decode(r#"{"id": "planet.1", "text": "Earth"}"#) {
            Err(DecodeError::UnrecognizedScope(ref id)) if id == "planet.1" => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn malformed_context_entries_are_skipped() {
        let p = decode(
            r#"{
                "id": "place.1",
                "text": "Wasaga Beach",
                "context": [
                    {"id": "region.3165"},
                    {"id": "galaxy.1", "text": "Milky Way"},
                    "not a feature",
                    {"id": "country.3145", "text": "Canada", "short_code": "ca"}
                ]
            }"#,
        )
        .unwrap();

        let names = p
            .superior_placemarks()
            .unwrap()
            .iter()
            .map(Placemark::name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Canada"]);
    }

    #[test]
    fn deserialize_impl() {
        let p: Placemark = serde_json::from_str(WASAGA).unwrap();
        assert_eq!(p, decode(WASAGA).unwrap());
        assert!(serde_json::from_str::<Placemark>(r#"{"id": "place.1"}"#).is_err());
    }

    #[test]
    fn new() {
        let p = Placemark::new("neighborhood.2103290", "Logan Circle").unwrap();
        assert_eq!(p.scope(), PlacemarkScope::NEIGHBORHOOD);
        assert_eq!(p.kind(), &PlacemarkKind::Qualifying);
        assert!(Placemark::new("nowhere", "Nowhere").is_err());
        assert!(Placemark::new("place", "Nowhere").is_err());
    }
}
