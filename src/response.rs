//! Decoding of Geocoding API responses.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::placemark::{Feature, Placemark};

/// The results of a geocoding query.
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeResult {
    /// The attribution that must accompany the results.
    pub attribution: String,
    /// The placemarks matching the query, most relevant first.
    pub placemarks: Vec<Placemark>,
}

/// The results of a batch geocoding request, in the order of the queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGeocodeResult {
    pub attributions: Vec<String>,
    pub placemarks: Vec<Vec<Placemark>>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: Option<String>,
    attribution: Option<String>,
    features: Option<Vec<Feature>>,
    message: Option<String>,
}

impl GeocodeResult {
    fn from_collection(collection: FeatureCollection) -> Result<Self, DecodeError> {
        if let Some(message) = collection.message {
            return Err(DecodeError::Api { message });
        }

        match collection.kind.as_deref() {
            Some("FeatureCollection") => {}
            Some(kind) => {
                return Err(DecodeError::EnvelopeShapeMismatch(format!(
                    "expected a `FeatureCollection`, found `{}`",
                    kind,
                )));
            }
            None => {
                return Err(DecodeError::EnvelopeShapeMismatch(
                    "missing `type`".to_owned(),
                ));
            }
        }

        let attribution = collection.attribution.ok_or_else(|| {
            DecodeError::EnvelopeShapeMismatch("missing `attribution`".to_owned())
        })?;
        let placemarks = collection
            .features
            .unwrap_or_default()
            .into_iter()
            .map(Placemark::from_feature)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(features = placemarks.len(), "decoded feature collection");

        Ok(GeocodeResult {
            attribution,
            placemarks,
        })
    }
}

impl BatchGeocodeResult {
    /// Iterates over the per-query results.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Placemark])> {
        self.attributions
            .iter()
            .map(String::as_str)
            .zip(self.placemarks.iter().map(Vec::as_slice))
    }
}

impl From<Vec<GeocodeResult>> for BatchGeocodeResult {
    fn from(results: Vec<GeocodeResult>) -> Self {
        let (attributions, placemarks) = results
            .into_iter()
            .map(|r| (r.attribution, r.placemarks))
            .unzip();
        BatchGeocodeResult {
            attributions,
            placemarks,
        }
    }
}

fn first_byte(body: &[u8]) -> Option<u8> {
    body.iter().copied().find(|b| !b.is_ascii_whitespace())
}

/// Decodes the response to a single-query request.
pub fn decode_single(body: &[u8]) -> Result<GeocodeResult, DecodeError> {
    if first_byte(body) == Some(b'[') {
        return Err(DecodeError::EnvelopeShapeMismatch(
            "expected a feature collection, found an array".to_owned(),
        ));
    }
    let collection: FeatureCollection = serde_json::from_slice(body)?;
    GeocodeResult::from_collection(collection)
}

/// Decodes the response to a batch request.
///
/// A batch request with a single query is answered with a bare feature collection, which is
/// decoded as a batch of one.
pub fn decode_batch(body: &[u8]) -> Result<BatchGeocodeResult, DecodeError> {
    match first_byte(body) {
        Some(b'[') => {
            let collections: Vec<FeatureCollection> = serde_json::from_slice(body)?;
            let results = collections
                .into_iter()
                .map(GeocodeResult::from_collection)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(results.into())
        }
        Some(b'{') => decode_single(body).map(|r| vec![r].into()),
        _ => Err(DecodeError::EnvelopeShapeMismatch(
            "expected a feature collection or an array of them".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scope::PlacemarkScope;
    use crate::types::Coordinate;

    const COFFEYVILLE: &str = r#"{
        "type": "FeatureCollection",
        "query": ["coffeyville"],
        "features": [
            {
                "id": "place.1",
                "type": "Feature",
                "text": "Coffeyville",
                "place_name": "Coffeyville, Kansas, United States",
                "relevance": 0.99,
                "center": [-95.78558, 37.13284],
                "context": [
                    {"id": "region.1", "text": "Kansas", "short_code": "US-KS"},
                    {"id": "country.1", "text": "United States", "short_code": "us"}
                ]
            }
        ],
        "attribution": "NOTICE: © 2016 Mapbox and its suppliers."
    }"#;

    fn collection(attribution: &str, id: &str) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "attribution": "{}", "features": [{{"id": "{}", "text": "20001"}}]}}"#,
            attribution, id,
        )
    }

    #[test]
    fn single() {
        let result = decode_single(COFFEYVILLE.as_bytes()).unwrap();
        assert_eq!(result.attribution, "NOTICE: © 2016 Mapbox and its suppliers.");
        assert_eq!(result.placemarks.len(), 1);

        let p = &result.placemarks[0];
        assert_eq!(p.scope(), PlacemarkScope::PLACE);
        assert_eq!(p.location(), Some(Coordinate::new(37.13284, -95.78558)));
        assert_eq!(p.administrative_region().and_then(Placemark::code), Some("US-KS"));
        assert_eq!(p.formatted_address_lines(), ["Kansas", "United States"]);
    }

    #[test]
    fn empty() {
        let result = decode_single(
            br#"{"type": "FeatureCollection", "query": [], "features": [], "attribution": "A"}"#,
        )
        .unwrap();
        assert!(result.placemarks.is_empty());
    }

    #[test]
    fn batch() {
        let body = format!(
            "[{}, {}, {}]",
            collection("A", "postcode.1"),
            collection("A", "postcode.2"),
            collection("A", "postcode.3"),
        );
        let result = decode_batch(body.as_bytes()).unwrap();
        assert_eq!(result.attributions, ["A", "A", "A"]);
        assert_eq!(result.placemarks.len(), 3);
        for (i, (attribution, placemarks)) in result.iter().enumerate() {
            assert_eq!(attribution, "A");
            assert_eq!(placemarks.len(), 1);
            assert_eq!(placemarks[0].identifier(), format!("postcode.{}", i + 1));
        }
    }

    #[test]
    fn batch_of_one() {
        let result = decode_batch(COFFEYVILLE.as_bytes()).unwrap();
        assert_eq!(result.attributions.len(), 1);
        assert_eq!(result.placemarks[0][0].name(), "Coffeyville");

        let result = decode_batch(b"  []").unwrap();
        assert_eq!(result, BatchGeocodeResult::default());
    }

    #[test]
    fn shape_mismatch() {
        macro_rules! test {
            ($f:ident($body:expr)) => {
                match $f($body.as_bytes()) {
                    Err(DecodeError::EnvelopeShapeMismatch(_)) => {}
                    r => panic!("{}({:?}): {:?}", stringify!($f), $body, r),
                }
            };
        }

        test!(decode_single("[]"));
        test!(decode_single(r#"{"type": "Feature", "attribution": "A"}"#));
        test!(decode_single(r#"{"features": [], "attribution": "A"}"#));
        test!(decode_single(r#"{"type": "FeatureCollection", "features": []}"#));
        test!(decode_batch("\"FeatureCollection\""));
        test!(decode_batch(""));
    }

    #[test]
    fn api_message() {
        match decode_single(br#"{"message": "Not Found"}"#) {
            Err(DecodeError::Api { ref message }) if message == "Not Found" => {}
            r => panic!("{:?}", r),
        }

        let body = format!(r#"[{}, {{"message": "Batch queries are limited"}}]"#, collection("A", "place.1"));
        match decode_batch(body.as_bytes()) {
            Err(DecodeError::Api { ref message }) if message == "Batch queries are limited" => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn top_level_features_fail_fast() {
        let body = r#"{
            "type": "FeatureCollection",
            "attribution": "A",
            "features": [{"id": "place.1", "text": "Somewhere"}, {"id": "place.2"}]
        }"#;
        match decode_single(body.as_bytes()) {
            Err(DecodeError::MalformedFeature(_)) => {}
            r => panic!("{:?}", r),
        }
    }

    #[test]
    fn invalid_json() {
        match decode_single(b"{\"type\": ") {
            Err(DecodeError::Json(_)) => {}
            r => panic!("{:?}", r),
        }
    }
}
