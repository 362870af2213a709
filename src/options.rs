//! Geocoding request options.

use crate::query_builder::{PathQuery, QueryBuilder};
use crate::region::RectangularRegion;
use crate::scope::PlacemarkScope;
use crate::types::Coordinate;
use crate::util::Join;

const DEFAULT_FORWARD_LIMIT: u32 = 5;
const DEFAULT_REVERSE_LIMIT: u32 = 1;

/// The maximum number of queries in a batch request.
pub const MAXIMUM_BATCH_QUERY_COUNT: usize = 50;

/// Options for a geocoding request.
///
/// # Example
///
/// ```rust
/// use mapbox_geocoder::{GeocodeOptions, PlacemarkScope};
///
/// let mut options = GeocodeOptions::forward("1600 pennsylvania ave");
/// options
///     .allowed_iso_country_codes(vec!["US".to_owned()])
///     .allowed_scopes(PlacemarkScope::ADDRESS | PlacemarkScope::POINT_OF_INTEREST)
///     .maximum_result_count(3);
/// ```
#[derive(Clone, Debug)]
pub struct GeocodeOptions {
    queries: Vec<String>,
    direction: Direction,
    batch: bool,
    allowed_iso_country_codes: Option<Vec<String>>,
    focal_location: Option<Coordinate>,
    allowed_scopes: PlacemarkScope,
    allowed_region: Option<RectangularRegion>,
    maximum_result_count: u32,
    language: Option<String>,
    autocompletes_query: bool,
    includes_routable_locations: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl GeocodeOptions {
    /// Options for finding the locations that match `query`.
    pub fn forward(query: impl Into<String>) -> Self {
        Self::new(vec![query.into()], Direction::Forward, false)
    }

    /// Options for a forward geocoding request with multiple queries.
    ///
    /// Batch requests are only available to accounts with access to the permanent geocoding
    /// endpoint, and are limited to [`MAXIMUM_BATCH_QUERY_COUNT`] queries.
    pub fn forward_batch<I>(queries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let queries = queries.into_iter().map(Into::into).collect();
        Self::new(queries, Direction::Forward, true)
    }

    /// Options for finding the placemarks at `location`.
    pub fn reverse(location: Coordinate) -> Self {
        Self::new(vec![reverse_query(location)], Direction::Reverse, false)
    }

    /// Options for a reverse geocoding request with multiple locations.
    pub fn reverse_batch<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let queries = locations.into_iter().map(reverse_query).collect();
        Self::new(queries, Direction::Reverse, true)
    }

    fn new(queries: Vec<String>, direction: Direction, batch: bool) -> Self {
        debug_assert!(
            !batch || queries.len() <= MAXIMUM_BATCH_QUERY_COUNT,
            "a batch request may have at most {} queries",
            MAXIMUM_BATCH_QUERY_COUNT,
        );
        let maximum_result_count = match direction {
            Direction::Forward => DEFAULT_FORWARD_LIMIT,
            Direction::Reverse => DEFAULT_REVERSE_LIMIT,
        };
        GeocodeOptions {
            queries,
            direction,
            batch,
            allowed_iso_country_codes: None,
            focal_location: None,
            allowed_scopes: PlacemarkScope::ALL,
            allowed_region: None,
            maximum_result_count,
            language: None,
            autocompletes_query: true,
            includes_routable_locations: false,
        }
    }

    /// Limits results to the countries with the given ISO 3166-1 alpha-2 codes.
    pub fn allowed_iso_country_codes(
        &mut self,
        codes: impl Into<Option<Vec<String>>>,
    ) -> &mut Self {
        let codes = codes.into();
        if let Some(ref codes) = codes {
            debug_assert!(
                codes.iter().all(|c| c.len() == 2 && !c.contains('-')),
                "ISO 3166-1 alpha-2 codes expected, found {:?}",
                codes,
            );
        }
        self.allowed_iso_country_codes = codes;
        self
    }

    /// Biases results toward `location`.
    pub fn focal_location(&mut self, location: impl Into<Option<Coordinate>>) -> &mut Self {
        self.focal_location = location.into();
        self
    }

    /// Limits results to the given scopes. Defaults to all scopes.
    pub fn allowed_scopes(&mut self, scopes: PlacemarkScope) -> &mut Self {
        self.allowed_scopes = scopes;
        self
    }

    /// Limits results to those within `region`.
    pub fn allowed_region(&mut self, region: impl Into<Option<RectangularRegion>>) -> &mut Self {
        self.allowed_region = region.into();
        self
    }

    /// The maximum number of results per query. Zero leaves the limit to the API.
    pub fn maximum_result_count(&mut self, count: u32) -> &mut Self {
        self.maximum_result_count = count;
        self
    }

    /// The IETF language tag(s) of the preferred result language, comma-separated.
    pub fn language(&mut self, language: impl Into<Option<String>>) -> &mut Self {
        self.language = language.into();
        self
    }

    /// Whether to include results whose names merely begin with the query. Ignored by reverse
    /// geocoding.
    pub fn autocompletes_query(&mut self, autocompletes: bool) -> &mut Self {
        self.autocompletes_query = autocompletes;
        self
    }

    /// Whether to request [routable locations](crate::Placemark::routable_locations).
    pub fn includes_routable_locations(&mut self, includes: bool) -> &mut Self {
        self.includes_routable_locations = includes;
        self
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn is_batch(&self) -> bool {
        self.batch
    }

    pub fn is_reverse(&self) -> bool {
        self.direction == Direction::Reverse
    }

    /// The API mode the request addresses.
    pub fn mode(&self) -> &'static str {
        if self.batch {
            "mapbox.places-permanent"
        } else {
            "mapbox.places"
        }
    }

    /// Returns the path of the request, relative to the API endpoint.
    pub(crate) fn path(&self) -> String {
        let queries = self.queries.iter().map(|q| PathQuery(q)).collect::<Vec<_>>();
        format!("/geocoding/v5/{}/{}.json", self.mode(), Join(&queries, ";"))
    }

    pub(crate) fn append_params(&self, qb: &mut QueryBuilder) {
        if let Some(ref codes) = self.allowed_iso_country_codes {
            let codes = codes.iter().map(|c| c.to_lowercase()).collect::<Vec<_>>();
            qb.append("country", &codes.join(","));
        }
        if let Some(location) = self.focal_location {
            qb.append_encoded(
                "proximity",
                format_args!("{},{}", location.longitude, location.latitude),
            );
        }
        if !self.allowed_scopes.is_empty() && self.allowed_scopes != PlacemarkScope::ALL {
            qb.append_encoded("types", self.allowed_scopes);
        }
        if let Some(region) = self.allowed_region {
            qb.append_encoded("bbox", region);
        }
        if self.maximum_result_count > 0 {
            qb.append_encoded("limit", self.maximum_result_count);
        }
        if let Some(ref language) = self.language {
            qb.append("language", language);
        }
        if self.direction == Direction::Forward && !self.autocompletes_query {
            qb.append_encoded("autocomplete", "false");
        }
        if self.includes_routable_locations {
            qb.append_encoded("routing", "true");
        }
    }
}

fn reverse_query(location: Coordinate) -> String {
    format!("{:.5},{:.5}", location.longitude, location.latitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(options: &GeocodeOptions) -> String {
        let mut qb = QueryBuilder::new(options.path());
        options.append_params(&mut qb);
        qb.build()
    }

    #[test]
    fn forward() {
        let options = GeocodeOptions::forward("1600 pennsylvania ave");
        assert_eq!(
            query(&options),
            "/geocoding/v5/mapbox.places/1600+pennsylvania+ave.json?limit=5",
        );
        assert!(!options.is_reverse());
    }

    #[test]
    fn forward_with_options() {
        let mut options = GeocodeOptions::forward("Sesame Street");
        options
            .allowed_iso_country_codes(vec!["CA".to_owned(), "us".to_owned()])
            .focal_location(Coordinate::new(45.3, -75.5))
            .allowed_scopes(
                PlacemarkScope::REGION
                    | PlacemarkScope::PLACE
                    | PlacemarkScope::LOCALITY
                    | PlacemarkScope::POINT_OF_INTEREST,
            )
            .allowed_region(RectangularRegion::new(
                Coordinate::new(-85.0, -179.0),
                Coordinate::new(85.0, 179.0),
            ))
            .maximum_result_count(10)
            .language("fr".to_owned())
            .autocompletes_query(false)
            .includes_routable_locations(true);

        assert_eq!(
            query(&options),
            "/geocoding/v5/mapbox.places/Sesame+Street.json\
             ?country=ca,us\
             &proximity=-75.5,45.3\
             &types=region,place,locality,poi\
             &bbox=-179,-85,179,85\
             &limit=10\
             &language=fr\
             &autocomplete=false\
             &routing=true",
        );
    }

    #[test]
    fn reverse() {
        let options = GeocodeOptions::reverse(Coordinate::new(38.897700, -77.036500));
        assert_eq!(options.queries(), ["-77.03650,38.89770"]);
        assert_eq!(
            query(&options),
            "/geocoding/v5/mapbox.places/-77.03650,38.89770.json?limit=1",
        );

        // Autocompletion does not apply to reverse geocoding.
        let mut options = GeocodeOptions::reverse(Coordinate::new(0.0, 0.0));
        options.autocompletes_query(false).maximum_result_count(0);
        assert_eq!(query(&options), "/geocoding/v5/mapbox.places/0.00000,0.00000.json");
    }

    #[test]
    fn batch() {
        let options = GeocodeOptions::forward_batch(vec!["20001"; 3]);
        assert!(options.is_batch());
        assert_eq!(
            query(&options),
            "/geocoding/v5/mapbox.places-permanent/20001;20001;20001.json?limit=5",
        );

        let options = GeocodeOptions::reverse_batch(vec![
            Coordinate::new(38.897700, -77.036500),
            Coordinate::new(40.7, -74.0),
        ]);
        assert_eq!(
            query(&options),
            "/geocoding/v5/mapbox.places-permanent/-77.03650,38.89770;-74.00000,40.70000.json?limit=1",
        );
    }

    #[test]
    fn query_escaping() {
        let options = GeocodeOptions::forward_batch(vec!["AC/DC", "a;b"]);
        assert_eq!(
            options.path(),
            "/geocoding/v5/mapbox.places-permanent/AC%2FDC;a%3Bb.json",
        );
    }
}
