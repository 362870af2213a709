//! Placemark scopes

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::DecodeError;

bitflags! {
    /// Each of these flags specifies a kind of administrative area, settlement, or addressable
    /// location.
    ///
    /// Every placemark has a scope, which offers a general indication of how local the feature
    /// it represents is. A set of scopes is also used to limit a geocoding request through the
    /// `types` parameter.
    ///
    /// Every landmark is a point of interest: `POINT_OF_INTEREST` includes the `LANDMARK` bit, so
    /// `POINT_OF_INTEREST.contains(LANDMARK)` holds but not the converse.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PlacemarkScope: u32 {
        /// A country or dependent territory, for example Switzerland or New Caledonia.
        const COUNTRY = 1 << 1;
        /// A top-level administrative region within a country, such as a state or province.
        const REGION = 1 << 2;
        /// A subdivision of a top-level administrative region, used for various
        /// administrative units in China.
        const DISTRICT = 1 << 3;
        /// A region defined by a postal code.
        const POSTAL_CODE = 1 << 4;
        /// A municipality, such as a city or village.
        const PLACE = 1 << 5;
        /// A major subdivision within a municipality.
        const LOCALITY = 1 << 6;
        /// A minor subdivision within a municipality.
        const NEIGHBORHOOD = 1 << 7;
        /// A physical address, such as to a business or residence.
        const ADDRESS = 1 << 8;
        /// A particularly notable or long-lived point of interest, such as a park, museum, or
        /// place of worship.
        const LANDMARK = 1 << 10;
        /// A point of interest, such as a business or store.
        const POINT_OF_INTEREST = (1 << 9) | Self::LANDMARK.bits();
    }
}

/// Scope tokens in the order the API documents them.
const TOKENS: &[(&str, PlacemarkScope)] = &[
    ("country", PlacemarkScope::COUNTRY),
    ("region", PlacemarkScope::REGION),
    ("district", PlacemarkScope::DISTRICT),
    ("postcode", PlacemarkScope::POSTAL_CODE),
    ("place", PlacemarkScope::PLACE),
    ("locality", PlacemarkScope::LOCALITY),
    ("neighborhood", PlacemarkScope::NEIGHBORHOOD),
    ("address", PlacemarkScope::ADDRESS),
    ("poi", PlacemarkScope::POINT_OF_INTEREST),
    ("poi.landmark", PlacemarkScope::LANDMARK),
];

impl PlacemarkScope {
    /// All scopes.
    pub const ALL: PlacemarkScope = PlacemarkScope::all();

    /// Returns the scope named by a single token such as `"postcode"` or `"poi.landmark"`.
    pub fn from_token(token: &str) -> Option<Self> {
        TOKENS
            .iter()
            .find(|&&(name, _)| name == token)
            .map(|&(_, scope)| scope)
    }

    /// Returns the union of the scopes named by `descriptions`, or `None` if any of them is not
    /// a scope token.
    pub fn from_descriptions<'a, I>(descriptions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        descriptions
            .into_iter()
            .try_fold(PlacemarkScope::empty(), |acc, token| {
                Self::from_token(token).map(|scope| acc | scope)
            })
    }

    /// Returns the scope of a feature from its identifier, which takes the form
    /// `<scope>.<id>`.
    ///
    /// The two leading components are tried first so that `poi.landmark.123` resolves to a
    /// landmark rather than to any point of interest.
    pub fn from_identifier(identifier: &str) -> Result<Self, DecodeError> {
        let unrecognized = || DecodeError::UnrecognizedScope(identifier.to_owned());

        let mut components = identifier.splitn(3, '.');
        let first = components.next().unwrap_or_default();
        // The scope prefix is always followed by at least one more component.
        let second = components.next().ok_or_else(unrecognized)?;

        Self::from_token(&format!("{}.{}", first, second))
            .or_else(|| Self::from_token(first))
            .ok_or_else(unrecognized)
    }
}

impl Default for PlacemarkScope {
    fn default() -> Self {
        PlacemarkScope::ALL
    }
}

impl Display for PlacemarkScope {
    /// Writes the comma-separated scope tokens in canonical order, as accepted by the `types`
    /// request parameter.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for &(name, scope) in &TOKENS[..8] {
            if self.contains(scope) {
                write!(f, "{}{}", sep, name)?;
                sep = ",";
            }
        }
        if self.contains(PlacemarkScope::LANDMARK) {
            let name = if self.contains(PlacemarkScope::POINT_OF_INTEREST) {
                "poi"
            } else {
                "poi.landmark"
            };
            write!(f, "{}{}", sep, name)?;
        }
        Ok(())
    }
}

impl FromStr for PlacemarkScope {
    type Err = DecodeError;

    /// Parses a comma-separated list of scope tokens.
    fn from_str(s: &str) -> Result<Self, DecodeError> {
        if s.is_empty() {
            return Ok(PlacemarkScope::empty());
        }
        Self::from_descriptions(s.split(',')).ok_or_else(|| DecodeError::UnrecognizedScope(s.to_owned()))
    }
}
