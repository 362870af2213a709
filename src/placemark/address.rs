//! Postal address derivation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Placemark, Properties};
use crate::scope::PlacemarkScope;
use crate::types::PlacemarkPrecision;

/// Keys of an [`AddressDictionary`].
pub mod keys {
    pub const STREET: &str = "street";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const COUNTRY: &str = "country";
    pub const ISO_COUNTRY_CODE: &str = "ISOCountryCode";
    pub const FORMATTED_ADDRESS_LINES: &str = "formattedAddressLines";
    pub const NAME: &str = "name";
    pub const SUB_ADMINISTRATIVE_AREA: &str = "subAdministrativeArea";
    pub const SUB_LOCALITY: &str = "subLocality";
    pub const SUB_THOROUGHFARE: &str = "subThoroughfare";
    pub const THOROUGHFARE: &str = "thoroughfare";
}

/// A flat map of a placemark's address fields, keyed by the constants in [`keys`].
pub type AddressDictionary = BTreeMap<&'static str, AddressValue>;

/// A value in an [`AddressDictionary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AddressValue {
    Text(String),
    Lines(Vec<String>),
}

impl AddressValue {
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            AddressValue::Text(ref s) => Some(s),
            AddressValue::Lines(_) => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match *self {
            AddressValue::Lines(ref lines) => Some(lines),
            AddressValue::Text(_) => None,
        }
    }
}

/// The postal address of a placemark.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    /// The street address; multiple lines are separated by `'\n'`.
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "ISOCountryCode")]
    pub iso_country_code: Option<String>,
}

impl Placemark {
    fn is_address(&self) -> bool {
        self.scope() == PlacemarkScope::ADDRESS
    }

    /// Whether the qualified name is a comma-free compound string, as in Chinese addresses.
    fn is_compound_qualified_name(&self) -> bool {
        !self.qualified_name().map_or(false, |n| n.contains(", "))
    }

    /// The components of the qualified name, in the order the qualified name writes them.
    ///
    /// Qualified names without a `", "` separator are written broadest first without
    /// delimiters, so the components are rebuilt from the containing placemarks instead,
    /// ending with this placemark's name.
    pub fn qualified_name_components(&self) -> Vec<&str> {
        match self.qualified_name() {
            Some(qualified_name) if qualified_name.contains(", ") => {
                qualified_name.split(", ").collect()
            }
            _ => self
                .ancestors()
                .iter()
                .rev()
                .map(Placemark::name)
                .chain(Some(self.name()))
                .collect(),
        }
    }

    /// The street address of the placemark.
    ///
    /// For an address, the house number is placed before or after the street name according to
    /// how the qualified name writes it.
    pub fn street_address(&self) -> Option<String> {
        if !self.is_address() {
            return self
                .properties
                .as_ref()
                .and_then(Properties::address)
                .or_else(|| self.address())
                .map(str::to_owned);
        }

        let house_number = match self.address() {
            Some(house_number) => house_number,
            None => return Some(self.name.clone()),
        };
        let street_first = format!("{} {}", self.name, house_number);
        if self.qualified_name_components().contains(&&*street_first) {
            Some(street_first)
        } else {
            Some(format!("{} {}", house_number, self.name))
        }
    }

    /// A name suitable for labeling the placemark in a list of results.
    pub fn formatted_name(&self) -> String {
        if !self.is_address() {
            return self.street_address().unwrap_or_else(|| self.name.clone());
        }

        if self.precision() == Some(PlacemarkPrecision::Intersection) {
            return self
                .qualified_name_components()
                .first()
                .map_or_else(|| self.name.clone(), |&c| c.to_owned());
        }

        self.street_address().unwrap_or_else(|| self.name.clone())
    }

    /// The lines of the placemark's address, omitting the placemark's own name unless it is an
    /// address.
    pub fn formatted_address_lines(&self) -> Vec<&str> {
        let mut lines = self.qualified_name_components();
        if !self.is_address() && !self.is_compound_qualified_name() && !lines.is_empty() {
            lines.remove(0);
        }
        lines
    }

    /// The placemark's address fields as a flat map. Absent fields are omitted.
    pub fn address_dictionary(&self) -> AddressDictionary {
        let mut dictionary = AddressDictionary::new();
        let mut insert = |key, value: Option<&str>| {
            if let Some(value) = value {
                dictionary.insert(key, AddressValue::Text(value.to_owned()));
            }
        };

        let street = if self.is_address() {
            Some(self.name.clone())
        } else {
            self.street_address()
        };
        insert(keys::STREET, street.as_deref());
        insert(keys::CITY, self.place().map(Placemark::name));
        insert(keys::STATE, self.administrative_region().map(Placemark::name));
        insert(keys::POSTAL_CODE, self.postal_code().map(Placemark::name));
        insert(keys::COUNTRY, self.country().map(Placemark::name));
        insert(keys::ISO_COUNTRY_CODE, self.country().and_then(Placemark::code));
        insert(keys::NAME, Some(self.name()));
        insert(
            keys::SUB_ADMINISTRATIVE_AREA,
            self.district().or_else(|| self.place()).map(Placemark::name),
        );
        insert(keys::SUB_LOCALITY, self.neighborhood().map(Placemark::name));
        insert(keys::SUB_THOROUGHFARE, self.sub_thoroughfare());
        insert(keys::THOROUGHFARE, self.thoroughfare());

        let lines = self
            .formatted_address_lines()
            .into_iter()
            .map(str::to_owned)
            .collect();
        dictionary.insert(keys::FORMATTED_ADDRESS_LINES, AddressValue::Lines(lines));

        dictionary
    }

    /// The placemark's postal address.
    pub fn postal_address(&self) -> PostalAddress {
        let street = if self.is_address() {
            Some(self.name.clone())
        } else {
            self.address().map(|s| s.replace(", ", "\n"))
        };
        let name = |p: Option<&Placemark>| p.map(|p| p.name.clone());

        PostalAddress {
            street,
            city: name(self.place()),
            state: name(self.administrative_region()),
            postal_code: name(self.postal_code()),
            country: name(self.country()),
            iso_country_code: self.country().and_then(Placemark::code).map(str::to_owned),
        }
    }
}
