//! Lookups over a placemark's containing administrative areas.
//!
//! The `context` of a feature lists its containing areas from the most local to the broadest.
//! A country or postal code is reported by its first occurrence, and the other areas by their
//! last occurrence, which is the broadest one when an area kind nests in itself.

use super::Placemark;
use crate::scope::PlacemarkScope;

fn first(ancestors: &[Placemark], scope: PlacemarkScope) -> Option<&Placemark> {
    ancestors.iter().find(|p| p.scope() == scope)
}

fn last(ancestors: &[Placemark], scope: PlacemarkScope) -> Option<&Placemark> {
    ancestors.iter().rev().find(|p| p.scope() == scope)
}

pub fn country(ancestors: &[Placemark]) -> Option<&Placemark> {
    first(ancestors, PlacemarkScope::COUNTRY)
}

pub fn postal_code(ancestors: &[Placemark]) -> Option<&Placemark> {
    first(ancestors, PlacemarkScope::POSTAL_CODE)
}

pub fn administrative_region(ancestors: &[Placemark]) -> Option<&Placemark> {
    last(ancestors, PlacemarkScope::REGION)
}

pub fn district(ancestors: &[Placemark]) -> Option<&Placemark> {
    last(ancestors, PlacemarkScope::DISTRICT)
}

pub fn place(ancestors: &[Placemark]) -> Option<&Placemark> {
    last(ancestors, PlacemarkScope::PLACE)
}

pub fn neighborhood(ancestors: &[Placemark]) -> Option<&Placemark> {
    last(ancestors, PlacemarkScope::NEIGHBORHOOD)
}
