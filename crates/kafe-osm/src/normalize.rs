//! Mapping from upstream shapes to [`kafe_core::Venue`].
//!
//! One function per upstream shape. Each returns a typed [`MappingError`]
//! instead of producing a half-filled record; callers log and skip rejects.
//! Synthetic attributes are always keyed by the final stable identifier, so
//! a venue shows the same rating whichever path produced it.

use std::collections::BTreeMap;

use kafe_core::{Category, LatLng, OpeningHours, Venue};
use thiserror::Error;

use crate::identity::{normalize, OsmKind};
use crate::nominatim::first_segment;
use crate::synth::synthesize;
use crate::types::{NominatimPlace, OverpassElement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("{id} has no name")]
    Unnamed { id: String },

    #[error("{id} has no coordinates")]
    MissingCoordinates { id: String },

    #[error("{id} has an invalid coordinate '{value}'")]
    InvalidCoordinate { id: String, value: String },
}

/// Fields that differ between upstream shapes; everything else is derived.
struct VenueParts {
    place_id: String,
    name: String,
    address: String,
    category: Vec<Category>,
    location: LatLng,
    weekday_text: Vec<String>,
    phone_number: Option<String>,
    website: Option<String>,
}

fn assemble(parts: VenueParts) -> Venue {
    let synthetic = synthesize(&parts.place_id);
    Venue {
        rating: synthetic.rating,
        user_ratings_total: synthetic.review_count,
        address: parts.address,
        category: parts.category,
        photos: vec![synthetic.photo()],
        opening_hours: OpeningHours {
            open_now: true,
            periods: Vec::new(),
            weekday_text: parts.weekday_text,
        },
        price_level: synthetic.price_level,
        location: parts.location,
        phone_number: parts.phone_number,
        website: parts.website,
        is_open_now: Some(true),
        place_id: parts.place_id,
        name: parts.name,
    }
}

/// Non-blank tag value, trimmed.
fn tag<'a>(tags: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// `key`, falling back to its `contact:` namespaced form.
fn contact_tag(tags: &BTreeMap<String, String>, key: &str) -> Option<String> {
    tag(tags, key)
        .or_else(|| tag(tags, &format!("contact:{key}")))
        .map(str::to_owned)
}

fn weekday_text(tags: &BTreeMap<String, String>) -> Vec<String> {
    tag(tags, "opening_hours")
        .map(|hours| vec![hours.to_owned()])
        .unwrap_or_default()
}

/// Generic coffee-shop tag plus cuisine-derived extras.
///
/// `cuisine` may hold several `;`-separated values.
#[must_use]
pub fn categories_from_tags(tags: &BTreeMap<String, String>) -> Vec<Category> {
    let mut categories = vec![Category::CoffeeShop];
    let cuisines: Vec<String> = tag(tags, "cuisine")
        .map(|c| c.split(';').map(|v| v.trim().to_ascii_lowercase()).collect())
        .unwrap_or_default();
    if cuisines.iter().any(|c| c == "indonesian") {
        categories.push(Category::Indonesian);
    }
    if cuisines.iter().any(|c| c == "western") {
        categories.push(Category::Western);
    }
    categories
}

/// `"<street> <housenumber>"`, or empty without a street.
#[must_use]
pub fn address_from_tags(tags: &BTreeMap<String, String>) -> String {
    match (tag(tags, "addr:street"), tag(tags, "addr:housenumber")) {
        (Some(street), Some(number)) => format!("{street} {number}"),
        (Some(street), None) => street.to_owned(),
        (None, _) => String::new(),
    }
}

fn checked(id: &str, location: LatLng) -> Result<LatLng, MappingError> {
    if location.is_valid() {
        Ok(location)
    } else {
        Err(MappingError::InvalidCoordinate {
            id: id.to_owned(),
            value: format!("{},{}", location.lat, location.lng),
        })
    }
}

/// Maps one Overpass element.
///
/// # Errors
///
/// - [`MappingError::Unnamed`] when the element has no usable `name` tag.
/// - [`MappingError::MissingCoordinates`] when neither own coordinates nor a
///   centroid are present.
/// - [`MappingError::InvalidCoordinate`] for out-of-range coordinates.
pub fn venue_from_overpass(element: &OverpassElement) -> Result<Venue, MappingError> {
    let place_id = normalize(
        OsmKind::from_type_name(element.kind.as_deref()),
        element.id,
    );

    let Some(name) = tag(&element.tags, "name") else {
        return Err(MappingError::Unnamed { id: place_id });
    };

    let location = match (element.lat, element.lon, element.center) {
        (Some(lat), Some(lon), _) => LatLng::new(lat, lon),
        (_, _, Some(center)) => LatLng::new(center.lat, center.lon),
        _ => return Err(MappingError::MissingCoordinates { id: place_id }),
    };
    let location = checked(&place_id, location)?;

    Ok(assemble(VenueParts {
        name: name.to_owned(),
        address: address_from_tags(&element.tags),
        category: categories_from_tags(&element.tags),
        location,
        weekday_text: weekday_text(&element.tags),
        phone_number: contact_tag(&element.tags, "phone"),
        website: contact_tag(&element.tags, "website"),
        place_id,
    }))
}

/// Maps every named, located element, logging and skipping the rest.
#[must_use]
pub fn venues_from_overpass(elements: &[OverpassElement]) -> Vec<Venue> {
    elements
        .iter()
        .filter_map(|element| match venue_from_overpass(element) {
            Ok(venue) => Some(venue),
            Err(e) => {
                tracing::debug!(error = %e, "dropping overpass element");
                None
            }
        })
        .collect()
}

fn parse_coordinate(id: &str, raw: &str) -> Result<f64, MappingError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MappingError::InvalidCoordinate {
            id: id.to_owned(),
            value: raw.to_owned(),
        })
}

/// Detail tags available for a Nominatim place.
#[derive(Debug, Clone, Copy)]
pub enum Extras<'a> {
    /// Plain search hit; no opening hours or contact details.
    None,
    /// `extratags` from a lookup.
    Tags(&'a BTreeMap<String, String>),
}

/// Maps one Nominatim place.
///
/// # Errors
///
/// - [`MappingError::Unnamed`] when both `name` and `display_name` are blank.
/// - [`MappingError::InvalidCoordinate`] when `lat`/`lon` do not parse or are
///   out of range.
pub fn venue_from_nominatim(
    place: &NominatimPlace,
    extras: Extras<'_>,
) -> Result<Venue, MappingError> {
    let place_id = normalize(
        OsmKind::from_type_name(place.osm_type.as_deref()),
        place.osm_id,
    );

    let name = place
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| first_segment(&place.display_name));
    if name.is_empty() {
        return Err(MappingError::Unnamed { id: place_id });
    }

    let lat = parse_coordinate(&place_id, &place.lat)?;
    let lng = parse_coordinate(&place_id, &place.lon)?;
    let location = checked(&place_id, LatLng::new(lat, lng))?;

    let (weekday_text, phone_number, website) = match extras {
        Extras::Tags(tags) => (
            weekday_text(tags),
            contact_tag(tags, "phone"),
            contact_tag(tags, "website"),
        ),
        Extras::None => (Vec::new(), None, None),
    };

    Ok(assemble(VenueParts {
        name: name.to_owned(),
        address: place.display_name.clone(),
        category: vec![Category::CoffeeShop],
        location,
        weekday_text,
        phone_number,
        website,
        place_id,
    }))
}

/// Maps one text-search hit. Opening hours, phone and website stay empty.
///
/// # Errors
///
/// See [`venue_from_nominatim`].
pub fn venue_from_search_hit(place: &NominatimPlace) -> Result<Venue, MappingError> {
    venue_from_nominatim(place, Extras::None)
}

/// Maps a detail lookup result, reading opening hours, phone and website
/// from `extratags`.
///
/// # Errors
///
/// See [`venue_from_nominatim`].
pub fn venue_from_lookup(place: &NominatimPlace) -> Result<Venue, MappingError> {
    let extras = place.extratags.as_ref().map_or(Extras::None, Extras::Tags);
    venue_from_nominatim(place, extras)
}

/// Maps every usable search hit, logging and skipping the rest.
#[must_use]
pub fn venues_from_search(places: &[NominatimPlace]) -> Vec<Venue> {
    places
        .iter()
        .filter_map(|place| match venue_from_search_hit(place) {
            Ok(venue) => Some(venue),
            Err(e) => {
                tracing::debug!(error = %e, "dropping nominatim hit");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
