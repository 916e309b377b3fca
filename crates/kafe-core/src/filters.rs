//! Client-side refinement of a fetched venue list.
//!
//! Filtering and sorting never touch the network: they run over whatever
//! [`Venue`]s a single fetch produced.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::venue::{Category, LatLng, PriceLevel, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Highest rating first.
    Rating,
    /// Most reviews first.
    ReviewCount,
    /// Closest to the search origin first.
    Distance,
    /// Cheapest first.
    Price,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" => Ok(SortBy::Rating),
            "review_count" | "reviews" => Ok(SortBy::ReviewCount),
            "distance" => Ok(SortBy::Distance),
            "price" => Ok(SortBy::Price),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Keep venues carrying any of these categories. Empty keeps everything.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Inclusive price bracket bounds.
    #[serde(default)]
    pub price_range: Option<(PriceLevel, PriceLevel)>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
}

impl SearchFilters {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.price_range.is_none()
            && self.min_rating.is_none()
            && !self.open_now
            && self.sort_by.is_none()
    }

    #[must_use]
    pub fn matches(&self, venue: &Venue) -> bool {
        if !self.categories.is_empty() && !self.categories.iter().any(|c| venue.has_category(*c))
        {
            return false;
        }
        if let Some((low, high)) = self.price_range {
            if venue.price_level < low || venue.price_level > high {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if venue.rating < min {
                return false;
            }
        }
        if self.open_now && !venue.is_open_now.unwrap_or(venue.opening_hours.open_now) {
            return false;
        }
        true
    }

    /// Drops non-matching venues and applies the sort order, if any.
    ///
    /// `origin` is only consulted for [`SortBy::Distance`]. Sorting is stable,
    /// so ties keep their fetch order.
    #[must_use]
    pub fn apply(&self, venues: Vec<Venue>, origin: LatLng) -> Vec<Venue> {
        let mut kept: Vec<Venue> = venues.into_iter().filter(|v| self.matches(v)).collect();
        if let Some(sort_by) = self.sort_by {
            sort_venues(&mut kept, sort_by, origin);
        }
        kept
    }
}

pub fn sort_venues(venues: &mut [Venue], sort_by: SortBy, origin: LatLng) {
    match sort_by {
        SortBy::Rating => venues.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortBy::ReviewCount => {
            venues.sort_by(|a, b| b.user_ratings_total.cmp(&a.user_ratings_total));
        }
        SortBy::Distance => venues.sort_by(|a, b| {
            a.location
                .distance_m(&origin)
                .partial_cmp(&b.location.distance_m(&origin))
                .unwrap_or(Ordering::Equal)
        }),
        SortBy::Price => venues.sort_by_key(|v| v.price_level),
    }
}

/// Narrows `venues` to one category, returning the full list unchanged when
/// nothing matches so a category page always has something to show.
#[must_use]
pub fn filter_by_category(venues: Vec<Venue>, category: Category) -> Vec<Venue> {
    if venues.iter().any(|v| v.has_category(category)) {
        venues
            .into_iter()
            .filter(|v| v.has_category(category))
            .collect()
    } else {
        venues
    }
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
