//! Name-based duplicate removal for proximity results.
//!
//! Overpass can return the same cafe as a node and as a building way. Venues
//! are considered duplicates when their names match after trimming and
//! case-folding; the first occurrence wins and input order is kept.

use std::collections::HashSet;

use kafe_core::Venue;

/// Key under which two venues collapse into one.
#[must_use]
pub fn dedup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[must_use]
pub fn dedupe_by_name(venues: Vec<Venue>) -> Vec<Venue> {
    let mut seen = HashSet::new();
    let before = venues.len();
    let kept: Vec<Venue> = venues
        .into_iter()
        .filter(|venue| seen.insert(dedup_key(&venue.name)))
        .collect();
    if kept.len() < before {
        tracing::debug!(dropped = before - kept.len(), "removed duplicate venue names");
    }
    kept
}
