//! Deterministic placeholder attributes.
//!
//! OSM carries no ratings, review counts, price levels or photos for cafes,
//! so these are derived from the venue's identifier. The derivation is a
//! pure function of the seed string: the same id always yields the same
//! values, with no stored state.

use kafe_core::{Photo, PriceLevel};

/// Candidate cover photos. Order is part of the derivation.
pub const PHOTO_URLS: [&str; 6] = [
    "https://images.unsplash.com/photo-1554118811-1e0d58224f24?q=80&w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1509042239860-f550ce710b93?q=80&w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1521017432531-fbd92d768814?q=80&w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1497935586351-b67a49e012bf?q=80&w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1559925393-8be0ec4767c8?q=80&w=800&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1498804103079-a6351b050096?q=80&w=800&auto=format&fit=crop",
];

/// Reference attached to every synthesized photo.
pub const SYNTHETIC_PHOTO_REFERENCE: &str = "osm-photo";

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticAttributes {
    /// `3.5..=4.9` in steps of 0.1.
    pub rating: f64,
    /// `10..=499`.
    pub review_count: u32,
    /// Only `Free..=Expensive` are produced.
    pub price_level: PriceLevel,
    pub photo_url: &'static str,
}

impl SyntheticAttributes {
    #[must_use]
    pub fn photo(&self) -> Photo {
        Photo {
            reference: SYNTHETIC_PHOTO_REFERENCE.to_string(),
            width: 800,
            height: 600,
            url: Some(self.photo_url.to_string()),
        }
    }
}

/// 31-multiplier string hash over UTF-16 code units with 32-bit signed
/// wraparound, returned as its absolute value.
#[must_use]
pub fn seed_hash(seed: &str) -> u64 {
    let hash = seed
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    i64::from(hash).unsigned_abs()
}

#[must_use]
pub fn synthesize(seed: &str) -> SyntheticAttributes {
    let h = seed_hash(seed);

    // Integer tenths keep the value exact to one decimal.
    #[allow(clippy::cast_precision_loss)]
    let rating = (35 + h % 15) as f64 / 10.0;
    #[allow(clippy::cast_possible_truncation)]
    let review_count = (10 + h % 490) as u32;
    #[allow(clippy::cast_possible_truncation)]
    let price_level = PriceLevel::from_index((h % 4) as u32);
    #[allow(clippy::cast_possible_truncation)]
    let photo_url = PHOTO_URLS[(h % PHOTO_URLS.len() as u64) as usize];

    SyntheticAttributes {
        rating,
        review_count,
        price_level,
        photo_url,
    }
}
