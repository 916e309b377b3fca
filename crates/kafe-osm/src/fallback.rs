//! Built-in sample venues served when proximity search is unavailable.
//!
//! Entries use the reserved `mock-` id prefix, which never collides with a
//! stable OSM identifier.

use kafe_core::{Category, LatLng, OpeningHours, Photo, PriceLevel, Venue};

pub const FALLBACK_PREFIX: &str = "mock-";

#[must_use]
pub fn is_fallback_id(id: &str) -> bool {
    id.starts_with(FALLBACK_PREFIX)
}

fn kopi_senja_utama() -> Venue {
    Venue {
        place_id: "mock-1".to_owned(),
        name: "Kopi Senja Utama".to_owned(),
        rating: 4.8,
        user_ratings_total: 1250,
        address: "Jl. Sudirman No. 45, Jakarta Selatan".to_owned(),
        category: vec![Category::CoffeeShop, Category::Indonesian],
        photos: vec![Photo {
            reference: "mock-photo-1".to_owned(),
            width: 1080,
            height: 720,
            url: Some(
                "https://images.unsplash.com/photo-1509042239860-f550ce710b93?q=80&w=1000&auto=format&fit=crop"
                    .to_owned(),
            ),
        }],
        opening_hours: OpeningHours {
            open_now: true,
            periods: Vec::new(),
            weekday_text: vec![
                "Senin: 07:00 - 22:00".to_owned(),
                "Selasa: 07:00 - 22:00".to_owned(),
            ],
        },
        price_level: PriceLevel::Moderate,
        location: LatLng::new(-6.2088, 106.8456),
        phone_number: Some("021-555-0123".to_owned()),
        website: None,
        is_open_now: Some(true),
    }
}

/// The whole catalog, in display order.
#[must_use]
pub fn catalog() -> Vec<Venue> {
    vec![kopi_senja_utama()]
}

/// The catalog entry with `id`, if any.
#[must_use]
pub fn find(id: &str) -> Option<Venue> {
    if !is_fallback_id(id) {
        return None;
    }
    catalog().into_iter().find(|venue| venue.place_id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entries_use_reserved_prefix() {
        let venues = catalog();
        assert!(!venues.is_empty());
        assert!(venues.iter().all(|v| is_fallback_id(&v.place_id)));
        assert!(venues.iter().all(|v| !v.category.is_empty()));
    }

    #[test]
    fn find_returns_first_entry() {
        let venue = find("mock-1").unwrap();
        assert_eq!(venue.name, "Kopi Senja Utama");
        assert_eq!(venue.user_ratings_total, 1250);
        assert_eq!(venue.phone_number.as_deref(), Some("021-555-0123"));
    }

    #[test]
    fn find_unknown_ids() {
        assert!(find("mock-404").is_none());
        assert!(find("N1").is_none());
    }
}
