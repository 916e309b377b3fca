use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// A food/beverage venue normalized from one of the upstream OSM services,
/// ready for rendering.
///
/// Field names serialize exactly as the presentation layer reads them
/// (`place_id`, `user_ratings_total`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Stable identifier, e.g. `"N123456"`, `"W789"` or a reserved `"mock-1"`.
    pub place_id: String,
    pub name: String,
    /// Synthetic rating in `3.5..=4.9`, one decimal place.
    pub rating: f64,
    /// Synthetic review count in `10..=499`.
    pub user_ratings_total: u32,
    /// Free-text address. Empty when upstream has no street information.
    pub address: String,
    /// Never empty; the first entry is the primary category.
    pub category: Vec<Category>,
    pub photos: Vec<Photo>,
    pub opening_hours: OpeningHours,
    pub price_level: PriceLevel,
    pub location: LatLng,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open_now: Option<bool>,
}

impl Venue {
    /// Returns the primary category (the first tag).
    #[must_use]
    pub fn primary_category(&self) -> Category {
        self.category.first().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.category.contains(&category)
    }

    /// URL of the first photo that carries one.
    #[must_use]
    pub fn cover_photo_url(&self) -> Option<&str> {
        self.photos.iter().find_map(|p| p.url.as_deref())
    }
}

/// Venue category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    CoffeeShop,
    FamilyRestaurant,
    FastFood,
    Indonesian,
    Western,
    Asian,
    #[serde(rename = "open_24h")]
    Open24h,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::CoffeeShop => "coffee_shop",
            Category::FamilyRestaurant => "family_restaurant",
            Category::FastFood => "fast_food",
            Category::Indonesian => "indonesian",
            Category::Western => "western",
            Category::Asian => "asian",
            Category::Open24h => "open_24h",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "coffee_shop" => Ok(Category::CoffeeShop),
            "family_restaurant" => Ok(Category::FamilyRestaurant),
            "fast_food" => Ok(Category::FastFood),
            "indonesian" => Ok(Category::Indonesian),
            "western" => Ok(Category::Western),
            "asian" => Ok(Category::Asian),
            "open_24h" => Ok(Category::Open24h),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Price bracket, serialized as its integer level (`0..=4`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum PriceLevel {
    Free = 0,
    Inexpensive = 1,
    Moderate = 2,
    Expensive = 3,
    VeryExpensive = 4,
}

impl PriceLevel {
    /// Maps an integer level onto a bracket, saturating at
    /// [`PriceLevel::VeryExpensive`].
    #[must_use]
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => PriceLevel::Free,
            1 => PriceLevel::Inexpensive,
            2 => PriceLevel::Moderate,
            3 => PriceLevel::Expensive,
            _ => PriceLevel::VeryExpensive,
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A photo reference with an optional resolved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub reference: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: bool,
    #[serde(default)]
    pub periods: Vec<TimePeriod>,
    /// Freeform weekday strings, e.g. the raw OSM `opening_hours` value.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// One open/close interval. Day is `0..=6`, time is `HHMM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub open: DayTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<DayTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

/// WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_m(&self, other: &LatLng) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_008.8;
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }

    /// Returns `true` when both components are finite and within WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}
