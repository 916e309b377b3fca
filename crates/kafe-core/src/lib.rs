pub mod app_config;
pub mod config;
pub mod filters;
pub mod location;
pub mod venue;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{filter_by_category, sort_venues, SearchFilters, SortBy};
pub use location::{
    load_or_default, JsonFileLocationStore, LatLngCity, LocationStore, MemoryLocationStore,
    StoreError,
};
pub use venue::{Category, DayTime, LatLng, OpeningHours, Photo, PriceLevel, TimePeriod, Venue};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
