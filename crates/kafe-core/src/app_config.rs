use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Overpass interpreter endpoint (POST).
    pub overpass_url: String,
    /// Nominatim base URL; `search`, `lookup` and `reverse` are appended.
    pub nominatim_url: String,
    pub request_timeout_secs: u64,
    /// Sent on every upstream request, as Nominatim's usage policy requires.
    pub user_agent: String,
    /// Comma-separated ISO 3166-1 codes passed to Nominatim `countrycodes`.
    pub country_codes: String,
    pub search_limit: u32,
    /// Half-width of the text search viewbox around the origin, in degrees.
    pub search_viewbox_degrees: f64,
    pub default_radius_m: u32,
    /// Directory holding the persisted location preference.
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: "id".to_string(),
            search_limit: 20,
            search_viewbox_degrees: 0.5,
            default_radius_m: 5000,
            data_dir: PathBuf::from("./.kafe"),
        }
    }
}

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "kafe/0.1 (cafe-finder)";
