use crate::app_config::{
    AppConfig, Environment, DEFAULT_NOMINATIM_URL, DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT,
};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be a positive number, got {value}")))
        }
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(invalid(var, format!("expected an http(s) URL, got '{raw}'")))
        }
    };

    let env = parse_environment(&or_default("KAFE_ENV", "development"));
    let bind_addr = parse_addr("KAFE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("KAFE_LOG_LEVEL", "info");

    let overpass_url = parse_url("KAFE_OVERPASS_URL", DEFAULT_OVERPASS_URL)?;
    let nominatim_url = parse_url("KAFE_NOMINATIM_URL", DEFAULT_NOMINATIM_URL)?;
    let request_timeout_secs = parse_u64("KAFE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("KAFE_USER_AGENT", DEFAULT_USER_AGENT);

    let country_codes = or_default("KAFE_COUNTRY_CODES", "id");
    let search_limit = parse_u32("KAFE_SEARCH_LIMIT", "20")?;
    let search_viewbox_degrees = parse_f64("KAFE_SEARCH_VIEWBOX_DEGREES", "0.5")?;
    let default_radius_m = parse_u32("KAFE_DEFAULT_RADIUS_M", "5000")?;
    let data_dir = PathBuf::from(or_default("KAFE_DATA_DIR", "./.kafe"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        overpass_url,
        nominatim_url,
        request_timeout_secs,
        user_agent,
        country_codes,
        search_limit,
        search_viewbox_degrees,
        default_radius_m,
        data_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
