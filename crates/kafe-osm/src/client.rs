//! Shared HTTP plumbing for the upstream clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::OsmError;

/// Builds the `reqwest::Client` used by both upstream clients.
///
/// # Errors
///
/// Returns [`OsmError::Http`] if the client cannot be constructed.
pub(crate) fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, OsmError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Parses `raw` as an absolute http(s) URL.
pub(crate) fn parse_url(raw: &str) -> Result<Url, OsmError> {
    let url = Url::parse(raw).map_err(|e| OsmError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(OsmError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Parses a base URL and ensures it ends with exactly one slash, so that
/// `join("search")` appends a segment instead of replacing the last one.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, OsmError> {
    parse_url(&format!("{}/", raw.trim_end_matches('/')))
}

/// Checks the status and decodes the body as JSON.
///
/// # Errors
///
/// - [`OsmError::UnexpectedStatus`] for any non-2xx status.
/// - [`OsmError::Http`] if the body cannot be read.
/// - [`OsmError::Deserialize`] if the body is not the expected JSON shape.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, OsmError> {
    let status = response.status();
    if !status.is_success() {
        return Err(OsmError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| OsmError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

/// Decodes each array item independently, skipping the ones that don't fit
/// `T`.
pub(crate) fn decode_each<T: DeserializeOwned>(items: Vec<serde_json::Value>, context: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(context, error = %e, "skipping malformed upstream item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        let url = parse_base_url("https://nominatim.openstreetmap.org").unwrap();
        assert_eq!(url.as_str(), "https://nominatim.openstreetmap.org/");
        let url = parse_base_url("http://localhost:8080/nominatim//").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/nominatim/");
        assert_eq!(
            url.join("search").unwrap().as_str(),
            "http://localhost:8080/nominatim/search"
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            parse_url("ftp://example.com"),
            Err(OsmError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            parse_url("not a url"),
            Err(OsmError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn decode_each_skips_bad_items() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: u64,
        }
        let items = vec![
            serde_json::json!({"id": 1}),
            serde_json::json!({"id": "oops"}),
            serde_json::json!({"id": 3}),
        ];
        let decoded: Vec<Item> = decode_each(items, "test");
        assert_eq!(decoded.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
