use thiserror::Error;

/// Errors raised by the Overpass and Nominatim clients.
///
/// [`crate::CafeFinder`] never surfaces these to its callers; it logs them and
/// substitutes an empty, fallback or "not found" outcome.
#[derive(Debug, Error)]
pub enum OsmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
