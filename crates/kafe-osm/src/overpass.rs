//! Client for the Overpass interpreter (proximity search).

use kafe_core::{AppConfig, LatLng};
use reqwest::{Client, Url};

use crate::client::{build_http_client, decode_each, parse_url, read_json};
use crate::error::OsmError;
use crate::types::{OverpassElement, OverpassResponse};

/// Server-side evaluation limit embedded in every query, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Builds the query for every node and way tagged `amenity=cafe` within
/// `radius_m` of `origin`.
///
/// `out body center` returns tags plus a centroid for ways; the recursion
/// step adds the ways' member nodes as untagged skeletons.
#[must_use]
pub fn build_cafe_query(origin: LatLng, radius_m: u32) -> String {
    let around = format!("(around:{radius_m},{},{})", origin.lat, origin.lng);
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n\
         (\n  \
           node[\"amenity\"=\"cafe\"]{around};\n  \
           way[\"amenity\"=\"cafe\"]{around};\n\
         );\n\
         out body center;\n\
         >;\n\
         out skel qt;\n"
    )
}

pub struct OverpassClient {
    client: Client,
    endpoint: Url,
}

impl OverpassClient {
    /// Creates a client posting to `endpoint` (the full interpreter URL).
    ///
    /// # Errors
    ///
    /// Returns [`OsmError::InvalidBaseUrl`] for a malformed endpoint or
    /// [`OsmError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, OsmError> {
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            endpoint: parse_url(endpoint)?,
        })
    }

    /// # Errors
    ///
    /// See [`OverpassClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, OsmError> {
        Self::new(
            &config.overpass_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Runs the cafe query and returns every decodable element, tagged or
    /// not. Elements that fail to decode are skipped.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Http`] on network failure.
    /// - [`OsmError::UnexpectedStatus`] on a non-2xx response (Overpass
    ///   answers 429/504 when overloaded).
    /// - [`OsmError::Deserialize`] if the body is not an Overpass JSON document.
    pub async fn fetch_cafes(
        &self,
        origin: LatLng,
        radius_m: u32,
    ) -> Result<Vec<OverpassElement>, OsmError> {
        let query = build_cafe_query(origin, radius_m);
        tracing::debug!(endpoint = %self.endpoint, radius_m, lat = origin.lat, lng = origin.lng, "querying overpass");

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("data", query.as_str())])
            .send()
            .await?;

        let body: OverpassResponse = read_json(response, "overpass cafe query").await?;
        Ok(decode_each(body.elements, "overpass element"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_targets_nodes_and_ways_around_origin() {
        let query = build_cafe_query(LatLng::new(-6.2, 106.8), 5000);
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("node[\"amenity\"=\"cafe\"](around:5000,-6.2,106.8);"));
        assert!(query.contains("way[\"amenity\"=\"cafe\"](around:5000,-6.2,106.8);"));
        assert!(query.contains("out body center;"));
        assert!(query.contains("out skel qt;"));
    }

    #[test]
    fn new_rejects_bad_endpoint() {
        let result = OverpassClient::new("overpass", 5, "kafe-test");
        assert!(matches!(result, Err(OsmError::InvalidBaseUrl { .. })));
    }
}
