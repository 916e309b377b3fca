//! Client for the Nominatim geocoder: bounded text search, id lookup, and
//! place geocoding for choosing a search origin.

use kafe_core::{AppConfig, LatLng};
use reqwest::{Client, Url};

use crate::client::{build_http_client, decode_each, parse_base_url, read_json};
use crate::error::OsmError;
use crate::identity::StableId;
use crate::types::{NominatimPlace, NominatimReverse};

/// Limit used when geocoding a place name for the location picker.
pub const PLACE_SUGGESTION_LIMIT: u32 = 5;

/// Text search bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Maximum hits per search.
    pub limit: u32,
    /// Half-width of the bounding box around the origin, in degrees.
    pub viewbox_degrees: f64,
    /// Comma-separated `countrycodes` filter. Empty disables it.
    pub country_codes: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 20,
            viewbox_degrees: 0.5,
            country_codes: "id".to_string(),
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            limit: config.search_limit,
            viewbox_degrees: config.search_viewbox_degrees,
            country_codes: config.country_codes.clone(),
        }
    }

    /// `left,top,right,bottom` viewbox string centred on `origin`.
    #[must_use]
    pub fn viewbox(&self, origin: LatLng) -> String {
        let d = self.viewbox_degrees;
        format!(
            "{},{},{},{}",
            origin.lng - d,
            origin.lat - d,
            origin.lng + d,
            origin.lat + d
        )
    }
}

/// A geocoded place offered as a search origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub display_name: String,
    pub location: LatLng,
    /// Settlement name from the address block, when present.
    pub city: Option<String>,
}

impl PlaceCandidate {
    /// Short label: the settlement name, else the first `display_name` segment.
    #[must_use]
    pub fn label(&self) -> &str {
        self.city
            .as_deref()
            .unwrap_or_else(|| first_segment(&self.display_name))
    }
}

pub(crate) fn first_segment(display_name: &str) -> &str {
    display_name.split(',').next().unwrap_or(display_name).trim()
}

pub struct NominatimClient {
    client: Client,
    base_url: Url,
    settings: SearchSettings,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`OsmError::InvalidBaseUrl`] for a malformed base URL or
    /// [`OsmError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        settings: SearchSettings,
    ) -> Result<Self, OsmError> {
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
            settings,
        })
    }

    /// # Errors
    ///
    /// See [`NominatimClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, OsmError> {
        Self::new(
            &config.nominatim_url,
            config.request_timeout_secs,
            &config.user_agent,
            SearchSettings::from_config(config),
        )
    }

    /// Builds `{base}{endpoint}?format=json&...` with percent-encoded params.
    pub(crate) fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(endpoint)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Free-text search strictly bounded to the viewbox around `origin`.
    ///
    /// # Errors
    ///
    /// - [`OsmError::Http`] on network failure.
    /// - [`OsmError::UnexpectedStatus`] on a non-2xx response.
    /// - [`OsmError::Deserialize`] if the body is not a JSON array.
    pub async fn search_cafes(
        &self,
        origin: LatLng,
        keyword: &str,
    ) -> Result<Vec<NominatimPlace>, OsmError> {
        let limit = self.settings.limit.to_string();
        let viewbox = self.settings.viewbox(origin);
        let mut params = vec![
            ("q", keyword),
            ("addressdetails", "1"),
            ("limit", limit.as_str()),
            ("viewbox", viewbox.as_str()),
            ("bounded", "1"),
        ];
        if !self.settings.country_codes.trim().is_empty() {
            params.push(("countrycodes", self.settings.country_codes.as_str()));
        }
        let url = self.build_url("search", &params);
        self.get_places(url, &format!("search(q={keyword})")).await
    }

    /// Looks up one element by stable id, with `extratags`.
    ///
    /// Returns an empty vector when Nominatim knows no such element.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::search_cafes`].
    pub async fn lookup(&self, id: StableId) -> Result<Vec<NominatimPlace>, OsmError> {
        let osm_ids = id.to_string();
        let url = self.build_url(
            "lookup",
            &[
                ("osm_ids", osm_ids.as_str()),
                ("addressdetails", "1"),
                ("extratags", "1"),
            ],
        );
        self.get_places(url, &format!("lookup(osm_ids={osm_ids})"))
            .await
    }

    /// Geocodes a place name (city, district, landmark) into origin
    /// candidates. Unbounded, no country filter.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::search_cafes`].
    pub async fn geocode_place(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<PlaceCandidate>, OsmError> {
        let limit = limit.to_string();
        let url = self.build_url(
            "search",
            &[
                ("q", query),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ],
        );
        let places = self.get_places(url, &format!("geocode(q={query})")).await?;

        Ok(places
            .into_iter()
            .filter_map(|place| {
                let lat = place.lat.trim().parse::<f64>().ok()?;
                let lng = place.lon.trim().parse::<f64>().ok()?;
                let location = LatLng::new(lat, lng);
                if !location.is_valid() {
                    return None;
                }
                let city = place
                    .address
                    .as_ref()
                    .and_then(|a| a.locality())
                    .map(str::to_owned);
                Some(PlaceCandidate {
                    display_name: place.display_name,
                    location,
                    city,
                })
            })
            .collect())
    }

    /// Names the settlement at a coordinate. `None` when Nominatim has no
    /// address there.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::search_cafes`].
    pub async fn reverse(&self, location: LatLng) -> Result<Option<String>, OsmError> {
        let lat = location.lat.to_string();
        let lon = location.lng.to_string();
        let url = self.build_url("reverse", &[("lat", lat.as_str()), ("lon", lon.as_str())]);
        tracing::debug!(%url, "nominatim reverse");
        let response = self.client.get(url).send().await?;
        let body: NominatimReverse = read_json(response, "reverse").await?;

        if let Some(error) = body.error {
            tracing::debug!(error, "nominatim reverse returned no address");
            return Ok(None);
        }
        let from_address = body
            .address
            .as_ref()
            .and_then(|a| a.locality())
            .map(str::to_owned);
        Ok(from_address.or_else(|| {
            body.display_name
                .as_deref()
                .map(first_segment)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        }))
    }

    async fn get_places(&self, url: Url, context: &str) -> Result<Vec<NominatimPlace>, OsmError> {
        tracing::debug!(%url, "querying nominatim");
        let response = self.client.get(url).send().await?;
        let items: Vec<serde_json::Value> = read_json(response, context).await?;
        Ok(decode_each(items, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> NominatimClient {
        NominatimClient::new(base_url, 5, "kafe-test/0.1", SearchSettings::default())
            .expect("client construction should not fail")
    }

    #[test]
    fn viewbox_spans_half_degree_each_way() {
        let settings = SearchSettings::default();
        assert_eq!(settings.viewbox(LatLng::new(-6.0, 106.0)), "105.5,-6.5,106.5,-5.5");
    }

    #[test]
    fn build_url_appends_format_and_params() {
        let client = test_client("https://nominatim.openstreetmap.org");
        let url = client.build_url("lookup", &[("osm_ids", "N123")]);
        assert_eq!(
            url.as_str(),
            "https://nominatim.openstreetmap.org/lookup?format=json&osm_ids=N123"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://nominatim.openstreetmap.org/");
        let url = client.build_url("search", &[("q", "kopi & roti")]);
        assert!(
            url.as_str().contains("q=kopi+%26+roti"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn candidate_label_prefers_city() {
        let candidate = PlaceCandidate {
            display_name: "Bandung, Jawa Barat, Indonesia".to_string(),
            location: LatLng::new(-6.9, 107.6),
            city: None,
        };
        assert_eq!(candidate.label(), "Bandung");

        let candidate = PlaceCandidate {
            city: Some("Kota Bandung".to_string()),
            ..candidate
        };
        assert_eq!(candidate.label(), "Kota Bandung");
    }
}
