//! Upstream response shapes.
//!
//! ## Overpass (`[out:json]`)
//! `{"elements": [...]}`. Each element carries `type` (`node`, `way`, ...),
//! a numeric `id`, and either its own `lat`/`lon` (nodes) or a computed
//! `center` (ways, when queried with `out center`). `tags` is a flat string
//! map and is absent on the untagged skeleton nodes the recursion step
//! returns.
//!
//! ## Nominatim (`format=json`)
//! `search` and `lookup` both return a JSON array of places. `lat`/`lon` are
//! decimal **strings**. `name` is only present on newer servers, so callers
//! fall back to the first segment of `display_name`. `extratags` appears when
//! requested and may be `null`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level Overpass response. Elements are kept raw so one malformed
/// element cannot fail the whole batch, but a body without an `elements`
/// array (e.g. a bare `remark` on a server-side timeout) fails to decode.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Computed centroid for ways.
    #[serde(default)]
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// One `search` / `lookup` hit.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub osm_type: Option<String>,
    pub osm_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    #[serde(default)]
    pub extratags: Option<BTreeMap<String, String>>,
}

/// The `address` block returned with `addressdetails=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

impl NominatimAddress {
    /// Most specific populated settlement name.
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        [
            &self.city,
            &self.town,
            &self.village,
            &self.county,
            &self.state,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .map(str::trim)
        .find(|v| !v.is_empty())
    }
}

/// `reverse` response: a single object, or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    #[serde(default)]
    pub error: Option<String>,
}
