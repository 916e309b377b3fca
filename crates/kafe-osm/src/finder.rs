//! The cafe-finding facade used by the binaries.
//!
//! Client methods surface [`OsmError`]; the facade's `fetch_nearby` and
//! `resolve_detail` never fail and instead degrade to the fallback catalog,
//! an empty list, or `None`.

use kafe_core::{AppConfig, LatLng, Venue};

use crate::dedup::dedupe_by_name;
use crate::error::OsmError;
use crate::fallback;
use crate::identity::StableId;
use crate::nominatim::NominatimClient;
use crate::normalize::{venue_from_lookup, venues_from_overpass, venues_from_search};
use crate::overpass::OverpassClient;

pub const DEFAULT_RADIUS_M: u32 = 5000;

/// One nearby-cafes request.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: LatLng,
    pub radius_m: u32,
    pub keyword: Option<String>,
}

impl NearbyQuery {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            origin: LatLng::new(lat, lng),
            radius_m: DEFAULT_RADIUS_M,
            keyword: None,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Trimmed keyword, or `None` when absent or blank.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

pub struct CafeFinder {
    overpass: OverpassClient,
    nominatim: NominatimClient,
}

impl CafeFinder {
    #[must_use]
    pub fn new(overpass: OverpassClient, nominatim: NominatimClient) -> Self {
        Self {
            overpass,
            nominatim,
        }
    }

    /// # Errors
    ///
    /// Returns [`OsmError`] if either upstream client cannot be built from
    /// the configured URLs.
    pub fn from_config(config: &AppConfig) -> Result<Self, OsmError> {
        Ok(Self::new(
            OverpassClient::from_config(config)?,
            NominatimClient::from_config(config)?,
        ))
    }

    #[must_use]
    pub fn nominatim(&self) -> &NominatimClient {
        &self.nominatim
    }

    /// Proximity search: every named cafe within `radius_m`, de-duplicated
    /// by name.
    ///
    /// # Errors
    ///
    /// Propagates [`OverpassClient::fetch_cafes`] failures.
    pub async fn nearby_cafes(&self, origin: LatLng, radius_m: u32) -> Result<Vec<Venue>, OsmError> {
        let elements = self.overpass.fetch_cafes(origin, radius_m).await?;
        let venues = dedupe_by_name(venues_from_overpass(&elements));
        tracing::debug!(elements = elements.len(), venues = venues.len(), "proximity search done");
        Ok(venues)
    }

    /// Keyword search bounded around `origin`.
    ///
    /// # Errors
    ///
    /// Propagates [`NominatimClient::search_cafes`] failures.
    pub async fn search_cafes(&self, origin: LatLng, keyword: &str) -> Result<Vec<Venue>, OsmError> {
        let places = self.nominatim.search_cafes(origin, keyword).await?;
        Ok(venues_from_search(&places))
    }

    /// Runs the keyword path when the query has a non-blank keyword and the
    /// proximity path otherwise.
    ///
    /// Proximity failures yield the fallback catalog; keyword failures yield
    /// an empty list.
    pub async fn fetch_nearby(&self, query: &NearbyQuery) -> Vec<Venue> {
        match query.keyword() {
            Some(keyword) => match self.search_cafes(query.origin, keyword).await {
                Ok(venues) => venues,
                Err(e) => {
                    tracing::warn!(error = %e, keyword, "keyword search failed");
                    Vec::new()
                }
            },
            None => match self.nearby_cafes(query.origin, query.radius_m).await {
                Ok(venues) => venues,
                Err(e) => {
                    tracing::warn!(error = %e, "proximity search failed, serving fallback catalog");
                    fallback::catalog()
                }
            },
        }
    }

    /// Looks one venue up by stable id.
    ///
    /// # Errors
    ///
    /// Propagates [`NominatimClient::lookup`] failures. Unmappable results
    /// are `Ok(None)`.
    pub async fn lookup_venue(&self, id: StableId) -> Result<Option<Venue>, OsmError> {
        let places = self.nominatim.lookup(id).await?;
        let Some(place) = places.first() else {
            return Ok(None);
        };
        match venue_from_lookup(place) {
            Ok(venue) => Ok(Some(venue)),
            Err(e) => {
                tracing::debug!(error = %e, "dropping lookup result");
                Ok(None)
            }
        }
    }

    /// Full detail for `id`.
    ///
    /// Fallback ids are served from the catalog. Ids that are not stable OSM
    /// identifiers resolve to `None` without touching the network.
    pub async fn resolve_detail(&self, id: &str) -> Option<Venue> {
        if fallback::is_fallback_id(id) {
            return fallback::find(id);
        }
        let Some(stable) = StableId::parse(id) else {
            tracing::debug!(id, "not a stable osm id");
            return None;
        };
        match self.lookup_venue(stable).await {
            Ok(venue) => venue,
            Err(e) => {
                tracing::warn!(error = %e, id, "detail lookup failed");
                None
            }
        }
    }
}
