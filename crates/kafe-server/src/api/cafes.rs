use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use kafe_core::{filter_by_category, Category, LatLng, PriceLevel, SearchFilters, SortBy, Venue};
use kafe_osm::NearbyQuery;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) const MIN_RADIUS_M: u32 = 100;
pub(super) const MAX_RADIUS_M: u32 = 50_000;

#[derive(Debug, Deserialize)]
pub(super) struct CafeQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub min_rating: Option<f64>,
    /// Highest price level to keep, `0..=4`.
    pub max_price: Option<u32>,
    pub sort: Option<String>,
    #[serde(default)]
    pub open_now: bool,
}

pub(super) fn normalize_radius(radius: Option<u32>, default_radius_m: u32) -> u32 {
    radius
        .unwrap_or(default_radius_m)
        .clamp(MIN_RADIUS_M, MAX_RADIUS_M)
}

fn bad_request(req_id: &RequestId, message: impl Into<String>) -> ApiError {
    ApiError::new(req_id.0.clone(), "bad_request", message)
}

pub(super) async fn list_cafes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<CafeQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Venue>>>, ApiError> {
    let Query(query) = query.map_err(|e| bad_request(&req_id, e.body_text()))?;

    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(bad_request(&req_id, "lat and lng are required"));
    };
    let origin = LatLng::new(lat, lng);
    if !origin.is_valid() {
        return Err(bad_request(&req_id, "lat/lng out of range"));
    }
    let category = query
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()
        .map_err(|e| bad_request(&req_id, e))?;
    let sort_by = query
        .sort
        .as_deref()
        .map(str::parse::<SortBy>)
        .transpose()
        .map_err(|e| bad_request(&req_id, e))?;

    let price_range = match query.max_price {
        Some(max) if max > 4 => {
            return Err(bad_request(&req_id, "max_price must be between 0 and 4"));
        }
        max => max.map(|max| (PriceLevel::Free, PriceLevel::from_index(max))),
    };

    let mut nearby = NearbyQuery::new(lat, lng)
        .with_radius(normalize_radius(query.radius, state.default_radius_m));
    if let Some(keyword) = query.keyword {
        nearby = nearby.with_keyword(keyword);
    }

    let mut venues = state.finder.fetch_nearby(&nearby).await;
    if let Some(category) = category {
        venues = filter_by_category(venues, category);
    }
    let filters = SearchFilters {
        price_range,
        min_rating: query.min_rating,
        open_now: query.open_now,
        sort_by,
        ..SearchFilters::default()
    };

    Ok(Json(ApiResponse {
        data: filters.apply(venues, origin),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_cafe(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    let venue = state.finder.resolve_detail(&id).await.ok_or_else(|| {
        ApiError::new(req_id.0.clone(), "not_found", format!("venue {id} not found"))
    })?;

    Ok(Json(ApiResponse {
        data: venue,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_radius_applies_default_and_bounds() {
        assert_eq!(normalize_radius(None, 5000), 5000);
        assert_eq!(normalize_radius(Some(10), 5000), MIN_RADIUS_M);
        assert_eq!(normalize_radius(Some(1_000_000), 5000), MAX_RADIUS_M);
        assert_eq!(normalize_radius(Some(750), 5000), 750);
    }
}
