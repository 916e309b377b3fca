mod cafes;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use kafe_osm::CafeFinder;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<CafeFinder>,
    /// Radius used when a request omits `radius`.
    pub default_radius_m: u32,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/cafes", get(cafes::list_cafes))
        .route("/api/v1/cafes/{id}", get(cafes::get_cafe))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use kafe_osm::{NominatimClient, OverpassClient, SearchSettings};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Finder pointing at `base`; Overpass lives under `/api/interpreter`.
    fn app_for(base: &str) -> Router {
        let overpass = OverpassClient::new(&format!("{base}/api/interpreter"), 5, "kafe-test/0.1")
            .expect("overpass client");
        let nominatim = NominatimClient::new(base, 5, "kafe-test/0.1", SearchSettings::default())
            .expect("nominatim client");
        build_app(AppState {
            finder: Arc::new(CafeFinder::new(overpass, nominatim)),
            default_radius_m: 5000,
        })
    }

    /// Finder pointing at a closed port; only for routes that must not
    /// reach upstream.
    fn offline_app() -> Router {
        app_for("http://127.0.0.1:9")
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json parse"))
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_returns_ok_envelope() {
        let (status, json) = get_json(offline_app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
        assert!(json["meta"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = offline_app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated request id");
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn cafes_requires_coordinates() {
        let (status, json) = get_json(offline_app(), "/api/v1/cafes?lat=-6.2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn cafes_rejects_malformed_query() {
        let (status, json) = get_json(offline_app(), "/api/v1/cafes?lat=north&lng=106.8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");

        let (status, _) =
            get_json(offline_app(), "/api/v1/cafes?lat=-6.2&lng=106.8&sort=vibes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(offline_app(), "/api/v1/cafes?lat=95&lng=106.8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cafes_lists_proximity_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "elements": [
                    {"type": "node", "id": 1, "lat": -6.2, "lon": 106.8, "tags": {"name": "Kopi Pagi"}},
                    {"type": "node", "id": 2, "lat": -6.2, "lon": 106.8}
                ]
            })))
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server.uri()), "/api/v1/cafes?lat=-6.2&lng=106.8").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["place_id"], "N1");
        assert_eq!(data[0]["name"], "Kopi Pagi");
        assert!(data[0]["user_ratings_total"].is_u64());
    }

    #[tokio::test]
    async fn cafes_serves_fallback_when_overpass_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server.uri()), "/api/v1/cafes?lat=-6.2&lng=106.8").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["place_id"], "mock-1");
    }

    #[tokio::test]
    async fn cafes_max_price_bounds_the_price_level() {
        // Unreachable upstream, so the moderately priced catalog entry is served.
        let (status, json) =
            get_json(offline_app(), "/api/v1/cafes?lat=-6.2&lng=106.8&max_price=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["place_id"], "mock-1");

        let (status, json) =
            get_json(offline_app(), "/api/v1/cafes?lat=-6.2&lng=106.8&max_price=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));

        let (status, json) =
            get_json(offline_app(), "/api/v1/cafes?lat=-6.2&lng=106.8&max_price=9").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn cafes_keyword_search_filters_and_sorts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "kopi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
                {"osm_type": "node", "osm_id": 10, "name": "Kopi Sepuluh", "display_name": "Kopi Sepuluh, Jakarta", "lat": "-6.2", "lon": "106.8"},
                {"osm_type": "node", "osm_id": 11, "name": "Kopi Sebelas", "display_name": "Kopi Sebelas, Jakarta", "lat": "-6.21", "lon": "106.81"}
            ])))
            .mount(&server)
            .await;

        let (status, json) = get_json(
            app_for(&server.uri()),
            "/api/v1/cafes?lat=-6.2&lng=106.8&keyword=kopi&sort=distance",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .filter_map(|v| v["place_id"].as_str())
            .collect();
        assert_eq!(ids, vec!["N10", "N11"]);
    }

    #[tokio::test]
    async fn cafe_detail_serves_catalog_entry() {
        let (status, json) = get_json(offline_app(), "/api/v1/cafes/mock-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Kopi Senja Utama");
        assert_eq!(json["data"]["price_level"], 2);
    }

    #[tokio::test]
    async fn cafe_detail_returns_404_for_unknown_id() {
        let (status, json) = get_json(offline_app(), "/api/v1/cafes/Z999999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }
}
