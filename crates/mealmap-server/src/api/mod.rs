mod enrichment;
mod geocode;
mod search;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mealmap_places::GeoapifyClient;
use mealmap_scraper::Enricher;

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub places: GeoapifyClient,
    pub enricher: Enricher,
    pub scraper_page_timeout_ms: u64,
    pub scraper_max_retries: u32,
}

/// Uniform error envelope.
///
/// The search/geocode endpoints report failures under `error_message`, the
/// enrichment endpoints under `error` — both carried over from the wire
/// contract the mobile client already speaks.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    field: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            field: "error_message",
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            field: "error_message",
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            field: "error_message",
            message: message.into(),
        }
    }

    pub fn enrichment_validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            field: "error",
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            field: "error_message",
            message: "internal server error".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert("success".to_owned(), json!(false));
        body.insert(self.field.to_owned(), json!(self.message));
        (self.status, Json(serde_json::Value::Object(body))).into_response()
    }
}

/// Maps a places-adapter failure onto the client envelope.
///
/// Validation problems keep their descriptive message; upstream failures
/// are collapsed to a generic provider error so nothing internal leaks.
pub(super) fn map_places_error(error: &mealmap_places::PlacesError) -> ApiError {
    use mealmap_places::PlacesError;

    match error {
        e if e.is_validation() => ApiError::validation(e.to_string()),
        PlacesError::NoResult { .. } => ApiError::not_found(error.to_string()),
        PlacesError::UnexpectedStatus { .. } => ApiError::upstream(error.to_string()),
        e => {
            tracing::error!(error = %e, "places provider call failed");
            ApiError::upstream("provider request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

/// A panic anywhere below this layer becomes a generic 500 envelope; no
/// stack trace or internal detail reaches the client.
fn catch_panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    tracing::error!(detail = %detail, "handler panicked");
    ApiError::internal().into_response()
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/restaurants/search",
            post(search::search_restaurants_handler),
        )
        .route("/api/geocode/reverse", get(geocode::reverse_geocode_handler))
        .route(
            "/api/openrice/search/{name}",
            get(enrichment::lookup_handler),
        )
        .route("/api/openrice/batch", post(enrichment::batch_handler))
        .route("/api/cache/stats", get(enrichment::cache_stats_handler))
        .route("/api/cache/clear", delete(enrichment::cache_clear_handler))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(catch_panic_response))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "config": {
            "cache_retention_hours": state.enricher.cache().retention_hours(),
            "page_timeout_ms": state.scraper_page_timeout_ms,
            "max_retries": state.scraper_max_retries,
        }
    }))
}
