use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use mealmap_core::EnrichmentRecord;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Batch requests beyond this are truncated, matching the documented
/// contract of at most 10 names per call.
const MAX_BATCH_SIZE: usize = 10;

fn round_secs(elapsed: std::time::Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
pub(super) struct LookupResponse {
    success: bool,
    data: EnrichmentRecord,
    cache_hit: bool,
    scrape_time_seconds: f64,
}

pub(super) async fn lookup_handler(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(name): Path<String>,
) -> Result<Json<LookupResponse>, ApiError> {
    let name = name.trim().to_owned();
    if name.is_empty() {
        return Err(ApiError::enrichment_validation(
            "restaurant name must not be empty",
        ));
    }

    let outcome = state.enricher.enrich(&name).await;
    tracing::info!(
        request_id = %req_id.0,
        query = %name,
        matched = outcome.record.matched,
        cache_hit = outcome.cache_hit,
        elapsed_ms = outcome.elapsed.as_millis(),
        "enrichment lookup complete"
    );

    Ok(Json(LookupResponse {
        success: true,
        data: outcome.record,
        cache_hit: outcome.cache_hit,
        scrape_time_seconds: round_secs(outcome.elapsed),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchRequest {
    restaurants: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchItem {
    query: String,
    success: bool,
    data: EnrichmentRecord,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchResponse {
    success: bool,
    results: Vec<BatchItem>,
    processed: usize,
    total_time_seconds: f64,
}

pub(super) async fn batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let started = std::time::Instant::now();

    let queries: Vec<String> = request
        .restaurants
        .into_iter()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .take(MAX_BATCH_SIZE)
        .collect();

    let outcomes = state.enricher.enrich_batch(&queries).await;
    let results: Vec<BatchItem> = outcomes
        .into_iter()
        .map(|outcome| BatchItem {
            query: outcome.record.query.clone(),
            success: true,
            data: outcome.record,
        })
        .collect();

    tracing::info!(processed = results.len(), "batch enrichment complete");

    Ok(Json(BatchResponse {
        success: true,
        processed: results.len(),
        results,
        total_time_seconds: round_secs(started.elapsed()),
    }))
}

pub(super) async fn cache_stats_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let stats = state.enricher.cache().stats().await;
    Json(json!({
        "cache_enabled": true,
        "cache_directory": stats.directory.display().to_string(),
        "cached_restaurants": stats.entries,
        "cache_retention_hours": state.enricher.cache().retention_hours(),
    }))
}

pub(super) async fn cache_clear_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.enricher.cache().clear().await {
        Ok(removed) => Ok(Json(json!({
            "success": true,
            "message": format!("cache cleared ({removed} entries removed)"),
        }))),
        Err(e) => {
            tracing::error!(error = %e, "cache clear failed");
            Err(ApiError::internal())
        }
    }
}
