use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mealmap_core::{Position, RestaurantRecord};
use mealmap_places::{search_restaurants, SearchParams};

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, AppState};

const DEFAULT_RADIUS_METERS: u32 = 2000;
const DEFAULT_LIMIT: u32 = 30;

fn default_radius() -> u32 {
    DEFAULT_RADIUS_METERS
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_cuisine() -> String {
    "all".to_owned()
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_radius")]
    radius: u32,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default = "default_cuisine")]
    cuisine_filter: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    success: bool,
    user_location: Position,
    search_radius_meters: u32,
    total_results: usize,
    restaurants: Vec<RestaurantRecord>,
    generated_at: DateTime<Utc>,
}

pub(super) async fn search_restaurants_handler(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let params = SearchParams {
        position: Position {
            latitude: request.latitude,
            longitude: request.longitude,
        },
        radius_meters: request.radius,
        limit: request.limit,
        cuisine_filter: request.cuisine_filter,
    };

    let restaurants = search_restaurants(&state.places, &params)
        .await
        .map_err(|e| map_places_error(&e))?;

    tracing::info!(
        request_id = %req_id.0,
        latitude = request.latitude,
        longitude = request.longitude,
        radius = request.radius,
        results = restaurants.len(),
        "restaurant search complete"
    );

    Ok(Json(SearchResponse {
        success: true,
        user_location: params.position,
        search_radius_meters: request.radius,
        total_results: restaurants.len(),
        restaurants,
        generated_at: Utc::now(),
    }))
}
