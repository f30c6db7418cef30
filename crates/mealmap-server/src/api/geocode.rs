use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use mealmap_places::geocode::reverse_geocode;

use super::{map_places_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeResponse {
    success: bool,
    address: String,
    details: GeocodeDetails,
}

#[derive(Debug, Serialize)]
pub(super) struct GeocodeDetails {
    city: Option<String>,
    district: Option<String>,
    country: Option<String>,
}

pub(super) async fn reverse_geocode_handler(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let geocoded = reverse_geocode(&state.places, query.lat, query.lon)
        .await
        .map_err(|e| map_places_error(&e))?;

    Ok(Json(GeocodeResponse {
        success: true,
        address: geocoded.address,
        details: GeocodeDetails {
            city: geocoded.city,
            district: geocoded.district,
            country: geocoded.country,
        },
    }))
}
