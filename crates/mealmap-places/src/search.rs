//! Restaurant search: validation, provider call, classification, sorting.

use mealmap_core::{classify, Position, RestaurantRecord};

use crate::categories::category_for_cuisine;
use crate::client::GeoapifyClient;
use crate::error::PlacesError;
use crate::types::FeatureProperties;

/// Provider-side cap on results per search.
pub const MAX_PROVIDER_LIMIT: u32 = 50;

/// Name used when the provider reports none.
const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";

/// Validated inputs of one restaurant search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub position: Position,
    pub radius_meters: u32,
    pub limit: u32,
    pub cuisine_filter: String,
}

/// Searches for restaurants near a position, classified and sorted by
/// distance (ascending, ties keep provider order).
///
/// The requested limit is silently clamped to [`MAX_PROVIDER_LIMIT`].
///
/// # Errors
///
/// - [`PlacesError::InvalidCoordinates`] — rejected before any provider
///   call.
/// - any error from [`GeoapifyClient::fetch_nearby`].
pub async fn search_restaurants(
    client: &GeoapifyClient,
    params: &SearchParams,
) -> Result<Vec<RestaurantRecord>, PlacesError> {
    if !params.position.is_valid() {
        return Err(PlacesError::InvalidCoordinates {
            latitude: params.position.latitude,
            longitude: params.position.longitude,
        });
    }

    let category = category_for_cuisine(&params.cuisine_filter);
    let limit = params.limit.min(MAX_PROVIDER_LIMIT);

    let collection = client
        .fetch_nearby(
            category,
            params.position.latitude,
            params.position.longitude,
            params.radius_meters,
            limit,
        )
        .await?;

    let mut features: Vec<FeatureProperties> = collection
        .features
        .into_iter()
        .map(|f| f.properties)
        .collect();

    // Stable sort: ties keep the provider's order.
    features.sort_by(|a, b| clamped_distance(a.distance).total_cmp(&clamped_distance(b.distance)));

    let restaurants = features.into_iter().map(into_record).collect();
    Ok(restaurants)
}

/// Normalizes one provider feature into a [`RestaurantRecord`].
fn into_record(properties: FeatureProperties) -> RestaurantRecord {
    let latitude = properties.lat.unwrap_or(0.0);
    let longitude = properties.lon.unwrap_or(0.0);

    let id = properties
        .place_id
        .clone()
        .unwrap_or_else(|| format!("loc-{latitude:.6}-{longitude:.6}"));

    let name = properties
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_owned());

    let classification = classify(&properties.categories, &name);

    let raw = properties
        .datasource
        .as_ref()
        .and_then(|d| d.raw.as_ref());
    let contact = properties.contact.as_ref();

    let phone = properties
        .phone
        .clone()
        .or_else(|| contact.and_then(|c| c.phone.clone()))
        .or_else(|| raw.and_then(|r| r.phone.clone()));
    let email = contact
        .and_then(|c| c.email.clone())
        .or_else(|| raw.and_then(|r| r.email.clone()));
    let website = properties
        .website
        .clone()
        .or_else(|| raw.and_then(|r| r.website.clone()));
    let price_level = raw.and_then(|r| r.price_range.clone());

    let district = properties
        .district
        .clone()
        .or_else(|| properties.suburb.clone());

    RestaurantRecord {
        id,
        name,
        latitude,
        longitude,
        address_line1: properties.address_line1,
        address_line2: properties.address_line2,
        city: properties.city,
        district,
        postcode: properties.postcode,
        country: properties.country,
        distance_meters: clamped_distance(properties.distance),
        categories: properties.categories,
        cuisine_types: classification.cuisine_types,
        health_score: classification.health_score,
        phone,
        website,
        email,
        price_level,
        rating: None,
        review_count: None,
    }
}

fn clamped_distance(distance: Option<f64>) -> f64 {
    distance.unwrap_or(0.0).max(0.0)
}
