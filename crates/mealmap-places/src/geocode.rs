//! Reverse geocoding: a pure pass-through to the provider.

use serde::Serialize;

use crate::client::GeoapifyClient;
use crate::error::PlacesError;

/// Human-readable address for a coordinate pair.
#[derive(Debug, Clone, Serialize)]
pub struct ReverseGeocode {
    pub address: String,
    pub city: Option<String>,
    pub district: Option<String>,
    pub country: Option<String>,
}

/// Resolves a coordinate pair to its formatted address.
///
/// # Errors
///
/// - [`PlacesError::InvalidCoordinates`] — rejected before any provider
///   call.
/// - [`PlacesError::NoResult`] — the provider returned no feature.
/// - any error from [`GeoapifyClient::fetch_reverse_geocode`].
pub async fn reverse_geocode(
    client: &GeoapifyClient,
    latitude: f64,
    longitude: f64,
) -> Result<ReverseGeocode, PlacesError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(PlacesError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }

    let collection = client.fetch_reverse_geocode(latitude, longitude).await?;
    let properties = collection
        .features
        .into_iter()
        .next()
        .map(|f| f.properties)
        .ok_or(PlacesError::NoResult {
            latitude,
            longitude,
        })?;

    Ok(ReverseGeocode {
        address: properties.formatted.unwrap_or_default(),
        city: properties.city,
        district: properties.district.or(properties.suburb),
        country: properties.country,
    })
}
