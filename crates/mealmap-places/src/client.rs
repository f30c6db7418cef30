//! HTTP client for the Geoapify places and geocoding endpoints.

use std::time::Duration;

use reqwest::Client;

use crate::error::PlacesError;
use crate::types::FeatureCollection;

/// Typed client for Geoapify.
///
/// Handles non-2xx responses as typed errors and attaches the API key and
/// request timeout to every call. One instance is shared across requests;
/// `reqwest::Client` is internally pooled.
#[derive(Clone)]
pub struct GeoapifyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyClient {
    /// Creates a `GeoapifyClient` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// Fetches restaurants inside a circular geofence, biased toward its
    /// center.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::UnexpectedStatus`] — any non-2xx provider status.
    /// - [`PlacesError::Http`] — network or timeout failure.
    /// - [`PlacesError::Deserialize`] — payload is not a feature collection.
    pub async fn fetch_nearby(
        &self,
        category: &str,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
        limit: u32,
    ) -> Result<FeatureCollection, PlacesError> {
        let url = format!("{}/v2/places", self.base_url);
        let filter = format!("circle:{longitude},{latitude},{radius_meters}");
        let bias = format!("proximity:{longitude},{latitude}");
        let limit = limit.to_string();

        tracing::debug!(category, latitude, longitude, radius_meters, "places search request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("categories", category),
                ("filter", filter.as_str()),
                ("bias", bias.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<FeatureCollection>(&body).map_err(|e| PlacesError::Deserialize {
            context: "places feature collection".to_owned(),
            source: e,
        })
    }

    /// Fetches the reverse-geocode feature collection for a coordinate pair.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_nearby`].
    pub async fn fetch_reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<FeatureCollection, PlacesError> {
        let url = format!("{}/v1/geocode/reverse", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<FeatureCollection>(&body).map_err(|e| PlacesError::Deserialize {
            context: "reverse geocode response".to_owned(),
            source: e,
        })
    }
}
