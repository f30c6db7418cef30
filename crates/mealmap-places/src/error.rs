use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("invalid coordinates: latitude {latitude} must be in [-90, 90], longitude {longitude} must be in [-180, 180]")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error: status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no result found for ({latitude}, {longitude})")]
    NoResult { latitude: f64, longitude: f64 },
}

impl PlacesError {
    /// Returns `true` when the error is the caller's fault (rejected before
    /// any provider call) rather than an upstream failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, PlacesError::InvalidCoordinates { .. })
    }
}
