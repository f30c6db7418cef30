pub mod categories;
pub mod client;
pub mod error;
pub mod geocode;
pub mod search;
pub mod types;

pub use categories::category_for_cuisine;
pub use client::GeoapifyClient;
pub use error::PlacesError;
pub use geocode::ReverseGeocode;
pub use search::{search_restaurants, SearchParams, MAX_PROVIDER_LIMIT};
