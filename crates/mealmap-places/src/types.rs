//! Wire types for the Geoapify places and geocoding APIs.
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! provider payload is ignored during deserialization.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureProperties {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub formatted: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    /// Geoapify reports some Hong Kong districts under `suburb`.
    pub suburb: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    /// Distance from the bias point in meters.
    pub distance: Option<f64>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub contact: Option<Contact>,
    pub datasource: Option<Datasource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Datasource {
    pub raw: Option<RawTags>,
}

/// OSM raw tags Geoapify passes through; used for provider-dependent extras.
#[derive(Debug, Default, Deserialize)]
pub struct RawTags {
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "price:range")]
    pub price_range: Option<String>,
}
