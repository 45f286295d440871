//! SoilGrids client for topsoil pH
//!
//! Queries the mean pH(H2O) of the 0-5cm depth band. The response is a deeply
//! nested structure where any level may be missing; every level is optional
//! here and an absent value is reported as [`UpstreamError::MissingField`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::{Coordinate, SoilResult};

use crate::error::UpstreamError;

use super::get_json;

const PH_PROPERTY: &str = "phh2o";
const TOPSOIL_DEPTH: &str = "0-5cm";

/// SoilGrids API client
#[derive(Clone)]
pub struct SoilClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsResponse {
    properties: Option<SoilGridsProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsProperties {
    #[serde(default)]
    layers: Vec<SoilGridsLayer>,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsLayer {
    name: Option<String>,
    #[serde(default)]
    depths: Vec<SoilGridsDepth>,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsDepth {
    values: Option<SoilGridsValues>,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsValues {
    mean: Option<f64>,
}

impl SoilGridsResponse {
    /// Mean of the first depth of the pH layer, in provider units
    fn mean_ph(&self) -> Option<f64> {
        let layers = &self.properties.as_ref()?.layers;
        let layer = layers
            .iter()
            .find(|layer| layer.name.as_deref() == Some(PH_PROPERTY))
            .or_else(|| layers.first())?;
        layer.depths.first()?.values.as_ref()?.mean
    }
}

impl SoilClient {
    /// Create a new SoilClient
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch measured topsoil pH for a coordinate. One request, no retries.
    pub async fn fetch_ph(&self, coordinate: &Coordinate) -> Result<SoilResult, UpstreamError> {
        let query = [
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("property", PH_PROPERTY.to_string()),
            ("depth", TOPSOIL_DEPTH.to_string()),
            ("value", "mean".to_string()),
        ];
        let url = format!("{}/properties/query", self.base_url);

        let raw: serde_json::Value = get_json(&self.client, &url, &query).await?;
        let response = SoilGridsResponse::deserialize(&raw)
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        let mean = response
            .mean_ph()
            .ok_or(UpstreamError::MissingField("properties.layers.depths.values.mean"))?;

        Ok(SoilResult::measured(mean, Some(raw)))
    }
}
