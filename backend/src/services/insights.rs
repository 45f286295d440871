//! Insights service: weather + soil for a coordinate, summarized and matched
//! against the crop rules.
//!
//! Provider failures are absorbed here and nowhere else. Both fetches run
//! concurrently and each is replaced by its fallback independently, so the
//! summarizer and rule engine always receive complete inputs.

use serde::Serialize;
use shared::{
    recommend, summarize, Coordinate, Recommendation, SoilResult, WeatherForecast, WeatherSummary,
};

use crate::config::SoilFallback;
use crate::error::UpstreamError;
use crate::external::{SoilClient, WeatherClient};

pub const ESTIMATED_PH_NOTE: &str =
    "Soil pH estimated based on regional climate (SoilGrids data unavailable)";

/// Insights service for one request pipeline
#[derive(Clone)]
pub struct InsightsService {
    weather: WeatherClient,
    soil: SoilClient,
    soil_fallback: SoilFallback,
}

/// Soil section of the response
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SoilSummary {
    pub ph: Option<f64>,
}

/// Response payload for `/api/insights`
#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    pub location: Coordinate,
    pub weather: WeatherSummary,
    pub soil: SoilSummary,
    pub recommendations: Vec<Recommendation>,
    /// Present when the soil pH is an estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Data sources that fell back to substitute values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl InsightsService {
    pub fn new(weather: WeatherClient, soil: SoilClient, soil_fallback: SoilFallback) -> Self {
        Self {
            weather,
            soil,
            soil_fallback,
        }
    }

    /// Build the insights payload for a coordinate. Never fails.
    pub async fn insights(&self, coordinate: Coordinate) -> InsightsResponse {
        let (forecast, soil) = tokio::join!(
            self.weather.fetch_forecast(&coordinate),
            self.soil.fetch_ph(&coordinate)
        );

        let mut warnings = Vec::new();

        let forecast = degrade("weather", forecast, &mut warnings, |err| {
            WeatherForecast::fallback(err.to_string())
        });
        let soil = degrade("soil", soil, &mut warnings, |_| match self.soil_fallback {
            SoilFallback::LatitudeEstimate => SoilResult::estimated_for(&coordinate),
            SoilFallback::Unknown => SoilResult::unknown(),
        });

        let summary = summarize(&forecast);
        let recommendations = recommend(&summary, &soil);

        tracing::debug!(
            %coordinate,
            avg_temp_c = ?summary.average_temperature_celsius,
            weekly_rain_mm = ?summary.total_rainfall_mm,
            ph = ?soil.ph,
            recommendations = recommendations.len(),
            "Insights computed"
        );

        InsightsResponse {
            location: coordinate,
            weather: summary,
            soil: SoilSummary { ph: soil.ph },
            recommendations,
            note: soil.estimated.then(|| ESTIMATED_PH_NOTE.to_string()),
            warnings,
        }
    }
}

/// Unwrap a provider result, substituting the fallback on failure
fn degrade<T>(
    source: &'static str,
    result: Result<T, UpstreamError>,
    warnings: &mut Vec<String>,
    fallback: impl FnOnce(&UpstreamError) -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                source,
                timeout = err.is_timeout(),
                "Upstream {} data unavailable, using fallback: {}",
                source,
                err
            );
            warnings.push(format!("{} data unavailable ({}); using fallback", source, err));
            fallback(&err)
        }
    }
}
