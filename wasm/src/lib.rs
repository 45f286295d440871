//! WebAssembly module for Crop Advisor
//!
//! Provides client-side computation for:
//! - Crop recommendations from the rule table
//! - Weekly weather summaries from raw forecast JSON
//! - Regional soil pH estimates
//! - Coordinate validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Recommend crops for the given weekly conditions.
///
/// Returns a JSON array of `{crop, reason}`. Absent inputs produce the
/// insufficient-data entry, exactly as the server does.
#[wasm_bindgen]
pub fn recommend_crops(
    avg_temp_c: Option<f64>,
    weekly_rain_mm: Option<f64>,
    ph: Option<f64>,
) -> Result<String, JsValue> {
    let summary = WeatherSummary {
        average_temperature_celsius: avg_temp_c,
        total_rainfall_mm: weekly_rain_mm,
    };
    let soil = SoilResult {
        ph,
        ..SoilResult::default()
    };

    serde_json::to_string(&recommend(&summary, &soil))
        .map_err(|e| JsValue::from_str(&format!("Failed to encode recommendations: {}", e)))
}

/// Summarize a forecast given as JSON (`{"shape": "daily_arrays" | "daily_list", ...}`)
#[wasm_bindgen]
pub fn summarize_forecast(forecast_json: &str) -> Result<String, JsValue> {
    let shape: ForecastShape = serde_json::from_str(forecast_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid forecast JSON: {}", e)))?;

    let summary = summarize(&WeatherForecast::measured(shape));
    serde_json::to_string(&summary)
        .map_err(|e| JsValue::from_str(&format!("Failed to encode summary: {}", e)))
}

/// Regional pH estimate for a latitude
#[wasm_bindgen]
pub fn estimate_soil_ph(latitude: f64) -> f64 {
    estimate_ph_from_latitude(latitude)
}

/// Check a coordinate before sending it to the server
#[wasm_bindgen]
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    validate_latitude(latitude).is_ok() && validate_longitude(longitude).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_crops_json() {
        let json = recommend_crops(Some(25.0), Some(20.0), Some(6.5)).unwrap();
        let recs: Vec<Recommendation> = serde_json::from_str(&json).unwrap();
        let crops: Vec<&str> = recs.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(crops, vec!["wheat", "millet"]);
    }

    #[test]
    fn test_recommend_crops_missing_input() {
        let json = recommend_crops(Some(25.0), None, Some(6.5)).unwrap();
        assert!(json.contains("insufficient-data"));
    }

    #[test]
    fn test_summarize_forecast() {
        let json = summarize_forecast(
            r#"{"shape":"daily_arrays","temperature_2m_mean":[20,30],"precipitation_sum":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(json, r#"{"avg_temp_c":25.0,"weekly_rain_mm":3.0}"#);
    }

    #[test]
    fn test_estimate_soil_ph() {
        assert_eq!(estimate_soil_ph(10.0), 6.2);
        assert_eq!(estimate_soil_ph(-35.0), 7.0);
        assert_eq!(estimate_soil_ph(60.0), 7.5);
    }

    #[test]
    fn test_is_valid_coordinate() {
        assert!(is_valid_coordinate(18.79, 98.98));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::NAN));
    }
}
