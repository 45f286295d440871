//! Soil models

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// SoilGrids reports pH(H2O) in tenths of a pH unit
pub const PROVIDER_PH_SCALE: f64 = 10.0;

/// Soil reading for a coordinate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SoilResult {
    pub ph: Option<f64>,
    /// True when `ph` is a regional estimate rather than a measurement
    #[serde(default)]
    pub estimated: bool,
    /// Provider payload the value was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl SoilResult {
    /// Measured pH from a provider value in tenths of a unit
    pub fn measured(provider_value: f64, raw: Option<serde_json::Value>) -> Self {
        Self {
            ph: Some(provider_value / PROVIDER_PH_SCALE),
            estimated: false,
            raw,
        }
    }

    /// No pH available
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Regional pH estimate for the coordinate's latitude band
    pub fn estimated_for(coordinate: &Coordinate) -> Self {
        Self {
            ph: Some(estimate_ph_from_latitude(coordinate.latitude)),
            estimated: true,
            raw: None,
        }
    }
}

/// Broad pH estimate by climate band.
///
/// Tropical (<23°) soils lean slightly acidic, temperate (23-40°) neutral,
/// higher latitudes alkaline.
pub fn estimate_ph_from_latitude(latitude: f64) -> f64 {
    let abs_latitude = latitude.abs();
    if abs_latitude < 23.0 {
        6.2
    } else if abs_latitude < 40.0 {
        7.0
    } else {
        7.5
    }
}
