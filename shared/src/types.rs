//! Common types used across the service

use serde::{Deserialize, Serialize};

/// Geographic coordinate of a query location (WGS84 degrees)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const LATITUDE_LIMIT: f64 = 90.0;
    pub const LONGITUDE_LIMIT: f64 = 180.0;

    /// Build a coordinate without range checks.
    ///
    /// Request handling goes through [`crate::validation::parse_coordinate`].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}
