//! Validation utilities for request inputs

use thiserror::Error;

use crate::types::Coordinate;

/// Reasons a latitude/longitude pair is rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("{0} is missing")]
    Missing(&'static str),

    #[error("{0} is not a number")]
    NotANumber(&'static str),

    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

impl CoordinateError {
    /// Query parameter the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            CoordinateError::Missing(field)
            | CoordinateError::NotANumber(field)
            | CoordinateError::OutOfRange(field) => field,
        }
    }
}

/// Validate latitude is a finite value within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), CoordinateError> {
    if !latitude.is_finite() {
        return Err(CoordinateError::NotANumber("lat"));
    }
    if latitude.abs() > Coordinate::LATITUDE_LIMIT {
        return Err(CoordinateError::OutOfRange("lat"));
    }
    Ok(())
}

/// Validate longitude is a finite value within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), CoordinateError> {
    if !longitude.is_finite() {
        return Err(CoordinateError::NotANumber("lon"));
    }
    if longitude.abs() > Coordinate::LONGITUDE_LIMIT {
        return Err(CoordinateError::OutOfRange("lon"));
    }
    Ok(())
}

fn parse_component(raw: Option<&str>, name: &'static str) -> Result<f64, CoordinateError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(CoordinateError::Missing(name))?;
    raw.parse::<f64>()
        .map_err(|_| CoordinateError::NotANumber(name))
}

/// Parse raw query parameters into a validated coordinate
pub fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> Result<Coordinate, CoordinateError> {
    let latitude = parse_component(lat, "lat")?;
    let longitude = parse_component(lon, "lon")?;
    validate_latitude(latitude)?;
    validate_longitude(longitude)?;
    Ok(Coordinate::new(latitude, longitude))
}
