//! Error handling for the Crop Advisor service
//!
//! Two families: [`AppError`] is what a request can fail with, and
//! [`UpstreamError`] is why a provider call produced no data. Upstream
//! errors never reach the client; the insights service substitutes fallback
//! data for them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CoordinateError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid latitude/longitude: {0}")]
    InvalidCoordinates(#[from] CoordinateError),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidCoordinates(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "invalid_lat_lon".to_string(),
                    message: format!("Invalid latitude/longitude: {}", err),
                    field: Some(err.field().to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "not_found".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
        };

        tracing::debug!("Request rejected: {:?}", self);

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

/// Why a provider call yielded no usable data
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("unreadable response: {0}")]
    Decode(String),

    #[error("response is missing {0}")]
    MissingField(&'static str),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport(err) if err.is_timeout())
    }
}
