//! Route definitions for the Crop Advisor service

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/insights", get(handlers::get_insights))
}
