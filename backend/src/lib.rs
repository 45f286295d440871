//! Crop Advisor - Backend
//!
//! Given a coordinate, fetches a short-term forecast and topsoil pH,
//! summarizes the week's weather and recommends crops from a fixed rule
//! table. Serves one JSON endpoint plus the landing page assets.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use crate::config::Config;

use external::{SoilClient, WeatherClient};
use services::InsightsService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub insights: InsightsService,
}

impl AppState {
    /// Build provider clients from configuration
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let timeout = config.upstream.timeout();
        let weather = WeatherClient::new(&config.weather, timeout)?;
        let soil = SoilClient::new(&config.soil.api_endpoint, timeout)?;
        let insights = InsightsService::new(weather, soil, config.soil.fallback);

        Ok(Self {
            config: Arc::new(config),
            insights,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/config.js", get(handlers::config_js))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
