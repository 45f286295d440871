//! HTTP handler for the crop insights endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::parse_coordinate;

use crate::error::AppResult;
use crate::services::InsightsResponse;
use crate::AppState;

/// Query parameters for insights.
///
/// Kept as raw strings so that malformed numbers map to `invalid_lat_lon`
/// rather than axum's generic query rejection.
#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Weather summary, soil pH and crop recommendations for a coordinate
pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> AppResult<Json<InsightsResponse>> {
    let coordinate = parse_coordinate(query.lat.as_deref(), query.lon.as_deref())?;
    let insights = state.insights.insights(coordinate).await;
    Ok(Json(insights))
}
