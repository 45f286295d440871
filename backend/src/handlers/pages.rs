//! Browser-facing handlers

use axum::{
    extract::State,
    http::{header, Uri},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::AppState;

/// Client configuration script exposing the map key as `window.CONFIG`
pub async fn config_js(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        render_config_js(&state.config.maps.api_key),
    )
}

/// Render the config script; an empty key still yields a valid script
pub fn render_config_js(api_key: &str) -> String {
    format!(
        "window.CONFIG={{GMAPS_API_KEY:'{}'}};",
        escape_js_string(api_key)
    )
}

/// Escape a value for a single-quoted JavaScript string literal
fn escape_js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '<' => escaped.push_str("\\x3C"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
