//! HTTP handlers

pub mod health;
pub mod insights;
pub mod pages;

pub use health::health_check;
pub use insights::get_insights;
pub use pages::{config_js, not_found};
