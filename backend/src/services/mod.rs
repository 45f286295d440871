//! Business logic services for the Crop Advisor service

pub mod insights;

pub use insights::{InsightsResponse, InsightsService};
