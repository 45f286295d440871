//! Shared types and models for the Crop Advisor service
//!
//! Everything in this crate is pure: the weather summarizer, the soil
//! latitude estimate and the crop rule table are used by the backend and,
//! through WASM, by the landing page.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
