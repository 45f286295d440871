//! Domain models for the Crop Advisor service

mod recommendation;
mod soil;
mod weather;

pub use recommendation::*;
pub use soil::*;
pub use weather::*;
