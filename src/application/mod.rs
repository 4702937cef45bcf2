//! Application layer: Use cases and services.
//!
//! Orchestrates domain types with the model ports.

mod inference;
mod report;

pub use inference::InferenceService;
pub use report::{Headline, ResultReport};
