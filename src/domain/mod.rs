//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no dependency on the UI or on artifact formats.

mod features;
mod prediction;

pub use features::{Feature, FeatureDomain, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use prediction::{AdviceTier, Outcome, PredictionResult};
