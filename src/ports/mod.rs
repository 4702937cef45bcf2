//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the pre-trained model artifacts.

mod model;

pub use model::{Classifier, FeatureScaler, ModelError};

#[cfg(test)]
pub(crate) mod testing;
