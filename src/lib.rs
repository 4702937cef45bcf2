//! # cardiopredict
//!
//! Terminal heart disease risk predictor over a pre-trained voting ensemble.
//!
//! This crate provides:
//! - Loading of a pre-fitted feature scaler and voting classifier
//! - A 13-field clinical input form in the terminal
//! - Tiered preventive-care advice from the predicted probability
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (FeatureVector, PredictionResult, AdviceTier)
//! - `ports`: Scaler and classifier traits
//! - `adapters`: JSON artifacts, ensemble math, log sanitization
//! - `application`: Inference use case and result report
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{AdviceTier, FeatureVector, Outcome, PredictionResult};

/// Result type for cardiopredict operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for cardiopredict
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Failed to load model artifacts: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Inference failed: {0}")]
    Model(#[from] ports::ModelError),
}
