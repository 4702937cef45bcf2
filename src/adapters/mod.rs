//! Adapters layer: Concrete implementations of ports.
//!
//! - `scaler`: fitted feature scalers (standard, min-max)
//! - `ensemble`: voting ensemble over linear, tree and naive Bayes estimators
//! - `artifacts`: startup loading and checking of both artifacts
//! - `sanitize`: clinical value redaction for logs

pub mod artifacts;
pub mod ensemble;
pub mod sanitize;
pub mod scaler;

pub use artifacts::{ArtifactError, ArtifactLoader, Artifacts};
pub use ensemble::VotingClassifier;
pub use scaler::ScalerArtifact;
