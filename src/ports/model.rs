//! Model ports: Traits for the pre-fitted scaler and classifier.
//!
//! The application treats both artifacts as opaque pure functions behind
//! these traits, so tests can substitute fixed implementations.

/// Errors raised by a scaler or classifier at inference time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Feature count mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Class probabilities unavailable: {0}")]
    ProbabilityUnavailable(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}

impl ModelError {
    /// Check an input length against the expected feature count.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if the lengths differ.
    pub fn check_shape(expected: usize, got: usize) -> Result<(), Self> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { expected, got })
        }
    }
}

/// Pre-fitted feature scaler (vector -> vector).
pub trait FeatureScaler: Send + Sync {
    /// Number of input features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Scale one raw feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` on a wrong feature count.
    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Pre-trained binary classifier (vector -> label / probability).
pub trait Classifier: Send + Sync {
    /// Number of input features the classifier was trained on.
    fn n_features(&self) -> usize;

    /// Predict the class label (0 or 1) for one scaled vector.
    ///
    /// # Errors
    /// Returns `ModelError` on a wrong feature count or internal failure.
    fn predict(&self, scaled: &[f64]) -> Result<u8, ModelError>;

    /// Probability of the positive class (label 1) for one scaled vector.
    ///
    /// # Errors
    /// Returns `ModelError` on a wrong feature count, or when the model
    /// cannot produce probabilities.
    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError>;
}
