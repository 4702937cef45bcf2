//! Fixed scaler/classifier implementations for unit tests.

use crate::domain::FEATURE_COUNT;
use crate::ports::{Classifier, FeatureScaler, ModelError};

/// Scaler that returns its input unchanged.
pub struct IdentityScaler;

impl FeatureScaler for IdentityScaler {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_shape(FEATURE_COUNT, raw.len())?;
        Ok(raw.to_vec())
    }
}

/// Scaler fitted on one feature fewer than the form produces.
pub struct TwelveFeatureScaler;

impl FeatureScaler for TwelveFeatureScaler {
    fn n_features(&self) -> usize {
        12
    }

    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_shape(12, raw.len())?;
        Ok(raw.to_vec())
    }
}

/// Classifier that always answers with the same label and probability.
pub struct FixedClassifier {
    pub label: u8,
    pub probability: f64,
}

impl Classifier for FixedClassifier {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, scaled: &[f64]) -> Result<u8, ModelError> {
        ModelError::check_shape(FEATURE_COUNT, scaled.len())?;
        Ok(self.label)
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        ModelError::check_shape(FEATURE_COUNT, scaled.len())?;
        Ok(self.probability)
    }
}
