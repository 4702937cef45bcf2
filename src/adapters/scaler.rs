//! Scaler adapter: pre-fitted feature scalers exported as JSON.
//!
//! Mirrors the fitted attributes of the two common scikit-learn scalers:
//! - `standard`: `(x - mean_) / scale_`
//! - `min_max`: `x * scale_ + min_`

use serde::{Deserialize, Serialize};

use crate::ports::{FeatureScaler, ModelError};

/// Fitted scaler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        /// Absent when fitted with `with_mean=False`.
        #[serde(default)]
        mean: Option<Vec<f64>>,
        /// Absent when fitted with `with_std=False`.
        #[serde(default)]
        scale: Option<Vec<f64>>,
        /// Required when both `mean` and `scale` are absent.
        #[serde(default)]
        n_features_in: Option<usize>,
    },
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl ScalerArtifact {
    /// Standard scaler that leaves every value unchanged.
    #[must_use]
    pub fn identity(n_features: usize) -> Self {
        Self::Standard {
            feature_names: None,
            mean: None,
            scale: None,
            n_features_in: Some(n_features),
        }
    }

    /// Feature names recorded at fit time, if any.
    #[must_use]
    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Standard { feature_names, .. } | Self::MinMax { feature_names, .. } => {
                feature_names.as_deref()
            }
        }
    }

    /// Check internal consistency of the fitted parameters.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.n_features();
        if n == 0 {
            return Err("scaler has no features (set mean, scale or n_features_in)".into());
        }

        let vectors: Vec<(&str, &[f64])> = match self {
            Self::Standard { mean, scale, .. } => [("mean", mean), ("scale", scale)]
                .into_iter()
                .filter_map(|(name, v)| v.as_deref().map(|v| (name, v)))
                .collect(),
            Self::MinMax { min, scale, .. } => vec![("min", min.as_slice()), ("scale", scale.as_slice())],
        };

        for (name, values) in vectors {
            if values.len() != n {
                return Err(format!(
                    "scaler {name} has {} values, expected {n}",
                    values.len()
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("scaler {name} contains non-finite values"));
            }
        }

        if let Some(names) = self.feature_names() {
            if names.len() != n {
                return Err(format!(
                    "scaler lists {} feature names, expected {n}",
                    names.len()
                ));
            }
        }

        Ok(())
    }
}

impl FeatureScaler for ScalerArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::Standard {
                mean,
                scale,
                n_features_in,
                ..
            } => mean
                .as_ref()
                .or(scale.as_ref())
                .map(Vec::len)
                .or(*n_features_in)
                .unwrap_or(0),
            Self::MinMax { min, .. } => min.len(),
        }
    }

    fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_shape(self.n_features(), raw.len())?;

        let scaled = match self {
            Self::Standard { mean, scale, .. } => raw
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    let centered = x - mean.as_ref().map_or(0.0, |m| m[i]);
                    // Zero-variance columns are stored with scale 1 at fit time;
                    // treat an exported 0 the same way.
                    let s = scale.as_ref().map_or(1.0, |s| s[i]);
                    if s.abs() < f64::EPSILON {
                        centered
                    } else {
                        centered / s
                    }
                })
                .collect(),
            Self::MinMax { min, scale, .. } => raw
                .iter()
                .zip(min.iter().zip(scale.iter()))
                .map(|(&x, (&m, &s))| x * s + m)
                .collect(),
        };

        Ok(scaled)
    }
}
