//! Artifact loader: reads the pre-fitted scaler and classifier at startup.
//!
//! Both artifacts are required. Any failure (missing file, unreadable file,
//! malformed JSON, wrong shape, pinned digest mismatch) is fatal: the caller
//! must not offer predictions without both artifacts.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::adapters::ensemble::{Voting, VotingClassifier};
use crate::adapters::scaler::ScalerArtifact;
use crate::config::AppConfig;
use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, FeatureScaler};

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read artifact {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Incompatible artifact {}: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },

    #[error("SHA-256 mismatch for {}: expected {expected}, got {actual}", path.display())]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// Lowercase hex SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Both loaded artifacts, shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scaler: Arc<ScalerArtifact>,
    pub classifier: Arc<VotingClassifier>,
}

/// Loads and checks artifacts from the configured paths.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    scaler_path: PathBuf,
    classifier_path: PathBuf,
    scaler_sha256: Option<String>,
    classifier_sha256: Option<String>,
}

impl ArtifactLoader {
    /// Create a loader for two artifact paths, without digest pins.
    pub fn new(scaler_path: impl Into<PathBuf>, classifier_path: impl Into<PathBuf>) -> Self {
        Self {
            scaler_path: scaler_path.into(),
            classifier_path: classifier_path.into(),
            scaler_sha256: None,
            classifier_sha256: None,
        }
    }

    /// Create a loader from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scaler_path: config.scaler_path.clone(),
            classifier_path: config.classifier_path.clone(),
            scaler_sha256: config.scaler_sha256.clone(),
            classifier_sha256: config.classifier_sha256.clone(),
        }
    }

    /// Require the scaler and classifier files to hash to the given digests.
    #[must_use]
    pub fn with_digests(mut self, scaler: Option<String>, classifier: Option<String>) -> Self {
        self.scaler_sha256 = scaler;
        self.classifier_sha256 = classifier;
        self
    }

    /// Load both artifacts.
    ///
    /// # Errors
    /// Returns the first `ArtifactError` encountered; nothing is returned
    /// unless both artifacts load and pass their checks.
    pub fn load(&self) -> Result<Artifacts, ArtifactError> {
        let scaler = self.load_scaler()?;
        let classifier = self.load_classifier()?;

        Ok(Artifacts {
            scaler: Arc::new(scaler),
            classifier: Arc::new(classifier),
        })
    }

    /// Load and check the feature scaler.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the file cannot be used.
    pub fn load_scaler(&self) -> Result<ScalerArtifact, ArtifactError> {
        let path = &self.scaler_path;
        let scaler: ScalerArtifact = read_json(path, self.scaler_sha256.as_deref())?;

        let incompatible = |reason: String| ArtifactError::Incompatible {
            path: path.clone(),
            reason,
        };
        scaler.validate().map_err(incompatible)?;
        if scaler.n_features() != FEATURE_COUNT {
            return Err(incompatible(format!(
                "scaler expects {} features, expected {FEATURE_COUNT}",
                scaler.n_features()
            )));
        }
        if let Some(names) = scaler.feature_names() {
            check_feature_names(names).map_err(incompatible)?;
        }

        tracing::info!(
            "Loaded scaler from {:?} (n_features={})",
            path,
            scaler.n_features()
        );
        Ok(scaler)
    }

    /// Load and check the voting classifier.
    ///
    /// # Errors
    /// Returns `ArtifactError` if the file cannot be used.
    pub fn load_classifier(&self) -> Result<VotingClassifier, ArtifactError> {
        let path = &self.classifier_path;
        let classifier: VotingClassifier = read_json(path, self.classifier_sha256.as_deref())?;

        let incompatible = |reason: String| ArtifactError::Incompatible {
            path: path.clone(),
            reason,
        };
        if let Some(n) = classifier.declared_features() {
            if n != FEATURE_COUNT {
                return Err(incompatible(format!(
                    "classifier expects {n} features, expected {FEATURE_COUNT}"
                )));
            }
        }
        classifier.validate(FEATURE_COUNT).map_err(incompatible)?;
        // The result panel needs a probability for every prediction
        if classifier.voting == Voting::Hard {
            return Err(incompatible(
                "hard voting provides no class probabilities; export the ensemble with soft voting"
                    .into(),
            ));
        }
        if classifier.n_features() != FEATURE_COUNT {
            return Err(incompatible(
                "classifier does not declare its feature count (add feature_names or a linear estimator)"
                    .into(),
            ));
        }
        if let Some(names) = &classifier.feature_names {
            check_feature_names(names).map_err(incompatible)?;
        }

        tracing::info!(
            "Loaded voting classifier from {:?} (voting={:?}, estimators={})",
            path,
            classifier.voting,
            classifier.estimators.len()
        );
        Ok(classifier)
    }
}

fn check_feature_names(names: &[String]) -> Result<(), String> {
    if names.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()) {
        Ok(())
    } else {
        Err(format!(
            "feature names {names:?} do not match expected order {FEATURE_NAMES:?}"
        ))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, pinned: Option<&str>) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if let Some(expected) = pinned {
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ArtifactError::DigestMismatch {
                path: path.to_path_buf(),
                expected: expected.trim().to_ascii_lowercase(),
                actual,
            });
        }
    }

    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}
