//! Inference service: runs one prediction over the loaded artifacts.
//!
//! Pipeline for a single Predict action:
//! - Snapshot to model input vector
//! - Scaler transform
//! - Label prediction and positive-class probability
//! - Result assembly

use std::sync::Arc;

use crate::adapters::{Artifacts, ScalerArtifact, VotingClassifier};
use crate::domain::{FeatureVector, PredictionResult};
use crate::ports::{Classifier, FeatureScaler, ModelError};
use crate::Result;

/// Service for running inference on one feature vector at a time.
///
/// Holds the artifacts behind `Arc`; they are never mutated after load.
pub struct InferenceService<S = ScalerArtifact, C = VotingClassifier>
where
    S: FeatureScaler,
    C: Classifier,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
}

impl InferenceService {
    /// Create a service over loaded artifacts.
    #[must_use]
    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self::new(artifacts.scaler, artifacts.classifier)
    }
}

impl<S, C> InferenceService<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Create a new inference service.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self { scaler, classifier }
    }

    /// Run inference on one feature snapshot.
    ///
    /// Either the whole pipeline succeeds or nothing is returned.
    ///
    /// # Errors
    /// Returns `CardioError::Model` if the scaler or classifier fails,
    /// or if the classifier output is not a valid label/probability.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let raw = features.to_array();

        tracing::debug!("Step 1: Scaling {} features...", raw.len());
        let scaled = self.scaler.transform(&raw)?;

        tracing::debug!("Step 2: Predicting label...");
        let label = self.classifier.predict(&scaled)?;

        tracing::debug!("Step 3: Predicting positive-class probability...");
        let probability = self.classifier.predict_proba(&scaled)?;

        let result =
            PredictionResult::new(label, probability).map_err(ModelError::InvalidOutput)?;

        tracing::info!(
            "Inference complete: prediction={}, probability={:.1}%, tier={:?}",
            label,
            probability * 100.0,
            result.advice_tier()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ArtifactLoader;
    use crate::CardioError;
    use crate::application::{Headline, ResultReport};
    use crate::domain::{AdviceTier, Feature, Outcome};
    use crate::ports::testing::{FixedClassifier, IdentityScaler, TwelveFeatureScaler};

    fn mock_service(label: u8, probability: f64) -> InferenceService<IdentityScaler, FixedClassifier> {
        InferenceService::new(
            Arc::new(IdentityScaler),
            Arc::new(FixedClassifier { label, probability }),
        )
    }

    fn bundled_service() -> InferenceService {
        let artifacts = ArtifactLoader::new("models/scaler.json", "models/voting_classifier.json")
            .load()
            .expect("bundled artifacts should load");
        InferenceService::from_artifacts(artifacts)
    }

    fn scenario_inputs() -> FeatureVector {
        FeatureVector {
            age: 45,
            sex: 1,
            chest_pain_type: 0,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: 0,
            resting_ecg: 0,
            max_heart_rate: 150,
            exercise_angina: 0,
            st_depression: 1.0,
            st_slope: 1,
            vessel_count: 0,
            thalassemia: 2,
        }
    }

    #[test]
    fn test_scenario_no_disease() {
        let result = mock_service(0, 0.1)
            .predict(&scenario_inputs())
            .expect("Should predict");
        assert_eq!(result.outcome, Outcome::NoDisease);

        let report = ResultReport::from_prediction(&result);
        assert_eq!(report.headline, Headline::NoDiseaseDetected);
        assert!(report.celebrate);
        assert_eq!(report.tier, AdviceTier::Healthy);
    }

    #[test]
    fn test_scenario_disease_urgent() {
        let result = mock_service(1, 0.85)
            .predict(&scenario_inputs())
            .expect("Should predict");
        assert_eq!(result.outcome, Outcome::Disease);
        assert!((result.probability - 0.85).abs() < f64::EPSILON);

        let report = ResultReport::from_prediction(&result);
        assert_eq!(report.headline, Headline::DiseaseDetected);
        assert!(!report.celebrate);
        assert_eq!(report.tier, AdviceTier::Urgent);
        assert_eq!(report.advice()[0], "Immediate doctor consultation recommended.");
    }

    #[test]
    fn test_boundary_probability_is_moderate() {
        let result = mock_service(1, 0.4)
            .predict(&scenario_inputs())
            .expect("Should predict");
        assert_eq!(result.advice_tier(), AdviceTier::Moderate);
    }

    #[test]
    fn test_shape_mismatch_aborts() {
        let service = InferenceService::new(
            Arc::new(TwelveFeatureScaler),
            Arc::new(FixedClassifier {
                label: 1,
                probability: 0.9,
            }),
        );
        let err = service.predict(&scenario_inputs()).expect_err("must fail");
        assert!(matches!(
            err,
            CardioError::Model(ModelError::ShapeMismatch {
                expected: 12,
                got: 13
            })
        ));
    }

    #[test]
    fn test_invalid_classifier_output_aborts() {
        let err = mock_service(3, 0.5)
            .predict(&scenario_inputs())
            .expect_err("label 3 is not binary");
        assert!(matches!(err, CardioError::Model(ModelError::InvalidOutput(_))));

        let err = mock_service(1, 1.2)
            .predict(&scenario_inputs())
            .expect_err("probability out of range");
        assert!(matches!(err, CardioError::Model(ModelError::InvalidOutput(_))));
    }

    #[test]
    fn test_bundled_model_is_idempotent() {
        let service = bundled_service();
        let first = service.predict(&scenario_inputs()).expect("Should predict");
        let second = service.predict(&scenario_inputs()).expect("Should predict");
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first.probability));
    }

    #[test]
    fn test_bundled_model_label_agrees_with_probability() {
        // Soft voting: label 1 exactly when the averaged probability exceeds 0.5.
        let service = bundled_service();
        let high_risk = FeatureVector {
            age: 67,
            sex: 1,
            chest_pain_type: 0,
            resting_bp: 160,
            cholesterol: 286,
            fasting_blood_sugar: 0,
            resting_ecg: 2,
            max_heart_rate: 108,
            exercise_angina: 1,
            st_depression: 1.5,
            st_slope: 1,
            vessel_count: 3,
            thalassemia: 3,
        };
        for features in [scenario_inputs(), high_risk, FeatureVector::default()] {
            let result = service.predict(&features).expect("Should predict");
            assert_eq!(result.outcome == Outcome::Disease, result.probability > 0.5);
        }
    }

    #[test]
    fn test_every_domain_corner_yields_one_outcome() {
        let service = bundled_service();

        // Each feature at its minimum, default and maximum, one at a time.
        for feature in Feature::ALL {
            let domain = feature.domain();
            for value in [domain.min(), feature.default_value(), domain.max()] {
                let mut values = FeatureVector::default().to_array();
                values[feature.index()] = value;
                let features = FeatureVector::from_array(values);

                let result = service.predict(&features).expect("Should predict");
                assert!(matches!(result.outcome, Outcome::Disease | Outcome::NoDisease));
                assert!((0.0..=1.0).contains(&result.probability));
            }
        }

        // All at minimum and all at maximum.
        let lows = Feature::ALL.map(|f| f.domain().min());
        let highs = Feature::ALL.map(|f| f.domain().max());
        for values in [lows, highs] {
            let result = service
                .predict(&FeatureVector::from_array(values))
                .expect("Should predict");
            assert!((0.0..=1.0).contains(&result.probability));
        }
    }
}
