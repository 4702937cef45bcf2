//! Prediction result types.
//!
//! Represents the output of the voting ensemble for one feature vector.

/// Binary class predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Label 0
    NoDisease,
    /// Label 1
    Disease,
}

impl Outcome {
    /// Map a classifier label to an outcome.
    #[must_use]
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::NoDisease),
            1 => Some(Self::Disease),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> u8 {
        match self {
            Self::NoDisease => 0,
            Self::Disease => 1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDisease => write!(f, "NO DISEASE"),
            Self::Disease => write!(f, "DISEASE"),
        }
    }
}

/// Advice block shown under the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceTier {
    /// Negative label, any probability
    Healthy,
    /// Positive label, probability < 0.4
    Mild,
    /// Positive label, 0.4 <= probability < 0.7
    Moderate,
    /// Positive label, probability >= 0.7
    Urgent,
}

impl AdviceTier {
    /// Tier for a positive prediction with the given disease probability.
    #[must_use]
    pub fn for_probability(probability: f64) -> Self {
        if probability < 0.4 {
            Self::Mild
        } else if probability < 0.7 {
            Self::Moderate
        } else {
            Self::Urgent
        }
    }

    /// Advice lines for this tier.
    #[must_use]
    pub fn advice(self) -> &'static [&'static str] {
        match self {
            Self::Healthy => &[
                "Maintain your current healthy lifestyle!",
                "Avoid smoking and limit processed foods.",
            ],
            Self::Mild => &["Focus on a healthy diet rich in vegetables and fruits."],
            Self::Moderate => &[
                "Exercise regularly (at least 150 min per week).",
                "Monitor blood pressure and cholesterol levels.",
            ],
            Self::Urgent => &[
                "Immediate doctor consultation recommended.",
                "Strictly follow prescribed medications.",
                "Reduce workload and prioritize heart health.",
            ],
        }
    }
}

/// Output of one predict action. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// Predicted class
    pub outcome: Outcome,

    /// Probability of the positive (disease) class, 0.0 to 1.0
    pub probability: f64,
}

impl PredictionResult {
    /// Build a result from raw classifier output.
    ///
    /// # Errors
    /// Returns error if the label is not 0/1 or the probability is not in [0, 1].
    pub fn new(label: u8, probability: f64) -> Result<Self, String> {
        let outcome =
            Outcome::from_label(label).ok_or_else(|| format!("Unexpected class label {label}"))?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(format!("Probability {probability} outside [0, 1]"));
        }
        Ok(Self {
            outcome,
            probability,
        })
    }

    /// Advice tier for this result.
    #[must_use]
    pub fn advice_tier(&self) -> AdviceTier {
        match self.outcome {
            Outcome::NoDisease => AdviceTier::Healthy,
            Outcome::Disease => AdviceTier::for_probability(self.probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(AdviceTier::for_probability(0.0), AdviceTier::Mild);
        assert_eq!(AdviceTier::for_probability(0.399_999), AdviceTier::Mild);
        assert_eq!(AdviceTier::for_probability(0.4), AdviceTier::Moderate);
        assert_eq!(AdviceTier::for_probability(0.699_999), AdviceTier::Moderate);
        assert_eq!(AdviceTier::for_probability(0.7), AdviceTier::Urgent);
        assert_eq!(AdviceTier::for_probability(1.0), AdviceTier::Urgent);
    }

    #[test]
    fn test_negative_label_always_healthy() {
        for p in [0.0, 0.1, 0.4, 0.55, 0.7, 0.99] {
            let result = PredictionResult::new(0, p).expect("valid");
            assert_eq!(result.advice_tier(), AdviceTier::Healthy);
        }
    }

    #[test]
    fn test_rejects_bad_output() {
        assert!(PredictionResult::new(2, 0.5).is_err());
        assert!(PredictionResult::new(1, 1.5).is_err());
        assert!(PredictionResult::new(1, f64::NAN).is_err());
    }

    #[test]
    fn test_tiers_do_not_share_advice() {
        let healthy = AdviceTier::Healthy.advice();
        for tier in [AdviceTier::Mild, AdviceTier::Moderate, AdviceTier::Urgent] {
            assert!(tier.advice().iter().all(|line| !healthy.contains(line)));
        }
    }
}
