//! Result report: what the result panel shows for one prediction.
//!
//! Pure function of a `PredictionResult`; the TUI only styles it.

use crate::domain::{AdviceTier, Outcome, PredictionResult};

/// Result headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headline {
    DiseaseDetected,
    NoDiseaseDetected,
}

impl Headline {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::DiseaseDetected => "Heart Disease Detected",
            Self::NoDiseaseDetected => "No Heart Disease Detected",
        }
    }
}

/// Everything the result panel renders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultReport {
    pub headline: Headline,
    /// Celebratory cue; only ever set for a negative prediction
    pub celebrate: bool,
    /// Positive-class probability, for the gauge
    pub probability: f64,
    pub tier: AdviceTier,
}

impl ResultReport {
    pub const ADVICE_TITLE: &'static str = "Doctor's Preventive Care Advice";

    #[must_use]
    pub fn from_prediction(result: &PredictionResult) -> Self {
        let (headline, celebrate) = match result.outcome {
            Outcome::Disease => (Headline::DiseaseDetected, false),
            Outcome::NoDisease => (Headline::NoDiseaseDetected, true),
        };

        Self {
            headline,
            celebrate,
            probability: result.probability,
            tier: result.advice_tier(),
        }
    }

    /// Advice lines for the selected tier.
    #[must_use]
    pub fn advice(&self) -> &'static [&'static str] {
        self.tier.advice()
    }
}
