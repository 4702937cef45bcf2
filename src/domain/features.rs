//! Clinical feature types for heart disease prediction.
//!
//! Based on the UCI Cleveland heart disease feature set (13 attributes).

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 13;

/// Training column names, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Closed domain of a single feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDomain {
    /// Whole numbers in `min..=max`.
    Integer { min: i64, max: i64 },
    /// Decimal values in `min..=max`, stepped by `step`, shown with `decimals` places.
    Decimal {
        min: f64,
        max: f64,
        step: f64,
        decimals: u32,
    },
    /// Enumerated codes `0..options.len()`, each with a human label.
    Categorical(&'static [&'static str]),
}

impl FeatureDomain {
    /// Lowest value in the domain.
    #[must_use]
    pub fn min(&self) -> f64 {
        match self {
            Self::Integer { min, .. } => *min as f64,
            Self::Decimal { min, .. } => *min,
            Self::Categorical(_) => 0.0,
        }
    }

    /// Highest value in the domain.
    #[must_use]
    pub fn max(&self) -> f64 {
        match self {
            Self::Integer { max, .. } => *max as f64,
            Self::Decimal { max, .. } => *max,
            Self::Categorical(options) => options.len().saturating_sub(1) as f64,
        }
    }

    /// Distance between two adjacent values.
    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            Self::Decimal { step, .. } => *step,
            _ => 1.0,
        }
    }

    /// Check whether `value` is a legal value of this domain.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min() || value > self.max() {
            return false;
        }
        match self {
            Self::Integer { .. } | Self::Categorical(_) => value.fract() == 0.0,
            Self::Decimal { .. } => (self.snap(value) - value).abs() < 1e-9,
        }
    }

    /// Bring an arbitrary value into the domain: clamp to the bounds and
    /// round to the nearest step.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { self.min() };
        self.snap(value.clamp(self.min(), self.max()))
    }

    fn snap(&self, value: f64) -> f64 {
        match self {
            Self::Integer { .. } | Self::Categorical(_) => value.round(),
            Self::Decimal { decimals, .. } => {
                let scale = 10f64.powi(*decimals as i32);
                (value * scale).round() / scale
            }
        }
    }

    /// Format a value for display (categorical codes show their label).
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Integer { .. } => format!("{}", value.round() as i64),
            Self::Decimal { decimals, .. } => format!("{:.*}", *decimals as usize, value),
            Self::Categorical(options) => options
                .get(value.round() as usize)
                .map(|label| (*label).to_string())
                .unwrap_or_else(|| format!("{value}")),
        }
    }
}

/// One of the 13 model inputs, enumerated in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Age,
    Sex,
    ChestPainType,
    RestingBp,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    VesselCount,
    Thalassemia,
}

impl Feature {
    /// All features in model input order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Self::Age,
        Self::Sex,
        Self::ChestPainType,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBloodSugar,
        Self::RestingEcg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::StSlope,
        Self::VesselCount,
        Self::Thalassemia,
    ];

    /// Position of this feature in the model input vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Training column name.
    #[must_use]
    pub fn column(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    #[must_use]
    pub fn domain(self) -> FeatureDomain {
        const NO_YES: &[&str] = &["No", "Yes"];
        match self {
            Self::Age => FeatureDomain::Integer { min: 1, max: 120 },
            Self::Sex => FeatureDomain::Categorical(&["Female", "Male"]),
            Self::ChestPainType => FeatureDomain::Categorical(&[
                "Typical Angina",
                "Atypical Angina",
                "Non-Anginal Pain",
                "Asymptomatic",
            ]),
            Self::RestingBp => FeatureDomain::Integer { min: 50, max: 300 },
            Self::Cholesterol => FeatureDomain::Integer { min: 100, max: 600 },
            Self::FastingBloodSugar => FeatureDomain::Categorical(NO_YES),
            Self::RestingEcg => FeatureDomain::Categorical(&[
                "Normal",
                "ST-T wave abnormality",
                "Left Ventricular Hypertrophy",
            ]),
            Self::MaxHeartRate => FeatureDomain::Integer { min: 50, max: 250 },
            Self::ExerciseAngina => FeatureDomain::Categorical(NO_YES),
            Self::StDepression => FeatureDomain::Decimal {
                min: 0.0,
                max: 6.0,
                step: 0.1,
                decimals: 1,
            },
            Self::StSlope => FeatureDomain::Categorical(&["Upsloping", "Flat", "Downsloping"]),
            Self::VesselCount => FeatureDomain::Categorical(&["0", "1", "2", "3", "4"]),
            Self::Thalassemia => FeatureDomain::Categorical(&[
                "Normal",
                "Fixed Defect",
                "Reversible Defect",
                "Unknown",
            ]),
        }
    }

    /// Value used when the user has made no selection.
    #[must_use]
    pub fn default_value(self) -> f64 {
        match self {
            Self::Age => 45.0,
            Self::RestingBp => 120.0,
            Self::Cholesterol => 200.0,
            Self::MaxHeartRate => 94.0,
            Self::StDepression => 1.0,
            _ => 0.0,
        }
    }
}

/// The 13 clinical inputs for one prediction, in model input order.
///
/// Domains are enforced by the input controls that produce this value;
/// no further validation happens here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Age in years
    pub age: u8,
    /// 0 = female, 1 = male
    pub sex: u8,
    /// 0 typical angina, 1 atypical angina, 2 non-anginal pain, 3 asymptomatic
    pub chest_pain_type: u8,
    /// Resting blood pressure in mm Hg
    pub resting_bp: u16,
    /// Serum cholesterol in mg/dl
    pub cholesterol: u16,
    /// Fasting blood sugar > 120 mg/dl (1 = yes)
    pub fasting_blood_sugar: u8,
    /// 0 normal, 1 ST-T wave abnormality, 2 left ventricular hypertrophy
    pub resting_ecg: u8,
    /// Maximum heart rate achieved
    pub max_heart_rate: u16,
    /// Exercise-induced angina (1 = yes)
    pub exercise_angina: u8,
    /// ST depression induced by exercise relative to rest (oldpeak)
    pub st_depression: f64,
    /// 0 upsloping, 1 flat, 2 downsloping
    pub st_slope: u8,
    /// Major vessels colored by fluoroscopy (0-4)
    pub vessel_count: u8,
    /// 0 normal, 1 fixed defect, 2 reversible defect, 3 unknown
    pub thalassemia: u8,
}

impl Default for FeatureVector {
    fn default() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = feature.default_value();
        }
        Self::from_array(values)
    }
}

impl FeatureVector {
    /// Convert to the model input vector.
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.chest_pain_type),
            f64::from(self.resting_bp),
            f64::from(self.cholesterol),
            f64::from(self.fasting_blood_sugar),
            f64::from(self.resting_ecg),
            f64::from(self.max_heart_rate),
            f64::from(self.exercise_angina),
            self.st_depression,
            f64::from(self.st_slope),
            f64::from(self.vessel_count),
            f64::from(self.thalassemia),
        ]
    }

    /// Build from values in model input order.
    ///
    /// Values are taken as produced by the bounded controls; integer fields
    /// are rounded.
    #[must_use]
    pub fn from_array(v: [f64; FEATURE_COUNT]) -> Self {
        let small = |x: f64| x.round() as u8;
        let wide = |x: f64| x.round() as u16;
        Self {
            age: small(v[0]),
            sex: small(v[1]),
            chest_pain_type: small(v[2]),
            resting_bp: wide(v[3]),
            cholesterol: wide(v[4]),
            fasting_blood_sugar: small(v[5]),
            resting_ecg: small(v[6]),
            max_heart_rate: wide(v[7]),
            exercise_angina: small(v[8]),
            st_depression: v[9],
            st_slope: small(v[10]),
            vessel_count: small(v[11]),
            thalassemia: small(v[12]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_domain() {
        for feature in Feature::ALL {
            assert!(
                feature.domain().contains(feature.default_value()),
                "{:?} default out of domain",
                feature
            );
        }
    }

    #[test]
    fn test_vector_order_matches_feature_index() {
        let v = FeatureVector {
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
        };
        let arr = v.to_array();
        assert_eq!(arr[Feature::Age.index()], 45.0);
        assert_eq!(arr[Feature::MaxHeartRate.index()], 150.0);
        assert_eq!(arr[Feature::Thalassemia.index()], 2.0);
        assert_eq!(FeatureVector::from_array(arr), v);
        assert_eq!(Feature::StDepression.column(), "oldpeak");
    }

    #[test]
    fn test_default_vector() {
        let v = FeatureVector::default();
        assert_eq!(v.age, 45);
        assert_eq!(v.max_heart_rate, 94);
        assert!((v.st_depression - 1.0).abs() < f64::EPSILON);
        assert_eq!(v.sex, 0);
    }

    #[test]
    fn test_domain_clamp_and_snap() {
        let oldpeak = Feature::StDepression.domain();
        assert_eq!(oldpeak.clamp(7.5), 6.0);
        assert_eq!(oldpeak.clamp(-1.0), 0.0);
        assert_eq!(oldpeak.clamp(1.14), 1.1);
        assert!(oldpeak.contains(2.3));
        assert!(!oldpeak.contains(2.35));

        let age = Feature::Age.domain();
        assert_eq!(age.clamp(0.0), 1.0);
        assert_eq!(age.clamp(f64::NAN), 1.0);
        assert!(!age.contains(121.0));

        let thal = Feature::Thalassemia.domain();
        assert_eq!(thal.max(), 3.0);
        assert_eq!(thal.format(2.0), "Reversible Defect");
        assert_eq!(oldpeak.format(1.0), "1.0");
    }
}
