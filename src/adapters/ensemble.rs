//! Voting ensemble adapter: pre-trained classifiers exported as JSON.
//!
//! Supported base estimators:
//! - logistic regression
//! - decision tree (scikit-learn node layout, `x[f] <= threshold` goes left)
//! - random forest (mean of tree probabilities)
//! - gaussian naive Bayes
//!
//! Soft voting averages base probabilities with optional weights; hard voting
//! takes a weighted majority of base labels and has no probabilities.

use serde::{Deserialize, Serialize};

use crate::ports::{Classifier, ModelError};

/// Class probabilities `[p(label 0), p(label 1)]`.
type ClassProba = [f64; 2];

/// How base estimator outputs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voting {
    Soft,
    Hard,
}

/// A node of an exported decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class counts or fractions; normalized at prediction time.
        value: ClassProba,
    },
}

/// Base estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coef: Vec<f64>,
        intercept: f64,
    },
    DecisionTree {
        nodes: Vec<TreeNode>,
    },
    RandomForest {
        trees: Vec<Vec<TreeNode>>,
    },
    GaussianNb {
        class_prior: ClassProba,
        theta: [Vec<f64>; 2],
        var: [Vec<f64>; 2],
    },
}

/// Named base estimator inside the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEstimator {
    pub name: String,
    #[serde(flatten)]
    pub estimator: Estimator,
}

/// Ensemble artifact tag. Only voting ensembles are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleKind {
    Voting,
}

/// Fitted voting classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingClassifier {
    pub kind: EnsembleKind,
    pub voting: Voting,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub estimators: Vec<NamedEstimator>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Index of the larger probability; ties go to class 0.
fn argmax(p: ClassProba) -> u8 {
    if p[1] > p[0] {
        1
    } else {
        0
    }
}

fn validate_tree(nodes: &[TreeNode], n_features: usize) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("decision tree has no nodes".into());
    }
    for (i, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(format!("node {i} splits on feature {feature} (>= {n_features})"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i} has a non-finite threshold"));
                }
                // Forward-only children guarantee traversal terminates.
                if *left <= i || *right <= i || *left >= nodes.len() || *right >= nodes.len() {
                    return Err(format!("node {i} has invalid children ({left}, {right})"));
                }
            }
            TreeNode::Leaf { value } => {
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value[0] + value[1] <= 0.0 {
                    return Err(format!("leaf {i} has invalid class values"));
                }
            }
        }
    }
    Ok(())
}

fn tree_proba(nodes: &[TreeNode], x: &[f64]) -> Result<ClassProba, ModelError> {
    let mut idx = 0;
    loop {
        match nodes.get(idx) {
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let next = if x[*feature] <= *threshold { *left } else { *right };
                if next <= idx {
                    return Err(ModelError::InvalidOutput(format!(
                        "tree node {idx} points backwards"
                    )));
                }
                idx = next;
            }
            Some(TreeNode::Leaf { value }) => {
                let total = value[0] + value[1];
                return Ok([value[0] / total, value[1] / total]);
            }
            None => {
                return Err(ModelError::InvalidOutput(format!(
                    "tree node {idx} out of range"
                )))
            }
        }
    }
}

impl Estimator {
    /// Number of input features, when the estimator records it.
    fn n_features(&self) -> Option<usize> {
        match self {
            Self::LogisticRegression { coef, .. } => Some(coef.len()),
            Self::GaussianNb { theta, .. } => Some(theta[0].len()),
            Self::DecisionTree { .. } | Self::RandomForest { .. } => None,
        }
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            Self::LogisticRegression { coef, intercept } => {
                if coef.len() != n_features {
                    return Err(format!(
                        "logistic regression has {} coefficients, expected {n_features}",
                        coef.len()
                    ));
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err("logistic regression has non-finite parameters".into());
                }
                Ok(())
            }
            Self::DecisionTree { nodes } => validate_tree(nodes, n_features),
            Self::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err("random forest has no trees".into());
                }
                trees
                    .iter()
                    .try_for_each(|nodes| validate_tree(nodes, n_features))
            }
            Self::GaussianNb {
                class_prior,
                theta,
                var,
            } => {
                if class_prior.iter().any(|p| !(*p > 0.0 && *p <= 1.0)) {
                    return Err("gaussian naive Bayes priors must be in (0, 1]".into());
                }
                for class in 0..2 {
                    if theta[class].len() != n_features || var[class].len() != n_features {
                        return Err(format!(
                            "gaussian naive Bayes class {class} parameters do not have {n_features} features"
                        ));
                    }
                    if theta[class].iter().any(|t| !t.is_finite())
                        || var[class].iter().any(|v| !(v.is_finite() && *v > 0.0))
                    {
                        return Err(format!(
                            "gaussian naive Bayes class {class} has invalid mean/variance"
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    fn predict_proba(&self, x: &[f64]) -> Result<ClassProba, ModelError> {
        match self {
            Self::LogisticRegression { coef, intercept } => {
                let z: f64 = coef.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + intercept;
                let p1 = sigmoid(z);
                Ok([1.0 - p1, p1])
            }
            Self::DecisionTree { nodes } => tree_proba(nodes, x),
            Self::RandomForest { trees } => {
                let mut acc = [0.0; 2];
                for nodes in trees {
                    let p = tree_proba(nodes, x)?;
                    acc[0] += p[0];
                    acc[1] += p[1];
                }
                let n = trees.len() as f64;
                Ok([acc[0] / n, acc[1] / n])
            }
            Self::GaussianNb {
                class_prior,
                theta,
                var,
            } => {
                let mut jll = [0.0; 2];
                for class in 0..2 {
                    let mut ll = class_prior[class].ln();
                    for ((&xi, &mu), &s2) in x.iter().zip(&theta[class]).zip(&var[class]) {
                        ll -= 0.5 * (2.0 * std::f64::consts::PI * s2).ln();
                        ll -= 0.5 * (xi - mu).powi(2) / s2;
                    }
                    jll[class] = ll;
                }
                // Log-sum-exp for numerical stability
                let max = jll[0].max(jll[1]);
                let e0 = (jll[0] - max).exp();
                let e1 = (jll[1] - max).exp();
                Ok([e0 / (e0 + e1), e1 / (e0 + e1)])
            }
        }
    }
}

impl VotingClassifier {
    /// Number of input features, taken from the first estimator that records it.
    #[must_use]
    pub fn declared_features(&self) -> Option<usize> {
        self.estimators
            .iter()
            .find_map(|e| e.estimator.n_features())
            .or_else(|| self.feature_names.as_ref().map(Vec::len))
    }

    /// Check internal consistency against the expected feature count.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.classes != [0, 1] {
            return Err(format!(
                "classifier must be binary with classes [0, 1], got {:?}",
                self.classes
            ));
        }
        if self.estimators.is_empty() {
            return Err("voting classifier has no estimators".into());
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.estimators.len() {
                return Err(format!(
                    "{} weights for {} estimators",
                    weights.len(),
                    self.estimators.len()
                ));
            }
            if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0))
                || weights.iter().sum::<f64>() <= 0.0
            {
                return Err("weights must be non-negative with a positive sum".into());
            }
        }
        if let Some(names) = &self.feature_names {
            if names.len() != n_features {
                return Err(format!(
                    "classifier lists {} feature names, expected {n_features}",
                    names.len()
                ));
            }
        }
        for named in &self.estimators {
            named
                .estimator
                .validate(n_features)
                .map_err(|e| format!("estimator '{}': {e}", named.name))?;
        }
        Ok(())
    }

    fn weight(&self, i: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i])
    }

    fn check_input(&self, x: &[f64]) -> Result<(), ModelError> {
        ModelError::check_shape(self.n_features(), x.len())?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidOutput(
                "input contains non-finite values".into(),
            ));
        }
        Ok(())
    }

    fn soft_proba(&self, x: &[f64]) -> Result<ClassProba, ModelError> {
        let mut acc = [0.0; 2];
        let mut total = 0.0;
        for (i, named) in self.estimators.iter().enumerate() {
            let w = self.weight(i);
            let p = named.estimator.predict_proba(x)?;
            acc[0] += w * p[0];
            acc[1] += w * p[1];
            total += w;
        }
        Ok([acc[0] / total, acc[1] / total])
    }

    fn hard_votes(&self, x: &[f64]) -> Result<ClassProba, ModelError> {
        let mut votes = [0.0; 2];
        for (i, named) in self.estimators.iter().enumerate() {
            let label = argmax(named.estimator.predict_proba(x)?);
            votes[label as usize] += self.weight(i);
        }
        Ok(votes)
    }
}

impl Classifier for VotingClassifier {
    fn n_features(&self) -> usize {
        self.declared_features().unwrap_or(0)
    }

    fn predict(&self, scaled: &[f64]) -> Result<u8, ModelError> {
        self.check_input(scaled)?;
        let scores = match self.voting {
            Voting::Soft => self.soft_proba(scaled)?,
            Voting::Hard => self.hard_votes(scaled)?,
        };
        Ok(argmax(scores))
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        self.check_input(scaled)?;
        match self.voting {
            Voting::Soft => Ok(self.soft_proba(scaled)?[1]),
            Voting::Hard => Err(ModelError::ProbabilityUnavailable(
                "hard voting does not produce class probabilities".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(coef: Vec<f64>, intercept: f64) -> NamedEstimator {
        NamedEstimator {
            name: "lr".into(),
            estimator: Estimator::LogisticRegression { coef, intercept },
        }
    }

    fn stump() -> NamedEstimator {
        NamedEstimator {
            name: "dt".into(),
            estimator: Estimator::DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: [8.0, 2.0] },
                    TreeNode::Leaf { value: [1.0, 3.0] },
                ],
            },
        }
    }

    fn ensemble(voting: Voting, estimators: Vec<NamedEstimator>) -> VotingClassifier {
        VotingClassifier {
            kind: EnsembleKind::Voting,
            voting,
            classes: vec![0, 1],
            weights: None,
            feature_names: None,
            estimators,
        }
    }

    #[test]
    fn test_logistic_probability() {
        let clf = ensemble(Voting::Soft, vec![logistic(vec![1.0, 0.0], 0.0)]);
        let p = clf.predict_proba(&[0.0, 5.0]).expect("proba");
        assert!((p - 0.5).abs() < 1e-12);
        // Exact tie goes to class 0
        assert_eq!(clf.predict(&[0.0, 5.0]).expect("predict"), 0);

        let p = clf.predict_proba(&[2.0, 0.0]).expect("proba");
        assert!((p - sigmoid(2.0)).abs() < 1e-12);
        assert_eq!(clf.predict(&[2.0, 0.0]).expect("predict"), 1);
    }

    #[test]
    fn test_tree_traversal_and_normalization() {
        let clf = ensemble(Voting::Soft, vec![logistic(vec![0.0], 0.0), stump()]);
        // Left leaf: [0.8, 0.2]; logistic: 0.5 -> mean 0.35
        let p = clf.predict_proba(&[0.5]).expect("proba");
        assert!((p - 0.35).abs() < 1e-12);
        assert_eq!(clf.predict(&[0.5]).expect("predict"), 0);
        // Right leaf: [0.25, 0.75] -> mean 0.625
        let p = clf.predict_proba(&[0.6]).expect("proba");
        assert!((p - 0.625).abs() < 1e-12);
        assert_eq!(clf.predict(&[0.6]).expect("predict"), 1);
    }

    #[test]
    fn test_weighted_soft_voting() {
        let mut clf = ensemble(Voting::Soft, vec![logistic(vec![0.0], 0.0), stump()]);
        clf.weights = Some(vec![1.0, 3.0]);
        // (0.5 * 1 + 0.2 * 3) / 4
        let p = clf.predict_proba(&[0.0]).expect("proba");
        assert!((p - 0.275).abs() < 1e-12);
    }

    #[test]
    fn test_random_forest_averages_trees() {
        let forest = NamedEstimator {
            name: "rf".into(),
            estimator: Estimator::RandomForest {
                trees: vec![
                    vec![TreeNode::Leaf { value: [1.0, 0.0] }],
                    vec![TreeNode::Leaf { value: [0.0, 1.0] }],
                    vec![TreeNode::Leaf { value: [0.0, 1.0] }],
                    vec![TreeNode::Leaf { value: [1.0, 1.0] }],
                ],
            },
        };
        let clf = ensemble(Voting::Soft, vec![logistic(vec![0.0], 0.0), forest]);
        // forest: (0 + 1 + 1 + 0.5) / 4 = 0.625; mean with 0.5 = 0.5625
        let p = clf.predict_proba(&[3.0]).expect("proba");
        assert!((p - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_nb_symmetric() {
        let nb = NamedEstimator {
            name: "nb".into(),
            estimator: Estimator::GaussianNb {
                class_prior: [0.5, 0.5],
                theta: [vec![-1.0], vec![1.0]],
                var: [vec![1.0], vec![1.0]],
            },
        };
        let clf = ensemble(Voting::Soft, vec![nb]);
        let p = clf.predict_proba(&[0.0]).expect("proba");
        assert!((p - 0.5).abs() < 1e-12);
        // log-odds = 2x for unit variances at -1 / +1
        let p = clf.predict_proba(&[1.0]).expect("proba");
        assert!((p - sigmoid(2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hard_voting() {
        let clf = ensemble(
            Voting::Hard,
            vec![
                logistic(vec![1.0], -10.0),
                logistic(vec![1.0], 10.0),
                stump(),
            ],
        );
        // Votes: 0, 1, 1 (x = 0.6 goes right)
        assert_eq!(clf.predict(&[0.6]).expect("predict"), 1);
        // Votes: 0, 1, 0
        assert_eq!(clf.predict(&[0.0]).expect("predict"), 0);

        let err = clf.predict_proba(&[0.6]).expect_err("hard voting has no proba");
        assert!(matches!(err, ModelError::ProbabilityUnavailable(_)));
    }

    #[test]
    fn test_shape_mismatch() {
        let clf = ensemble(Voting::Soft, vec![logistic(vec![1.0; 13], 0.0)]);
        assert_eq!(clf.n_features(), 13);
        let err = clf.predict(&[0.0; 12]).expect_err("must fail");
        assert!(matches!(
            err,
            ModelError::ShapeMismatch {
                expected: 13,
                got: 12
            }
        ));
    }

    #[test]
    fn test_validate() {
        let clf = ensemble(Voting::Soft, vec![logistic(vec![1.0], 0.0), stump()]);
        assert!(clf.validate(1).is_ok());
        assert!(clf.validate(2).is_err());

        let mut weighted = clf.clone();
        weighted.weights = Some(vec![1.0]);
        assert!(weighted.validate(1).is_err());

        let backwards = ensemble(
            Voting::Soft,
            vec![NamedEstimator {
                name: "loop".into(),
                estimator: Estimator::DecisionTree {
                    nodes: vec![
                        TreeNode::Split {
                            feature: 0,
                            threshold: 0.0,
                            left: 0,
                            right: 1,
                        },
                        TreeNode::Leaf { value: [1.0, 0.0] },
                    ],
                },
            }],
        );
        assert!(backwards.validate(1).is_err());

        let mut multiclass = clf;
        multiclass.classes = vec![0, 1, 2];
        assert!(multiclass.validate(1).is_err());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "kind": "voting",
            "voting": "soft",
            "estimators": [
                {"name": "lr", "kind": "logistic_regression", "coef": [0.5], "intercept": 0.1},
                {"name": "dt", "kind": "decision_tree", "nodes": [
                    {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
                    {"value": [3, 1]},
                    {"value": [1, 3]}
                ]}
            ]
        }"#;
        let clf: VotingClassifier = serde_json::from_str(json).expect("parse");
        assert_eq!(clf.classes, vec![0, 1]);
        assert_eq!(clf.n_features(), 1);
        assert!(clf.validate(1).is_ok());
    }
}
