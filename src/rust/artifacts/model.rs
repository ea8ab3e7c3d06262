use ndarray::{Array1, Array2, Axis};
use serde::Deserialize;

use super::error::ArtifactError;
use super::utils::argmax;
use super::Classifier;

/// A fitted classifier artifact, tagged by `kind` in its JSON form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    /// Logistic regression, linear SVM and other linear decision functions.
    Linear(LinearModel),
    MultinomialNb(NaiveBayesModel),
}

impl Classifier for ClassifierModel {
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>, ArtifactError> {
        match self {
            Self::Linear(model) => model.predict(features),
            Self::MultinomialNb(model) => model.predict(features),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            Self::Linear(model) => model.coef.ncols(),
            Self::MultinomialNb(model) => model.feature_log_prob.ncols(),
        }
    }

    fn classes(&self) -> &[i64] {
        match self {
            Self::Linear(model) => &model.classes,
            Self::MultinomialNb(model) => &model.classes,
        }
    }
}

fn check_width(expected: usize, features: &Array2<f64>) -> Result<(), ArtifactError> {
    if features.ncols() != expected {
        return Err(ArtifactError::FeatureMismatch {
            expected,
            actual: features.ncols(),
        });
    }
    Ok(())
}

fn to_matrix(artifact: &'static str, name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>, ArtifactError> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(ArtifactError::invalid(artifact, format!("{} is empty", name)));
    }
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(ArtifactError::invalid(artifact, format!("{} rows have different lengths", name)));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| ArtifactError::invalid(artifact, e.to_string()))
}

/// Linear decision function `X · coefᵀ + intercept`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawLinear")]
pub struct LinearModel {
    coef: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawLinear {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    classes: Vec<i64>,
}

impl TryFrom<RawLinear> for LinearModel {
    type Error = ArtifactError;

    fn try_from(raw: RawLinear) -> Result<Self, Self::Error> {
        let coef = to_matrix("classifier", "coef", raw.coef)?;
        if raw.intercept.len() != coef.nrows() {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("intercept has {} values for {} coef rows", raw.intercept.len(), coef.nrows()),
            ));
        }
        let binary = coef.nrows() == 1 && raw.classes.len() == 2;
        if !binary && raw.classes.len() != coef.nrows() {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("{} classes do not match {} coef rows", raw.classes.len(), coef.nrows()),
            ));
        }
        Ok(Self {
            coef,
            intercept: Array1::from(raw.intercept),
            classes: raw.classes,
        })
    }
}

impl LinearModel {
    pub fn decision_function(&self, features: &Array2<f64>) -> Result<Array2<f64>, ArtifactError> {
        check_width(self.coef.ncols(), features)?;
        Ok(features.dot(&self.coef.t()) + &self.intercept)
    }

    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>, ArtifactError> {
        let scores = self.decision_function(features)?;
        if scores.ncols() == 1 && self.classes.len() == 2 {
            return Ok(scores
                .column(0)
                .iter()
                .map(|&score| self.classes[usize::from(score > 0.0)])
                .collect());
        }
        Ok(scores
            .axis_iter(Axis(0))
            .map(|row| argmax(row.iter().copied()).map(|idx| self.classes[idx]).unwrap_or(self.classes[0]))
            .collect())
    }
}

/// Multinomial naive Bayes, scoring `X · feature_log_probᵀ + class_log_prior`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawNaiveBayes")]
pub struct NaiveBayesModel {
    feature_log_prob: Array2<f64>,
    class_log_prior: Array1<f64>,
    classes: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawNaiveBayes {
    feature_log_prob: Vec<Vec<f64>>,
    class_log_prior: Vec<f64>,
    classes: Vec<i64>,
}

impl TryFrom<RawNaiveBayes> for NaiveBayesModel {
    type Error = ArtifactError;

    fn try_from(raw: RawNaiveBayes) -> Result<Self, Self::Error> {
        let feature_log_prob = to_matrix("classifier", "feature_log_prob", raw.feature_log_prob)?;
        let n_classes = feature_log_prob.nrows();
        if raw.class_log_prior.len() != n_classes || raw.classes.len() != n_classes {
            return Err(ArtifactError::invalid(
                "classifier",
                format!(
                    "feature_log_prob has {} rows but class_log_prior has {} and classes has {}",
                    n_classes,
                    raw.class_log_prior.len(),
                    raw.classes.len()
                ),
            ));
        }
        Ok(Self {
            feature_log_prob,
            class_log_prior: Array1::from(raw.class_log_prior),
            classes: raw.classes,
        })
    }
}

impl NaiveBayesModel {
    pub fn joint_log_likelihood(&self, features: &Array2<f64>) -> Result<Array2<f64>, ArtifactError> {
        check_width(self.feature_log_prob.ncols(), features)?;
        Ok(features.dot(&self.feature_log_prob.t()) + &self.class_log_prior)
    }

    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<i64>, ArtifactError> {
        let jll = self.joint_log_likelihood(features)?;
        Ok(jll
            .axis_iter(Axis(0))
            .map(|row| argmax(row.iter().copied()).map(|idx| self.classes[idx]).unwrap_or(self.classes[0]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use serde_json::json;

    fn multiclass() -> ClassifierModel {
        serde_json::from_value(json!({
            "kind": "linear",
            "coef": [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            "intercept": [0.1, 0.0, 0.0],
            "classes": [0, 1, 2],
        }))
        .unwrap()
    }

    #[test]
    fn test_linear_multiclass_argmax() {
        let model = multiclass();
        let x = array![[0.0, 0.9, 0.1], [0.7, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(model.predict(&x).unwrap(), vec![2, 1, 0]);
        assert_eq!(model.n_features(), 3);
        assert_eq!(model.classes(), &[0, 1, 2]);
    }

    #[test]
    fn test_linear_binary_uses_sign() {
        let model: ClassifierModel = serde_json::from_value(json!({
            "kind": "linear",
            "coef": [[2.0, -1.0]],
            "intercept": [-0.5],
            "classes": [3, 7],
        }))
        .unwrap();
        let x = array![[1.0, 0.0], [0.0, 1.0], [0.25, 0.0]];
        // scores: 1.5, -1.5, 0.0
        assert_eq!(model.predict(&x).unwrap(), vec![7, 3, 3]);
    }

    #[test]
    fn test_naive_bayes_prefers_highest_joint_likelihood() {
        let model: ClassifierModel = serde_json::from_value(json!({
            "kind": "multinomial_nb",
            "feature_log_prob": [[-0.2, -1.8], [-1.8, -0.2]],
            "class_log_prior": [-0.7, -0.7],
            "classes": [0, 1],
        }))
        .unwrap();
        let x = array![[3.0, 1.0], [0.0, 2.0]];
        assert_eq!(model.predict(&x).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_feature_width_mismatch() {
        let model = multiclass();
        let x = array![[1.0, 0.0]];
        match model.predict(&x) {
            Err(ArtifactError::FeatureMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_ragged_coef_is_rejected() {
        let result: Result<ClassifierModel, _> = serde_json::from_value(json!({
            "kind": "linear",
            "coef": [[1.0, 0.0], [1.0]],
            "intercept": [0.0, 0.0],
            "classes": [0, 1],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_class_count_mismatch_is_rejected() {
        let result: Result<ClassifierModel, _> = serde_json::from_value(json!({
            "kind": "multinomial_nb",
            "feature_log_prob": [[-0.5, -0.9]],
            "class_log_prior": [0.0],
            "classes": [0, 1],
        }));
        assert!(result.is_err());
    }
}
