//! Binary logistic regression fitted by gradient descent.
//!
//! Small enough to refit per symbol per cycle: a handful of features over
//! at most a couple hundred rows.

use ndarray::{Array1, Array2};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("empty training set")]
    EmptyTrainingSet,

    #[error("fit produced non-finite weights")]
    NonFinite,
}

/// Fitting hyper-parameters. Inputs are expected to be standardized, which
/// keeps the fixed learning rate stable across symbols.
#[derive(Debug, Clone, Copy)]
pub struct LogisticRegression {
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    l2: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 500,
            tolerance: 1e-6,
            l2: 1e-3,
        }
    }
}

/// A fitted model: weights plus intercept.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Fit on rows of `x` with labels `y` in {0, 1}.
    ///
    /// Single-class label sets are fitted like any other: the intercept
    /// saturates toward the lone class instead of erroring out.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LogisticModel, ModelError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples == 0 || n_features == 0 || n_samples != y.len() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        let mut prev_cost = f64::INFINITY;

        for _ in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = linear.mapv(sigmoid);

            let errors = &predictions - y;
            let mut dw = x.t().dot(&errors) / n_samples as f64;
            dw = &dw + &(&weights * self.l2);
            let db = errors.sum() / n_samples as f64;

            weights = &weights - &(&dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let cost = log_loss(y, &predictions);
            if (prev_cost - cost).abs() < self.tolerance {
                break;
            }
            prev_cost = cost;
        }

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        Ok(LogisticModel { weights, bias })
    }
}

impl LogisticModel {
    /// Probability of the positive class for one feature vector.
    pub fn predict_proba(&self, x: &Array1<f64>) -> f64 {
        sigmoid(self.weights.dot(x) + self.bias)
    }
}

/// Numerically stable sigmoid.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Binary cross-entropy with clipped probabilities.
fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let eps = 1e-15;
    let n = y_true.len() as f64;

    -y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            y * p.ln() + (1.0 - y) * (1.0 - p).ln()
        })
        .sum::<f64>()
        / n
}
