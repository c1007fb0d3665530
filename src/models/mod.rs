//! models: fitted-model adapters implementing [`ModelWithLoss`].
//!
//! Purpose
//! -------
//! Provide ready-made adapters for common model families so searches can run
//! without caller-written losses. Models are built from already-fitted
//! parameters; nothing here trains.
//!
//! Key behaviors
//! -------------
//! - [`LinearRegression`]: squared error to a target value, analytic gradient.
//! - [`SoftmaxRegression`] and [`GaussianNaiveBayes`]: negative log
//!   probability of the accepted classes, analytic gradient.
//! - [`DecisionTree`]: black-box distance to the nearest leaf region whose
//!   output is accepted.
//!
//! Conventions
//! -----------
//! - Classifier outputs are class indices (`usize`), regressor outputs `f64`.
//! - Classifier losses accept either a literal class or a predicate over
//!   classes; the predicate is evaluated on every class once, when the loss
//!   is built.
//!
//! [`ModelWithLoss`]: crate::counterfactual::ModelWithLoss
pub mod decision_tree;
pub mod gaussian_nb;
pub mod layers;
pub mod linear_regression;
pub mod softmax_regression;
pub mod validation;

pub use self::decision_tree::{DecisionTree, DecisionTreeClassifier, DecisionTreeRegressor, Node};
pub use self::gaussian_nb::GaussianNaiveBayes;
pub use self::linear_regression::LinearRegression;
pub use self::softmax_regression::SoftmaxRegression;

use crate::counterfactual::{
    errors::{CfError, CfResult},
    target::Target,
};
use crate::optimization::{
    cost_optimizer::{Cost, Grad, Objective, Theta, validation::validate_param_dim},
    errors::OptResult,
};
use layers::log_sum_exp;
use ndarray::{Array1, Array2};

/// Per-class log-scores of a probabilistic classifier.
///
/// Class probabilities are `softmax(scores(x))`.
pub(crate) trait ClassScores {
    fn n_features(&self) -> usize;

    fn scores(&self, x: &Array1<f64>) -> Array1<f64>;

    /// `K × D` matrix of `∂ scores_k / ∂ x_j`.
    fn score_jacobian(&self, x: &Array1<f64>) -> Array2<f64>;
}

/// Classes in `0..n_classes` that satisfy `target`.
pub(crate) fn accepted_classes(target: &Target<usize>, n_classes: usize) -> CfResult<Vec<usize>> {
    let accepted: Vec<usize> = match target {
        Target::Value(class) if *class < n_classes => vec![*class],
        Target::Value(class) => {
            return Err(CfError::UnsupportedTarget {
                reason: format!("class {class} is out of range for {n_classes} classes"),
            });
        }
        Target::Predicate(p) => (0..n_classes).filter(|k| p.accepts(k)).collect(),
    };
    if accepted.is_empty() {
        return Err(CfError::UnsupportedTarget {
            reason: "the predicate accepts none of the model's classes".to_string(),
        });
    }
    Ok(accepted)
}

/// `−ln P(class ∈ accepted | x)`.
///
/// With scores `s` and `p = softmax(s)`, `q` the distribution renormalized on
/// the accepted classes:
///
/// ```text
/// loss(x) = lse(s) − lse(s_A)
/// ∇loss(x) = Jᵀ (p − q)
/// ```
pub(crate) struct ClassSetLoss<'m, S: ?Sized> {
    scorer: &'m S,
    accepted: Vec<usize>,
}

impl<'m, S: ClassScores + ?Sized> ClassSetLoss<'m, S> {
    pub(crate) fn new(scorer: &'m S, accepted: Vec<usize>) -> Self {
        Self { scorer, accepted }
    }

    fn accepted_lse(&self, s: &Array1<f64>) -> f64 {
        let picked: Vec<f64> = self.accepted.iter().map(|&k| s[k]).collect();
        log_sum_exp(picked.iter())
    }
}

impl<S: ClassScores + ?Sized> Objective for ClassSetLoss<'_, S> {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        validate_param_dim(x, self.scorer.n_features())?;
        let s = self.scorer.scores(x);
        Ok(log_sum_exp(s.iter()) - self.accepted_lse(&s))
    }

    fn grad(&self, x: &Theta) -> OptResult<Grad> {
        validate_param_dim(x, self.scorer.n_features())?;
        let s = self.scorer.scores(x);
        let lse_all = log_sum_exp(s.iter());
        let lse_acc = self.accepted_lse(&s);
        let mut weights = s.mapv(|v| (v - lse_all).exp());
        for &k in &self.accepted {
            weights[k] -= (s[k] - lse_acc).exp();
        }
        Ok(self.scorer.score_jacobian(x).t().dot(&weights))
    }

    fn is_differentiable(&self) -> bool {
        true
    }
}
