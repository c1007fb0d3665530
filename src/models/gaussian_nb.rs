//! Gaussian naive Bayes classifier.
//!
//! Per class `k`, features are independent normals `N(μ_kj, σ²_kj)`:
//!
//! ```text
//! score_k(x) = ln π_k + Σ_j ln N(x_j; μ_kj, σ²_kj)
//! ∂score_k/∂x_j = −(x_j − μ_kj) / σ²_kj
//! ```
//!
//! Posterior class probabilities are `softmax(score(x))`.
use crate::counterfactual::{
    errors::{CfError, CfResult},
    model::ModelWithLoss,
    target::Target,
};
use crate::models::{
    ClassScores, ClassSetLoss, accepted_classes,
    layers::argmax,
    validation::{check_input, check_len, check_matrix, check_vector},
};
use crate::optimization::cost_optimizer::Objective;
use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, Normal};

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNaiveBayes {
    log_priors: Array1<f64>,
    means: Array2<f64>,
    variances: Array2<f64>,
    densities: Vec<Vec<Normal>>,
}

impl GaussianNaiveBayes {
    /// `priors` has length `K`; `means` and `variances` are `K × D`.
    ///
    /// # Errors
    /// [`CfError::InvalidModel`] for non-finite, mismatched or non-positive
    /// parameters.
    pub fn new(priors: Array1<f64>, means: Array2<f64>, variances: Array2<f64>) -> CfResult<Self> {
        check_vector("priors", &priors)?;
        check_matrix("means", &means)?;
        check_matrix("variances", &variances)?;
        check_len("priors", means.nrows(), priors.len())?;
        if means.dim() != variances.dim() {
            return Err(CfError::InvalidModel {
                reason: format!(
                    "variances have shape {:?}, expected {:?}",
                    variances.dim(),
                    means.dim()
                ),
            });
        }
        if let Some((k, &p)) = priors.iter().enumerate().find(|(_, p)| **p <= 0.0) {
            return Err(CfError::InvalidModel {
                reason: format!("prior of class {k} must be > 0; got {p}"),
            });
        }
        let densities = means
            .outer_iter()
            .zip(variances.outer_iter())
            .map(|(mu, var)| {
                mu.iter()
                    .zip(var.iter())
                    .map(|(&m, &v)| Normal::new(m, v.sqrt()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { log_priors: priors.mapv(f64::ln), means, variances, densities })
    }

    pub fn n_classes(&self) -> usize {
        self.means.nrows()
    }
}

impl ClassScores for GaussianNaiveBayes {
    fn n_features(&self) -> usize {
        self.means.ncols()
    }

    fn scores(&self, x: &Array1<f64>) -> Array1<f64> {
        Array1::from_iter(self.densities.iter().zip(self.log_priors.iter()).map(
            |(class, &log_prior)| {
                log_prior + class.iter().zip(x.iter()).map(|(n, &xj)| n.ln_pdf(xj)).sum::<f64>()
            },
        ))
    }

    fn score_jacobian(&self, x: &Array1<f64>) -> Array2<f64> {
        let mut jac = &self.means - x;
        jac /= &self.variances;
        jac
    }
}

impl ModelWithLoss for GaussianNaiveBayes {
    type Output = usize;

    fn dim(&self) -> usize {
        self.means.ncols()
    }

    fn predict(&self, x: &Array1<f64>) -> CfResult<usize> {
        check_input(x, self.dim())?;
        Ok(argmax(&self.scores(x)))
    }

    fn get_loss(
        &self, target: &Target<usize>, _prediction: Option<&usize>,
    ) -> CfResult<Box<dyn Objective + '_>> {
        let accepted = accepted_classes(target, self.n_classes())?;
        Ok(Box::new(ClassSetLoss::new(self, accepted)))
    }
}
