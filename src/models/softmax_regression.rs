//! Multinomial logistic (softmax) regression.
//!
//! `P(k | x) = softmax(W x + b)_k`; the prediction is the most probable
//! class. The loss for a target is `−ln P(class ∈ accepted | x)` with
//! gradient `Wᵀ (p − q)`.
use crate::counterfactual::{
    errors::CfResult,
    model::ModelWithLoss,
    target::Target,
};
use crate::models::{
    ClassScores, ClassSetLoss, accepted_classes,
    layers::{affine, argmax, softmax},
    validation::{check_input, check_len, check_matrix, check_vector},
};
use crate::optimization::cost_optimizer::Objective;
use ndarray::{Array1, Array2};

#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxRegression {
    weights: Array2<f64>,
    intercept: Array1<f64>,
}

impl SoftmaxRegression {
    /// `weights` is `K × D`, `intercept` has length `K`.
    ///
    /// # Errors
    /// [`CfError::InvalidModel`](crate::counterfactual::CfError::InvalidModel)
    /// for empty, non-finite or mismatched parameters.
    pub fn new(weights: Array2<f64>, intercept: Array1<f64>) -> CfResult<Self> {
        check_matrix("weights", &weights)?;
        check_vector("intercept", &intercept)?;
        check_len("intercept", weights.nrows(), intercept.len())?;
        Ok(Self { weights, intercept })
    }

    pub fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    /// Class probabilities for `x`.
    pub fn predict_proba(&self, x: &Array1<f64>) -> CfResult<Array1<f64>> {
        check_input(x, self.dim())?;
        Ok(softmax(&self.scores(x)))
    }
}

impl ClassScores for SoftmaxRegression {
    fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    fn scores(&self, x: &Array1<f64>) -> Array1<f64> {
        affine(x, &self.weights, &self.intercept)
    }

    fn score_jacobian(&self, _x: &Array1<f64>) -> Array2<f64> {
        self.weights.clone()
    }
}

impl ModelWithLoss for SoftmaxRegression {
    type Output = usize;

    fn dim(&self) -> usize {
        self.weights.ncols()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterfactual::CfError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn model() -> SoftmaxRegression {
        SoftmaxRegression::new(array![[-2.0, 0.0], [0.0, 0.0], [2.0, 0.0]], array![0.0, 0.0, 0.0])
            .unwrap()
    }

    #[test]
    fn predicts_most_probable_class() {
        let m = model();
        assert_eq!(m.predict(&array![1.0, 0.3]).unwrap(), 2);
        assert_eq!(m.predict(&array![-1.0, 0.3]).unwrap(), 0);
        let p = m.predict_proba(&array![0.0, 5.0]).unwrap();
        assert_abs_diff_eq!(p[0], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The loss is the negative log probability of the target class and its
    // gradient is Wᵀ (p − e_t).
    //
    // Given
    // -----
    // - Logits (−2 s, 0, 2 s) at x = (s, ·) with s = 0.5, target class 0.
    //
    // Expect
    // ------
    // - loss = −ln p_0.
    // - ∂loss/∂x0 = −2 (p_0 − 1) + 2 p_2, ∂loss/∂x1 = 0.
    fn loss_is_negative_log_probability() {
        // Arrange
        let m = model();
        let x = array![0.5, 0.3];
        let p = m.predict_proba(&x).unwrap();
        let loss = m.get_loss(&Target::Value(0), Some(&2)).unwrap();

        // Act
        let value = loss.value(&x).unwrap();
        let grad = loss.grad(&x).unwrap();

        // Assert
        assert!(loss.is_differentiable());
        assert_abs_diff_eq!(value, -p[0].ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(grad[0], -2.0 * (p[0] - 1.0) + 2.0 * p[2], epsilon = 1e-12);
        assert_abs_diff_eq!(grad[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_mismatched_intercept_and_unknown_class() {
        assert!(matches!(
            SoftmaxRegression::new(array![[1.0, 0.0]], array![0.0, 1.0]),
            Err(CfError::InvalidModel { .. })
        ));
        assert!(matches!(
            model().get_loss(&Target::Value(7), None),
            Err(CfError::UnsupportedTarget { .. })
        ));
    }
}
