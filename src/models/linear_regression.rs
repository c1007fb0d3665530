//! Linear regression `y = w·x + b`.
use crate::counterfactual::{
    errors::{CfError, CfResult},
    model::ModelWithLoss,
    target::Target,
};
use crate::models::validation::{check_input, check_vector};
use crate::optimization::{
    cost_optimizer::{Cost, Grad, Objective, Theta, validation::validate_param_dim},
    errors::OptResult,
};
use ndarray::Array1;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    coef: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// # Errors
    /// [`CfError::InvalidModel`] for empty or non-finite parameters.
    pub fn new(coef: Array1<f64>, intercept: f64) -> CfResult<Self> {
        check_vector("coef", &coef)?;
        if !intercept.is_finite() {
            return Err(CfError::InvalidModel {
                reason: format!("intercept is non-finite: {intercept}"),
            });
        }
        Ok(Self { coef, intercept })
    }

    pub fn coef(&self) -> &Array1<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn raw_predict(&self, x: &Array1<f64>) -> f64 {
        self.coef.dot(x) + self.intercept
    }
}

impl ModelWithLoss for LinearRegression {
    type Output = f64;

    fn dim(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, x: &Array1<f64>) -> CfResult<f64> {
        check_input(x, self.dim())?;
        Ok(self.raw_predict(x))
    }

    /// Squared error to the literal target or the predicate's anchor.
    fn get_loss(
        &self, target: &Target<f64>, _prediction: Option<&f64>,
    ) -> CfResult<Box<dyn Objective + '_>> {
        let y_target = target.steer_value().copied().ok_or_else(|| CfError::UnsupportedTarget {
            reason: "a regression loss needs a target value; give the predicate an anchor"
                .to_string(),
        })?;
        if !y_target.is_finite() {
            return Err(CfError::UnsupportedTarget {
                reason: format!("target value is non-finite: {y_target}"),
            });
        }
        Ok(Box::new(SquaredError { model: self, y_target }))
    }
}

/// `(w·x + b − y*)²`.
struct SquaredError<'m> {
    model: &'m LinearRegression,
    y_target: f64,
}

impl Objective for SquaredError<'_> {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        validate_param_dim(x, self.model.dim())?;
        Ok((self.model.raw_predict(x) - self.y_target).powi(2))
    }

    fn grad(&self, x: &Theta) -> OptResult<Grad> {
        validate_param_dim(x, self.model.dim())?;
        let residual = self.model.raw_predict(x) - self.y_target;
        Ok(&self.model.coef * (2.0 * residual))
    }

    fn is_differentiable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterfactual::target::Predicate;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn model() -> LinearRegression {
        LinearRegression::new(array![2.0, 1.0, 3.0], 7.0).unwrap()
    }

    #[test]
    fn predicts_affine_output() {
        assert_abs_diff_eq!(model().predict(&array![1.0, 2.0, 3.0]).unwrap(), 20.0);
        assert_eq!(
            model().predict(&array![1.0]),
            Err(CfError::DimMismatch { expected: 3, found: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The squared-error loss steers toward a literal target or a predicate's
    // anchor and rejects bare predicates.
    //
    // Given
    // -----
    // - y = 2 x0 + x1 + 3 x2 + 7, x = (1, 2, 3) so y = 20.
    //
    // Expect
    // ------
    // - Literal 25: loss 25, gradient -10 · w.
    // - Predicate |y − 25| < 1 anchored at 25: same loss.
    // - Predicate without anchor: UnsupportedTarget.
    fn loss_uses_literal_or_anchor() {
        // Arrange
        let m = model();
        let x = array![1.0, 2.0, 3.0];
        let anchored: Target<f64> =
            Predicate::new(|y: &f64| (y - 25.0).abs() < 1.0).with_anchor(25.0).into();
        let bare: Target<f64> = Target::predicate(|y: &f64| *y > 0.0);

        // Act
        let literal_loss = m.get_loss(&Target::Value(25.0), None).unwrap();
        let anchored_loss = m.get_loss(&anchored, None).unwrap();
        let bare_loss = m.get_loss(&bare, None);

        // Assert
        assert_abs_diff_eq!(literal_loss.value(&x).unwrap(), 25.0, epsilon = 1e-12);
        assert_eq!(literal_loss.grad(&x).unwrap(), array![-20.0, -10.0, -30.0]);
        assert_abs_diff_eq!(anchored_loss.value(&x).unwrap(), 25.0, epsilon = 1e-12);
        assert!(matches!(bare_loss, Err(CfError::UnsupportedTarget { .. })));
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(LinearRegression::new(array![], 0.0).is_err());
        assert!(LinearRegression::new(array![1.0], f64::NAN).is_err());
    }
}
