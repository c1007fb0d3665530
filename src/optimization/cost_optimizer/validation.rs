//! Validation helpers for cost minimization.
//!
//! - **Configuration checks**: [`verify_tol_grad`], [`verify_tol_cost`],
//!   [`verify_learning_rate`], [`verify_momentum`], [`verify_sd_tolerance`].
//! - **Gradient validation**: [`validate_grad`] enforces dimension and finite
//!   entries.
//! - **Parameter checks**: [`validate_param_dim`] for objective inputs and
//!   [`validate_theta_hat`] for solver outputs.
//! - **Objective values**: [`validate_value`] checks finiteness.
use crate::optimization::{
    cost_optimizer::{Grad, Theta},
    errors::{OptError, OptResult},
};

/// Reason a tuning value fails the "finite and strictly positive" rule.
fn not_positive_finite(value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        Some("value must be finite")
    } else if value <= 0.0 {
        Some("value must be > 0")
    } else {
        None
    }
}

/// `None` passes; a gradient-norm tolerance must be finite and > 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| not_positive_finite(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// `None` passes; a cost-change tolerance must be finite and > 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| not_positive_finite(t).map(|reason| (t, reason))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

pub fn verify_learning_rate(lr: f64) -> OptResult<()> {
    not_positive_finite(lr)
        .map_or(Ok(()), |reason| Err(OptError::InvalidLearningRate { lr, reason }))
}

pub fn verify_momentum(momentum: f64) -> OptResult<()> {
    if !momentum.is_finite() || !(0.0..1.0).contains(&momentum) {
        return Err(OptError::InvalidMomentum {
            momentum,
            reason: "Momentum must lie in [0, 1).",
        });
    }
    Ok(())
}

pub fn verify_sd_tolerance(tol: f64) -> OptResult<()> {
    not_positive_finite(tol)
        .map_or(Ok(()), |reason| Err(OptError::InvalidSdTolerance { tol, reason }))
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().enumerate().find(|(_, g)| !g.is_finite()) {
        Some((index, &value)) => {
            Err(OptError::InvalidGradient { index, value, reason: "gradient entry is not finite" })
        }
        None => Ok(()),
    }
}

/// Check that a parameter vector has the length an objective expects.
pub fn validate_param_dim(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ParamDimMismatch { expected: dim, found: theta.len() });
    }
    Ok(())
}

/// Unwrap a solver's best parameter vector, rejecting absent or
/// non-finite results.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "solver returned a non-finite coordinate",
        });
    }
    Ok(theta)
}

/// Validate that a scalar cost value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn validate_grad_reports_first_non_finite_entry() {
        let g = array![0.0, f64::NAN, f64::INFINITY];
        let err = validate_grad(&g, 3).unwrap_err();
        assert!(matches!(err, OptError::InvalidGradient { index: 1, .. }));
    }

    #[test]
    fn validate_grad_checks_dimension() {
        let g = array![1.0, 2.0];
        assert_eq!(
            validate_grad(&g, 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
    }

    #[test]
    fn validate_theta_hat_rejects_nan() {
        let err = validate_theta_hat(Some(array![1.0, f64::NAN])).unwrap_err();
        assert!(matches!(err, OptError::InvalidThetaHat { index: 1, .. }));
    }

    #[test]
    fn tolerance_checks_accept_none_and_reject_non_positive() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-9)).is_ok());
        assert!(matches!(verify_tol_grad(Some(-1.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(verify_sd_tolerance(0.0), Err(OptError::InvalidSdTolerance { .. })));
    }
}
