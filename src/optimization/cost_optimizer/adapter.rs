//! Adapter that exposes an [`Objective`] as an `argmin` problem.
//!
//! Objectives are costs already, so values pass through unchanged apart from
//! a finiteness check. There is no finite-difference fallback for missing
//! gradients; callers opt in through
//! [`FiniteDiffObjective`](super::finite_diff::FiniteDiffObjective).
use crate::optimization::{
    cost_optimizer::{
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::{validate_grad, validate_value},
    },
    errors::OptResult,
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges an [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Clone, Copy)]
pub struct ArgMinAdapter<'a> {
    pub objective: &'a dyn Objective,
}

impl<'a> CostFunction for ArgMinAdapter<'a> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost and reject non-finite values.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.checked_cost(theta)?)
    }
}

impl<'a> Gradient for ArgMinAdapter<'a> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate and validate the analytic gradient.
    ///
    /// # Errors
    /// - `GradientNotImplemented` for black-box objectives.
    /// - Validation errors for wrong dimension or non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let g = self.objective.grad(theta)?;
        validate_grad(&g, theta.len())?;
        Ok(g)
    }
}

impl<'a> ArgMinAdapter<'a> {
    pub fn new(objective: &'a dyn Objective) -> Self {
        Self { objective }
    }

    fn checked_cost(&self, theta: &Theta) -> OptResult<Cost> {
        let value = self.objective.value(theta)?;
        validate_value(value)?;
        Ok(value)
    }
}
