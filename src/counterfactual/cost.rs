//! Composite cost over the reduced variable.
//!
//! ```text
//! cost(z) = loss(decode(z)) + C · penalty(decode(z))
//! ∇cost(z) = reduce(∇loss(decode(z)) + C · ∇penalty(decode(z)))
//! ```
//!
//! `reduce` masks pinned dimensions and gathers the free ones, so the
//! gradient handed to a solver never moves a pinned feature.
use crate::counterfactual::input_wrapper::InputWrapper;
use crate::optimization::{
    cost_optimizer::{
        Cost, Grad, Objective, Theta,
        validation::{validate_grad, validate_param_dim, validate_value},
    },
    errors::{OptError, OptResult},
};

/// Model loss plus weighted penalty, evaluated through an [`InputWrapper`].
#[derive(Clone, Copy)]
pub struct CompositeCost<'a> {
    wrapper: &'a InputWrapper,
    loss: &'a dyn Objective,
    penalty: Option<&'a dyn Objective>,
    strength: f64,
}

impl<'a> CompositeCost<'a> {
    pub fn new(
        wrapper: &'a InputWrapper, loss: &'a dyn Objective, penalty: Option<&'a dyn Objective>,
        strength: f64,
    ) -> Self {
        Self { wrapper, loss, penalty, strength }
    }

    fn candidate(&self, z: &Theta) -> OptResult<Theta> {
        validate_param_dim(z, self.wrapper.n_free())?;
        Ok(self.wrapper.expand(z))
    }
}

impl Objective for CompositeCost<'_> {
    fn value(&self, z: &Theta) -> OptResult<Cost> {
        let x = self.candidate(z)?;
        let mut total = self.loss.value(&x)?;
        if let Some(penalty) = self.penalty {
            total += self.strength * penalty.value(&x)?;
        }
        validate_value(total)?;
        Ok(total)
    }

    fn grad(&self, z: &Theta) -> OptResult<Grad> {
        if !self.is_differentiable() {
            return Err(OptError::GradientNotImplemented);
        }
        let x = self.candidate(z)?;
        let dim = self.wrapper.dim();
        let mut g = self.loss.grad(&x)?;
        validate_grad(&g, dim)?;
        if let Some(penalty) = self.penalty {
            let g_pen = penalty.grad(&x)?;
            validate_grad(&g_pen, dim)?;
            g.scaled_add(self.strength, &g_pen);
        }
        Ok(self.wrapper.gather(&g))
    }

    fn is_differentiable(&self) -> bool {
        self.loss.is_differentiable() && self.penalty.map_or(true, |p| p.is_differentiable())
    }
}
