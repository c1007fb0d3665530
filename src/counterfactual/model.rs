//! Capability contract between the search and a fitted model.
//!
//! The search never looks inside a model. It asks for predictions on
//! full-dimensional inputs and for a loss object that scores how far a
//! candidate's output is from the requested [`Target`]. Model families (see
//! [`crate::models`]) implement [`ModelWithLoss`] once each.
use crate::counterfactual::{errors::CfResult, target::Target};
use crate::optimization::cost_optimizer::Objective;
use ndarray::Array1;
use std::fmt::Debug;

/// A fitted model that can score candidates against a target.
///
/// Required:
/// - `dim()`: input dimensionality the model accepts.
/// - `predict(&x)`: model output on a full-dimensional input.
/// - `get_loss(&target, prediction)`: a loss over full-dimensional inputs,
///   minimized where the model produces the target. `prediction` is the
///   output on the original input, available to losses that depend on it.
///
/// A loss that cannot supply gradients keeps `Objective`'s defaults; the
/// search then only accepts derivative-free optimizers for it.
pub trait ModelWithLoss {
    type Output: Clone + PartialEq + Debug;

    fn dim(&self) -> usize;

    fn predict(&self, x: &Array1<f64>) -> CfResult<Self::Output>;

    fn get_loss(
        &self, target: &Target<Self::Output>, prediction: Option<&Self::Output>,
    ) -> CfResult<Box<dyn Objective + '_>>;
}
