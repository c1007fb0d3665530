//! One-call entry point.
use crate::counterfactual::{
    errors::CfResult,
    model::ModelWithLoss,
    options::SearchOptions,
    search::{Counterfactual, CounterfactualResult, Explainer},
    target::Target,
};
use ndarray::Array1;

/// Compute a counterfactual for `x` under `model`.
///
/// Equivalent to `Explainer::new(model).compute_counterfactual(x, &target, options)`.
/// Use [`CounterfactualResult::into_triple`] for the positional form.
///
/// # Errors
/// See [`Counterfactual::compute_counterfactual`].
pub fn generate_counterfactual<M: ModelWithLoss>(
    model: &M, x: &Array1<f64>, target: Target<M::Output>, options: &SearchOptions<M::Output>,
) -> CfResult<CounterfactualResult<M::Output>> {
    Explainer::new(model).compute_counterfactual(x, &target, options)
}
