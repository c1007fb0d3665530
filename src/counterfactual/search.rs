//! The counterfactual search loop.
//!
//! Purpose
//! -------
//! Find a candidate close to the original input that the model maps to the
//! requested target, trying each regularization strength of the schedule in
//! order and stopping at the first accepted candidate.
//!
//! Key behaviors
//! -------------
//! - The input is wrapped, the original prediction computed, the model loss
//!   and the penalty built once per search. Only the composite cost changes
//!   between strengths.
//! - Exactly one optimizer dispatch per tried strength; accepted candidates
//!   end the loop immediately.
//! - An exhausted schedule fails with [`CfError::NoCounterfactualFound`].
//!   Every other error propagates unchanged from the step that raised it.
//!
//! Extension points
//! ----------------
//! [`Counterfactual`] has one required method, [`Counterfactual::rebuild_model`].
//! The steps of the loop ([`wrap_input`](Counterfactual::wrap_input),
//! [`build_loss`](Counterfactual::build_loss),
//! [`compute_counterfactual_ex`](Counterfactual::compute_counterfactual_ex))
//! and the loop itself have default implementations that implementers may
//! override. [`Explainer`] is the stock implementation over a borrowed model.
use crate::counterfactual::{
    cost::CompositeCost,
    errors::{CfError, CfResult},
    input_wrapper::InputWrapper,
    model::ModelWithLoss,
    options::SearchOptions,
    target::{Acceptance, Target},
};
use crate::optimization::cost_optimizer::{Objective, Theta, minimize};
use log::{debug, info, warn};
use ndarray::Array1;

/// An accepted counterfactual.
///
/// - `x_cf`: full-dimensional candidate input.
/// - `y_cf`: model output on `x_cf`.
/// - `delta`: `x_orig − x_cf`, exactly zero on pinned dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterfactualResult<Y> {
    pub x_cf: Array1<f64>,
    pub y_cf: Y,
    pub delta: Array1<f64>,
}

impl<Y> CounterfactualResult<Y> {
    /// Positional form `(x_cf, y_cf, delta)`.
    pub fn into_triple(self) -> (Array1<f64>, Y, Array1<f64>) {
        (self.x_cf, self.y_cf, self.delta)
    }
}

pub trait Counterfactual {
    type Model: ModelWithLoss;

    /// The model, in a form that exposes predictions and a loss.
    fn rebuild_model(&self) -> &Self::Model;

    /// Validate `x` against the model and wrap it with the whitelist.
    ///
    /// # Errors
    /// Wrapper construction errors, or [`CfError::DimMismatch`] when `x` does
    /// not have the model's input dimension.
    fn wrap_input(&self, x: &Array1<f64>, whitelist: Option<&[usize]>) -> CfResult<InputWrapper> {
        let wrapper = InputWrapper::new(x.clone(), whitelist)?;
        let dim = self.rebuild_model().dim();
        if wrapper.dim() != dim {
            return Err(CfError::DimMismatch { expected: dim, found: wrapper.dim() });
        }
        Ok(wrapper)
    }

    /// Combine the model loss and the penalty at one strength.
    fn build_loss<'a>(
        &self, wrapper: &'a InputWrapper, loss: &'a dyn Objective,
        penalty: Option<&'a dyn Objective>, strength: f64,
    ) -> Box<dyn Objective + 'a> {
        Box::new(CompositeCost::new(wrapper, loss, penalty, strength))
    }

    /// One attempt: minimize `cost` from `x0`, decode and predict.
    fn compute_counterfactual_ex(
        &self, wrapper: &InputWrapper, cost: &dyn Objective, x0: Theta,
        options: &SearchOptions<<Self::Model as ModelWithLoss>::Output>,
    ) -> CfResult<(Array1<f64>, <Self::Model as ModelWithLoss>::Output)> {
        let z = minimize(&options.optimizer, cost, x0, &options.optimizer_args)?;
        let x_cf = wrapper.decode(&z)?;
        let y_cf = self.rebuild_model().predict(&x_cf)?;
        Ok((x_cf, y_cf))
    }

    /// Run the strength schedule until a candidate is accepted.
    ///
    /// # Errors
    /// - Input, target and model errors from the setup steps.
    /// - Optimizer errors from any attempt (the schedule is not continued).
    /// - [`CfError::NoCounterfactualFound`] when no strength yields an
    ///   accepted candidate.
    fn compute_counterfactual(
        &self, x: &Array1<f64>, target: &Target<<Self::Model as ModelWithLoss>::Output>,
        options: &SearchOptions<<Self::Model as ModelWithLoss>::Output>,
    ) -> CfResult<CounterfactualResult<<Self::Model as ModelWithLoss>::Output>> {
        let model = self.rebuild_model();
        let wrapper = self.wrap_input(x, options.features_whitelist.as_deref())?;
        let x0 = wrapper.x0();
        let y_orig = model.predict(wrapper.original())?;
        let acceptance = Acceptance::resolve(options.done.as_ref(), target);
        let loss = model.get_loss(&acceptance.loss_target(target), Some(&y_orig))?;
        let penalty = options.regularization.build(wrapper.original())?;

        let total = options.strengths.len();
        for (attempt, strength) in options.strengths.iter().enumerate() {
            debug!(
                "counterfactual attempt {}/{total}: C = {strength}, optimizer = {}, regularization = {}",
                attempt + 1,
                options.optimizer.name(),
                options.regularization.name(),
            );
            let cost = self.build_loss(&wrapper, loss.as_ref(), penalty.as_deref(), strength);
            let (x_cf, y_cf) =
                self.compute_counterfactual_ex(&wrapper, cost.as_ref(), x0.clone(), options)?;
            if acceptance.accepts(&y_cf) {
                info!("counterfactual found at C = {strength}: {y_orig:?} -> {y_cf:?}");
                let delta = wrapper.original() - &x_cf;
                return Ok(CounterfactualResult { x_cf, y_cf, delta });
            }
            debug!("candidate rejected at C = {strength}: prediction {y_cf:?}");
        }
        warn!("no counterfactual found after {total} attempt(s)");
        Err(CfError::NoCounterfactualFound { attempts: total })
    }
}

/// Stock [`Counterfactual`] implementation over a borrowed model.
pub struct Explainer<'m, M> {
    model: &'m M,
}

impl<'m, M: ModelWithLoss> Explainer<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }
}

impl<M: ModelWithLoss> Counterfactual for Explainer<'_, M> {
    type Model = M;

    fn rebuild_model(&self) -> &M {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterfactual::{options::Strengths, regularization::Regularization};
    use crate::optimization::{
        cost_optimizer::{
            Cost, GradientFn, OptimizerArgs, OptimizerChoice, OptimizerFactory, Solve,
        },
        errors::OptResult,
    };
    use ndarray::array;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Class 1 when x0 > 0, else class 0. Hinge loss on x0, black-box.
    struct Threshold;

    struct Hinge {
        sign: f64,
    }

    impl Objective for Hinge {
        fn value(&self, x: &Theta) -> OptResult<Cost> {
            Ok((1.0 - self.sign * x[0]).max(0.0))
        }
    }

    impl ModelWithLoss for Threshold {
        type Output = usize;

        fn dim(&self) -> usize {
            2
        }

        fn predict(&self, x: &Array1<f64>) -> CfResult<usize> {
            Ok(usize::from(x[0] > 0.0))
        }

        fn get_loss(
            &self, target: &Target<usize>, _prediction: Option<&usize>,
        ) -> CfResult<Box<dyn Objective + '_>> {
            let sign = match target.steer_value().copied() {
                Some(1) => 1.0,
                _ => -1.0,
            };
            Ok(Box::new(Hinge { sign }))
        }
    }

    /// Adds 1 to every free coordinate and counts dispatches.
    struct Jump {
        calls: Rc<Cell<usize>>,
    }

    struct JumpSolve {
        x0: Theta,
    }

    impl Solve for JumpSolve {
        fn solve(self: Box<Self>) -> OptResult<Theta> {
            Ok(self.x0 + 1.0)
        }
    }

    impl OptimizerFactory for Jump {
        fn build<'a>(
            &self, _cost: &'a dyn Objective, x0: Theta, _gradient: Option<GradientFn<'a>>,
            _args: &OptimizerArgs,
        ) -> OptResult<Box<dyn Solve + 'a>> {
            self.calls.set(self.calls.get() + 1);
            Ok(Box::new(JumpSolve { x0 }))
        }
    }

    fn jump_options(calls: &Rc<Cell<usize>>, schedule: Vec<f64>) -> SearchOptions<usize> {
        SearchOptions::default()
            .with_optimizer(OptimizerChoice::custom(Jump { calls: Rc::clone(calls) }))
            .with_strengths(Strengths::new(schedule).unwrap())
    }

    #[test]
    // Purpose
    // -------
    // The loop stops at the first accepted strength and never dispatches for
    // the rest of the schedule.
    //
    // Given
    // -----
    // - x = (-0.5, 3) predicted as class 0; target class 1.
    // - A three-strength schedule and an optimizer that jumps every free
    //   coordinate by +1.
    //
    // Expect
    // ------
    // - Exactly one dispatch.
    // - x_cf = (0.5, 4), y_cf = 1, delta = (-1, -1).
    fn first_accepted_strength_ends_the_schedule() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let options = jump_options(&calls, vec![0.1, 1.0, 10.0]);
        let explainer = Explainer::new(&Threshold);

        // Act
        let res = explainer
            .compute_counterfactual(&array![-0.5, 3.0], &Target::Value(1), &options)
            .unwrap();

        // Assert
        assert_eq!(calls.get(), 1);
        assert_eq!(res.x_cf, array![0.5, 4.0]);
        assert_eq!(res.y_cf, 1);
        assert_eq!(res.delta, array![-1.0, -1.0]);
    }

    #[test]
    fn pinned_dimensions_have_zero_delta() {
        let calls = Rc::new(Cell::new(0));
        let options = jump_options(&calls, vec![1.0]).with_whitelist(vec![0]);

        let (x_cf, y_cf, delta) = Explainer::new(&Threshold)
            .compute_counterfactual(&array![-0.5, 3.0], &Target::Value(1), &options)
            .unwrap()
            .into_triple();

        assert_eq!(x_cf, array![0.5, 3.0]);
        assert_eq!(y_cf, 1);
        assert_eq!(delta[1], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // A `done` predicate that never accepts exhausts the schedule after one
    // dispatch per strength.
    fn rejecting_done_exhausts_schedule() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let options = jump_options(&calls, vec![0.001, 0.01, 0.1]).with_done(|_: &usize| false);

        // Act
        let res = Explainer::new(&Threshold).compute_counterfactual(
            &array![-0.5, 3.0],
            &Target::Value(1),
            &options,
        );

        // Assert
        assert_eq!(res, Err(CfError::NoCounterfactualFound { attempts: 3 }));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn input_dimension_must_match_model() {
        let res = Explainer::new(&Threshold).compute_counterfactual(
            &array![1.0, 2.0, 3.0],
            &Target::Value(1),
            &SearchOptions::default(),
        );
        assert_eq!(res, Err(CfError::DimMismatch { expected: 2, found: 3 }));
    }

    #[test]
    fn invalid_whitelist_fails_before_any_dispatch() {
        let calls = Rc::new(Cell::new(0));
        let options = jump_options(&calls, vec![1.0]).with_whitelist(vec![5]);

        let res = Explainer::new(&Threshold).compute_counterfactual(
            &array![-0.5, 3.0],
            &Target::Value(1),
            &options,
        );

        assert_eq!(res, Err(CfError::InvalidFeatureIndex { index: 5, dim: 2 }));
        assert_eq!(calls.get(), 0);
    }

    /// Overrides `wrap_input` to always pin the second feature.
    struct FirstFeatureOnly<'m> {
        model: &'m Threshold,
    }

    impl Counterfactual for FirstFeatureOnly<'_> {
        type Model = Threshold;

        fn rebuild_model(&self) -> &Threshold {
            self.model
        }

        fn wrap_input(
            &self, x: &Array1<f64>, _whitelist: Option<&[usize]>,
        ) -> CfResult<InputWrapper> {
            InputWrapper::new(x.clone(), Some(&[0][..]))
        }
    }

    #[test]
    // Purpose
    // -------
    // Overriding one step of the loop changes the search without touching
    // the rest of it.
    fn overridden_wrap_input_is_used_by_the_loop() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let options = jump_options(&calls, vec![1.0]);
        let explainer = FirstFeatureOnly { model: &Threshold };

        // Act
        let res = explainer
            .compute_counterfactual(&array![-0.5, 3.0], &Target::Value(1), &options)
            .unwrap();

        // Assert
        assert_eq!(res.x_cf, array![0.5, 3.0]);
        assert_eq!(res.delta, array![-1.0, 0.0]);
    }

    #[test]
    fn derivative_free_default_optimizer_runs_the_real_loop() {
        let options = SearchOptions::default().with_regularization(Regularization::None);
        let res = Explainer::new(&Threshold)
            .compute_counterfactual(&array![-0.5, 3.0], &Target::Value(1), &options)
            .unwrap();
        assert_eq!(res.y_cf, 1);
        assert!(res.x_cf[0] > 0.0);
    }
}
