//! Heavy-ball gradient descent as an `argmin` solver.
//!
//! Update rule with learning rate `η` and momentum `μ`:
//!
//! ```text
//! v_{k+1} = μ v_k − η ∇c(z_k)
//! z_{k+1} = z_k + v_{k+1}
//! ```
//!
//! The solver stops on its own when `‖∇c(z_k)‖ < tol_grad` or when one step
//! changes the cost by less than `tol_cost`; otherwise the executor's
//! `max_iters` cap ends the run. Argmin's best-parameter
//! bookkeeping means the returned point is the lowest-cost iterate seen, so
//! overshooting steps never make the final answer worse.
use crate::optimization::{
    cost_optimizer::{
        traits::StepArgs,
        types::{Cost, Grad, Theta},
        validation::{verify_learning_rate, verify_momentum, verify_tol_cost, verify_tol_grad},
    },
    errors::{OptError, OptResult},
};
use argmin::core::{
    CostFunction, Error, Gradient, IterState, KV, Problem, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin_math::ArgminL2Norm;

type MomentumState = IterState<Theta, Grad, (), (), (), Cost>;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumDescent {
    lr: f64,
    momentum: f64,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    velocity: Option<Theta>,
    last_cost_change: Option<f64>,
}

impl MomentumDescent {
    /// # Errors
    /// Invalid learning rate, momentum, or tolerance.
    pub fn new(step: StepArgs, tol_grad: Option<f64>, tol_cost: Option<f64>) -> OptResult<Self> {
        verify_learning_rate(step.lr)?;
        verify_momentum(step.momentum)?;
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        Ok(Self {
            lr: step.lr,
            momentum: step.momentum,
            tol_grad,
            tol_cost,
            velocity: None,
            last_cost_change: None,
        })
    }

    fn gradient_small(&self, grad: &Grad) -> bool {
        matches!(self.tol_grad, Some(tol) if grad.l2_norm() < tol)
    }

    fn cost_stalled(&self) -> bool {
        matches!((self.tol_cost, self.last_cost_change), (Some(tol), Some(change)) if change < tol)
    }
}

impl<O> Solver<O, MomentumState> for MomentumDescent
where
    O: CostFunction<Param = Theta, Output = Cost> + Gradient<Param = Theta, Gradient = Grad>,
{
    const NAME: &'static str = "Momentum gradient descent";

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: MomentumState,
    ) -> Result<(MomentumState, Option<KV>), Error> {
        let param = state.take_param().ok_or(OptError::Solver {
            kind: "not initialized",
            text: "Initial parameter vector required by momentum descent.".to_string(),
        })?;
        let cost = problem.cost(&param)?;
        let grad = problem.gradient(&param)?;
        self.velocity = Some(Theta::zeros(param.len()));
        self.last_cost_change = None;
        Ok((state.param(param).cost(cost).gradient(grad), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: MomentumState,
    ) -> Result<(MomentumState, Option<KV>), Error> {
        let prev_cost = state.get_cost();
        let param = state.take_param().ok_or(OptError::MissingThetaHat)?;
        let grad = match state.take_gradient() {
            Some(g) => g,
            None => problem.gradient(&param)?,
        };
        let velocity = match self.velocity.take() {
            Some(v) => v * self.momentum - &grad * self.lr,
            None => &grad * -self.lr,
        };
        let next = &param + &velocity;
        let cost = problem.cost(&next)?;
        let next_grad = problem.gradient(&next)?;
        self.velocity = Some(velocity);
        self.last_cost_change = Some((prev_cost - cost).abs());
        Ok((state.param(next).cost(cost).gradient(next_grad), None))
    }

    fn terminate(&mut self, state: &MomentumState) -> TerminationStatus {
        let grad_done = state.get_gradient().is_some_and(|g| self.gradient_small(g));
        if grad_done || self.cost_stalled() {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else {
            TerminationStatus::NotTerminated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::cost_optimizer::{adapter::ArgMinAdapter, traits::Objective};
    use approx::assert_abs_diff_eq;
    use argmin::core::Executor;
    use ndarray::array;

    struct Shifted;

    impl Objective for Shifted {
        fn value(&self, theta: &Theta) -> OptResult<Cost> {
            Ok((theta[0] - 3.0).powi(2) + (theta[1] + 1.0).powi(2))
        }

        fn grad(&self, theta: &Theta) -> OptResult<Grad> {
            Ok(array![2.0 * (theta[0] - 3.0), 2.0 * (theta[1] + 1.0)])
        }

        fn is_differentiable(&self) -> bool {
            true
        }
    }

    #[test]
    fn rejects_invalid_step_arguments() {
        let step = StepArgs { lr: -1.0, momentum: 0.5 };
        assert!(matches!(
            MomentumDescent::new(step, None, None),
            Err(OptError::InvalidLearningRate { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Momentum descent drives a convex quadratic to its minimizer and stops
    // through its own gradient test.
    //
    // Given
    // -----
    // - c(z) = (z0 − 3)² + (z1 + 1)², start at the origin.
    // - lr = 0.1, momentum = 0.5, tol_grad = 1e-8, at most 2000 iterations.
    //
    // Expect
    // ------
    // - Best parameter ≈ (3, −1).
    fn converges_on_shifted_quadratic() {
        // Arrange
        let solver = MomentumDescent::new(StepArgs { lr: 0.1, momentum: 0.5 }, Some(1e-8), None)
            .expect("valid step arguments");
        let objective = Shifted;
        let problem = ArgMinAdapter::new(&objective);

        // Act
        let res = Executor::new(problem, solver)
            .configure(|state| state.param(array![0.0, 0.0]).max_iters(2000))
            .run()
            .expect("run should succeed");
        let best = res.state().get_best_param().cloned().expect("best param");

        // Assert
        assert_abs_diff_eq!(best[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(best[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A cost-change tolerance alone ends the run; no gradient tolerance and
    // no iteration cap are configured.
    //
    // Given
    // -----
    // - c(z) = (z0 − 3)² + (z1 + 1)², start at the origin.
    // - lr = 0.1, momentum = 0.5, tol_cost = 1e-12 only.
    //
    // Expect
    // ------
    // - The executor stops with `SolverConverged` near (3, −1).
    fn cost_tolerance_alone_terminates() {
        // Arrange
        let solver = MomentumDescent::new(StepArgs { lr: 0.1, momentum: 0.5 }, None, Some(1e-12))
            .expect("valid step arguments");
        let objective = Shifted;
        let problem = ArgMinAdapter::new(&objective);

        // Act
        let res = Executor::new(problem, solver)
            .configure(|state| state.param(array![0.0, 0.0]))
            .run()
            .expect("run should succeed");
        let state = res.state();
        let best = state.get_best_param().cloned().expect("best param");

        // Assert
        assert_eq!(
            state.get_termination_status(),
            &TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
        assert_abs_diff_eq!(best[0], 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(best[1], -1.0, epsilon = 1e-4);
    }
}
