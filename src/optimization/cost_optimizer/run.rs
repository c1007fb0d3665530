//! Solver runners.
//!
//! Argmin solvers differ in the state they carry (nothing extra for the
//! simplex, an inverse Hessian for BFGS), so each state shape gets its own
//! runner. All of them seed the start point, apply the iteration cap,
//! optionally attach the slog observer, and summarize the final state as an
//! [`OptimOutcome`].
use crate::optimization::{
    cost_optimizer::{
        Cost, Grad, OptimOutcome, OptimizerArgs, Theta,
        adapter::ArgMinAdapter,
        types::{BfgsMoreThuente, InvHessian, NelderMeadSimplex},
    },
    errors::OptResult,
};
use argmin::core::{CostFunction, Executor, Gradient, IterState, Solver, State};
use argmin_math::ArgminL2Norm;
use log::debug;

pub type GradientState = IterState<Theta, Grad, (), (), (), Cost>;

pub type BfgsState = IterState<Theta, Grad, (), InvHessian, (), Cost>;

pub type SimplexState = IterState<Theta, (), (), (), (), Cost>;

/// Run a solver over [`GradientState`] (L-BFGS, momentum descent).
///
/// # Errors
/// Argmin runtime failures (line search, callback errors) and
/// [`OptimOutcome::new`] validation.
pub fn run_gradient<'a, S>(
    theta0: Theta, args: &OptimizerArgs, problem: ArgMinAdapter<'a>, solver: S,
) -> OptResult<OptimOutcome>
where
    S: Solver<ArgMinAdapter<'a>, GradientState>,
{
    if args.verbose {
        log_start(&theta0, &problem)?;
    }
    let max_iter = args.tols.max_iter;
    let exec = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(n) => state.max_iters(n as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let exec = if args.verbose {
        exec.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        exec
    };
    let mut state = exec.run()?.state().clone();
    let grad = state.take_gradient();
    summarize(state, grad)
}

/// Run BFGS from the identity inverse Hessian.
pub fn run_bfgs<'a>(
    theta0: Theta, args: &OptimizerArgs, problem: ArgMinAdapter<'a>, solver: BfgsMoreThuente,
) -> OptResult<OptimOutcome> {
    if args.verbose {
        log_start(&theta0, &problem)?;
    }
    let max_iter = args.tols.max_iter;
    let inv_hessian = InvHessian::eye(theta0.len());
    let exec: Executor<ArgMinAdapter<'a>, BfgsMoreThuente, BfgsState> =
        Executor::new(problem, solver).configure(|state| {
            let state = state.param(theta0).inv_hessian(inv_hessian);
            match max_iter {
                Some(n) => state.max_iters(n as u64),
                None => state,
            }
        });
    #[cfg(feature = "obs_slog")]
    let exec = if args.verbose {
        exec.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        exec
    };
    let mut state = exec.run()?.state().clone();
    let grad = state.take_gradient();
    summarize(state, grad)
}

/// Run Nelder–Mead. The start point is already baked into the simplex.
pub fn run_simplex<'a>(
    args: &OptimizerArgs, problem: ArgMinAdapter<'a>, solver: NelderMeadSimplex,
) -> OptResult<OptimOutcome> {
    let max_iter = args.tols.max_iter;
    let exec: Executor<ArgMinAdapter<'a>, NelderMeadSimplex, SimplexState> =
        Executor::new(problem, solver).configure(|state| match max_iter {
            Some(n) => state.max_iters(n as u64),
            None => state,
        });
    #[cfg(feature = "obs_slog")]
    let exec = if args.verbose {
        exec.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        exec
    };
    let state = exec.run()?.state().clone();
    summarize(state, None)
}

fn summarize<S>(state: S, grad: Option<Grad>) -> OptResult<OptimOutcome>
where
    S: State<Param = Theta, Float = Cost>,
{
    OptimOutcome::new(
        state.get_best_param().cloned(),
        state.get_best_cost(),
        state.get_termination_status().clone(),
        state.get_iter(),
        state.get_func_counts().clone(),
        grad,
    )
}

fn log_start(theta0: &Theta, problem: &ArgMinAdapter<'_>) -> OptResult<()> {
    let cost = problem.cost(theta0)?;
    match problem.gradient(theta0) {
        Ok(g) => debug!("solver start: cost = {cost:.6}, |grad| = {:.6}", g.l2_norm()),
        Err(_) => debug!("solver start: cost = {cost:.6}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        cost_optimizer::{
            builders::{build_bfgs, build_lbfgs_more_thuente, build_nelder_mead},
            traits::Objective,
        },
        errors::OptResult,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Convex bowl centred at (1, 2).
    struct Bowl;

    impl Objective for Bowl {
        fn value(&self, z: &Theta) -> OptResult<Cost> {
            Ok((z[0] - 1.0).powi(2) + 3.0 * (z[1] - 2.0).powi(2))
        }

        fn grad(&self, z: &Theta) -> OptResult<Grad> {
            Ok(array![2.0 * (z[0] - 1.0), 6.0 * (z[1] - 2.0)])
        }

        fn is_differentiable(&self) -> bool {
            true
        }
    }

    #[test]
    // Purpose
    // -------
    // Each runner minimizes a convex quadratic and reports a converged,
    // validated outcome.
    //
    // Given
    // -----
    // - c(z) = (z0 − 1)² + 3 (z1 − 2)², start at (0, 0), default arguments.
    //
    // Expect
    // ------
    // - L-BFGS, BFGS and Nelder–Mead all land near (1, 2) with a small cost.
    fn runners_minimize_convex_bowl() {
        // Arrange
        let args = OptimizerArgs::default();
        let x0 = array![0.0, 0.0];
        let objective = Bowl;

        // Act
        let lbfgs = run_gradient(
            x0.clone(),
            &args,
            ArgMinAdapter::new(&objective),
            build_lbfgs_more_thuente(&args).unwrap(),
        )
        .unwrap();
        let bfgs =
            run_bfgs(x0.clone(), &args, ArgMinAdapter::new(&objective), build_bfgs(&args).unwrap())
                .unwrap();
        let simplex = run_simplex(
            &args,
            ArgMinAdapter::new(&objective),
            build_nelder_mead(&x0, &args).unwrap(),
        )
        .unwrap();

        // Assert
        for out in [&lbfgs, &bfgs] {
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!(out.theta_hat[1], 2.0, epsilon = 1e-4);
            assert!(out.grad_norm.is_some());
        }
        assert_abs_diff_eq!(simplex.theta_hat[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(simplex.theta_hat[1], 2.0, epsilon = 1e-2);
        assert!(simplex.grad_norm.is_none());
        assert!(simplex.value < 1e-3);
    }
}
