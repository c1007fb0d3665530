//! cost_optimizer: argmin-powered minimization of counterfactual costs.
//!
//! Purpose
//! -------
//! Provide the minimization layer used by the counterfactual search. Callers
//! implement [`Objective`] for a scalar cost over a reduced variable `z`,
//! pick an [`OptimizerChoice`], and call [`minimize`] to obtain the solution
//! vector without touching Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Bridge [`Objective`] into Argmin's `CostFunction`/`Gradient` traits via
//!   [`adapter::ArgMinAdapter`].
//! - Offer four built-in strategies ([`BuiltinOptimizer`]): Nelder–Mead
//!   (derivative-free, the default), BFGS, L-BFGS with a selectable line
//!   search, and heavy-ball gradient descent ([`momentum::MomentumDescent`]).
//! - Accept caller-supplied optimizers through [`OptimizerFactory`] /
//!   [`Solve`], handing them the cost, the start, an optional gradient
//!   callback and the pass-through [`OptimizerArgs`].
//! - Refuse gradient-based built-ins for black-box objectives up front
//!   ([`OptError::OptimizerRequiresGradient`](crate::optimization::errors::OptError)).
//!   Numerical gradients are available only by wrapping the objective in
//!   [`FiniteDiffObjective`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Objectives are *minimized*; costs must be finite wherever the solver
//!   evaluates them, otherwise the run fails with `NonFiniteCost`.
//! - Configuration types ([`Tolerances`], [`StepArgs`], [`OptimizerArgs`])
//!   are validated on construction.
//! - Every vector returned by [`minimize`] has the dimension of `x0` and only
//!   finite entries.
//!
//! Conventions
//! -----------
//! - Parameters and gradients are `Array1<f64>` ([`Theta`], [`Grad`]).
//! - Errors bubble up as `OptResult<T>`; raw Argmin errors are converted at
//!   the `?` boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover adapter validation, solver construction,
//!   the momentum solver, each runner, finite differences, and dispatch.
//! - End-to-end searches are covered by the crate's integration tests.
pub mod adapter;
pub mod builders;
pub mod dispatch;
pub mod finite_diff;
pub mod momentum;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::dispatch::{
    BuiltinOptimizer, GradientFn, OptimizerChoice, OptimizerFactory, Solve, minimize,
    run_builtin,
};
pub use self::finite_diff::FiniteDiffObjective;
pub use self::traits::{
    LineSearcher, Objective, OptimOutcome, OptimizerArgs, StepArgs, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::{
        BuiltinOptimizer, Cost, FiniteDiffObjective, Grad, GradientFn, LineSearcher, Objective,
        OptimizerArgs, OptimizerChoice, OptimizerFactory, Solve, StepArgs, Theta, Tolerances,
        minimize,
    };
}
