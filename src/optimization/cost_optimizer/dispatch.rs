//! cost_optimizer::dispatch: resolve an optimizer choice and run it.
//!
//! Purpose
//! -------
//! Map an optimizer identifier (a built-in name) or a caller-supplied
//! optimizer factory, together with an [`Objective`] and an initial point,
//! onto a concrete solve strategy, run it to its own termination criterion,
//! and hand back the solution vector.
//!
//! Key behaviors
//! -------------
//! - [`OptimizerChoice`] is resolved exactly once, here; nothing upstream
//!   inspects which kind of optimizer it carries.
//! - Gradient-based built-ins are refused with
//!   [`OptError::OptimizerRequiresGradient`] before any iteration when the
//!   objective is black-box. Custom optimizers are never refused; they
//!   receive `None` as their gradient function and decide for themselves.
//! - Custom optimizers are built from `(cost, x0, gradient, args)` through
//!   [`OptimizerFactory`] and run through the zero-argument [`Solve::solve`].
//! - Every result is checked for dimension and finiteness before it leaves
//!   the dispatcher.
//!
//! Conventions
//! -----------
//! - Runs are synchronous and blocking; no partial results are exposed.
//! - [`OptimizerArgs`] reach custom factories untouched.
use crate::optimization::{
    cost_optimizer::{
        Grad, OptimOutcome, OptimizerArgs, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_bfgs, build_lbfgs_hager_zhang, build_lbfgs_more_thuente, build_momentum,
            build_nelder_mead,
        },
        run::{run_bfgs, run_gradient, run_simplex},
        traits::{LineSearcher, Objective},
        validation::validate_theta_hat,
    },
    errors::{OptError, OptResult},
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Gradient callback handed to custom optimizers.
pub type GradientFn<'a> = Box<dyn Fn(&Theta) -> OptResult<Grad> + 'a>;

/// Built-in solve strategies.
///
/// Parsing accepts (case-insensitive):
/// - `"nelder-mead"` / `"neldermead"`
/// - `"bfgs"`
/// - `"lbfgs"` / `"l-bfgs"`
/// - `"gradient-descent"` / `"gd"` / `"momentum"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOptimizer {
    NelderMead,
    Bfgs,
    Lbfgs,
    GradientDescent,
}

impl BuiltinOptimizer {
    pub fn requires_gradient(self) -> bool {
        !matches!(self, BuiltinOptimizer::NelderMead)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinOptimizer::NelderMead => "nelder-mead",
            BuiltinOptimizer::Bfgs => "bfgs",
            BuiltinOptimizer::Lbfgs => "lbfgs",
            BuiltinOptimizer::GradientDescent => "gradient-descent",
        }
    }
}

impl FromStr for BuiltinOptimizer {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nelder-mead" | "neldermead" => Ok(BuiltinOptimizer::NelderMead),
            "bfgs" => Ok(BuiltinOptimizer::Bfgs),
            "lbfgs" | "l-bfgs" => Ok(BuiltinOptimizer::Lbfgs),
            "gradient-descent" | "gd" | "momentum" => Ok(BuiltinOptimizer::GradientDescent),
            _ => Err(OptError::UnknownOptimizer {
                name: s.to_string(),
                reason: "Valid options are 'nelder-mead', 'bfgs', 'lbfgs' or 'gradient-descent'.",
            }),
        }
    }
}

impl fmt::Display for BuiltinOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured solver ready to run.
pub trait Solve {
    /// Run to completion and return the solution vector.
    fn solve(self: Box<Self>) -> OptResult<Theta>;
}

/// Builds a [`Solve`] from the pieces the dispatcher owns.
///
/// `gradient` is `Some` exactly when the objective is differentiable.
pub trait OptimizerFactory {
    fn name(&self) -> &str {
        "custom"
    }

    fn build<'a>(
        &self, cost: &'a dyn Objective, x0: Theta, gradient: Option<GradientFn<'a>>,
        args: &OptimizerArgs,
    ) -> OptResult<Box<dyn Solve + 'a>>;
}

/// Which optimizer a search should use.
#[derive(Clone)]
pub enum OptimizerChoice {
    Builtin(BuiltinOptimizer),
    Custom(Arc<dyn OptimizerFactory>),
}

impl OptimizerChoice {
    pub fn custom<F: OptimizerFactory + 'static>(factory: F) -> Self {
        OptimizerChoice::Custom(Arc::new(factory))
    }

    pub fn name(&self) -> &str {
        match self {
            OptimizerChoice::Builtin(b) => b.name(),
            OptimizerChoice::Custom(f) => f.name(),
        }
    }
}

impl Default for OptimizerChoice {
    fn default() -> Self {
        OptimizerChoice::Builtin(BuiltinOptimizer::NelderMead)
    }
}

impl From<BuiltinOptimizer> for OptimizerChoice {
    fn from(b: BuiltinOptimizer) -> Self {
        OptimizerChoice::Builtin(b)
    }
}

impl FromStr for OptimizerChoice {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BuiltinOptimizer>().map(OptimizerChoice::Builtin)
    }
}

impl fmt::Debug for OptimizerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerChoice::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            OptimizerChoice::Custom(c) => f.debug_tuple("Custom").field(&c.name()).finish(),
        }
    }
}

/// Minimize `objective` from `x0` with the chosen optimizer.
///
/// # Errors
/// - [`OptError::EmptyParameter`] for an empty `x0`.
/// - [`OptError::OptimizerRequiresGradient`] when a gradient-based built-in
///   meets a black-box objective.
/// - Builder, runtime, and outcome-validation errors of the chosen solver.
/// - [`OptError::ParamDimMismatch`] / [`OptError::InvalidThetaHat`] when a
///   custom solver returns a malformed vector.
pub fn minimize(
    choice: &OptimizerChoice, objective: &dyn Objective, x0: Theta, args: &OptimizerArgs,
) -> OptResult<Theta> {
    if x0.is_empty() {
        return Err(OptError::EmptyParameter);
    }
    match choice {
        OptimizerChoice::Builtin(builtin) => {
            Ok(run_builtin(*builtin, objective, x0, args)?.theta_hat)
        }
        OptimizerChoice::Custom(factory) => run_custom(factory.as_ref(), objective, x0, args),
    }
}

/// Run a built-in optimizer and keep the full outcome.
pub fn run_builtin(
    builtin: BuiltinOptimizer, objective: &dyn Objective, x0: Theta, args: &OptimizerArgs,
) -> OptResult<OptimOutcome> {
    if builtin.requires_gradient() && !objective.is_differentiable() {
        return Err(OptError::OptimizerRequiresGradient { optimizer: builtin.name().to_string() });
    }
    let problem = ArgMinAdapter::new(objective);
    match builtin {
        BuiltinOptimizer::NelderMead => {
            let solver = build_nelder_mead(&x0, args)?;
            run_simplex(args, problem, solver)
        }
        BuiltinOptimizer::Bfgs => {
            let solver = build_bfgs(args)?;
            run_bfgs(x0, args, problem, solver)
        }
        BuiltinOptimizer::Lbfgs => match args.line_searcher {
            LineSearcher::MoreThuente => {
                let solver = build_lbfgs_more_thuente(args)?;
                run_gradient(x0, args, problem, solver)
            }
            LineSearcher::HagerZhang => {
                let solver = build_lbfgs_hager_zhang(args)?;
                run_gradient(x0, args, problem, solver)
            }
        },
        BuiltinOptimizer::GradientDescent => {
            let solver = build_momentum(args)?;
            run_gradient(x0, args, problem, solver)
        }
    }
}

fn run_custom(
    factory: &dyn OptimizerFactory, objective: &dyn Objective, x0: Theta, args: &OptimizerArgs,
) -> OptResult<Theta> {
    let dim = x0.len();
    let gradient: Option<GradientFn<'_>> = if objective.is_differentiable() {
        Some(Box::new(move |z: &Theta| objective.grad(z)))
    } else {
        None
    };
    let solver = factory.build(objective, x0, gradient, args)?;
    let solution = solver.solve()?;
    if solution.len() != dim {
        return Err(OptError::ParamDimMismatch { expected: dim, found: solution.len() });
    }
    validate_theta_hat(Some(solution))
}
