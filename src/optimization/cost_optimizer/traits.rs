//! Public API surface for cost minimization.
//!
//! - [`Objective`]: trait implemented by every cost the crate minimizes.
//! - [`OptimizerArgs`], [`Tolerances`], [`StepArgs`]: solver configuration.
//! - [`LineSearcher`]: choice of line search used by the quasi-Newton solvers.
//! - [`OptimOutcome`]: normalized result of a built-in solver run.
//!
//! Convention: objectives are *minimized*. An objective that cannot supply a
//! gradient keeps the default [`Objective::grad`] and
//! [`Objective::is_differentiable`]; gradient-based solvers then refuse it.
use crate::optimization::{
    cost_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        types::DEFAULT_SD_TOLERANCE,
        validation::{
            validate_theta_hat, validate_value, verify_learning_rate, verify_momentum,
            verify_sd_tolerance, verify_tol_cost, verify_tol_grad,
        },
    },
    errors::{OptError, OptResult},
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Scalar cost over a parameter vector.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: evaluate the cost.
///
/// Optional (override both together):
/// - `grad(&Theta) -> OptResult<Grad>`: analytic gradient of the cost.
/// - `is_differentiable() -> bool`: advertise that `grad` is implemented.
///   The dispatcher consults this flag *before* running a solver.
pub trait Objective {
    fn value(&self, theta: &Theta) -> OptResult<Cost>;

    fn grad(&self, _theta: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn is_differentiable(&self) -> bool {
        false
    }
}

impl<T: Objective + ?Sized> Objective for Box<T> {
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        (**self).value(theta)
    }

    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        (**self).grad(theta)
    }

    fn is_differentiable(&self) -> bool {
        (**self).is_differentiable()
    }
}

/// Line search run inside BFGS and L-BFGS.
///
/// Parses `"more-thuente"` / `"hager-zhang"`, ignoring case, `-` and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.chars().filter(|c| !matches!(c, '-' | '_')).collect::<String>().to_lowercase();
        match key.as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "expected 'more-thuente' or 'hager-zhang'",
            }),
        }
    }
}

/// Stopping rules for the built-in solvers.
///
/// `tol_grad` bounds the gradient norm, `tol_cost` the per-iteration cost
/// change, `max_iter` the iteration count. Nelder–Mead only honors
/// `max_iter`; its own convergence test uses
/// [`OptimizerArgs::sd_tolerance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// [`OptError::NoTolerancesProvided`] when all rules are `None`; the
    /// matching `Invalid*` variant for a non-positive or non-finite rule.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if (tol_grad, tol_cost, max_iter) == (None, None, None) {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter { max_iter: 0, reason: "cap must be >= 1" });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Step-size parameters for first-order solvers.
///
/// - `lr`: learning rate, finite and `> 0`.
/// - `momentum`: heavy-ball coefficient in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepArgs {
    pub lr: f64,
    pub momentum: f64,
}

impl StepArgs {
    pub fn new(lr: f64, momentum: f64) -> OptResult<Self> {
        verify_learning_rate(lr)?;
        verify_momentum(momentum)?;
        Ok(Self { lr, momentum })
    }
}

impl Default for StepArgs {
    fn default() -> Self {
        Self { lr: 0.1, momentum: 0.9 }
    }
}

/// Solver configuration handed to the dispatcher.
///
/// Built-in solvers read the typed fields; custom optimizers receive the
/// whole struct, including the free-form `extra` map, without any
/// interpretation by the dispatcher.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 1000`
/// - `line_searcher`: `MoreThuente`
/// - `lbfgs_mem`: `None` (uses [`DEFAULT_LBFGS_MEM`](super::DEFAULT_LBFGS_MEM))
/// - `step`: `lr = 0.1`, `momentum = 0.9`
/// - `sd_tolerance`: [`DEFAULT_SD_TOLERANCE`]
/// - `verbose`: `false`
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerArgs {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
    pub step: StepArgs,
    pub sd_tolerance: f64,
    pub verbose: bool,
    pub extra: BTreeMap<String, f64>,
}

impl OptimizerArgs {
    /// Create validated optimizer arguments.
    ///
    /// Numeric fields of `tols` and `step` are validated by their own
    /// constructors; this checks the remaining scalars.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`OptError::InvalidSdTolerance`] if `sd_tolerance` is non-finite or `<= 0`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>, step: StepArgs,
        sd_tolerance: f64, verbose: bool,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem { mem: 0, reason: "history must be >= 1" });
        }
        verify_sd_tolerance(sd_tolerance)?;
        Ok(Self {
            tols,
            line_searcher,
            lbfgs_mem,
            step,
            sd_tolerance,
            verbose,
            extra: BTreeMap::new(),
        })
    }

    /// Replace the iteration cap, keeping the other tolerances.
    pub fn with_max_iter(mut self, max_iter: usize) -> OptResult<Self> {
        self.tols = Tolerances::new(self.tols.tol_grad, self.tols.tol_cost, Some(max_iter))?;
        Ok(self)
    }

    /// Attach a pass-through setting for custom optimizers.
    pub fn with_extra(mut self, key: impl Into<String>, value: f64) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl Default for OptimizerArgs {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(1000) },
            line_searcher: LineSearcher::default(),
            lbfgs_mem: None,
            step: StepArgs::default(),
            sd_tolerance: DEFAULT_SD_TOLERANCE,
            verbose: false,
            extra: BTreeMap::new(),
        }
    }
}

/// Summary of a built-in solver run: the best point and its cost, whether
/// Argmin reported a termination reason (`converged`, `status`), iteration
/// and evaluation counts, and the last gradient norm when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: Cost,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` (missing or
    ///   non-finite) and `value` (non-finite).
    pub fn new(
        theta_hat_opt: Option<Theta>, value: Cost, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` must reject a configuration with no stopping rule.
    fn tolerances_require_at_least_one_rule() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
    }

    #[test]
    fn tolerances_reject_zero_max_iter() {
        let err = Tolerances::new(Some(1e-6), None, Some(0)).unwrap_err();
        assert!(matches!(err, OptError::InvalidMaxIter { max_iter: 0, .. }));
    }

    #[test]
    fn line_searcher_parses_loose_spellings() {
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("hager-zhang".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("more_thuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert_eq!("moreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Step arguments enforce a positive learning rate and a momentum in [0, 1).
    //
    // Given
    // -----
    // - A valid pair, a zero learning rate, and a momentum of 1.
    //
    // Expect
    // ------
    // - Only the valid pair constructs.
    fn step_args_validate_ranges() {
        assert!(StepArgs::new(0.9, 0.9).is_ok());
        assert!(matches!(StepArgs::new(0.0, 0.5), Err(OptError::InvalidLearningRate { .. })));
        assert!(matches!(StepArgs::new(0.1, 1.0), Err(OptError::InvalidMomentum { .. })));
    }

    #[test]
    fn optimizer_args_reject_zero_lbfgs_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();
        let res = OptimizerArgs::new(
            tols,
            LineSearcher::MoreThuente,
            Some(0),
            StepArgs::default(),
            DEFAULT_SD_TOLERANCE,
            false,
        );
        assert!(matches!(res, Err(OptError::InvalidLBFGSMem { mem: 0, .. })));
    }

    #[test]
    fn optimizer_args_with_max_iter_keeps_other_tolerances() {
        let args = OptimizerArgs::default().with_max_iter(250).unwrap().with_extra("lr", 0.5);
        assert_eq!(args.tols.max_iter, Some(250));
        assert_eq!(args.tols.tol_grad, Some(1e-6));
        assert_eq!(args.extra.get("lr"), Some(&0.5));
    }

    #[test]
    fn outcome_rejects_missing_theta_hat() {
        let res = OptimOutcome::new(
            None,
            0.0,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );
        assert_eq!(res, Err(OptError::MissingThetaHat));
    }
}
