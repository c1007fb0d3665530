//! Error surface of the optimization layer.
//!
//! Configuration mistakes, numerical failures inside objectives and Argmin
//! backend errors all end up as one [`OptError`]. Objective errors raised
//! inside Argmin callbacks are recovered unchanged by the `From` impl.
use argmin::core::{ArgminError, Error};

pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Differentiability ----
    /// The objective only exposes zero-order evaluations.
    GradientNotImplemented,

    /// A gradient-based optimizer was selected for a black-box objective.
    OptimizerRequiresGradient {
        optimizer: String,
    },

    /// An objective returned a gradient of the wrong length.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// An objective returned a NaN or infinite partial derivative.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Solver configuration ----
    /// `tol_grad` outside (0, ∞).
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// `tol_cost` outside (0, ∞).
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Iteration cap of zero.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Every stopping rule was disabled.
    NoTolerancesProvided,

    /// Unrecognized line-search name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// L-BFGS history of zero.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Learning rate needs to be positive and finite.
    InvalidLearningRate {
        lr: f64,
        reason: &'static str,
    },

    /// Momentum needs to lie in [0, 1).
    InvalidMomentum {
        momentum: f64,
        reason: &'static str,
    },

    /// Nelder–Mead simplex standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance {
        tol: f64,
        reason: &'static str,
    },

    /// Optimizer name is not one of the built-in choices.
    UnknownOptimizer {
        name: String,
        reason: &'static str,
    },

    // ---- Objective evaluation ----
    /// An objective evaluated to NaN or ±∞.
    NonFiniteCost {
        value: f64,
    },

    /// Parameter vector passed to an objective has the wrong length.
    ParamDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Initial point must be non-empty.
    EmptyParameter,

    // ---- Solver result ----
    /// The best point reported by a solver has a non-finite coordinate.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// A solver finished without reporting a best point.
    MissingThetaHat,

    /// A caller-supplied solver reported a failure.
    CustomSolverFailed {
        text: String,
    },

    // ---- Argmin ----
    /// Failure raised by the Argmin backend; `kind` names the Argmin error
    /// class ("invalid parameter", "condition violated", ...).
    Solver {
        kind: &'static str,
        text: String,
    },
}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use OptError::*;
        match self {
            GradientNotImplemented => write!(f, "objective has no analytic gradient"),
            OptimizerRequiresGradient { optimizer } => write!(
                f,
                "optimizer '{optimizer}' needs a gradient but the cost is not differentiable \
                 (black-box model loss or non-differentiable regularization); \
                 choose a gradient-free optimizer such as 'nelder-mead'"
            ),
            GradientDimMismatch { expected, found } => {
                write!(f, "gradient has length {found}, expected {expected}")
            }
            InvalidGradient { index, value, reason } => {
                write!(f, "gradient[{index}] = {value}: {reason}")
            }
            InvalidTolGrad { tol, reason } => write!(f, "tol_grad = {tol}: {reason}"),
            InvalidTolCost { tol, reason } => write!(f, "tol_cost = {tol}: {reason}"),
            InvalidMaxIter { max_iter, reason } => write!(f, "max_iter = {max_iter}: {reason}"),
            NoTolerancesProvided => {
                write!(f, "at least one of tol_grad, tol_cost or max_iter must be set")
            }
            InvalidLineSearch { name, reason } => write!(f, "line search '{name}': {reason}"),
            InvalidLBFGSMem { mem, reason } => write!(f, "lbfgs_mem = {mem}: {reason}"),
            InvalidLearningRate { lr, reason } => write!(f, "learning rate {lr}: {reason}"),
            InvalidMomentum { momentum, reason } => write!(f, "momentum {momentum}: {reason}"),
            InvalidSdTolerance { tol, reason } => write!(f, "simplex sd tolerance {tol}: {reason}"),
            UnknownOptimizer { name, reason } => write!(f, "unknown optimizer '{name}': {reason}"),
            NonFiniteCost { value } => write!(f, "cost evaluated to {value}"),
            ParamDimMismatch { expected, found } => {
                write!(f, "parameter vector has length {found}, expected {expected}")
            }
            EmptyParameter => write!(f, "starting point is empty"),
            InvalidThetaHat { index, value, reason } => {
                write!(f, "solution[{index}] = {value}: {reason}")
            }
            MissingThetaHat => write!(f, "solver reported no best point"),
            CustomSolverFailed { text } => write!(f, "custom optimizer failed: {text}"),
            Solver { kind, text } => write!(f, "argmin {kind} error: {text}"),
        }
    }
}

impl std::error::Error for OptError {}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        // Errors raised inside cost/gradient callbacks travel through argmin
        // boxed; recover them first so callers see the original variant.
        let err = match err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let text = err.to_string();
        let kind = match err.downcast_ref::<ArgminError>() {
            Some(ArgminError::InvalidParameter { .. }) => "invalid parameter",
            Some(ArgminError::NotImplemented { .. }) => "not implemented",
            Some(ArgminError::NotInitialized { .. }) => "not initialized",
            Some(ArgminError::ConditionViolated { .. }) => "condition violated",
            Some(ArgminError::CheckpointNotFound { .. }) => "checkpoint not found",
            Some(ArgminError::PotentialBug { .. }) => "potential bug",
            Some(ArgminError::ImpossibleError { .. }) => "impossible error",
            _ => "backend",
        };
        OptError::Solver { kind, text }
    }
}
