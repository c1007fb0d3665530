//! cost_optimizer::finite_diff: opt-in numerical gradients.
//!
//! Purpose
//! -------
//! Let callers turn a black-box [`Objective`] into a differentiable one by
//! approximating its gradient with finite differences, so that gradient-based
//! solvers accept it. Nothing in the crate applies this wrapper implicitly:
//! a black-box cost handed to a gradient-based optimizer is an error unless
//! the caller wrapped it first.
//!
//! Key behaviors
//! -------------
//! - [`FiniteDiffObjective`] forwards `value` and computes `grad` with a
//!   central difference, retrying once with a forward difference when the
//!   central estimate fails validation or an evaluation errored.
//! - [`run_fd_diff`] performs the forward-difference pass with error capture.
//!
//! Conventions
//! -----------
//! - The `finitediff` closures must return `f64`, so evaluation errors are
//!   parked in a `RefCell` slot and the closure yields `NaN`; the slot is
//!   inspected after differencing and turned back into an [`OptError`].
use crate::optimization::{
    cost_optimizer::{Cost, Grad, Theta, traits::Objective, validation::validate_grad},
    errors::{OptError, OptResult},
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Wraps an objective and supplies a finite-difference gradient.
#[derive(Debug, Clone)]
pub struct FiniteDiffObjective<O> {
    inner: O,
}

impl<O: Objective> FiniteDiffObjective<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

impl<O: Objective> Objective for FiniteDiffObjective<O> {
    fn value(&self, theta: &Theta) -> OptResult<Cost> {
        self.inner.value(theta)
    }

    /// Central difference first; forward difference when the central pass
    /// captured an evaluation error or produced an invalid gradient.
    fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
        let cost_func = |z: &Theta| -> f64 {
            match self.inner.value(z) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let central = theta.central_diff(&cost_func);
        if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
            return Ok(central);
        }
        run_fd_diff(theta, &cost_func, &closure_err)
    }

    fn is_differentiable(&self) -> bool {
        true
    }
}

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// Clears `closure_err`, differentiates, then returns the first captured
/// error if any, otherwise the validated gradient.
///
/// # Errors
/// - Whatever `func` parked in `closure_err`.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
