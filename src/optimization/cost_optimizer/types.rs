//! cost_optimizer::types: shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the cost
//! optimizer so the rest of the crate stays agnostic to `ndarray` and Argmin
//! generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, inverse
//!   Hessians, and scalar costs (`Theta`, `Grad`, `InvHessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired solver aliases (Nelder–Mead, BFGS, L-BFGS with either
//!   line search) over the common `(Theta, Grad, Cost)` shapes.
//!
//! Conventions
//! -----------
//! - `Theta` is always the *reduced* optimization variable: one entry per
//!   free feature of the search, never the full-dimensional input.
//! - `Cost` is a scalar `f64` that every solver minimizes.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::{BFGS, LBFGS},
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Optimization variable `z`.
pub type Theta = Array1<f64>;

/// Gradient vector `∇c(z)`, same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Dense inverse-Hessian approximation carried by BFGS.
pub type InvHessian = Array2<f64>;

/// Scalar objective value minimized by every solver.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default Nelder–Mead termination threshold on the simplex cost spread.
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-8;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Full-memory BFGS wired to the More–Thuente line search.
pub type BfgsMoreThuente = BFGS<MoreThuenteLS, Cost>;

/// Derivative-free downhill simplex.
pub type NelderMeadSimplex = NelderMead<Theta, Cost>;
