//! optimization: solver dispatch and unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical optimization layer beneath the counterfactual
//! search: a cost-minimization stack built on Argmin and a single
//! error/result surface for configuration problems, numerical failures and
//! backend solver errors.
//!
//! Key behaviors
//! -------------
//! - [`cost_optimizer`] minimizes an [`Objective`](cost_optimizer::Objective)
//!   with a built-in or caller-supplied optimizer.
//! - [`errors::OptError`] and [`errors::OptResult`] normalize every failure
//!   the layer can produce.
//!
//! Conventions
//! -----------
//! - This layer performs no logging of its own except the optional slog
//!   observer behind the `obs_slog` feature; the search loop above it
//!   reports progress through `log`.
pub mod cost_optimizer;
pub mod errors;

pub mod prelude {
    pub use super::cost_optimizer::prelude::*;
    pub use super::errors::{OptError, OptResult};
}
