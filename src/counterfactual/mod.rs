//! counterfactual: search for minimally-different inputs with a desired output.
//!
//! Purpose
//! -------
//! Given a fitted model, an input `x` and a desired outcome, find a candidate
//! `x_cf` close to `x` that the model maps to the outcome. The search
//! minimizes `loss(x_cf) + C · penalty(x_cf − x)` over an optional subset of
//! mutable features and retries with the next strength `C` until an
//! acceptance test passes.
//!
//! Key behaviors
//! -------------
//! - [`InputWrapper`] restricts the search to whitelisted features; pinned
//!   features keep their original values exactly.
//! - [`Regularization`] selects the penalty (`l1`, `l2`, none, or custom).
//! - [`CompositeCost`] combines model loss and penalty and exposes a
//!   gradient only when both parts have one.
//! - [`Counterfactual`] runs the schedule; [`generate_counterfactual`] is the
//!   one-call entry point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models are borrowed immutably for the whole search and only queried.
//! - `delta = x − x_cf` is exactly zero on pinned features.
//! - Acceptance priority: explicit `done`, then a predicate target, then
//!   exact equality with a literal target.
//!
//! Conventions
//! -----------
//! - Errors are [`CfError`]; optimizer failures are wrapped unchanged in
//!   [`CfError::Optimization`].
//! - Progress is reported through the `log` facade: one `debug!` line per
//!   strength, `info!` on success, `warn!` on exhaustion.
pub mod api;
pub mod cost;
pub mod errors;
pub mod input_wrapper;
pub mod model;
pub mod options;
pub mod regularization;
pub mod search;
pub mod target;

pub use self::api::generate_counterfactual;
pub use self::cost::CompositeCost;
pub use self::errors::{CfError, CfResult};
pub use self::input_wrapper::InputWrapper;
pub use self::model::ModelWithLoss;
pub use self::options::{DEFAULT_STRENGTH, SearchOptions, Strengths};
pub use self::regularization::{L1Penalty, L2Penalty, PenaltyFactory, Regularization};
pub use self::search::{Counterfactual, CounterfactualResult, Explainer};
pub use self::target::{Acceptance, Predicate, Target};
