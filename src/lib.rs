//! rust_counterfactuals: counterfactual explanations for fitted models.
//!
//! Purpose
//! -------
//! Answer "what is the smallest change to this input that makes the model
//! predict something else?". Given a fitted model, an input `x` and a desired
//! outcome, the crate searches for a nearby `x_cf` that the model maps to the
//! outcome, optionally changing only a whitelist of features.
//!
//! Key behaviors
//! -------------
//! - [`counterfactual`] holds the search: input wrapping, regularization,
//!   the composite cost, and the strength-schedule loop behind
//!   [`generate_counterfactual`](counterfactual::generate_counterfactual).
//! - [`optimization`] minimizes costs with Argmin solvers (Nelder–Mead,
//!   BFGS, L-BFGS, momentum gradient descent) or caller-supplied optimizers.
//! - [`models`] provides adapters for linear regression, softmax regression,
//!   Gaussian naive Bayes and decision trees.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models are fitted elsewhere and only queried here.
//! - Searches are synchronous and single-threaded; each call owns its
//!   buffers and borrows the model immutably.
//!
//! Conventions
//! -----------
//! - Inputs are `ndarray::Array1<f64>`; feature indices are 0-based.
//! - Fallible operations return `CfResult<T>` (search layer) or
//!   `OptResult<T>` (optimization layer); nothing panics on bad input.
//! - Progress is logged through the `log` facade. Enable the `obs_slog`
//!   feature and set `OptimizerArgs::verbose` for per-iteration solver output.
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! use rust_counterfactuals::prelude::*;
//!
//! let model = SoftmaxRegression::new(weights, intercept)?;
//! let options = SearchOptions::default().with_whitelist(vec![0, 2]);
//! let (x_cf, y_cf, delta) =
//!     generate_counterfactual(&model, &x, Target::Value(0), &options)?.into_triple();
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover.
//! - `tests/integration_counterfactual_pipeline.rs` runs complete searches
//!   against the bundled model adapters.

pub mod counterfactual;
pub mod models;
pub mod optimization;

pub mod prelude {
    pub use crate::counterfactual::{
        CfError, CfResult, Counterfactual, CounterfactualResult, Explainer, InputWrapper,
        ModelWithLoss, PenaltyFactory, Predicate, Regularization, SearchOptions, Strengths,
        Target, generate_counterfactual,
    };
    pub use crate::models::{
        DecisionTree, DecisionTreeClassifier, DecisionTreeRegressor, GaussianNaiveBayes,
        LinearRegression, Node, SoftmaxRegression,
    };
    pub use crate::optimization::prelude::*;
}
