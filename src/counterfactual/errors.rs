//! Errors for counterfactual search (input wrapping, configuration, model
//! adapters, and schedule exhaustion).
//!
//! This module defines [`CfError`], the error surfaced by every public
//! operation of the search layer, and the alias [`CfResult`]. Failures raised
//! inside the optimization layer are carried unchanged in
//! [`CfError::Optimization`].
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the full-dimensional input.
//! - Errors are raised eagerly: whitelist and input problems surface when the
//!   input is wrapped, before any optimizer work.
use crate::optimization::errors::OptError;
use statrs::distribution::NormalError;

/// Result alias for counterfactual operations that may produce [`CfError`].
pub type CfResult<T> = Result<T, CfError>;

/// Unified error type for counterfactual search.
#[derive(Debug, Clone, PartialEq)]
pub enum CfError {
    // ---- Input wrapping ----
    /// Input vector has no entries.
    EmptyInput,

    /// An input entry is NaN/±inf.
    NonFiniteInput { index: usize, value: f64 },

    /// Whitelist references a dimension outside `[0, dim)`.
    InvalidFeatureIndex { index: usize, dim: usize },

    /// Whitelist lists the same dimension twice.
    DuplicateFeatureIndex { index: usize },

    /// A vector does not have the expected length.
    DimMismatch { expected: usize, found: usize },

    // ---- Search configuration ----
    /// Regularization strengths must be finite and >= 0.
    InvalidStrength { value: f64, reason: &'static str },

    /// Regularization name not recognized.
    UnknownRegularization { name: String },

    /// The model cannot build a loss for the requested target.
    UnsupportedTarget { reason: String },

    /// Model parameters are structurally invalid.
    InvalidModel { reason: String },

    // ---- Search outcome ----
    /// Every strength in the schedule was tried without an accepted candidate.
    NoCounterfactualFound { attempts: usize },

    /// Failure inside the optimization layer.
    Optimization(OptError),
}

impl std::error::Error for CfError {}

impl std::fmt::Display for CfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input wrapping ----
            CfError::EmptyInput => {
                write!(f, "Input vector is empty.")
            }
            CfError::NonFiniteInput { index, value } => {
                write!(f, "Input entry at index {index} is non-finite: {value}")
            }
            CfError::InvalidFeatureIndex { index, dim } => {
                write!(f, "Feature index {index} is out of range for an input of dimension {dim}.")
            }
            CfError::DuplicateFeatureIndex { index } => {
                write!(f, "Feature index {index} appears more than once in the whitelist.")
            }
            CfError::DimMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {expected}, found {found}.")
            }
            // ---- Search configuration ----
            CfError::InvalidStrength { value, reason } => {
                write!(f, "Invalid regularization strength {value}: {reason}")
            }
            CfError::UnknownRegularization { name } => {
                write!(
                    f,
                    "Unknown regularization '{name}'. Valid options are 'l1', 'l2' or 'none'."
                )
            }
            CfError::UnsupportedTarget { reason } => {
                write!(f, "Unsupported target: {reason}")
            }
            CfError::InvalidModel { reason } => {
                write!(f, "Invalid model: {reason}")
            }
            // ---- Search outcome ----
            CfError::NoCounterfactualFound { attempts } => {
                write!(
                    f,
                    "No counterfactual found after {attempts} attempt(s). Consider changing \
                     parameters 'C', 'regularization', 'features_whitelist', 'optimizer' and \
                     try again."
                )
            }
            CfError::Optimization(err) => {
                write!(f, "Optimization failed: {err}")
            }
        }
    }
}

impl From<OptError> for CfError {
    fn from(err: OptError) -> CfError {
        CfError::Optimization(err)
    }
}

impl From<NormalError> for CfError {
    fn from(err: NormalError) -> CfError {
        CfError::InvalidModel { reason: format!("invalid Gaussian parameters: {err}") }
    }
}
