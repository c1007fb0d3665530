//! Structural checks for model parameters and inputs.
//!
//! Every constructor in [`crate::models`] validates through these helpers so a
//! model that exists is finite and dimensionally consistent.
use crate::counterfactual::errors::{CfError, CfResult};
use ndarray::{Array1, Array2};

/// Vector must be non-empty and finite.
pub fn check_vector(name: &str, v: &Array1<f64>) -> CfResult<()> {
    if v.is_empty() {
        return Err(CfError::InvalidModel { reason: format!("{name} is empty") });
    }
    if let Some((i, value)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(CfError::InvalidModel {
            reason: format!("{name}[{i}] is non-finite: {value}"),
        });
    }
    Ok(())
}

/// Matrix must be non-empty and finite.
pub fn check_matrix(name: &str, m: &Array2<f64>) -> CfResult<()> {
    if m.is_empty() {
        return Err(CfError::InvalidModel { reason: format!("{name} is empty") });
    }
    if let Some(((r, c), value)) = m.indexed_iter().find(|(_, x)| !x.is_finite()) {
        return Err(CfError::InvalidModel {
            reason: format!("{name}[{r}, {c}] is non-finite: {value}"),
        });
    }
    Ok(())
}

/// Two declared sizes must agree.
pub fn check_len(name: &str, expected: usize, found: usize) -> CfResult<()> {
    if expected != found {
        return Err(CfError::InvalidModel {
            reason: format!("{name} has length {found}, expected {expected}"),
        });
    }
    Ok(())
}

/// Input passed to a model must have its dimension.
pub fn check_input(x: &Array1<f64>, dim: usize) -> CfResult<()> {
    if x.len() != dim {
        return Err(CfError::DimMismatch { expected: dim, found: x.len() });
    }
    Ok(())
}
