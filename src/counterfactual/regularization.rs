//! Penalties measuring how far a candidate moved from the original input.
//!
//! Penalties are [`Objective`]s over the *full-dimensional* candidate; the
//! composite cost decodes the reduced variable before evaluating them.
//!
//! - `l1`: `Σ |x_i − x_orig_i|`. Black-box: the kink at zero is left to
//!   derivative-free solvers, so no gradient is exposed.
//! - `l2`: `Σ (x_i − x_orig_i)²` with gradient `2 (x − x_orig)`.
//! - `none`: no penalty; the strength is ignored.
//! - custom: any [`PenaltyFactory`].
use crate::counterfactual::errors::{CfError, CfResult};
use crate::optimization::{
    cost_optimizer::{Cost, Grad, Objective, Theta, validation::validate_param_dim},
    errors::OptResult,
};
use ndarray::Array1;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Builds a caller-defined penalty around the original input.
pub trait PenaltyFactory {
    fn name(&self) -> &str {
        "custom"
    }

    fn build(&self, x_orig: &Array1<f64>) -> CfResult<Box<dyn Objective>>;
}

/// Penalty selection for a search. Defaults to [`Regularization::L1`].
#[derive(Clone, Default)]
pub enum Regularization {
    #[default]
    L1,
    L2,
    None,
    Custom(Arc<dyn PenaltyFactory>),
}

impl Regularization {
    pub fn custom<F: PenaltyFactory + 'static>(factory: F) -> Self {
        Regularization::Custom(Arc::new(factory))
    }

    /// Instantiate the penalty around `x_orig`; `None` means no penalty term.
    pub fn build(&self, x_orig: &Array1<f64>) -> CfResult<Option<Box<dyn Objective>>> {
        match self {
            Regularization::L1 => Ok(Some(Box::new(L1Penalty::new(x_orig.clone())))),
            Regularization::L2 => Ok(Some(Box::new(L2Penalty::new(x_orig.clone())))),
            Regularization::None => Ok(None),
            Regularization::Custom(factory) => factory.build(x_orig).map(Some),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Regularization::L1 => "l1",
            Regularization::L2 => "l2",
            Regularization::None => "none",
            Regularization::Custom(factory) => factory.name(),
        }
    }
}

impl FromStr for Regularization {
    type Err = CfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l1" => Ok(Regularization::L1),
            "l2" => Ok(Regularization::L2),
            "none" | "" => Ok(Regularization::None),
            _ => Err(CfError::UnknownRegularization { name: s.to_string() }),
        }
    }
}

impl fmt::Debug for Regularization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regularization::Custom(factory) => {
                f.debug_tuple("Custom").field(&factory.name()).finish()
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Sum of absolute deviations from the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct L1Penalty {
    x_orig: Array1<f64>,
}

impl L1Penalty {
    pub fn new(x_orig: Array1<f64>) -> Self {
        Self { x_orig }
    }
}

impl Objective for L1Penalty {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        validate_param_dim(x, self.x_orig.len())?;
        Ok(x.iter().zip(self.x_orig.iter()).map(|(a, b)| (a - b).abs()).sum())
    }
}

/// Sum of squared deviations from the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct L2Penalty {
    x_orig: Array1<f64>,
}

impl L2Penalty {
    pub fn new(x_orig: Array1<f64>) -> Self {
        Self { x_orig }
    }
}

impl Objective for L2Penalty {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        validate_param_dim(x, self.x_orig.len())?;
        Ok(x.iter().zip(self.x_orig.iter()).map(|(a, b)| (a - b).powi(2)).sum())
    }

    fn grad(&self, x: &Theta) -> OptResult<Grad> {
        validate_param_dim(x, self.x_orig.len())?;
        Ok((x - &self.x_orig) * 2.0)
    }

    fn is_differentiable(&self) -> bool {
        true
    }
}
