//! Search configuration: the strength schedule and per-call options.
use crate::counterfactual::{
    errors::{CfError, CfResult},
    regularization::Regularization,
    target::Predicate,
};
use crate::optimization::cost_optimizer::{OptimizerArgs, OptimizerChoice};
use std::fmt;

/// Strength used when the caller gives none.
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// Ordered, non-empty schedule of regularization strengths `C`.
///
/// Strengths are tried in order and the first accepted candidate ends the
/// search. An empty schedule degenerates to `[DEFAULT_STRENGTH]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Strengths(Vec<f64>);

impl Strengths {
    /// # Errors
    /// [`CfError::InvalidStrength`] for a non-finite or negative entry.
    pub fn new(values: Vec<f64>) -> CfResult<Self> {
        for &value in &values {
            if !value.is_finite() {
                return Err(CfError::InvalidStrength {
                    value,
                    reason: "Regularization strength must be finite.",
                });
            }
            if value < 0.0 {
                return Err(CfError::InvalidStrength {
                    value,
                    reason: "Regularization strength must be non-negative.",
                });
            }
        }
        if values.is_empty() {
            return Ok(Self(vec![DEFAULT_STRENGTH]));
        }
        Ok(Self(values))
    }

    /// A schedule with a single strength.
    pub fn single(value: f64) -> CfResult<Self> {
        Self::new(vec![value])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Strengths {
    fn default() -> Self {
        Self(vec![DEFAULT_STRENGTH])
    }
}

/// Per-call search options.
///
/// Default:
/// - `features_whitelist`: `None` (every feature mutable)
/// - `regularization`: `l1`
/// - `strengths`: `[1.0]`
/// - `optimizer`: `nelder-mead`
/// - `optimizer_args`: [`OptimizerArgs::default`]
/// - `done`: `None` (the target decides acceptance)
pub struct SearchOptions<Y> {
    pub features_whitelist: Option<Vec<usize>>,
    pub regularization: Regularization,
    pub strengths: Strengths,
    pub optimizer: OptimizerChoice,
    pub optimizer_args: OptimizerArgs,
    pub done: Option<Predicate<Y>>,
}

impl<Y> SearchOptions<Y> {
    pub fn with_whitelist(mut self, whitelist: Vec<usize>) -> Self {
        self.features_whitelist = Some(whitelist);
        self
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn with_strengths(mut self, strengths: Strengths) -> Self {
        self.strengths = strengths;
        self
    }

    /// # Errors
    /// [`CfError::InvalidStrength`] for a non-finite or negative strength.
    pub fn with_strength(self, value: f64) -> CfResult<Self> {
        Ok(self.with_strengths(Strengths::single(value)?))
    }

    pub fn with_optimizer(mut self, optimizer: impl Into<OptimizerChoice>) -> Self {
        self.optimizer = optimizer.into();
        self
    }

    pub fn with_optimizer_args(mut self, args: OptimizerArgs) -> Self {
        self.optimizer_args = args;
        self
    }

    pub fn with_done<F>(mut self, done: F) -> Self
    where
        F: Fn(&Y) -> bool + 'static,
    {
        self.done = Some(Predicate::new(done));
        self
    }
}

impl<Y> Default for SearchOptions<Y> {
    fn default() -> Self {
        Self {
            features_whitelist: None,
            regularization: Regularization::default(),
            strengths: Strengths::default(),
            optimizer: OptimizerChoice::default(),
            optimizer_args: OptimizerArgs::default(),
            done: None,
        }
    }
}

impl<Y: Clone> Clone for SearchOptions<Y> {
    fn clone(&self) -> Self {
        Self {
            features_whitelist: self.features_whitelist.clone(),
            regularization: self.regularization.clone(),
            strengths: self.strengths.clone(),
            optimizer: self.optimizer.clone(),
            optimizer_args: self.optimizer_args.clone(),
            done: self.done.clone(),
        }
    }
}

impl<Y: fmt::Debug> fmt::Debug for SearchOptions<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("features_whitelist", &self.features_whitelist)
            .field("regularization", &self.regularization)
            .field("strengths", &self.strengths)
            .field("optimizer", &self.optimizer)
            .field("optimizer_args", &self.optimizer_args)
            .field("done", &self.done)
            .finish()
    }
}
