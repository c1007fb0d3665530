//! Restriction of the search variable to a whitelist of mutable features.
//!
//! The optimizer works on a reduced variable `z` with one entry per free
//! dimension. [`InputWrapper`] keeps the original input and maps `z` back to a
//! full-dimensional candidate by overwriting only the free dimensions; every
//! other dimension stays bit-for-bit equal to the original.
use crate::counterfactual::errors::{CfError, CfResult};
use crate::optimization::cost_optimizer::{Grad, Theta};
use ndarray::{Array1, Axis};

/// Original input plus the set of free dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWrapper {
    x_orig: Array1<f64>,
    free: Vec<usize>,
    mask: Array1<f64>,
}

impl InputWrapper {
    /// Capture `x` and validate the whitelist.
    ///
    /// `None` or an empty whitelist leaves every dimension free. Otherwise the
    /// reduced variable follows the order of the whitelist.
    ///
    /// # Errors
    /// - [`CfError::EmptyInput`] / [`CfError::NonFiniteInput`] for a bad `x`.
    /// - [`CfError::InvalidFeatureIndex`] for an index outside `[0, dim)`.
    /// - [`CfError::DuplicateFeatureIndex`] for a repeated index.
    pub fn new(x: Array1<f64>, whitelist: Option<&[usize]>) -> CfResult<Self> {
        if x.is_empty() {
            return Err(CfError::EmptyInput);
        }
        if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CfError::NonFiniteInput { index, value });
        }
        let dim = x.len();
        let free = match whitelist {
            Some(indices) if !indices.is_empty() => {
                let mut seen = vec![false; dim];
                for &index in indices {
                    if index >= dim {
                        return Err(CfError::InvalidFeatureIndex { index, dim });
                    }
                    if seen[index] {
                        return Err(CfError::DuplicateFeatureIndex { index });
                    }
                    seen[index] = true;
                }
                indices.to_vec()
            }
            _ => (0..dim).collect(),
        };
        let mut mask = Array1::zeros(dim);
        for &i in &free {
            mask[i] = 1.0;
        }
        Ok(Self { x_orig: x, free, mask })
    }

    /// Initial reduced variable: the original values of the free dimensions.
    pub fn x0(&self) -> Theta {
        self.x_orig.select(Axis(0), &self.free)
    }

    /// Expand `z` into a full-dimensional candidate.
    ///
    /// # Errors
    /// [`CfError::DimMismatch`] if `z` does not have one entry per free dimension.
    pub fn decode(&self, z: &Theta) -> CfResult<Array1<f64>> {
        if z.len() != self.free.len() {
            return Err(CfError::DimMismatch { expected: self.free.len(), found: z.len() });
        }
        Ok(self.expand(z))
    }

    /// 0/1 indicator over the full input, 1 on free dimensions.
    pub fn grad_mask(&self) -> &Array1<f64> {
        &self.mask
    }

    /// Chain rule through [`decode`](Self::decode): mask a full-dimensional
    /// gradient and keep the free dimensions, in reduced-variable order.
    ///
    /// # Errors
    /// [`CfError::DimMismatch`] if `g_full` is not full-dimensional.
    pub fn reduce_gradient(&self, g_full: &Grad) -> CfResult<Grad> {
        if g_full.len() != self.dim() {
            return Err(CfError::DimMismatch { expected: self.dim(), found: g_full.len() });
        }
        Ok(self.gather(g_full))
    }

    pub fn free_dims(&self) -> &[usize] {
        &self.free
    }

    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    pub fn dim(&self) -> usize {
        self.x_orig.len()
    }

    pub fn original(&self) -> &Array1<f64> {
        &self.x_orig
    }

    /// `true` when some dimensions are pinned.
    pub fn is_restricted(&self) -> bool {
        self.free.len() < self.dim()
    }

    // Callers must have checked `z.len() == n_free()`.
    pub(crate) fn expand(&self, z: &Theta) -> Array1<f64> {
        let mut x = self.x_orig.clone();
        for (&i, &v) in self.free.iter().zip(z.iter()) {
            x[i] = v;
        }
        x
    }

    // Callers must have checked `g_full.len() == dim()`.
    pub(crate) fn gather(&self, g_full: &Grad) -> Grad {
        (g_full * &self.mask).select(Axis(0), &self.free)
    }
}
