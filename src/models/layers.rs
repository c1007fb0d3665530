//! Small numeric building blocks shared by the model adapters.
use ndarray::{Array1, Array2};

/// `W x + b`.
pub fn affine(x: &Array1<f64>, w: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    w.dot(x) + b
}

/// `ln Σ exp(v_i)`, shifted by the maximum for stability.
pub fn log_sum_exp<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let max = iter.clone().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + iter.map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Numerically stable softmax.
pub fn softmax(logits: &Array1<f64>) -> Array1<f64> {
    let lse = log_sum_exp(logits.iter());
    logits.mapv(|v| (v - lse).exp())
}

/// Index of the largest entry; the first one on ties.
pub fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
