//! Numerical stability utilities.
//!
//! Reweighting works with exponentials of energy differences that easily
//! overflow `f64` (a difference of 800 k_BT already does). Everything that
//! sums exponentials therefore goes through a max-shifted log-sum-exp.
//!
//! # Provided items
//! - [`log_sum_exp`]: stable `ln Σ exp(x_i)`.
//! - [`safe_softmax`]: stable `exp(x_i) / Σ exp(x_j)`.
use ndarray::{Array1, ArrayView1};

/// Numerically stable `ln Σ exp(x_i)`.
///
/// Returns `-∞` for an empty input or when every entry is `-∞`.
/// Shifts by the maximum so the largest exponent is `exp(0) = 1`.
pub fn log_sum_exp(values: ArrayView1<f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let sum: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Numerically stable softmax.
///
/// Entries equal to `-∞` receive exactly zero weight. The output sums to one
/// whenever at least one entry is finite; otherwise it is all zeros.
/// Shifted by the maximum and divided by the shifted sum, so equal logits
/// give exactly equal weights at any magnitude.
pub fn safe_softmax(logits: ArrayView1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if !max.is_finite() {
        return Array1::zeros(logits.len());
    }
    let shifted = logits.mapv(|v| (v - max).exp());
    let sum = shifted.sum();
    shifted / sum
}
