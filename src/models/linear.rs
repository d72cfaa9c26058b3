//! Energies that are linear in the epsilons.
//!
//! Both bundled models write the reduced energy of frame `k` as
//! `u_k(ε) = c_k + Σ_j ε_j·β·f_j(x_k)`, where `c_k` collects the fixed
//! (non-fitted) parameters. [`LinearPotential`] stores `c` and the basis
//! matrix `β·f_j(x_k)` once, so `energy` is a matrix-vector product and
//! `derivative` borrows the stored matrix.
use ndarray::{Array1, Array2, ArrayView2, CowArray, Ix2};

use crate::models::{
    errors::{ModelError, ModelResult},
    traits::EpsilonPotential,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LinearPotential {
    fixed: Array1<f64>,
    basis: Array2<f64>,
}

impl LinearPotential {
    /// Assemble from per-parameter shape values.
    ///
    /// `shapes` is `n_params × n_frames` with `shapes[i, k] = f_i(x_k)`.
    /// Rows listed in `use_params` become tunable; the others are folded
    /// into the fixed energy with their value from `params`.
    ///
    /// # Errors
    /// - `ParamLengthMismatch` if `shapes.nrows() != params.len()`.
    /// - `EmptyFitSet` if `use_params` is empty.
    pub fn from_shapes(
        shapes: ArrayView2<f64>, params: &Array1<f64>, use_params: &[usize], beta: f64,
    ) -> ModelResult<Self> {
        if shapes.nrows() != params.len() {
            return Err(ModelError::ParamLengthMismatch {
                terms: shapes.nrows(),
                params: params.len(),
            });
        }
        if use_params.is_empty() {
            return Err(ModelError::EmptyFitSet);
        }
        let mut fixed = Array1::<f64>::zeros(shapes.ncols());
        for (i, row) in shapes.outer_iter().enumerate() {
            if !use_params.contains(&i) {
                fixed.scaled_add(beta * params[i], &row);
            }
        }
        let basis = shapes.select(ndarray::Axis(0), use_params) * beta;
        Ok(Self { fixed, basis })
    }

    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    pub fn fixed(&self) -> &Array1<f64> {
        &self.fixed
    }

    fn check_len(&self, epsilons: &Array1<f64>) -> ModelResult<()> {
        if epsilons.len() != self.basis.nrows() {
            return Err(ModelError::EpsilonLengthMismatch {
                expected: self.basis.nrows(),
                found: epsilons.len(),
            });
        }
        Ok(())
    }
}

impl EpsilonPotential for LinearPotential {
    fn n_frames(&self) -> usize {
        self.fixed.len()
    }

    fn n_params(&self) -> usize {
        self.basis.nrows()
    }

    fn energy(&self, epsilons: &Array1<f64>) -> ModelResult<Array1<f64>> {
        self.check_len(epsilons)?;
        Ok(&self.fixed + &self.basis.t().dot(epsilons))
    }

    fn derivative(&self, epsilons: &Array1<f64>) -> ModelResult<CowArray<'_, f64, Ix2>> {
        self.check_len(epsilons)?;
        Ok(CowArray::from(self.basis.view()))
    }
}

/// Full parameter vector, fit mask and the tunable subset derived from them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EpsilonLayout {
    pub params: Array1<f64>,
    pub use_params: Vec<usize>,
    pub epsilons: Array1<f64>,
    pub beta: f64,
}

impl EpsilonLayout {
    /// Validate `params` against `n_terms` and `fit_mask` and collect the
    /// tunable indices.
    pub fn new(n_terms: usize, params: Array1<f64>, fit_mask: &[bool], beta: f64) -> ModelResult<Self> {
        if params.len() != n_terms {
            return Err(ModelError::ParamLengthMismatch { terms: n_terms, params: params.len() });
        }
        if fit_mask.len() != params.len() {
            return Err(ModelError::FitMaskLengthMismatch {
                params: params.len(),
                mask: fit_mask.len(),
            });
        }
        if !(beta.is_finite() && beta > 0.0) {
            return Err(ModelError::InvalidBeta { value: beta });
        }
        if let Some((index, &value)) = params.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteParam { index, value });
        }
        let use_params: Vec<usize> =
            fit_mask.iter().enumerate().filter_map(|(i, &fit)| fit.then_some(i)).collect();
        if use_params.is_empty() {
            return Err(ModelError::EmptyFitSet);
        }
        let epsilons = params.select(ndarray::Axis(0), &use_params);
        Ok(Self { params, use_params, epsilons, beta })
    }
}

/// Reject empty, wrong-width or non-finite frame blocks.
pub(crate) fn validate_frames(data: ArrayView2<f64>, ncols: usize) -> ModelResult<()> {
    if data.nrows() == 0 {
        return Err(ModelError::EmptyData);
    }
    if data.ncols() != ncols {
        return Err(ModelError::DataColumnMismatch { expected: ncols, found: data.ncols() });
    }
    if let Some(((frame, column), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::NonFiniteData { frame, column });
    }
    Ok(())
}
