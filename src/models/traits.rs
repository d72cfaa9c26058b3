//! Capability traits connecting a parameterized model to the estimator.
//!
//! A [`PotentialModel`] knows its tunable parameters ("epsilons") and, for a
//! block of frames, produces an [`EpsilonPotential`]: the reduced energy of
//! every frame as a function of the epsilons, plus its derivative.
use ndarray::{Array1, ArrayView2, CowArray, Ix2};

use crate::models::errors::ModelResult;

/// Reduced energy `u(ε) = βE(ε)` of a fixed block of frames.
///
/// Implementations are immutable after construction and shared across
/// threads by the estimator.
pub trait EpsilonPotential: Send + Sync + std::fmt::Debug {
    fn n_frames(&self) -> usize;

    /// Number of tunable epsilons this potential expects.
    fn n_params(&self) -> usize;

    /// `u_k(ε)` for every frame `k`.
    ///
    /// # Errors
    /// - `EpsilonLengthMismatch` if `epsilons.len() != n_params()`.
    fn energy(&self, epsilons: &Array1<f64>) -> ModelResult<Array1<f64>>;

    /// `∂u_k/∂ε_j` as an `n_params × n_frames` matrix.
    ///
    /// Borrowed when the derivative does not depend on `ε`.
    ///
    /// # Errors
    /// - `EpsilonLengthMismatch` if `epsilons.len() != n_params()`.
    fn derivative(&self, epsilons: &Array1<f64>) -> ModelResult<CowArray<'_, f64, Ix2>>;
}

/// A model with tunable epsilons that can score frames.
pub trait PotentialModel {
    /// Current values of the tunable subset of parameters.
    fn epsilons(&self) -> &Array1<f64>;

    /// Indices of the tunable parameters within the full parameter vector.
    fn use_params(&self) -> &[usize];

    /// Build the energy function of `data` (frames × coordinates).
    ///
    /// # Errors
    /// - `EmptyData`, `DataColumnMismatch` or `NonFiniteData` for frame
    ///   blocks the model cannot evaluate.
    fn potentials_epsilon(&self, data: ArrayView2<f64>) -> ModelResult<Box<dyn EpsilonPotential>>;

    fn n_epsilons(&self) -> usize {
        self.epsilons().len()
    }
}
