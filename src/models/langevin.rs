//! One-dimensional Langevin model built from basis terms.
//!
//! The potential is `E(x) = Σ_i p_i·f_i(x)` over a list of
//! [`PotentialTerm`]s; frames are rows of an `(n, 1)` matrix holding the
//! position. Parameters selected by the fit mask are the epsilons.
use ndarray::{Array1, Array2, ArrayView2};

use crate::models::{
    basis::PotentialTerm,
    errors::ModelResult,
    linear::{validate_frames, EpsilonLayout, LinearPotential},
    traits::{EpsilonPotential, PotentialModel},
};

#[derive(Debug, Clone, PartialEq)]
pub struct LangevinModel {
    terms: Vec<PotentialTerm>,
    layout: EpsilonLayout,
}

impl LangevinModel {
    /// Build a model with one parameter per term.
    ///
    /// # Errors
    /// - `InvalidTerm` for a malformed term.
    /// - `ParamLengthMismatch`, `FitMaskLengthMismatch`, `EmptyFitSet`,
    ///   `InvalidBeta` or `NonFiniteParam` for an inconsistent layout.
    pub fn new(
        terms: Vec<PotentialTerm>, params: Array1<f64>, fit_mask: &[bool], beta: f64,
    ) -> ModelResult<Self> {
        for (index, term) in terms.iter().enumerate() {
            term.validate(index)?;
        }
        let layout = EpsilonLayout::new(terms.len(), params, fit_mask, beta)?;
        Ok(Self { terms, layout })
    }

    pub fn terms(&self) -> &[PotentialTerm] {
        &self.terms
    }

    /// Full parameter vector, tunable and fixed.
    pub fn params(&self) -> &Array1<f64> {
        &self.layout.params
    }

    pub fn beta(&self) -> f64 {
        self.layout.beta
    }

    /// `E(x)` at the current parameters, unscaled by β.
    pub fn potential(&self, x: f64) -> f64 {
        self.terms.iter().zip(self.layout.params.iter()).map(|(t, &p)| p * t.eval(x)).sum()
    }
}

impl PotentialModel for LangevinModel {
    fn epsilons(&self) -> &Array1<f64> {
        &self.layout.epsilons
    }

    fn use_params(&self) -> &[usize] {
        &self.layout.use_params
    }

    fn potentials_epsilon(&self, data: ArrayView2<f64>) -> ModelResult<Box<dyn EpsilonPotential>> {
        validate_frames(data, 1)?;
        let x = data.column(0);
        let mut shapes = Array2::<f64>::zeros((self.terms.len(), x.len()));
        for (mut row, term) in shapes.outer_iter_mut().zip(&self.terms) {
            row.assign(&term.eval_many(x));
        }
        let potential = LinearPotential::from_shapes(
            shapes.view(),
            &self.layout.params,
            &self.layout.use_params,
            self.layout.beta,
        )?;
        Ok(Box::new(potential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ModelError;
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    fn double_well() -> LangevinModel {
        LangevinModel::new(
            vec![
                PotentialTerm::GaussianWell { center: 0.5, width: 0.1 },
                PotentialTerm::GaussianWell { center: 2.5, width: 0.1 },
                PotentialTerm::Harmonic { center: 1.5, k: 0.2 },
            ],
            array![1.0, 1.0, 1.0],
            &[true, true, false],
            2.0,
        )
        .expect("model should build")
    }

    #[test]
    // Purpose
    // -------
    // The reduced energy equals β·E(x) at the model's own epsilons and its
    // derivative matches finite differences.
    //
    // Given
    // -----
    // - Two fitted wells and a fixed spring, β = 2; frames at 0.5, 1.5,
    //   2.4.
    //
    // Expect
    // ------
    // - energy(ε₀)_k = 2·E(x_k); every derivative row matches central
    //   differences of the energy.
    fn energy_and_derivative_are_consistent() {
        // Arrange
        let model = double_well();
        let data = array![[0.5], [1.5], [2.4]];
        let pot = model.potentials_epsilon(data.view()).expect("potential should build");
        let eps = model.epsilons().clone();

        // Act
        let energy = pot.energy(&eps).expect("energy");
        let deriv = pot.derivative(&eps).expect("derivative").to_owned();

        // Assert
        assert_eq!(model.use_params(), &[0, 1]);
        for (k, &x) in data.column(0).iter().enumerate() {
            assert_relative_eq!(energy[k], 2.0 * model.potential(x), epsilon = 1e-12);
            let fd = eps.central_diff(&|e: &Array1<f64>| {
                pot.energy(e).map(|u| u[k]).unwrap_or(f64::NAN)
            });
            for j in 0..eps.len() {
                assert_relative_eq!(deriv[[j, k]], fd[j], epsilon = 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Frame blocks the model cannot read are rejected.
    //
    // Given
    // -----
    // - An empty block, a two-column block and a NaN frame.
    //
    // Expect
    // ------
    // - `EmptyData`, `DataColumnMismatch` and `NonFiniteData`.
    fn invalid_frames_are_rejected() {
        let model = double_well();
        assert_eq!(
            model.potentials_epsilon(Array2::<f64>::zeros((0, 1)).view()).err(),
            Some(ModelError::EmptyData)
        );
        assert_eq!(
            model.potentials_epsilon(array![[0.0, 1.0]].view()).err(),
            Some(ModelError::DataColumnMismatch { expected: 1, found: 2 })
        );
        assert_eq!(
            model.potentials_epsilon(array![[0.0], [f64::NAN]].view()).err(),
            Some(ModelError::NonFiniteData { frame: 1, column: 0 })
        );
    }
}
