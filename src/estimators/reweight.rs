//! Exponential reweighting of equilibrium states.
//!
//! Purpose
//! -------
//! Predict the stacked observation vector at a candidate `ε` from frames
//! sampled at the reference `ε₀`, together with its Jacobian. Everything
//! that does not depend on `ε` is computed once in [`ReweightContext::new`].
//!
//! Key behaviors
//! -------------
//! - Within state `s` with frames `k`, `Δu_{s,k} = u_{s,k}(ε) − u_{s,k}(ε₀)`
//!   and `log w_s = logsumexp_k(−Δu_{s,k}) − ln n_s`.
//! - Populations `P_s = softmax_s(ln π_s + log w_s)` over states with
//!   `π_s > 0`; other states get `P_s = 0` and are never evaluated.
//! - Prediction `O(ε) = Σ_s P_s o_s`.
//! - With `α_{s,k}` the within-state softmax of `−Δu` and
//!   `g_{s,j} = −Σ_k α_{s,k} ∂u_{s,k}/∂ε_j`:
//!   `∂P_s/∂ε_j = P_s (g_{s,j} − Σ_t P_t g_{t,j})` and
//!   `∂O_b/∂ε_j = Σ_s o_{s,b} ∂P_s/∂ε_j`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The context is immutable after construction and `Send + Sync`; it is
//!   shared through `Arc` by the objective value objects.
//! - Stationary weights passed in are already validated and sum to one.
//!
//! Testing notes
//! -------------
//! - The Jacobian is cross-checked against `finitediff` on a two-state
//!   Langevin system; zero-weight states are checked to stay at `P = 0`.
use ndarray::{Array1, Array2, Axis};

use crate::{
    estimators::{
        errors::{EstimatorError, EstimatorResult},
        state::StateRecord,
    },
    models::{EpsilonPotential, ModelResult, PotentialModel},
    observables::ObservableSet,
    optimization::numerical_stability::{log_sum_exp, safe_softmax},
};

/// Per-state data needed to reweight one state.
#[derive(Debug)]
struct StateTerm {
    slot: usize,
    potential: Box<dyn EpsilonPotential>,
    reference_energy: Array1<f64>,
    observed: Array1<f64>,
    log_pi: f64,
    ln_frames: f64,
}

/// Within-state quantities at one `ε`.
struct StateEval {
    log_w: f64,
    alpha: Array1<f64>,
}

impl StateTerm {
    fn evaluate(&self, epsilons: &Array1<f64>) -> ModelResult<StateEval> {
        let energy = self.potential.energy(epsilons)?;
        let neg_delta = &self.reference_energy - &energy;
        let log_w = log_sum_exp(neg_delta.view()) - self.ln_frames;
        let alpha = safe_softmax(neg_delta.view());
        Ok(StateEval { log_w, alpha })
    }
}

#[derive(Debug)]
pub struct ReweightContext {
    terms: Vec<StateTerm>,
    observables: ObservableSet,
    epsilons0: Array1<f64>,
    n_states: usize,
}

impl ReweightContext {
    /// Build the reweighting context of `states` at the model's current
    /// epsilons.
    ///
    /// `weights` is the normalized stationary distribution, one entry per
    /// state.
    ///
    /// # Errors
    /// - [`EstimatorError::StationaryLengthMismatch`] if `weights` does not
    ///   have one entry per state.
    /// - [`EstimatorError::ObservationLengthMismatch`] if a state's observed
    ///   vector does not match `observables`.
    /// - Model errors from building or evaluating a state's potential.
    pub fn new<M: PotentialModel + ?Sized>(
        states: &[StateRecord], observables: &ObservableSet, model: &M, weights: &Array1<f64>,
    ) -> EstimatorResult<Self> {
        if weights.len() != states.len() {
            return Err(EstimatorError::StationaryLengthMismatch {
                expected: states.len(),
                found: weights.len(),
            });
        }
        let epsilons0 = model.epsilons().clone();
        let mut terms = Vec::with_capacity(states.len());
        for (slot, (state, &pi)) in states.iter().zip(weights.iter()).enumerate() {
            if state.observed.len() != observables.n_values() {
                return Err(EstimatorError::ObservationLengthMismatch {
                    state: slot,
                    expected: observables.n_values(),
                    found: state.observed.len(),
                });
            }
            if pi <= 0.0 {
                continue;
            }
            let potential = model.potentials_epsilon(state.data.view())?;
            let reference_energy = potential.energy(&epsilons0)?;
            terms.push(StateTerm {
                slot,
                potential,
                reference_energy,
                observed: state.observed.clone(),
                log_pi: pi.ln(),
                ln_frames: (state.n_frames() as f64).ln(),
            });
        }
        Ok(Self { terms, observables: observables.clone(), epsilons0, n_states: states.len() })
    }

    /// Number of tunable epsilons.
    pub fn n_params(&self) -> usize {
        self.epsilons0.len()
    }

    /// Number of states, including zero-weight ones.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn observables(&self) -> &ObservableSet {
        &self.observables
    }

    /// Epsilons the frames were sampled at.
    pub fn reference_epsilons(&self) -> &Array1<f64> {
        &self.epsilons0
    }

    /// State populations `P_s(ε)`, one per state.
    ///
    /// # Errors
    /// - `EpsilonLengthMismatch` for a wrong-length `epsilons`.
    pub fn populations(&self, epsilons: &Array1<f64>) -> ModelResult<Array1<f64>> {
        let evals = self.evaluate(epsilons)?;
        let active = self.active_populations(&evals);
        let mut out = Array1::zeros(self.n_states);
        for (term, &p) in self.terms.iter().zip(active.iter()) {
            out[term.slot] = p;
        }
        Ok(out)
    }

    /// Reweighted prediction `O(ε)`.
    ///
    /// # Errors
    /// - `EpsilonLengthMismatch` for a wrong-length `epsilons`.
    pub fn predict(&self, epsilons: &Array1<f64>) -> ModelResult<Array1<f64>> {
        let evals = self.evaluate(epsilons)?;
        let pops = self.active_populations(&evals);
        Ok(self.mix(&pops))
    }

    /// Prediction `O(ε)` and its Jacobian `∂O_b/∂ε_j` (`n_values × n_params`).
    ///
    /// # Errors
    /// - `EpsilonLengthMismatch` for a wrong-length `epsilons`.
    pub fn prediction_jacobian(
        &self, epsilons: &Array1<f64>,
    ) -> ModelResult<(Array1<f64>, Array2<f64>)> {
        let evals = self.evaluate(epsilons)?;
        let pops = self.active_populations(&evals);
        let prediction = self.mix(&pops);

        let n_params = self.n_params();
        let mut g = Array2::<f64>::zeros((self.terms.len(), n_params));
        for (s, (term, eval)) in self.terms.iter().zip(&evals).enumerate() {
            let deriv = term.potential.derivative(epsilons)?;
            g.row_mut(s).assign(&(-deriv.dot(&eval.alpha)));
        }
        let g_bar = pops.dot(&g);
        let dp = (&g - &g_bar.insert_axis(Axis(0))) * &pops.view().insert_axis(Axis(1));

        let mut jac = Array2::<f64>::zeros((prediction.len(), n_params));
        for (term, dp_s) in self.terms.iter().zip(dp.outer_iter()) {
            let o = term.observed.view().insert_axis(Axis(1));
            jac += &(&o * &dp_s.insert_axis(Axis(0)));
        }
        Ok((prediction, jac))
    }

    // ---- Helper Methods ----

    fn evaluate(&self, epsilons: &Array1<f64>) -> ModelResult<Vec<StateEval>> {
        self.terms.iter().map(|t| t.evaluate(epsilons)).collect()
    }

    fn active_populations(&self, evals: &[StateEval]) -> Array1<f64> {
        let logits: Array1<f64> =
            self.terms.iter().zip(evals).map(|(t, e)| t.log_pi + e.log_w).collect();
        safe_softmax(logits.view())
    }

    fn mix(&self, pops: &Array1<f64>) -> Array1<f64> {
        let mut out = Array1::<f64>::zeros(self.observables.n_values());
        for (term, &p) in self.terms.iter().zip(pops.iter()) {
            out.scaled_add(p, &term.observed);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{LangevinModel, PotentialTerm},
        observables::{ErrorModel, HistogramObservable},
    };
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    fn observables() -> ObservableSet {
        let mut set = ObservableSet::new();
        set.push_histogram(
            HistogramObservable::new(
                array![0.0, 1.0, 2.0, 3.0, 4.0],
                array![2.0, 4.0, 3.0, 1.0],
                None,
                ErrorModel::Gaussian,
                1.0,
            )
            .expect("histogram should build"),
        );
        set
    }

    fn model() -> LangevinModel {
        LangevinModel::new(
            vec![
                PotentialTerm::GaussianWell { center: 0.5, width: 0.5 },
                PotentialTerm::GaussianWell { center: 2.5, width: 0.5 },
            ],
            array![1.0, 1.0],
            &[true, true],
            1.0,
        )
        .expect("model should build")
    }

    fn states(set: &ObservableSet) -> Vec<StateRecord> {
        vec![
            StateRecord::from_positions(0, array![0.3, 0.5, 0.9].view(), set).expect("state"),
            StateRecord::from_positions(1, array![2.2, 2.5].view(), set).expect("state"),
            StateRecord::from_positions(2, array![1.4, 3.6, 1.1, 2.9].view(), set).expect("state"),
        ]
    }

    #[test]
    // Purpose
    // -------
    // At the sampling epsilons every state keeps its stationary weight.
    //
    // Given
    // -----
    // - Three states with weights (0.2, 0.3, 0.5).
    //
    // Expect
    // ------
    // - populations(ε₀) = (0.2, 0.3, 0.5) and the prediction is the
    //   weighted mean of the observed vectors.
    fn reference_epsilons_reproduce_stationary_weights() {
        // Arrange
        let set = observables();
        let states = states(&set);
        let weights = array![0.2, 0.3, 0.5];
        let ctx = ReweightContext::new(&states, &set, &model(), &weights).expect("context");
        let eps0 = ctx.reference_epsilons().clone();

        // Act
        let pops = ctx.populations(&eps0).expect("populations");
        let pred = ctx.predict(&eps0).expect("prediction");

        // Assert
        for s in 0..3 {
            assert_relative_eq!(pops[s], weights[s], epsilon = 1e-14);
        }
        let manual = &states[0].observed * 0.2 + &states[1].observed * 0.3 + &states[2].observed * 0.5;
        for b in 0..pred.len() {
            assert_relative_eq!(pred[b], manual[b], epsilon = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // The analytic Jacobian of the prediction matches finite differences
    // away from the sampling point.
    //
    // Given
    // -----
    // - Three states, equal weights, ε = (1.3, 0.6).
    //
    // Expect
    // ------
    // - Every column of the Jacobian matches central differences of
    //   `predict` to 1e-7.
    fn jacobian_matches_finite_differences() {
        // Arrange
        let set = observables();
        let ctx = ReweightContext::new(&states(&set), &set, &model(), &(array![1.0, 1.0, 1.0] / 3.0))
            .expect("context");
        let eps = array![1.3, 0.6];

        // Act
        let (_, jac) = ctx.prediction_jacobian(&eps).expect("jacobian");

        // Assert
        for b in 0..jac.nrows() {
            let fd = eps.central_diff(&|e: &Array1<f64>| {
                ctx.predict(e).map(|o| o[b]).unwrap_or(f64::NAN)
            });
            for j in 0..eps.len() {
                assert_relative_eq!(jac[[b, j]], fd[j], epsilon = 1e-7);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Zero-weight states never contribute and never produce NaN.
    //
    // Given
    // -----
    // - Weights (0.5, 0, 0.5) and a far-off ε = (40, −40).
    //
    // Expect
    // ------
    // - P₁ = 0 exactly; populations sum to one; prediction finite.
    fn zero_weight_states_are_excluded() {
        // Arrange
        let set = observables();
        let ctx = ReweightContext::new(&states(&set), &set, &model(), &array![0.5, 0.0, 0.5])
            .expect("context");
        let eps = array![40.0, -40.0];

        // Act
        let pops = ctx.populations(&eps).expect("populations");
        let pred = ctx.predict(&eps).expect("prediction");

        // Assert
        assert_eq!(pops[1], 0.0);
        assert_relative_eq!(pops.sum(), 1.0, epsilon = 1e-12);
        assert!(pred.iter().all(|v| v.is_finite()));
        assert_eq!(ctx.n_states(), 3);
    }

    #[test]
    // Purpose
    // -------
    // The context can be shared across threads.
    //
    // Given
    // -----
    // - The `ReweightContext` type.
    //
    // Expect
    // ------
    // - It satisfies `Send + Sync` at compile time.
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReweightContext>();
    }
}
