//! Max-likelihood estimation of model epsilons.
//!
//! Purpose
//! -------
//! Find the epsilons whose reweighted ensemble best reproduces the
//! experimental observables, starting from the epsilons the frames were
//! sampled at.
//!
//! Key behaviors
//! -------------
//! - Validates states, observables, options and stationary weights before
//!   any solver work.
//! - Builds one shared [`ReweightContext`] and maximizes `Q` or `log Q`
//!   with the solver chosen in [`EstimatorOptions::mle`].
//! - Reports scores as the minimized quantity `F = −Q` / `F = −log Q` and
//!   hands back value objects for both score kinds.
//!
//! Invariants & assumptions
//! ------------------------
//! - The model is borrowed read-only; new epsilons are returned, never
//!   written back.
//! - Solver non-convergence is reported through
//!   [`EstimationResult::outcome`], not raised.
//! - Bounded runs return epsilons inside the bounds.
use std::sync::Arc;

use ndarray::Array1;

use crate::{
    estimators::{
        errors::{EstimatorError, EstimatorResult},
        objective::{ObjectiveFunction, QObjective},
        options::EstimatorOptions,
        reweight::ReweightContext,
        state::StateRecord,
    },
    models::PotentialModel,
    observables::ObservableSet,
    optimization::loglik_optimizer::{maximize, LogLikelihood, OptimOutcome},
};

/// EstimationResult — fitted epsilons and scores.
///
/// Fields
/// ------
/// - `old_epsilons` / `new_epsilons`: tunable parameters before and after.
/// - `old_q` / `new_q`: minimized objective (`−Q` or `−log Q` following
///   `logq`) at the old and new epsilons.
/// - `q_function_epsilon` / `log_q_function_epsilon`: `−Q(ε)` and
///   `−log Q(ε)` over the same reweighting context.
/// - `outcome`: solver report (status, convergence flag, iteration and
///   evaluation counts, final gradient norm when available).
#[derive(Debug, Clone)]
pub struct EstimationResult {
    pub old_epsilons: Array1<f64>,
    pub new_epsilons: Array1<f64>,
    pub old_q: f64,
    pub new_q: f64,
    pub q_function_epsilon: ObjectiveFunction,
    pub log_q_function_epsilon: ObjectiveFunction,
    pub outcome: OptimOutcome,
}

/// Estimate new epsilons for `model` from `states`.
///
/// # Errors
/// - Configuration errors (all raised before the solver starts):
///   - [`EstimatorError::NoStates`], [`EstimatorError::EmptyStateData`],
///     [`EstimatorError::ObservationLengthMismatch`];
///   - solver option errors (unrecognized options, bounds on a gradient
///     solver, bounds cardinality or ordering) as
///     [`EstimatorError::Optimizer`];
///   - stationary weight errors;
///   - model errors while building a state's potential.
/// - Evaluation errors of the objective during the run.
pub fn max_likelihood_estimate<M: PotentialModel + ?Sized>(
    states: &[StateRecord], observables: &ObservableSet, model: &M, options: &EstimatorOptions,
) -> EstimatorResult<EstimationResult> {
    validate_states(states, observables)?;
    options.mle.validate(model.n_epsilons())?;
    let weights = stationary_weights(states, options.stationary_distributions.as_ref())?;
    let context = Arc::new(ReweightContext::new(states, observables, model, &weights)?);

    let objective = QObjective { logq: options.logq };
    let old_epsilons = model.epsilons().clone();
    let old_q = -objective.value(&old_epsilons, &context)?;

    let outcome = maximize(&objective, old_epsilons.clone(), &*context, &options.mle)?;
    let new_epsilons = outcome.theta_hat.clone();
    let new_q = -objective.value(&new_epsilons, &context)?;

    Ok(EstimationResult {
        old_epsilons,
        new_epsilons,
        old_q,
        new_q,
        q_function_epsilon: ObjectiveFunction::new(Arc::clone(&context), false),
        log_q_function_epsilon: ObjectiveFunction::new(context, true),
        outcome,
    })
}

/// Reject empty state lists, empty states and mismatched observations.
fn validate_states(states: &[StateRecord], observables: &ObservableSet) -> EstimatorResult<()> {
    if states.is_empty() {
        return Err(EstimatorError::NoStates);
    }
    let expected = observables.n_values();
    for (state, record) in states.iter().enumerate() {
        if record.n_frames() == 0 {
            return Err(EstimatorError::EmptyStateData { state });
        }
        if record.observed.len() != expected {
            return Err(EstimatorError::ObservationLengthMismatch {
                state,
                expected,
                found: record.observed.len(),
            });
        }
    }
    Ok(())
}

/// Validated stationary distribution normalized to sum one.
///
/// Without explicit weights each state is weighted by its share of frames.
fn stationary_weights(
    states: &[StateRecord], weights: Option<&Array1<f64>>,
) -> EstimatorResult<Array1<f64>> {
    let raw = match weights {
        Some(w) => {
            if w.len() != states.len() {
                return Err(EstimatorError::StationaryLengthMismatch {
                    expected: states.len(),
                    found: w.len(),
                });
            }
            if let Some((index, &value)) =
                w.iter().enumerate().find(|(_, v)| !(v.is_finite() && **v >= 0.0))
            {
                return Err(EstimatorError::InvalidStationaryWeight { index, value });
            }
            w.clone()
        }
        None => states.iter().map(|s| s.n_frames() as f64).collect(),
    };
    let total = raw.sum();
    if !(total > 0.0) {
        return Err(EstimatorError::ZeroStationaryMass);
    }
    Ok(raw / total)
}
