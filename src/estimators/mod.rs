//! estimators — reweighting max-likelihood estimation of model epsilons.
//!
//! Purpose
//! -------
//! Take simulation frames grouped into equilibrium states, reweight them to
//! candidate epsilons and fit the epsilons to experimental observables.
//!
//! Key behaviors
//! -------------
//! - [`partition_by_bins`] / [`build_state_records`] discretize a 1-D
//!   trajectory into states; [`StateRecord`] holds frames plus observations.
//! - [`ReweightContext`] predicts observables and their Jacobian at any ε.
//! - [`QObjective`] adapts the prediction to the optimizer;
//!   [`ObjectiveFunction`] exposes `−Q` / `−log Q` to callers.
//! - [`max_likelihood_estimate`] validates, optimizes and reports an
//!   [`EstimationResult`].
//!
//! Conventions
//! -----------
//! - `old_q` / `new_q` and the objective value objects report the minimized
//!   quantity (`−Q` or `−log Q`).
//! - All failures surface as [`EstimatorError`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover weights, validation and gradients; the integration
//!   suite in `tests/` runs full estimations with every solver family.

pub mod errors;
pub mod max_likelihood;
pub mod objective;
pub mod options;
pub mod partition;
pub mod reweight;
pub mod state;

pub use self::errors::{EstimatorError, EstimatorResult};
pub use self::max_likelihood::{max_likelihood_estimate, EstimationResult};
pub use self::objective::{ObjectiveFunction, QObjective};
pub use self::options::EstimatorOptions;
pub use self::partition::{build_state_records, partition_by_bins, StatePartition};
pub use self::reweight::ReweightContext;
pub use self::state::StateRecord;

pub mod prelude {
    pub use super::{
        build_state_records, max_likelihood_estimate, EstimationResult, EstimatorError,
        EstimatorOptions, StateRecord,
    };
}
