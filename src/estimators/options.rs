//! Options of a max-likelihood estimation run.
use ndarray::Array1;

use crate::{
    estimators::errors::EstimatorResult,
    optimization::loglik_optimizer::{Bounds, MLEOptions, SolverKind, Tolerances},
};

/// EstimatorOptions — what to score and how to optimize.
///
/// Fields
/// ------
/// - `logq`: score with `log Q` instead of `Q`.
/// - `stationary_distributions`: prior weight of every state; `None` uses
///   the fraction of frames in each state. Validated and normalized by the
///   estimator.
/// - `mle`: solver choice and its options; bounds live here.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorOptions {
    pub logq: bool,
    pub stationary_distributions: Option<Array1<f64>>,
    pub mle: MLEOptions,
}

impl EstimatorOptions {
    /// Defaults for `solver`: `Q` scoring, frame-count weights.
    pub fn new(solver: SolverKind) -> Self {
        Self { logq: false, stationary_distributions: None, mle: MLEOptions::for_solver(solver) }
    }

    /// Like [`EstimatorOptions::new`] with the solver given by name
    /// (`"simplex"`, `"annealing"`, `"cg"`, `"lbfgs"`).
    ///
    /// # Errors
    /// - `InvalidSolver` for an unknown name.
    pub fn for_solver_name(name: &str) -> EstimatorResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn with_logq(mut self, logq: bool) -> Self {
        self.logq = logq;
        self
    }

    pub fn with_stationary_distributions(mut self, weights: Array1<f64>) -> Self {
        self.stationary_distributions = Some(weights);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.mle = self.mle.with_bounds(bounds);
        self
    }

    pub fn with_tols(mut self, tols: Tolerances) -> Self {
        self.mle = self.mle.with_tols(tols);
        self
    }

    pub fn with_mle(mut self, mle: MLEOptions) -> Self {
        self.mle = mle;
        self
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self::new(SolverKind::Simplex)
    }
}
