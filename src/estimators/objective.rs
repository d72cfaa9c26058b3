//! Q / log-Q objectives over reweighted predictions.
//!
//! [`QObjective`] is the [`LogLikelihood`] handed to the optimizer: it
//! scores `O(ε)` with `Q` or `log Q` and differentiates through the chain
//! `∂ℓ/∂ε_j = Σ_b ∂ℓ/∂O_b · ∂O_b/∂ε_j`. [`ObjectiveFunction`] is the
//! caller-facing value object that reports the minimized quantity
//! `F = −Q` or `F = −log Q`.
use std::sync::Arc;

use ndarray::Array1;

use crate::{
    estimators::{errors::EstimatorResult, reweight::ReweightContext},
    optimization::{
        errors::OptResult,
        loglik_optimizer::{validation::validate_theta, Grad, LogLikelihood, Theta},
    },
};

/// `ℓ(ε) = Q(O(ε))` or `log Q(O(ε))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QObjective {
    pub logq: bool,
}

impl LogLikelihood for QObjective {
    type Data = ReweightContext;

    fn value(&self, theta: &Theta, data: &ReweightContext) -> OptResult<f64> {
        let prediction = data.predict(theta)?;
        let observables = data.observables();
        let score = if self.logq {
            observables.log_q(prediction.view())?
        } else {
            observables.q(prediction.view())?
        };
        Ok(score)
    }

    fn check(&self, theta: &Theta, data: &ReweightContext) -> OptResult<()> {
        validate_theta(theta, data.n_params())
    }

    fn grad(&self, theta: &Theta, data: &ReweightContext) -> OptResult<Grad> {
        let (prediction, jacobian) = data.prediction_jacobian(theta)?;
        let observables = data.observables();
        let d_score = if self.logq {
            observables.log_q_derivative(prediction.view())?
        } else {
            observables.q_derivative(prediction.view())?
        };
        Ok(jacobian.t().dot(&d_score))
    }
}

/// `F(ε) = −Q(O(ε))` or `−log Q(O(ε))` over a shared context.
///
/// Cheap to clone; evaluation is pure and thread-safe.
#[derive(Clone)]
pub struct ObjectiveFunction {
    context: Arc<ReweightContext>,
    objective: QObjective,
}

impl ObjectiveFunction {
    pub fn new(context: Arc<ReweightContext>, logq: bool) -> Self {
        Self { context, objective: QObjective { logq } }
    }

    pub fn logq(&self) -> bool {
        self.objective.logq
    }

    pub fn context(&self) -> &ReweightContext {
        &self.context
    }

    /// `F(ε)`.
    ///
    /// # Errors
    /// - `ThetaLengthMismatch` / `InvalidThetaInput` for a malformed `ε`.
    pub fn evaluate(&self, epsilons: &Array1<f64>) -> EstimatorResult<f64> {
        self.objective.check(epsilons, &self.context)?;
        Ok(-self.objective.value(epsilons, &self.context)?)
    }

    /// `∇F(ε)`.
    ///
    /// # Errors
    /// - Same as [`ObjectiveFunction::evaluate`].
    pub fn gradient(&self, epsilons: &Array1<f64>) -> EstimatorResult<Array1<f64>> {
        self.objective.check(epsilons, &self.context)?;
        Ok(-self.objective.grad(epsilons, &self.context)?)
    }
}

impl std::fmt::Debug for ObjectiveFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectiveFunction")
            .field("logq", &self.objective.logq)
            .field("n_params", &self.context.n_params())
            .field("n_states", &self.context.n_states())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        estimators::{errors::EstimatorError, state::StateRecord},
        models::{LangevinModel, PotentialTerm},
        observables::{ErrorModel, HistogramObservable, ObservableSet},
        optimization::errors::OptError,
    };
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    fn context() -> Arc<ReweightContext> {
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
        let model = LangevinModel::new(
            vec![
                PotentialTerm::GaussianWell { center: 0.5, width: 0.4 },
                PotentialTerm::GaussianWell { center: 2.5, width: 0.4 },
            ],
            array![1.0, 1.0],
            &[true, true],
            1.0,
        )
        .expect("model should build");
        let states = vec![
            StateRecord::from_positions(0, array![0.5, 0.7, 1.2].view(), &set).expect("state"),
            StateRecord::from_positions(1, array![2.5, 2.1].view(), &set).expect("state"),
        ];
        let ctx = ReweightContext::new(&states, &set, &model, &array![0.5, 0.5]).expect("context");
        Arc::new(ctx)
    }

    #[test]
    // Purpose
    // -------
    // Gradients of −Q and −log Q match finite differences of their values.
    //
    // Given
    // -----
    // - A two-state context, ε = (1.2, 0.7), both score kinds.
    //
    // Expect
    // ------
    // - Analytic and central-difference gradients agree to 1e-6.
    fn gradient_matches_finite_differences() {
        let eps = array![1.2, 0.7];
        for logq in [false, true] {
            // Arrange
            let f = ObjectiveFunction::new(context(), logq);

            // Act
            let analytic = f.gradient(&eps).expect("gradient");
            let fd = eps.central_diff(&|e: &Array1<f64>| f.evaluate(e).unwrap_or(f64::NAN));

            // Assert
            for j in 0..eps.len() {
                assert_relative_eq!(analytic[j], fd[j], epsilon = 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Evaluation is deterministic and rejects malformed epsilons.
    //
    // Given
    // -----
    // - The same ε evaluated twice; a length-3 ε; a NaN entry.
    //
    // Expect
    // ------
    // - Identical values; `ThetaLengthMismatch` and `InvalidThetaInput`
    //   wrapped in `EstimatorError::Optimizer`.
    fn evaluation_is_pure_and_validated() {
        // Arrange
        let f = ObjectiveFunction::new(context(), true);
        let eps = array![0.8, 1.1];

        // Act / Assert
        assert_eq!(f.evaluate(&eps), f.evaluate(&eps));
        assert_eq!(
            f.evaluate(&array![1.0, 1.0, 1.0]),
            Err(EstimatorError::Optimizer(OptError::ThetaLengthMismatch { expected: 2, actual: 3 }))
        );
        assert!(matches!(
            f.gradient(&array![1.0, f64::NAN]),
            Err(EstimatorError::Optimizer(OptError::InvalidThetaInput { index: 1, .. }))
        ));
        assert!(format!("{f:?}").contains("logq: true"));
    }
}
