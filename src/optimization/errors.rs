use argmin::core::{ArgminError, Error};

use crate::{
    models::errors::ModelError,
    observables::errors::ObservableError,
    optimization::loglik_optimizer::traits::{SolverKind, SolverOption},
};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Unknown solver name.
    InvalidSolver {
        name: String,
        reason: &'static str,
    },

    /// The chosen solver does not recognize this option.
    UnsupportedOption {
        solver: SolverKind,
        option: SolverOption,
    },

    /// Bounds were supplied to a solver that cannot honor them.
    BoundsNotSupported {
        solver: SolverKind,
    },

    /// Relative simplex step must be finite and positive.
    InvalidSimplexStep {
        value: f64,
    },

    /// Annealing schedule entry out of range.
    InvalidAnnealing {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Conjugate-gradient restart period must be positive.
    InvalidRestartIters {
        value: u64,
    },

    // ---- Bounds ----
    /// One `[lo, hi]` pair per parameter.
    BoundsLengthMismatch {
        expected: usize,
        found: usize,
    },

    /// Bound pair is non-finite or inverted.
    InvalidBound {
        index: usize,
        lo: f64,
        hi: f64,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Objective input ----
    /// Parameter vector length does not match the objective.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Parameter vectors handed to an objective must be finite.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    // ---- Domain ----
    /// Failure while evaluating the energy model.
    Model(ModelError),

    /// Failure while scoring observables.
    Observable(ObservableError),

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// `true` for errors caused by the caller's options rather than by a
    /// failing evaluation or solver.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OptError::InvalidTolGrad { .. }
                | OptError::InvalidTolCost { .. }
                | OptError::InvalidMaxIter { .. }
                | OptError::NoTolerancesProvided
                | OptError::InvalidLineSearch { .. }
                | OptError::InvalidLBFGSMem { .. }
                | OptError::InvalidSolver { .. }
                | OptError::UnsupportedOption { .. }
                | OptError::BoundsNotSupported { .. }
                | OptError::InvalidSimplexStep { .. }
                | OptError::InvalidAnnealing { .. }
                | OptError::InvalidRestartIters { .. }
                | OptError::BoundsLengthMismatch { .. }
                | OptError::InvalidBound { .. }
                | OptError::ThetaLengthMismatch { .. }
                | OptError::InvalidThetaInput { .. }
        )
    }

    /// `true` when a line search or solver step gave up, as opposed to the
    /// objective failing. Runners may recover the best point seen so far.
    pub fn is_solver_stop(&self) -> bool {
        matches!(
            self,
            OptError::ConditionViolated { .. }
                | OptError::InvalidParameter { .. }
                | OptError::BackendError { .. }
        )
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidSolver { name, reason } => {
                write!(f, "Invalid solver '{name}': {reason}")
            }
            OptError::UnsupportedOption { solver, option } => {
                write!(f, "Solver '{solver}' does not recognize option '{option}'")
            }
            OptError::BoundsNotSupported { solver } => {
                write!(f, "Solver '{solver}' does not support parameter bounds")
            }
            OptError::InvalidSimplexStep { value } => {
                write!(f, "Invalid simplex step {value}: must be finite and > 0")
            }
            OptError::InvalidAnnealing { field, value, reason } => {
                write!(f, "Invalid annealing {field} {value}: {reason}")
            }
            OptError::InvalidRestartIters { value } => {
                write!(f, "Invalid conjugate-gradient restart period {value}: must be > 0")
            }

            // ---- Bounds ----
            OptError::BoundsLengthMismatch { expected, found } => {
                write!(f, "Bounds length mismatch: expected {expected} pairs, found {found}")
            }
            OptError::InvalidBound { index, lo, hi, reason } => {
                write!(f, "Invalid bound at index {index}: [{lo}, {hi}]: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Objective input ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }

            // ---- Domain ----
            OptError::Model(err) => write!(f, "Model evaluation failed: {err}"),
            OptError::Observable(err) => write!(f, "Observable evaluation failed: {err}"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover our own error if it travelled through argmin, otherwise map
    /// argmin's error kinds one-to-one.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(own) => return own,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        OptError::Model(err)
    }
}

impl From<ObservableError> for OptError {
    fn from(err: ObservableError) -> Self {
        OptError::Observable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside a cost function survives the trip through
    // argmin's type-erased error.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - Converting back yields the identical variant, not `BackendError`.
    fn from_argmin_error_recovers_own_variant() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let erased: Error = original.clone().into();

        // Act
        let recovered = OptError::from(erased);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own error kinds map onto the wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::ConditionViolated` erased into `Error`.
    //
    // Expect
    // ------
    // - `OptError::ConditionViolated` carrying the same text, flagged as a
    //   solver stop.
    fn from_argmin_error_maps_condition_violated() {
        // Arrange
        let erased: Error =
            ArgminError::ConditionViolated { text: "line search".to_string() }.into();

        // Act
        let mapped = OptError::from(erased);

        // Assert
        assert_eq!(mapped, OptError::ConditionViolated { text: "line search".to_string() });
        assert!(mapped.is_solver_stop());
        assert!(!mapped.is_configuration());
    }

    #[test]
    // Purpose
    // -------
    // Option errors are classified as configuration errors.
    //
    // Given
    // -----
    // - A `BoundsNotSupported` error for the CG solver.
    //
    // Expect
    // ------
    // - `is_configuration()` is true and the message names the solver.
    fn bounds_not_supported_is_configuration() {
        // Arrange
        let err = OptError::BoundsNotSupported { solver: SolverKind::ConjugateGradient };

        // Act
        let message = err.to_string();

        // Assert
        assert!(err.is_configuration());
        assert!(message.contains("cg"), "message was: {message}");
    }
}
