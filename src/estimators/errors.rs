//! estimators::errors — the top-level error surface of an estimation run.
//!
//! Purpose
//! -------
//! Collect input validation failures of the estimator together with the
//! errors of the layers it drives (optimizer, observables, models), so a
//! caller of [`max_likelihood_estimate`](crate::estimators::max_likelihood_estimate)
//! matches on a single enum.
//!
//! Conventions
//! -----------
//! - Failures of a lower layer keep their own enum inside a wrapping
//!   variant; nothing is flattened into strings.
//! - [`EstimatorError::is_configuration`] is `true` for every failure that
//!   is detected before the solver starts.

use crate::{
    models::errors::ModelError, observables::errors::ObservableError,
    optimization::errors::OptError,
};

pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// EstimatorError — failures of state preparation and estimation.
///
/// Variants
/// --------
/// - `NoStates`: the state list is empty.
/// - `EmptyStateData { state }`: a state has no frames.
/// - `ObservationLengthMismatch { state, expected, found }`: a state's
///   observation vector does not match the stacked observable length.
/// - `StationaryLengthMismatch`, `InvalidStationaryWeight`,
///   `ZeroStationaryMass`: malformed stationary distribution.
/// - `InvalidBinCount`, `EmptyTrajectory`, `NonFiniteFrame`: partitioning
///   inputs.
/// - `ColumnMismatch { expected, found }`: a frame matrix has fewer columns
///   than there are observables.
/// - `Optimizer`, `Observable`, `Model`: errors of the wrapped layers.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorError {
    // ---- State validation ----
    NoStates,
    EmptyStateData { state: usize },
    ObservationLengthMismatch { state: usize, expected: usize, found: usize },

    // ---- Stationary distribution ----
    StationaryLengthMismatch { expected: usize, found: usize },
    InvalidStationaryWeight { index: usize, value: f64 },
    ZeroStationaryMass,

    // ---- Partitioning ----
    InvalidBinCount { nbins: usize },
    EmptyTrajectory,
    NonFiniteFrame { index: usize, value: f64 },
    ColumnMismatch { expected: usize, found: usize },

    // ---- Wrapped layers ----
    Optimizer(OptError),
    Observable(ObservableError),
    Model(ModelError),
}

impl EstimatorError {
    /// `true` for invalid inputs or options, i.e. anything detected before
    /// the solver evaluates a candidate.
    pub fn is_configuration(&self) -> bool {
        match self {
            EstimatorError::Optimizer(err) => err.is_configuration(),
            EstimatorError::Observable(err) => err.is_configuration(),
            _ => true,
        }
    }
}

impl std::error::Error for EstimatorError {}

impl std::fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimatorError::NoStates => write!(f, "At least one equilibrium state is required."),
            EstimatorError::EmptyStateData { state } => {
                write!(f, "State {state} contains no frames.")
            }
            EstimatorError::ObservationLengthMismatch { state, expected, found } => write!(
                f,
                "State {state} has {found} observations; the observable set has {expected}."
            ),
            EstimatorError::StationaryLengthMismatch { expected, found } => write!(
                f,
                "Stationary distribution has {found} entries for {expected} states."
            ),
            EstimatorError::InvalidStationaryWeight { index, value } => write!(
                f,
                "Stationary weight {index} must be finite and non-negative; got {value}."
            ),
            EstimatorError::ZeroStationaryMass => {
                write!(f, "Stationary distribution sums to zero.")
            }
            EstimatorError::InvalidBinCount { nbins } => {
                write!(f, "Number of bins must be positive; got {nbins}.")
            }
            EstimatorError::EmptyTrajectory => write!(f, "Trajectory contains no frames."),
            EstimatorError::NonFiniteFrame { index, value } => {
                write!(f, "Trajectory frame {index} is not finite: {value}.")
            }
            EstimatorError::ColumnMismatch { expected, found } => write!(
                f,
                "Frame data has {found} columns; at least {expected} are required."
            ),
            EstimatorError::Optimizer(err) => write!(f, "Optimizer error: {err}"),
            EstimatorError::Observable(err) => write!(f, "Observable error: {err}"),
            EstimatorError::Model(err) => write!(f, "Model error: {err}"),
        }
    }
}

impl From<OptError> for EstimatorError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::Model(inner) => EstimatorError::Model(inner),
            OptError::Observable(inner) => EstimatorError::Observable(inner),
            other => EstimatorError::Optimizer(other),
        }
    }
}

impl From<ObservableError> for EstimatorError {
    fn from(err: ObservableError) -> Self {
        EstimatorError::Observable(err)
    }
}

impl From<ModelError> for EstimatorError {
    fn from(err: ModelError) -> Self {
        EstimatorError::Model(err)
    }
}
