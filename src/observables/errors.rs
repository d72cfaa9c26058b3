//! observables::errors — validation and evaluation failures for histogram
//! observables.
//!
//! Purpose
//! -------
//! Give construction of reference histograms, binning of trajectory frames
//! and evaluation of Q / log-Q scores a single error surface.
//!
//! Conventions
//! -----------
//! - Index payloads are 0-based bin or observable positions.
//! - [`ObservableError::is_configuration`] separates malformed inputs from
//!   failures that depend on the candidate being scored.

use crate::io::errors::IoError;

pub type ObsResult<T> = Result<T, ObservableError>;

/// ObservableError — failures raised by histogram observables.
///
/// Variants
/// --------
/// - Edges: `TooFewEdges`, `NonFiniteEdge`, `NonMonotonicEdges`.
/// - Reference data: `BinCountMismatch`, `ErrorCountMismatch`,
///   `NonFiniteReference`, `NegativeReference`, `ZeroReferenceMass`,
///   `InvalidError`, `InvalidScale`, `UnknownErrorType`.
/// - Evaluation: `ObservableCountMismatch`, `EmptyFrames`,
///   `CandidateLengthMismatch`.
/// - `Io`: the reference file could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservableError {
    // ---- Edges ----
    TooFewEdges { found: usize },
    NonFiniteEdge { index: usize, value: f64 },
    NonMonotonicEdges { index: usize },

    // ---- Reference data ----
    BinCountMismatch { bins: usize, values: usize },
    ErrorCountMismatch { bins: usize, errors: usize },
    NonFiniteReference { index: usize, value: f64 },
    NegativeReference { index: usize, value: f64 },
    ZeroReferenceMass,
    InvalidError { index: usize, value: f64 },
    InvalidScale { value: f64 },
    UnknownErrorType { name: String },

    // ---- Evaluation ----
    ObservableCountMismatch { expected: usize, found: usize },
    EmptyFrames { observable: usize },
    CandidateLengthMismatch { expected: usize, found: usize },

    Io(IoError),
}

impl ObservableError {
    /// `true` for errors caused by malformed construction inputs rather
    /// than by a particular evaluation.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            ObservableError::CandidateLengthMismatch { .. } | ObservableError::Io(_)
        )
    }
}

impl std::error::Error for ObservableError {}

impl std::fmt::Display for ObservableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservableError::TooFewEdges { found } => {
                write!(f, "A histogram needs at least 2 bin edges; got {found}.")
            }
            ObservableError::NonFiniteEdge { index, value } => {
                write!(f, "Bin edge {index} is not finite: {value}.")
            }
            ObservableError::NonMonotonicEdges { index } => {
                write!(f, "Bin edges must be strictly increasing; edge {index} is not.")
            }
            ObservableError::BinCountMismatch { bins, values } => {
                write!(f, "Reference has {values} values for {bins} bins.")
            }
            ObservableError::ErrorCountMismatch { bins, errors } => {
                write!(f, "Reference has {errors} error entries for {bins} bins.")
            }
            ObservableError::NonFiniteReference { index, value } => {
                write!(f, "Reference value {index} is not finite: {value}.")
            }
            ObservableError::NegativeReference { index, value } => {
                write!(f, "Reference value {index} is negative: {value}.")
            }
            ObservableError::ZeroReferenceMass => {
                write!(f, "Reference histogram has zero total mass.")
            }
            ObservableError::InvalidError { index, value } => {
                write!(f, "Error of bin {index} must be finite and positive; got {value}.")
            }
            ObservableError::InvalidScale { value } => {
                write!(f, "Error scale must be finite and positive; got {value}.")
            }
            ObservableError::UnknownErrorType { name } => {
                write!(f, "Unknown error type '{name}'. Supported: gaussian.")
            }
            ObservableError::ObservableCountMismatch { expected, found } => {
                write!(f, "Expected frame data for {expected} observables; got {found}.")
            }
            ObservableError::EmptyFrames { observable } => {
                write!(f, "No frames supplied for observable {observable}.")
            }
            ObservableError::CandidateLengthMismatch { expected, found } => {
                write!(f, "Candidate observation vector has length {found}; expected {expected}.")
            }
            ObservableError::Io(err) => write!(f, "Reference file error: {err}"),
        }
    }
}

impl From<IoError> for ObservableError {
    fn from(err: IoError) -> Self {
        ObservableError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Construction problems classify as configuration errors, evaluation
    // problems do not.
    //
    // Given
    // -----
    // - `NonMonotonicEdges`, `UnknownErrorType` and `CandidateLengthMismatch`.
    //
    // Expect
    // ------
    // - The first two are configuration errors; the mismatch is not. The
    //   unknown type's message names it.
    fn configuration_classification() {
        // Arrange
        let edges = ObservableError::NonMonotonicEdges { index: 2 };
        let unknown = ObservableError::UnknownErrorType { name: "poisson".into() };
        let candidate = ObservableError::CandidateLengthMismatch { expected: 4, found: 3 };

        // Act / Assert
        assert!(edges.is_configuration());
        assert!(unknown.is_configuration());
        assert!(!candidate.is_configuration());
        assert!(unknown.to_string().contains("poisson"));
    }
}
