//! models::errors — construction and evaluation failures of potential models.

pub type ModelResult<T> = Result<T, ModelError>;

/// ModelError — invalid model definitions or incompatible inputs.
///
/// Variants
/// --------
/// - `ParamLengthMismatch`: one parameter per basis term is required.
/// - `FitMaskLengthMismatch`: the fit mask must cover every parameter.
/// - `EmptyFitSet`: at least one parameter must be tunable.
/// - `InvalidBeta`: inverse temperature must be finite and positive.
/// - `InvalidTerm`: a basis term has a non-finite or non-positive shape
///   constant.
/// - `NonFiniteParam`: a parameter value is NaN or ±∞.
/// - `EmptyData`: a frame matrix has no rows.
/// - `DataColumnMismatch`: the frame matrix width does not match the model.
/// - `NonFiniteData`: a frame coordinate is NaN or ±∞.
/// - `EpsilonLengthMismatch`: a candidate epsilon vector has the wrong
///   length for the tunable set.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Definition ----
    ParamLengthMismatch { terms: usize, params: usize },
    FitMaskLengthMismatch { params: usize, mask: usize },
    EmptyFitSet,
    InvalidBeta { value: f64 },
    InvalidTerm { index: usize, reason: &'static str },
    NonFiniteParam { index: usize, value: f64 },

    // ---- Evaluation ----
    EmptyData,
    DataColumnMismatch { expected: usize, found: usize },
    NonFiniteData { frame: usize, column: usize },
    EpsilonLengthMismatch { expected: usize, found: usize },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ParamLengthMismatch { terms, params } => {
                write!(f, "Model has {terms} basis terms but {params} parameters.")
            }
            ModelError::FitMaskLengthMismatch { params, mask } => {
                write!(f, "Fit mask has {mask} entries for {params} parameters.")
            }
            ModelError::EmptyFitSet => write!(f, "No parameter is marked for fitting."),
            ModelError::InvalidBeta { value } => {
                write!(f, "Inverse temperature must be finite and positive; got {value}.")
            }
            ModelError::InvalidTerm { index, reason } => {
                write!(f, "Invalid basis term {index}: {reason}")
            }
            ModelError::NonFiniteParam { index, value } => {
                write!(f, "Parameter {index} is not finite: {value}.")
            }
            ModelError::EmptyData => write!(f, "Frame data must contain at least one frame."),
            ModelError::DataColumnMismatch { expected, found } => {
                write!(f, "Frame data has {found} columns; model expects {expected}.")
            }
            ModelError::NonFiniteData { frame, column } => {
                write!(f, "Frame {frame}, column {column} is not finite.")
            }
            ModelError::EpsilonLengthMismatch { expected, found } => {
                write!(f, "Epsilon vector has length {found}; expected {expected}.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Messages embed their payload.
    //
    // Given
    // -----
    // - `EpsilonLengthMismatch { expected: 2, found: 3 }` and
    //   `InvalidBeta { value: -1 }`.
    //
    // Expect
    // ------
    // - Both numbers appear in the first message, "-1" in the second.
    fn display_embeds_payload() {
        let len = ModelError::EpsilonLengthMismatch { expected: 2, found: 3 }.to_string();
        let beta = ModelError::InvalidBeta { value: -1.0 }.to_string();

        assert!(len.contains('2') && len.contains('3'));
        assert!(beta.contains("-1"));
    }
}
