//! Basis shapes `f(x)` that parameters multiply.
//!
//! A term contributes `ε·f(x)` to the energy of a frame at coordinate `x`.
use ndarray::{Array1, ArrayView1};

use crate::models::errors::{ModelError, ModelResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PotentialTerm {
    /// `−exp(−(x − center)² / (2·width²))`; a positive epsilon deepens it.
    GaussianWell { center: f64, width: f64 },
    /// `½·k·(x − center)²`.
    Harmonic { center: f64, k: f64 },
    /// `slope·x`.
    Linear { slope: f64 },
}

impl PotentialTerm {
    /// Check the shape constants; `index` is reported in the error.
    ///
    /// # Errors
    /// - [`ModelError::InvalidTerm`] for non-finite constants or a
    ///   non-positive width / spring constant.
    pub fn validate(&self, index: usize) -> ModelResult<()> {
        let invalid = |reason| Err(ModelError::InvalidTerm { index, reason });
        match *self {
            PotentialTerm::GaussianWell { center, width } => {
                if !center.is_finite() {
                    return invalid("center must be finite");
                }
                if !(width.is_finite() && width > 0.0) {
                    return invalid("width must be finite and positive");
                }
            }
            PotentialTerm::Harmonic { center, k } => {
                if !center.is_finite() {
                    return invalid("center must be finite");
                }
                if !(k.is_finite() && k > 0.0) {
                    return invalid("spring constant must be finite and positive");
                }
            }
            PotentialTerm::Linear { slope } => {
                if !slope.is_finite() {
                    return invalid("slope must be finite");
                }
            }
        }
        Ok(())
    }

    pub fn eval(&self, x: f64) -> f64 {
        match *self {
            PotentialTerm::GaussianWell { center, width } => {
                let d = (x - center) / width;
                -(-0.5 * d * d).exp()
            }
            PotentialTerm::Harmonic { center, k } => 0.5 * k * (x - center).powi(2),
            PotentialTerm::Linear { slope } => slope * x,
        }
    }

    pub fn eval_many(&self, xs: ArrayView1<f64>) -> Array1<f64> {
        xs.mapv(|x| self.eval(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Shapes evaluate to their closed forms and invalid constants are
    // rejected.
    //
    // Given
    // -----
    // - A unit-width well at 0.5, a k = 2 spring at 1, slope 3.
    //
    // Expect
    // ------
    // - Well = −1 at its center and −e^{−½} one width away; spring = 1 at
    //   x = 2; linear = 6 at x = 2; zero width fails validation.
    fn shapes_evaluate_and_validate() {
        let well = PotentialTerm::GaussianWell { center: 0.5, width: 1.0 };
        let spring = PotentialTerm::Harmonic { center: 1.0, k: 2.0 };
        let line = PotentialTerm::Linear { slope: 3.0 };

        assert_eq!(well.eval(0.5), -1.0);
        assert!((well.eval(1.5) + (-0.5f64).exp()).abs() < 1e-15);
        assert_eq!(spring.eval(2.0), 1.0);
        assert_eq!(line.eval(2.0), 6.0);
        assert!(well.validate(0).is_ok());
        assert_eq!(
            PotentialTerm::GaussianWell { center: 0.0, width: 0.0 }.validate(4),
            Err(ModelError::InvalidTerm { index: 4, reason: "width must be finite and positive" })
        );
    }
}
