//! Box constraints for derivative-free solvers.
//!
//! Bounds are enforced by projection: the adapter evaluates the objective at
//! `clamp(θ, lo, hi)` and the runner clamps the reported optimum, so the
//! solver is free to wander outside the box while every value it sees and
//! every parameter it returns lies inside.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::Theta,
};

/// Closed box `[lo_i, hi_i]` per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Theta,
    upper: Theta,
}

impl Bounds {
    /// Build bounds from `[lo, hi]` pairs, one per parameter.
    ///
    /// # Errors
    /// - [`OptError::InvalidBound`] if a limit is non-finite or `lo > hi`.
    pub fn new(pairs: &[[f64; 2]]) -> OptResult<Self> {
        for (index, &[lo, hi]) in pairs.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(OptError::InvalidBound {
                    index,
                    lo,
                    hi,
                    reason: "Bounds must be finite.",
                });
            }
            if lo > hi {
                return Err(OptError::InvalidBound {
                    index,
                    lo,
                    hi,
                    reason: "Lower bound must not exceed upper bound.",
                });
            }
        }
        let lower = pairs.iter().map(|p| p[0]).collect();
        let upper = pairs.iter().map(|p| p[1]).collect();
        Ok(Self { lower, upper })
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    /// # Errors
    /// - [`OptError::BoundsLengthMismatch`] unless there is one pair per parameter.
    pub fn validate_dim(&self, dim: usize) -> OptResult<()> {
        if self.len() != dim {
            return Err(OptError::BoundsLengthMismatch { expected: dim, found: self.len() });
        }
        Ok(())
    }

    /// Whether every coordinate of `theta` lies inside its interval.
    pub fn contains(&self, theta: &Theta) -> bool {
        theta.len() == self.len()
            && theta
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }

    /// Clamp `theta` into the box, returning a new vector.
    pub fn project(&self, theta: &Theta) -> Theta {
        let mut out = theta.clone();
        self.project_in_place(&mut out);
        out
    }

    pub fn project_in_place(&self, theta: &mut Theta) {
        for ((v, &lo), &hi) in theta.iter_mut().zip(self.lower.iter()).zip(self.upper.iter()) {
            *v = v.clamp(lo, hi);
        }
    }
}
