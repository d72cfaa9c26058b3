//! numerical_stability — overflow-safe exponential sums.
//!
//! Purpose
//! -------
//! Collect the log-domain primitives the reweighting estimator needs:
//! log-sum-exp and softmax.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs may contain `-∞` (zero weight) but not `NaN`; callers validate
//!   energies before they reach these helpers.
//! - This module never logs, performs I/O, or touches global state.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check agreement with the naïve
//!   formulas on safe inputs and the absence of overflow on large ones.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{log_sum_exp, safe_softmax};

pub mod prelude {
    pub use super::transformations::{log_sum_exp, safe_softmax};
}
