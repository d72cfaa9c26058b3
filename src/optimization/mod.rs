//! optimization — solver stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for parameter fitting, combining an
//! Argmin-backed objective optimizer, numerically stable log-domain
//! primitives, and a single error/result surface. Callers implement an
//! objective, choose a solver and its options, and obtain fitted parameters
//! and diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing** objectives `ℓ(θ)`
//!   (`loglik_optimizer`) with four solver families and per-solver option
//!   validation.
//! - Supply shared numerical primitives (`numerical_stability`) for
//!   log-sum-exp and softmax.
//! - Normalize configuration issues, numerical failures, objective failures
//!   and backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing an internal
//!   cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are expressed in
//!   terms of `ℓ`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Progress reporting is limited to the optional `obs_slog` observer.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns; the estimator
//!   integration suite exercises full runs on reweighted objectives.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use odem::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
