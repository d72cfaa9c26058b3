//! loglik_optimizer — argmin-powered objective maximization.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing**
//! scalar objectives `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], pick a [`SolverKind`], and invoke [`maximize`] to run
//! Nelder–Mead, simulated annealing, nonlinear conjugate gradient, or
//! L-BFGS with finite-difference fallbacks where gradients are missing.
//!
//! Key behaviors
//! -------------
//! - Convert user objectives `ℓ(θ)` into Argmin-compatible cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`], optionally evaluated at
//!   `clamp(θ)` when [`Bounds`] are set.
//! - Expose a single, user-facing entrypoint [`maximize`] that:
//!   - validates the option set against the solver's recognized options,
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - builds the solver via [`builders`],
//!   - executes it via [`run`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradients
//!   when analytic derivatives are missing.
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`],
//!   [`AnnealingSchedule`]) and validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user code implements `ℓ(θ)` and `∇ℓ(θ)` (when available), **never**
//!   the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] must treat invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Bounds are honored only by the derivative-free solvers; requesting
//!   them for a gradient solver is a configuration error.
//! - Returned `theta_hat` always lies inside the bounds when bounds are set.
//!
//! Conventions
//! -----------
//! - Parameters are [`Theta`] (`Array1<f64>`).
//! - All user-facing values (including [`OptimOutcome::value`]) are in
//!   terms of `ℓ`, not the cost.
//! - Errors bubble up as `OptResult<T>`; this module and its children never
//!   intentionally panic or use `unsafe`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions, bounds projection and
//!   annealing moves in [`adapter`], solver construction in [`builders`],
//!   option validation in [`validation`] and [`traits`], finite-difference
//!   fallbacks in [`finite_diff`], and end-to-end runs of every solver on a
//!   concave quadratic in [`api`].

pub mod adapter;
pub mod api;
pub mod bounds;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::bounds::Bounds;
pub use self::traits::{
    AnnealingSchedule, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, SolverKind,
    SolverOption, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use odem::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::bounds::Bounds;
    pub use super::traits::{
        AnnealingSchedule, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, SolverKind,
        Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
