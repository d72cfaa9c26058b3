//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! optimizer. By defining these in one place, the rest of the optimization
//! code can stay agnostic to `ndarray` and Argmin generics and can more
//! easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients, and scalar
//!   costs (`Theta`, `Grad`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired solver aliases for the four supported families:
//!   Nelder–Mead, simulated annealing, nonlinear conjugate gradient, and
//!   L-BFGS (the latter two in both line-search flavours).
//! - Name the two Argmin iteration-state shapes the runners are generic
//!   over (with and without a gradient slot).
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors are `ndarray` containers over `f64`.
//! - `Cost` is always the scalar `c(θ) = -ℓ(θ)`; higher layers handle the
//!   sign flip back to the objective.
//! - The line-search aliases assume Argmin's three-parameter forms
//!   `(Param, Gradient, Float)` as of the pinned Argmin version.
//!
//! Conventions
//! -----------
//! - `DEFAULT_*` constants encode the defaults applied when an option is
//!   left unset in `MLEOptions`.
//! - This module defines no runtime behavior.
use argmin::{
    core::IterState,
    solver::{
        conjugategradient::{beta::PolakRibierePlus, NonlinearConjugateGradient},
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        neldermead::NelderMead,
        quasinewton::LBFGS,
        simulatedannealing::SimulatedAnnealing,
    },
};
use ndarray::Array1;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::HashMap;

/// Parameter vector `θ` for optimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default relative edge length of the initial Nelder–Mead simplex.
pub const DEFAULT_SIMPLEX_STEP: f64 = 0.05;

/// Absolute edge length used for coordinates that start at exactly zero.
pub const ZERO_SIMPLEX_STEP: f64 = 0.00025;

/// Default conjugate-gradient orthogonality restart threshold.
pub const DEFAULT_CG_RESTART_ORTHOGONALITY: f64 = 0.1;

/// Iteration state for derivative-free solvers.
pub type CostState = IterState<Theta, (), (), (), (), Cost>;

/// Iteration state for gradient-based solvers.
pub type GradState = IterState<Theta, Grad, (), (), (), Cost>;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Polak–Ribière+ conjugate gradient with Hager–Zhang line search.
pub type CgHagerZhang = NonlinearConjugateGradient<Theta, HagerZhangLS, PolakRibierePlus, Cost>;

/// Polak–Ribière+ conjugate gradient with More–Thuente line search.
pub type CgMoreThuente = NonlinearConjugateGradient<Theta, MoreThuenteLS, PolakRibierePlus, Cost>;

/// Nelder–Mead simplex over `Theta`.
pub type Simplex = NelderMead<Theta, Cost>;

/// Simulated annealing with a seeded, reproducible acceptance RNG.
pub type Annealer = SimulatedAnnealing<Cost, Xoshiro256PlusPlus>;
