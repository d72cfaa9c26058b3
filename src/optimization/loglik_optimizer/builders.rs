//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for every supported solver family.
//! These helpers hide Argmin's generic wiring and apply crate-level options
//! (tolerances, memory size, simplex step, annealing schedule, restart
//! period) so that higher-level code can request a configured solver
//! without touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS and Polak–Ribière+ conjugate-gradient solvers with
//!   either Hager–Zhang or More–Thuente line search.
//! - Construct a Nelder–Mead solver from an initial simplex built around
//!   `theta0` (see [`initial_simplex`]).
//! - Construct a seeded simulated-annealing solver with Boltzmann cooling
//!   and a stall-on-best stopping rule.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner/executor layer, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical optimizer numeric types
//!   [`Theta`], [`Grad`], and [`Cost`].
//! - Options have been validated against the solver
//!   ([`validate_solver_options`](super::validation::validate_solver_options))
//!   before a builder runs; builders only consult the options their solver
//!   recognizes.
//! - Any invalid value passed into Argmin's `with_*` configuration is
//!   surfaced as an [`OptError`](crate::optimization::errors::OptError) via
//!   the crate's `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters` (Nelder–Mead's vertices aside); these are applied by the
//!   runner.
//! - Errors are always reported via [`OptResult`].
//!
//! Testing notes
//! -------------
//! - Unit tests verify each builder accepts its defaults and explicit
//!   options, and the shape of the initial simplex.
//! - End-to-end behavior is exercised in `api` and the integration suite.
use argmin::solver::{
    conjugategradient::{beta::PolakRibierePlus, NonlinearConjugateGradient},
    quasinewton::LBFGS,
    simulatedannealing::{SATempFunc, SimulatedAnnealing},
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Annealer, CgHagerZhang, CgMoreThuente, Cost, Grad, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Simplex, Theta, DEFAULT_CG_RESTART_ORTHOGONALITY,
            DEFAULT_LBFGS_MEM, DEFAULT_SIMPLEX_STEP, ZERO_SIMPLEX_STEP,
        },
    },
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   This builder consults `opts.lbfgs_mem` (default
///   [`DEFAULT_LBFGS_MEM`]) and `opts.tols.tol_grad` / `opts.tols.tol_cost`.
///
/// Returns
/// -------
/// `OptResult<LbfgsHagerZhang>`
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More–Thuente line search.
///
/// Same option handling as [`build_optimizer_hager_zhang`].
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// When a tolerance is `None`, the corresponding `with_tolerance_*` method
/// is not called and Argmin's default remains in effect.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Polak–Ribière+ conjugate gradient with More–Thuente line search.
///
/// The gradient tolerance is not a solver setting for CG in Argmin; the
/// runner applies it (see `run::run_conjugate_gradient`).
pub fn build_cg_more_thuente(opts: &MLEOptions) -> OptResult<CgMoreThuente> {
    configure_cg(NonlinearConjugateGradient::new(MoreThuenteLS::new(), PolakRibierePlus::new()), opts)
}

/// Polak–Ribière+ conjugate gradient with Hager–Zhang line search.
pub fn build_cg_hager_zhang(opts: &MLEOptions) -> OptResult<CgHagerZhang> {
    configure_cg(NonlinearConjugateGradient::new(HagerZhangLS::new(), PolakRibierePlus::new()), opts)
}

fn configure_cg<L>(
    solver: NonlinearConjugateGradient<Theta, L, PolakRibierePlus, Cost>, opts: &MLEOptions,
) -> OptResult<NonlinearConjugateGradient<Theta, L, PolakRibierePlus, Cost>> {
    let mut solver = solver.restart_orthogonality(DEFAULT_CG_RESTART_ORTHOGONALITY);
    if let Some(iters) = opts.cg_restart_iters {
        solver = solver.restart_iters(iters);
    }
    Ok(solver)
}

/// build_simplex — Nelder–Mead around `theta0`.
///
/// Uses `opts.simplex_step` (default [`DEFAULT_SIMPLEX_STEP`]) for the
/// initial simplex and `opts.tols.tol_cost` as the standard-deviation
/// tolerance on vertex costs.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects the
///   tolerance.
pub fn build_simplex(theta0: &Theta, opts: &MLEOptions) -> OptResult<Simplex> {
    let step = opts.simplex_step.unwrap_or(DEFAULT_SIMPLEX_STEP);
    let mut solver = Simplex::new(initial_simplex(theta0, step));
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(tol)?;
    }
    Ok(solver)
}

/// Vertices of the initial simplex: `theta0` plus one vertex per coordinate,
/// moved by `step * |θ_i|`, or by [`ZERO_SIMPLEX_STEP`] when `θ_i == 0`.
pub fn initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] = if vertex[i] != 0.0 { vertex[i] * (1.0 + step) } else { ZERO_SIMPLEX_STEP };
        vertices.push(vertex);
    }
    vertices
}

/// build_annealer — seeded simulated annealing.
///
/// Temperature decays with [`SATempFunc::Boltzmann`]; the run stops once
/// `stall_best` iterations pass without improving the best cost (or at
/// `max_iter`, applied by the runner).
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects the
///   initial temperature.
pub fn build_annealer(opts: &MLEOptions) -> OptResult<Annealer> {
    let schedule = opts.annealing.unwrap_or_default();
    let rng = Xoshiro256PlusPlus::seed_from_u64(schedule.seed);
    let solver = SimulatedAnnealing::new_with_rng(schedule.temperature, rng)?
        .with_temp_func(SATempFunc::Boltzmann)
        .with_stall_best(schedule.stall_best);
    Ok(solver)
}
