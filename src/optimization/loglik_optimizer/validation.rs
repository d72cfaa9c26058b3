//! Validation helpers for objective optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Option checks**: [`validate_solver_options`] rejects options the
//!   chosen solver does not recognize and bounds of the wrong dimension.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks objective outputs
//!   for finiteness.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants, making higher-level code more uniform and easier
//! to debug.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        traits::{MLEOptions, SolverOption},
        types::{Grad, Theta},
    },
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an option set against the chosen solver.
///
/// Checks, in order:
/// - every tolerance present is well-formed (fields are public, so a
///   struct literal can bypass [`Tolerances::new`](super::Tolerances::new));
/// - the solver has some way to stop (a recognized tolerance or `max_iter`);
/// - every option that is set is recognized by the solver;
/// - bounds, when present, carry one pair per parameter.
///
/// # Errors
/// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] /
///   [`OptError::InvalidMaxIter`] for malformed tolerances.
/// - [`OptError::NoTolerancesProvided`] when nothing would stop the solver.
/// - [`OptError::BoundsNotSupported`] for bounds on a gradient solver.
/// - [`OptError::UnsupportedOption`] for any other unrecognized option.
/// - [`OptError::BoundsLengthMismatch`] for bounds of the wrong length.
pub fn validate_solver_options(opts: &MLEOptions, dim: usize) -> OptResult<()> {
    let kind = opts.solver;
    verify_tol_grad(opts.tols.tol_grad)?;
    verify_tol_cost(opts.tols.tol_cost)?;
    if opts.tols.max_iter == Some(0) {
        return Err(OptError::InvalidMaxIter {
            max_iter: 0,
            reason: "Maximum iterations must be greater than zero.",
        });
    }

    let set = [
        (SolverOption::TolGrad, opts.tols.tol_grad.is_some()),
        (SolverOption::TolCost, opts.tols.tol_cost.is_some()),
        (SolverOption::MaxIter, opts.tols.max_iter.is_some()),
        (SolverOption::Bounds, opts.bounds.is_some()),
        (SolverOption::LineSearcher, opts.line_searcher.is_some()),
        (SolverOption::LbfgsMem, opts.lbfgs_mem.is_some()),
        (SolverOption::SimplexStep, opts.simplex_step.is_some()),
        (SolverOption::Annealing, opts.annealing.is_some()),
        (SolverOption::CgRestartIters, opts.cg_restart_iters.is_some()),
    ];
    if !set.iter().any(|&(option, present)| present && is_stopping(option)) {
        return Err(OptError::NoTolerancesProvided);
    }
    for (option, present) in set {
        if !present || kind.accepts(option) {
            continue;
        }
        if option == SolverOption::Bounds {
            return Err(OptError::BoundsNotSupported { solver: kind });
        }
        return Err(OptError::UnsupportedOption { solver: kind, option });
    }
    if let Some(bounds) = &opts.bounds {
        bounds.validate_dim(dim)?;
    }
    Ok(())
}

fn is_stopping(option: SolverOption) -> bool {
    matches!(option, SolverOption::TolGrad | SolverOption::TolCost | SolverOption::MaxIter)
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate a parameter vector handed to an objective.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Theta` if valid.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
