//! loglik_optimizer::finite_diff — finite-difference gradient helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient approximations around a parameter
//! vector, together with validation, so that the adapter can serve
//! gradient-based solvers for objectives without an analytic gradient and
//! without depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] tries central differences first and falls back to
//!   forward differences when the central pass hits an evaluation error or
//!   yields a non-finite gradient.
//! - [`run_fd_diff`] computes a forward-difference gradient with error
//!   capture and post-hoc validation.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective closure cannot return `Result`; evaluation errors are
//!   routed into a shared `closure_err` cell and the closure returns `NaN`.
//! - Gradients returned from this module always satisfy [`validate_grad`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the success path, closure-error propagation, the
//!   non-finite rejection, and the central→forward fallback.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// fd_gradient — central-difference gradient with a forward fallback.
///
/// Parameters
/// ----------
/// - `theta`: point at which to differentiate.
/// - `func`: fallible scalar objective (typically the adapter's cost).
///
/// Returns
/// -------
/// `OptResult<Grad>` holding a validated gradient of `func`.
///
/// Errors
/// ------
/// - Any error raised by `func` during the forward pass.
/// - `OptError::InvalidGradient` if even the forward pass is non-finite.
///
/// Notes
/// -----
/// - An error raised during the central pass is not reported directly; the
///   forward pass evaluates closer to `theta` and often stays inside the
///   objective's domain.
pub fn fd_gradient<G>(theta: &Theta, func: G) -> OptResult<Grad>
where
    G: Fn(&Theta) -> Result<f64, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let captured = |x: &Theta| -> f64 {
        match func(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&captured);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, &captured, &closure_err)
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Parameters
/// ----------
/// - `theta`: `&Theta`
///   Point in parameter space at which the gradient should be
///   approximated. The length of `theta` defines the expected gradient
///   dimension.
/// - `func`: `&G`
///   Objective function mapping `theta` to a scalar value. It is assumed
///   to route any evaluation errors into `closure_err` and return `NaN`.
/// - `closure_err`: `&RefCell<Option<Error>>`
///   Shared cell used to capture an [`argmin::core::Error`] raised inside
///   `func`. This helper clears the cell on entry and inspects it after
///   the FD call.
///
/// Returns
/// -------
/// `OptResult<Grad>`
///   - `Ok(grad)` when no error was captured and the gradient passes
///     [`validate_grad`].
///   - `Err(e)` otherwise.
///
/// Errors
/// ------
/// - `OptError` (via `impl From<Error> for OptError`) for a captured error.
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
///
/// Panics
/// ------
/// - Never panics.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
