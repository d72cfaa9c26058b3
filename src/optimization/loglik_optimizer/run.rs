//! Execution helpers that run an `argmin` solver on an objective and return a
//! crate-friendly [`OptimOutcome`].
//!
//! - [`run_gradient_solver`]: L-BFGS (and the core of CG).
//! - [`run_conjugate_gradient`]: CG, which has no built-in gradient-norm
//!   test; the runner applies `tol_grad` and recovers from line-search
//!   aborts.
//! - [`run_derivative_free`]: Nelder–Mead and simulated annealing.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::{ArgMinAdapter, BestSeen},
        traits::{LogLikelihood, MLEOptions, OptimOutcome},
        types::{CostState, FnEvalMap, GradState, Theta},
    },
};
use argmin::core::{
    CostFunction, Executor, Gradient, Solver, State, TerminationReason, TerminationStatus,
};
use argmin_math::ArgminL2Norm;

/// Run an `argmin` gradient solver on an objective.
///
/// This is the shared runner used by every gradient solver. It first checks
/// whether `theta0` already meets `tol_grad` and, if so, returns it as
/// converged. Otherwise it wires up:
/// - the user objective via [`ArgMinAdapter`],
/// - the chosen `Solver`,
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always` and a one-time pre-iteration
/// line logs ℓ(θ₀) and, if available, ||grad|| before the first iteration.
///
/// # Errors
/// - Propagates any `argmin` runtime error (observer failures, solver errors,
///   line-search failures, etc.) via the crate's `From<argmin::core::Error>`
///   conversion.
/// - Propagates any validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_gradient_solver<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, GradState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    if let Some(outcome) = stationary_start(&theta0, opts, &problem)? {
        return Ok(outcome);
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    Ok(OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )?
    .with_gradient_tolerance(opts.tols.tol_grad))
}

/// Run nonlinear conjugate gradient.
///
/// Behavior:
/// - Runs through [`run_gradient_solver`], so a stationary start is
///   returned as-is and the outcome counts as converged when the final
///   gradient norm meets `tol_grad`. Argmin's CG has no gradient-norm stop
///   of its own, so otherwise it runs up to `max_iter`.
/// - When the line search aborts (`ConditionViolated`, `InvalidParameter`
///   or a backend error), the lowest-cost point recorded in `seen` is
///   returned with a status naming the abort, instead of an error. It
///   counts as converged if its gradient norm meets `tol_grad`.
///
/// # Errors
/// - Objective failures (model or observable errors) and errors raised
///   before any point was evaluated are propagated.
pub fn run_conjugate_gradient<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
    seen: &BestSeen,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, GradState> + Send + 'static,
{
    let (f, data) = (problem.f, problem.data);
    match run_gradient_solver(theta0, opts, problem, solver) {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is_solver_stop() => match seen.best() {
            Some((theta_hat, cost)) => {
                let grad = ArgMinAdapter::new(f, data).gradient(&theta_hat).ok();
                let mut counts = FnEvalMap::new();
                counts.insert("cost_count".to_string(), seen.evaluations());
                let mut outcome = OptimOutcome::new(
                    Some(theta_hat),
                    -cost,
                    TerminationStatus::NotTerminated,
                    0,
                    counts,
                    grad,
                )?
                .with_gradient_tolerance(opts.tols.tol_grad);
                outcome.status = format!("Line search stopped: {err}");
                Ok(outcome)
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

/// Run a derivative-free solver (Nelder–Mead or simulated annealing).
///
/// Generic over the problem type so both the plain [`ArgMinAdapter`] and the
/// annealing wrapper can share it. The caller projects the outcome onto the
/// bounds.
///
/// # Errors
/// - Propagates `argmin` runtime errors and outcome validation errors.
pub fn run_derivative_free<O, S>(
    theta0: Theta, opts: &MLEOptions, problem: O, solver: S,
) -> OptResult<OptimOutcome>
where
    O: CostFunction<Param = Theta, Output = f64>,
    S: Solver<O, CostState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        eprintln!("init: ell(theta0) = {:.6}", -problem.cost(&theta0)?);
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        None,
    )
}

// ---- Helper Methods ----

/// Short-circuit when `‖∇c(θ₀)‖ <= tol_grad`: the start point is returned as
/// converged without touching the solver, so a stationary start is never
/// perturbed by a line search along a vanishing direction.
fn stationary_start<F>(
    theta0: &Theta, opts: &MLEOptions, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<Option<OptimOutcome>>
where
    F: LogLikelihood,
{
    let Some(tol) = opts.tols.tol_grad else {
        return Ok(None);
    };
    let g0 = problem.gradient(theta0)?;
    if g0.l2_norm() > tol {
        return Ok(None);
    }
    let value = -problem.cost(theta0)?;
    let mut counts = FnEvalMap::new();
    counts.insert("cost_count".to_string(), 1);
    counts.insert("gradient_count".to_string(), 1);
    let outcome = OptimOutcome::new(
        Some(theta0.clone()),
        value,
        TerminationStatus::Terminated(TerminationReason::SolverConverged),
        0,
        counts,
        Some(g0),
    )?;
    Ok(Some(outcome))
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
