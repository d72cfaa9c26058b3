//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! Dispatches on [`SolverKind`]: builds the matching solver, wraps the
//! objective in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), and
//! delegates the run to the matching runner.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::{AnnealAdapter, ArgMinAdapter, BestSeen},
        builders::{
            build_annealer, build_cg_hager_zhang, build_cg_more_thuente,
            build_optimizer_hager_zhang, build_optimizer_more_thuente, build_simplex,
        },
        run::{run_conjugate_gradient, run_derivative_free, run_gradient_solver},
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, SolverKind},
        types::Theta,
    },
};

/// Maximize an objective `ℓ(θ)` with the solver named in `opts.solver`.
///
/// # Behavior
/// - Validates the option set against the solver and `theta0.len()`
///   (unrecognized options and misplaced bounds are rejected here, before
///   any evaluation).
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Runs the solver:
///   - **Simplex** / **Annealing**: on `c(clamp(θ))` when bounds are set;
///     the returned `theta_hat` is clamped too.
///   - **ConjugateGradient** / **Lbfgs**: with the line search in
///     `opts.line_searcher` (default More–Thuente).
///
/// # Parameters
/// - `f`: Your objective implementing [`LogLikelihood`].
/// - `theta0`: Initial parameter vector.
/// - `data`: Data passed through to `value`/`grad`.
/// - `opts`: Optimizer options.
///
/// # Errors
/// - Option errors from [`MLEOptions::validate`].
/// - Propagates any error from `f.check`.
/// - Propagates builder errors and runtime errors from the runners.
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `ℓ(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm.
///
/// # Example
/// ```
/// use ndarray::array;
/// use odem::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta},
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta - 1.0).mapv(|v| v * v).sum())
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.5, 1.5], &(), &MLEOptions::simplex())?;
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-3);
/// # Ok::<(), odem::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    opts.validate(theta0.len())?;
    f.check(&theta0, data)?;
    let bounds = opts.bounds.as_ref();
    match opts.solver {
        SolverKind::Simplex => {
            let problem = ArgMinAdapter::new(f, data).with_bounds(bounds);
            let solver = build_simplex(&theta0, opts)?;
            Ok(run_derivative_free(theta0, opts, problem, solver)?.project_onto(bounds))
        }
        SolverKind::Annealing => {
            let schedule = opts.annealing.unwrap_or_default();
            let start = match bounds {
                Some(b) => b.project(&theta0),
                None => theta0,
            };
            let problem =
                AnnealAdapter::new(ArgMinAdapter::new(f, data).with_bounds(bounds), &schedule);
            let solver = build_annealer(opts)?;
            Ok(run_derivative_free(start, opts, problem, solver)?.project_onto(bounds))
        }
        SolverKind::ConjugateGradient => {
            let seen = BestSeen::default();
            let problem = ArgMinAdapter::new(f, data).with_tracking(&seen);
            match opts.line_searcher.unwrap_or_default() {
                LineSearcher::MoreThuente => {
                    let solver = build_cg_more_thuente(opts)?;
                    run_conjugate_gradient(theta0, opts, problem, solver, &seen)
                }
                LineSearcher::HagerZhang => {
                    let solver = build_cg_hager_zhang(opts)?;
                    run_conjugate_gradient(theta0, opts, problem, solver, &seen)
                }
            }
        }
        SolverKind::Lbfgs => {
            let problem = ArgMinAdapter::new(f, data);
            match opts.line_searcher.unwrap_or_default() {
                LineSearcher::MoreThuente => {
                    let solver = build_optimizer_more_thuente(opts)?;
                    run_gradient_solver(theta0, opts, problem, solver)
                }
                LineSearcher::HagerZhang => {
                    let solver = build_optimizer_hager_zhang(opts)?;
                    run_gradient_solver(theta0, opts, problem, solver)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{
            bounds::Bounds,
            traits::{AnnealingSchedule, Tolerances},
            types::Grad,
        },
    };
    use ndarray::array;

    /// Concave quadratic with maximum at (1, -2).
    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(theta[0] - 1.0).powi(2) - 2.0 * (theta[1] + 2.0).powi(2))
        }

        fn check(&self, theta: &Theta, _: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(array![-2.0 * (theta[0] - 1.0), -4.0 * (theta[1] + 2.0)])
        }
    }

    #[test]
    // Purpose
    // -------
    // Every solver family finds the maximum of a smooth concave quadratic.
    //
    // Given
    // -----
    // - The quadratic with optimum (1, -2), started at (0, 0).
    // - Default options per solver (annealing with a long stall limit).
    //
    // Expect
    // ------
    // - θ̂ within 1e-3 of the optimum for the deterministic solvers and
    //   within 0.1 for annealing.
    fn every_solver_finds_quadratic_maximum() {
        let schedule =
            AnnealingSchedule::new(1.0, 0.2, 2000, 3).expect("schedule should be valid");
        let cases = [
            (MLEOptions::simplex(), 1e-3),
            (MLEOptions::annealing().with_annealing(schedule), 1e-1),
            (MLEOptions::conjugate_gradient(), 1e-3),
            (MLEOptions::lbfgs(), 1e-3),
        ];
        for (opts, tol) in cases {
            // Act
            let out = maximize(&Quadratic, array![0.0, 0.0], &(), &opts)
                .unwrap_or_else(|e| panic!("{} failed: {e}", opts.solver));

            // Assert
            assert!(
                (out.theta_hat[0] - 1.0).abs() < tol && (out.theta_hat[1] + 2.0).abs() < tol,
                "{}: theta_hat = {}",
                opts.solver,
                out.theta_hat
            );
            assert!(out.value <= 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Bounded simplex returns the clamped optimum when the box excludes the
    // unconstrained one.
    //
    // Given
    // -----
    // - The quadratic, bounds [0, 0.5] × [-1, 0], start (0.25, -0.5).
    //
    // Expect
    // ------
    // - θ̂ ≈ (0.5, -1), inside the box; the value is ℓ at that point.
    fn bounded_simplex_returns_clamped_optimum() {
        // Arrange
        let bounds = Bounds::new(&[[0.0, 0.5], [-1.0, 0.0]]).expect("bounds should be valid");
        let opts = MLEOptions::simplex().with_bounds(bounds);

        // Act
        let out = maximize(&Quadratic, array![0.25, -0.5], &(), &opts).expect("run should succeed");

        // Assert
        assert!((out.theta_hat[0] - 0.5).abs() < 1e-6, "theta_hat = {}", out.theta_hat);
        assert!((out.theta_hat[1] + 1.0).abs() < 1e-6, "theta_hat = {}", out.theta_hat);
        assert!((out.value - (-0.25 - 2.0)).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Configuration errors surface before any evaluation.
    //
    // Given
    // -----
    // - CG options with bounds; L-BFGS options with a zero-length start.
    //
    // Expect
    // ------
    // - `BoundsNotSupported` and the model's own `check` error.
    fn configuration_errors_fail_fast() {
        // Arrange
        let bounds = Bounds::new(&[[0.0, 1.0], [0.0, 1.0]]).expect("bounds should be valid");
        let cg = MLEOptions::conjugate_gradient().with_bounds(bounds);

        // Act
        let cg_err = maximize(&Quadratic, array![0.0, 0.0], &(), &cg);
        let check_err = maximize(&Quadratic, array![0.0], &(), &MLEOptions::lbfgs());

        // Assert
        assert_eq!(
            cg_err,
            Err(OptError::BoundsNotSupported { solver: SolverKind::ConjugateGradient })
        );
        assert_eq!(check_err, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // CG returns the start point unchanged when it already satisfies the
    // gradient tolerance.
    //
    // Given
    // -----
    // - The quadratic started at its optimum.
    //
    // Expect
    // ------
    // - θ̂ equals the start, zero iterations, converged.
    fn cg_returns_stationary_start_point() {
        // Arrange
        let opts = MLEOptions::conjugate_gradient().with_tols(Tolerances {
            tol_grad: Some(1e-8),
            tol_cost: None,
            max_iter: Some(50),
        });

        // Act
        let out = maximize(&Quadratic, array![1.0, -2.0], &(), &opts).expect("run should succeed");

        // Assert
        assert_eq!(out.theta_hat, array![1.0, -2.0]);
        assert_eq!(out.iterations, 0);
        assert!(out.converged);
    }
}
