//! Public API surface for objective maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their objective.
//! - [`SolverKind`]: which optimizer family to run.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by the gradient solvers.
//! - [`AnnealingSchedule`]: temperature, step, stall and seed for annealing.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user objective `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the objective (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        bounds::Bounds,
        types::{FnEvalMap, Grad, Theta},
        validation::{
            validate_solver_options, validate_theta_hat, validate_value, verify_tol_cost,
            verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::{fmt, str::FromStr};

/// User-implemented objective interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// objective `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-objective data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<f64>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Optimizer family.
///
/// Parsing accepts case-insensitive names: `"simplex"` / `"nelder-mead"`,
/// `"anneal"` / `"annealing"`, `"cg"` / `"conjugate-gradient"`, and
/// `"lbfgs"` / `"l-bfgs"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    Simplex,
    Annealing,
    ConjugateGradient,
    Lbfgs,
}

impl SolverKind {
    pub const ALL: [SolverKind; 4] = [
        SolverKind::Simplex,
        SolverKind::Annealing,
        SolverKind::ConjugateGradient,
        SolverKind::Lbfgs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Simplex => "simplex",
            SolverKind::Annealing => "annealing",
            SolverKind::ConjugateGradient => "cg",
            SolverKind::Lbfgs => "lbfgs",
        }
    }

    /// Whether the solver uses gradients.
    pub fn uses_gradient(self) -> bool {
        matches!(self, SolverKind::ConjugateGradient | SolverKind::Lbfgs)
    }

    /// Recognized-option table.
    ///
    /// | solver    | recognized                                              |
    /// |-----------|---------------------------------------------------------|
    /// | simplex   | `tol_cost`, `max_iter`, `bounds`, `simplex_step`        |
    /// | annealing | `max_iter`, `bounds`, `annealing`                       |
    /// | cg        | `tol_grad`, `max_iter`, `line_searcher`, `cg_restart_iters` |
    /// | lbfgs     | `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem` |
    pub fn accepts(self, option: SolverOption) -> bool {
        type O = SolverOption;
        match self {
            SolverKind::Simplex => {
                matches!(option, O::TolCost | O::MaxIter | O::Bounds | O::SimplexStep)
            }
            SolverKind::Annealing => matches!(option, O::MaxIter | O::Bounds | O::Annealing),
            SolverKind::ConjugateGradient => {
                matches!(option, O::TolGrad | O::MaxIter | O::LineSearcher | O::CgRestartIters)
            }
            SolverKind::Lbfgs => matches!(
                option,
                O::TolGrad | O::TolCost | O::MaxIter | O::LineSearcher | O::LbfgsMem
            ),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simplex" | "nelder-mead" | "neldermead" => Ok(SolverKind::Simplex),
            "anneal" | "annealing" => Ok(SolverKind::Annealing),
            "cg" | "conjugate-gradient" | "conjugategradient" => {
                Ok(SolverKind::ConjugateGradient)
            }
            "lbfgs" | "l-bfgs" => Ok(SolverKind::Lbfgs),
            _ => Err(OptError::InvalidSolver {
                name: s.to_string(),
                reason: "Valid options are 'simplex', 'annealing', 'cg' or 'lbfgs'.",
            }),
        }
    }
}

/// Names of the per-solver options, used in `UnsupportedOption` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverOption {
    TolGrad,
    TolCost,
    MaxIter,
    Bounds,
    LineSearcher,
    LbfgsMem,
    SimplexStep,
    Annealing,
    CgRestartIters,
}

impl fmt::Display for SolverOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverOption::TolGrad => "tol_grad",
            SolverOption::TolCost => "tol_cost",
            SolverOption::MaxIter => "max_iter",
            SolverOption::Bounds => "bounds",
            SolverOption::LineSearcher => "line_searcher",
            SolverOption::LbfgsMem => "lbfgs_mem",
            SolverOption::SimplexStep => "simplex_step",
            SolverOption::Annealing => "annealing",
            SolverOption::CgRestartIters => "cg_restart_iters",
        };
        f.write_str(name)
    }
}

/// Choice of line search used inside the gradient solvers.
///
/// Variants:
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    ///
    /// Any other value returns `OptError::InvalidLineSearch` with a helpful message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Simulated-annealing schedule.
///
/// - `temperature`: initial temperature, cooled with Boltzmann decay.
/// - `step`: half-width of the uniform perturbation at temperature 1;
///   moves shrink with `sqrt(temperature)`.
/// - `stall_best`: stop once this many iterations pass without a new best.
/// - `seed`: seeds both the acceptance and the perturbation generators, so
///   runs are reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingSchedule {
    pub temperature: f64,
    pub step: f64,
    pub stall_best: u64,
    pub seed: u64,
}

impl AnnealingSchedule {
    /// # Errors
    /// - [`OptError::InvalidAnnealing`] if `temperature` or `step` is not
    ///   finite and positive, or `stall_best == 0`.
    pub fn new(temperature: f64, step: f64, stall_best: u64, seed: u64) -> OptResult<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(OptError::InvalidAnnealing {
                field: "temperature",
                value: temperature,
                reason: "Temperature must be finite and positive.",
            });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(OptError::InvalidAnnealing {
                field: "step",
                value: step,
                reason: "Step must be finite and positive.",
            });
        }
        if stall_best == 0 {
            return Err(OptError::InvalidAnnealing {
                field: "stall_best",
                value: 0.0,
                reason: "Stall limit must be greater than zero.",
            });
        }
        Ok(Self { temperature, step, stall_best, seed })
    }
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self { temperature: 1.0, step: 0.1, stall_best: 200, seed: 0 }
    }
}

/// Optimizer-level configuration.
///
/// Every field other than `solver`, `tols` and `verbose` is optional and is
/// only legal for the solvers listed in [`SolverKind::accepts`]; setting an
/// option the chosen solver does not recognize fails validation with
/// [`OptError::UnsupportedOption`] instead of being silently ignored.
///
/// Constructors:
/// - [`MLEOptions::simplex`], [`MLEOptions::annealing`],
///   [`MLEOptions::conjugate_gradient`], [`MLEOptions::lbfgs`] return the
///   per-solver defaults.
/// - `with_*` setters refine them; numeric setters validate immediately.
///
/// Default: [`MLEOptions::simplex`].
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub solver: SolverKind,
    pub tols: Tolerances,
    pub bounds: Option<Bounds>,
    pub line_searcher: Option<LineSearcher>,
    pub lbfgs_mem: Option<usize>,
    pub simplex_step: Option<f64>,
    pub annealing: Option<AnnealingSchedule>,
    pub cg_restart_iters: Option<u64>,
    pub verbose: bool,
}

impl MLEOptions {
    fn bare(solver: SolverKind, tols: Tolerances) -> Self {
        Self {
            solver,
            tols,
            bounds: None,
            line_searcher: None,
            lbfgs_mem: None,
            simplex_step: None,
            annealing: None,
            cg_restart_iters: None,
            verbose: false,
        }
    }

    /// Nelder–Mead: simplex standard-deviation tolerance `1e-10`, 2000 iterations.
    pub fn simplex() -> Self {
        Self::bare(
            SolverKind::Simplex,
            Tolerances { tol_grad: None, tol_cost: Some(1e-10), max_iter: Some(2000) },
        )
    }

    /// Simulated annealing: 5000 iterations with the default schedule.
    pub fn annealing() -> Self {
        Self::bare(
            SolverKind::Annealing,
            Tolerances { tol_grad: None, tol_cost: None, max_iter: Some(5000) },
        )
    }

    /// Polak–Ribière+ CG: gradient tolerance `1e-6`, 500 iterations.
    pub fn conjugate_gradient() -> Self {
        Self::bare(
            SolverKind::ConjugateGradient,
            Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(500) },
        )
    }

    /// L-BFGS: gradient tolerance `1e-6`, 300 iterations.
    pub fn lbfgs() -> Self {
        Self::bare(
            SolverKind::Lbfgs,
            Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
        )
    }

    pub fn for_solver(solver: SolverKind) -> Self {
        match solver {
            SolverKind::Simplex => Self::simplex(),
            SolverKind::Annealing => Self::annealing(),
            SolverKind::ConjugateGradient => Self::conjugate_gradient(),
            SolverKind::Lbfgs => Self::lbfgs(),
        }
    }

    pub fn with_tols(mut self, tols: Tolerances) -> Self {
        self.tols = tols;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_line_searcher(mut self, line_searcher: LineSearcher) -> Self {
        self.line_searcher = Some(line_searcher);
        self
    }

    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `mem == 0`.
    pub fn with_lbfgs_mem(mut self, mem: usize) -> OptResult<Self> {
        if mem == 0 {
            return Err(OptError::InvalidLBFGSMem {
                mem,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        self.lbfgs_mem = Some(mem);
        Ok(self)
    }

    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] unless `step` is finite and positive.
    pub fn with_simplex_step(mut self, step: f64) -> OptResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(OptError::InvalidSimplexStep { value: step });
        }
        self.simplex_step = Some(step);
        Ok(self)
    }

    pub fn with_annealing(mut self, schedule: AnnealingSchedule) -> Self {
        self.annealing = Some(schedule);
        self
    }

    /// # Errors
    /// - [`OptError::InvalidRestartIters`] if `iters == 0`.
    pub fn with_cg_restart_iters(mut self, iters: u64) -> OptResult<Self> {
        if iters == 0 {
            return Err(OptError::InvalidRestartIters { value: iters });
        }
        self.cg_restart_iters = Some(iters);
        Ok(self)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the option set against the solver's recognized options and the
    /// problem dimension.
    ///
    /// # Errors
    /// See [`validate_solver_options`].
    pub fn validate(&self, dim: usize) -> OptResult<()> {
        validate_solver_options(self, dim)
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self::simplex()
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: cost-change tolerance for L-BFGS; simplex standard-deviation
///   tolerance for Nelder–Mead.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - `OptError::InvalidMaxIter` if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found (inside the bounds, if any).
/// - `value`: best **objective** value `ℓ(θ̂)` (not the cost).
/// - `converged`: `true` if the solver stopped on its own criterion rather
///   than by exhausting `max_iter`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - Keys follow argmin's counters, e.g., cost_count, gradient_count, etc.
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` into `(converged, status)`; running out of
    ///   iterations is reported but does not count as converged.
    /// - Computes `grad_norm` if a gradient was provided.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
                (false, format!("{termination:?}"))
            }
            _ => (true, format!("{termination:?}")),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }

    /// Mark the run as converged when the final gradient norm already meets
    /// `tol_grad`, even if the solver stopped for another reason.
    pub fn with_gradient_tolerance(mut self, tol_grad: Option<f64>) -> Self {
        if let (Some(tol), Some(norm)) = (tol_grad, self.grad_norm) {
            if norm <= tol {
                self.converged = true;
            }
        }
        self
    }

    /// Clamp `theta_hat` into `bounds`. `value` is unaffected because the
    /// bounded adapter already scored the clamped point.
    pub fn project_onto(mut self, bounds: Option<&Bounds>) -> Self {
        if let Some(bounds) = bounds {
            bounds.project_in_place(&mut self.theta_hat);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Solver names parse case-insensitively, including aliases.
    //
    // Given
    // -----
    // - A handful of accepted spellings and one unknown name.
    //
    // Expect
    // ------
    // - Known names map to their variant; the unknown one yields `InvalidSolver`.
    fn solver_kind_parses_aliases() {
        // Act / Assert
        assert_eq!("Nelder-Mead".parse::<SolverKind>(), Ok(SolverKind::Simplex));
        assert_eq!("anneal".parse::<SolverKind>(), Ok(SolverKind::Annealing));
        assert_eq!("CG".parse::<SolverKind>(), Ok(SolverKind::ConjugateGradient));
        assert_eq!("l-bfgs".parse::<SolverKind>(), Ok(SolverKind::Lbfgs));
        assert!(matches!("newton".parse::<SolverKind>(), Err(OptError::InvalidSolver { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Each solver's default options pass their own validation.
    //
    // Given
    // -----
    // - `MLEOptions::for_solver(kind)` for every solver kind, 2 parameters.
    //
    // Expect
    // ------
    // - `validate(2)` succeeds for all four.
    fn default_options_validate_for_every_solver() {
        for kind in SolverKind::ALL {
            // Arrange
            let opts = MLEOptions::for_solver(kind);

            // Act
            let result = opts.validate(2);

            // Assert
            assert!(result.is_ok(), "defaults for {kind} should validate: {result:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Only the derivative-free solvers take bounds.
    //
    // Given
    // -----
    // - The recognized-option table.
    //
    // Expect
    // ------
    // - `accepts(Bounds)` is true for simplex and annealing only.
    fn bounds_are_accepted_only_by_derivative_free_solvers() {
        assert!(SolverKind::Simplex.accepts(SolverOption::Bounds));
        assert!(SolverKind::Annealing.accepts(SolverOption::Bounds));
        assert!(!SolverKind::ConjugateGradient.accepts(SolverOption::Bounds));
        assert!(!SolverKind::Lbfgs.accepts(SolverOption::Bounds));
    }

    #[test]
    // Purpose
    // -------
    // Numeric setters reject out-of-range values at construction.
    //
    // Given
    // -----
    // - Zero L-BFGS memory, a negative simplex step, zero CG restart period
    //   and a zero annealing temperature.
    //
    // Expect
    // ------
    // - Each yields its dedicated error variant.
    fn setters_reject_out_of_range_values() {
        assert!(matches!(
            MLEOptions::lbfgs().with_lbfgs_mem(0),
            Err(OptError::InvalidLBFGSMem { mem: 0, .. })
        ));
        assert!(matches!(
            MLEOptions::simplex().with_simplex_step(-0.1),
            Err(OptError::InvalidSimplexStep { .. })
        ));
        assert!(matches!(
            MLEOptions::conjugate_gradient().with_cg_restart_iters(0),
            Err(OptError::InvalidRestartIters { value: 0 })
        ));
        assert!(matches!(
            AnnealingSchedule::new(0.0, 0.1, 10, 0),
            Err(OptError::InvalidAnnealing { field: "temperature", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Exhausting the iteration budget is not reported as convergence.
    //
    // Given
    // -----
    // - A `MaxItersReached` termination and a `SolverConverged` termination.
    //
    // Expect
    // ------
    // - `converged` is false for the former and true for the latter.
    fn outcome_maps_max_iters_to_not_converged() {
        // Act
        let capped = OptimOutcome::new(
            Some(array![1.0]),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            10,
            FnEvalMap::new(),
            None,
        )
        .expect("outcome should be valid");
        let done = OptimOutcome::new(
            Some(array![1.0]),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            3,
            FnEvalMap::new(),
            None,
        )
        .expect("outcome should be valid");

        // Assert
        assert!(!capped.converged);
        assert!(done.converged);
        assert_eq!(done.iterations, 3);
    }

    #[test]
    // Purpose
    // -------
    // Tolerances reject the all-`None` configuration.
    //
    // Given
    // -----
    // - `Tolerances::new(None, None, None)`.
    //
    // Expect
    // ------
    // - `OptError::NoTolerancesProvided`.
    fn tolerances_require_at_least_one_criterion() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
    }
}
