//! Adapters that expose a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of an objective `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! Two optional attachments change what the solver sees:
//! - [`Bounds`]: every evaluation happens at `clamp(θ)`.
//! - [`BestSeen`]: records the lowest-cost point evaluated so far, so a run
//!   that aborts inside a line search can still report something useful.
//!
//! [`AnnealAdapter`] wraps an [`ArgMinAdapter`] and adds the random-move
//! generator simulated annealing needs.
use std::cell::{Cell, RefCell};

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        bounds::Bounds,
        finite_diff::fd_gradient,
        traits::{AnnealingSchedule, LogLikelihood},
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::{
    core::{CostFunction, Error, Gradient},
    solver::simulatedannealing::Anneal,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Lowest-cost point evaluated by an adapter.
#[derive(Debug, Default)]
pub struct BestSeen {
    best: RefCell<Option<(Theta, Cost)>>,
    evaluations: Cell<u64>,
}

impl BestSeen {
    pub fn record(&self, theta: &Theta, cost: Cost) {
        self.evaluations.set(self.evaluations.get() + 1);
        let mut best = self.best.borrow_mut();
        let improved = match best.as_ref() {
            Some((_, c)) => cost < *c,
            None => true,
        };
        if improved {
            *best = Some((theta.clone(), cost));
        }
    }

    /// Best `(θ, cost)` pair so far, if anything was evaluated.
    pub fn best(&self) -> Option<(Theta, Cost)> {
        self.best.borrow().clone()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }
}

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`, evaluated at `clamp(θ)` when
///   bounds are attached.
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub bounds: Option<&'a Bounds>,
    pub seen: Option<&'a BestSeen>,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// - Calls the user's `value(θ, data)` and checks the result is finite.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user's `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let projected;
        let point = match self.bounds {
            Some(bounds) => {
                projected = bounds.project(theta);
                &projected
            }
            None => theta,
        };
        let output = self.f.value(point, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        let cost = -output;
        if let Some(seen) = self.seen {
            seen.record(point, cost);
        }
        Ok(cost)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - If the user implements `grad(θ, data)`, we validate it and return `-grad`
    ///   (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**
    ///   via [`fd_gradient`] (central first, forward as fallback).
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                Ok(fd_gradient(theta, |x: &Theta| self.cost(x))?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, bounds: None, seen: None }
    }

    /// Evaluate at `clamp(θ)` from now on.
    pub fn with_bounds(mut self, bounds: Option<&'a Bounds>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Record every evaluation into `seen`.
    pub fn with_tracking(mut self, seen: &'a BestSeen) -> Self {
        self.seen = Some(seen);
        self
    }
}

/// Simulated-annealing problem: the bounded cost plus a seeded move generator.
///
/// A move adds independent uniform noise on `[-s, s]` to every coordinate,
/// with `s = step * sqrt(T)` at temperature `T`, then clamps into the bounds.
pub struct AnnealAdapter<'a, F: LogLikelihood> {
    inner: ArgMinAdapter<'a, F>,
    step: f64,
    rng: RefCell<Xoshiro256PlusPlus>,
}

impl<'a, F: LogLikelihood> AnnealAdapter<'a, F> {
    /// The move generator is seeded from `schedule.seed` but on a different
    /// stream than the solver's acceptance draws.
    pub fn new(inner: ArgMinAdapter<'a, F>, schedule: &AnnealingSchedule) -> Self {
        let rng = Xoshiro256PlusPlus::seed_from_u64(schedule.seed ^ 0x9e37_79b9_7f4a_7c15);
        Self { inner, step: schedule.step, rng: RefCell::new(rng) }
    }
}

impl<'a, F: LogLikelihood> CostFunction for AnnealAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        self.inner.cost(theta)
    }
}

impl<'a, F: LogLikelihood> Anneal for AnnealAdapter<'a, F> {
    type Param = Theta;
    type Output = Theta;
    type Float = f64;

    fn anneal(&self, param: &Self::Param, extent: Self::Float) -> Result<Self::Output, Error> {
        let scale = self.step * extent.max(0.0).sqrt();
        let mut rng = self.rng.borrow_mut();
        let mut next = param.mapv(|v| v + scale * rng.gen_range(-1.0..=1.0));
        if let Some(bounds) = self.inner.bounds {
            bounds.project_in_place(&mut next);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    /// ℓ(θ) = -(θ - 1)·(θ - 1), optionally with an analytic gradient.
    struct Bowl {
        analytic: bool,
    }

    impl LogLikelihood for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-theta.mapv(|v| (v - 1.0).powi(2)).sum())
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            if self.analytic {
                Ok(theta.mapv(|v| -2.0 * (v - 1.0)))
            } else {
                Err(OptError::GradientNotImplemented)
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated objective and the analytic gradient is negated.
    //
    // Given
    // -----
    // - The bowl objective at θ = (0, 2) with an analytic gradient.
    //
    // Expect
    // ------
    // - cost = 2 and ∇c = (-2, 2).
    fn adapter_flips_sign_of_value_and_gradient() {
        // Arrange
        let f = Bowl { analytic: true };
        let adapter = ArgMinAdapter::new(&f, &());
        let theta = array![0.0, 2.0];

        // Act
        let cost = adapter.cost(&theta).expect("cost should evaluate");
        let grad = adapter.gradient(&theta).expect("gradient should evaluate");

        // Assert
        assert_eq!(cost, 2.0);
        assert_eq!(grad, array![-2.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the adapter differentiates the cost.
    //
    // Given
    // -----
    // - The bowl objective without `grad`, at θ = (0, 2).
    //
    // Expect
    // ------
    // - A finite-difference gradient close to (-2, 2).
    fn adapter_uses_finite_differences_when_gradient_missing() {
        // Arrange
        let f = Bowl { analytic: false };
        let adapter = ArgMinAdapter::new(&f, &());

        // Act
        let grad = adapter.gradient(&array![0.0, 2.0]).expect("fd gradient should evaluate");

        // Assert
        assert!((grad[0] + 2.0).abs() < 1e-6);
        assert!((grad[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // With bounds attached, evaluation happens at the clamped point and the
    // tracker records that clamped point.
    //
    // Given
    // -----
    // - Bounds [0, 0.5] and θ = (3.0).
    //
    // Expect
    // ------
    // - cost = (0.5 - 1)² = 0.25; the tracker's best point is (0.5).
    fn bounded_adapter_evaluates_clamped_point() {
        // Arrange
        let f = Bowl { analytic: true };
        let bounds = Bounds::new(&[[0.0, 0.5]]).expect("bounds should be valid");
        let seen = BestSeen::default();
        let adapter = ArgMinAdapter::new(&f, &()).with_bounds(Some(&bounds)).with_tracking(&seen);

        // Act
        let cost = adapter.cost(&array![3.0]).expect("cost should evaluate");

        // Assert
        assert_eq!(cost, 0.25);
        let (best, best_cost) = seen.best().expect("one evaluation was recorded");
        assert_eq!(best, array![0.5]);
        assert_eq!(best_cost, 0.25);
        assert_eq!(seen.evaluations(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Annealing moves stay inside the bounds and are reproducible per seed.
    //
    // Given
    // -----
    // - Two adapters with the same seed and tight bounds [0.9, 1.1].
    //
    // Expect
    // ------
    // - Identical move sequences, all inside the box.
    fn anneal_moves_are_bounded_and_reproducible() {
        // Arrange
        let f = Bowl { analytic: false };
        let bounds = Bounds::new(&[[0.9, 1.1], [0.9, 1.1]]).expect("bounds should be valid");
        let schedule = AnnealingSchedule { step: 5.0, ..AnnealingSchedule::default() };
        let a = AnnealAdapter::new(ArgMinAdapter::new(&f, &()).with_bounds(Some(&bounds)), &schedule);
        let b = AnnealAdapter::new(ArgMinAdapter::new(&f, &()).with_bounds(Some(&bounds)), &schedule);
        let start = array![1.0, 1.0];

        for _ in 0..20 {
            // Act
            let ma = a.anneal(&start, 1.0).expect("move should succeed");
            let mb = b.anneal(&start, 1.0).expect("move should succeed");

            // Assert
            assert_eq!(ma, mb);
            assert!(bounds.contains(&ma), "move left the box: {ma}");
        }
    }
}
