//! Ordered collection of reference histograms and the Q / log-Q scores.
//!
//! The stacked observation vector is the concatenation of every histogram's
//! bins in insertion order. Scores compare a candidate stacked vector `x`
//! with the stacked reference `r` through `z_b = (x_b − r_b) / σ_b`:
//!
//! - `Q(x) = Π_b exp(−½ z_b²)` and `∂Q/∂x_b = −Q·z_b/σ_b`;
//! - `log Q(x) = −½ Σ_b z_b²` and `∂ log Q/∂x_b = −z_b/σ_b`.
//!
//! log Q is evaluated in closed form, never as `ln(Q)`, so it stays finite
//! and keeps its gradient however far the candidate is from the reference.
use std::path::Path;

use ndarray::{concatenate, Array1, ArrayView1, Axis};

use crate::{
    io::load_table,
    observables::{
        errors::{ObsResult, ObservableError},
        histogram::{ErrorModel, HistogramObservable},
    },
};

/// Which score a [`QFunction`] evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Q,
    LogQ,
}

/// Score/derivative pair bound to an [`ObservableSet`].
#[derive(Debug, Clone, Copy)]
pub struct QFunction<'a> {
    set: &'a ObservableSet,
    score: Score,
}

impl QFunction<'_> {
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn value(&self, values: ArrayView1<f64>) -> ObsResult<f64> {
        self.set.score(values, self.score)
    }

    pub fn derivative(&self, values: ArrayView1<f64>) -> ObsResult<Array1<f64>> {
        self.set.score_derivative(values, self.score)
    }
}

/// Ordered set of reference histograms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservableSet {
    histograms: Vec<HistogramObservable>,
}

impl ObservableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a reference table from `reference_file` and append it.
    ///
    /// Column 0 holds the reference values, an optional column 1 their
    /// uncertainty. `errortype` is parsed case-insensitively.
    ///
    /// # Errors
    /// - [`ObservableError::Io`] if the file cannot be read or parsed.
    /// - [`ObservableError::UnknownErrorType`] for an unsupported model.
    /// - Any construction error of [`HistogramObservable::from_table`].
    pub fn add_histogram<P: AsRef<Path>>(
        &mut self, reference_file: P, edges: Array1<f64>, errortype: &str, scale: f64,
    ) -> ObsResult<()> {
        let model: ErrorModel = errortype.parse()?;
        let table = load_table(reference_file)?;
        let histogram = HistogramObservable::from_table(&table, edges, model, scale)?;
        self.histograms.push(histogram);
        Ok(())
    }

    pub fn push_histogram(&mut self, histogram: HistogramObservable) {
        self.histograms.push(histogram);
    }

    /// Number of histograms.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Length of the stacked observation vector.
    pub fn n_values(&self) -> usize {
        self.histograms.iter().map(HistogramObservable::n_bins).sum()
    }

    pub fn histograms(&self) -> &[HistogramObservable] {
        &self.histograms
    }

    /// Stacked reference density.
    pub fn reference(&self) -> Array1<f64> {
        self.stack(HistogramObservable::reference)
    }

    /// Stacked per-bin standard errors.
    pub fn errors(&self) -> Array1<f64> {
        self.stack(HistogramObservable::errors)
    }

    /// Histogram one frame sequence per observable and stack the results.
    ///
    /// Densities are `n_b / (N·w_b)` with `N` the length of the sequence,
    /// counting frames that fall outside the edges, unlike numpy's
    /// `density=True`, which divides by the in-range count.
    ///
    /// # Errors
    /// - [`ObservableError::ObservableCountMismatch`] if `frames.len()`
    ///   differs from [`ObservableSet::len`].
    /// - [`ObservableError::EmptyFrames`] naming the first empty sequence.
    pub fn compute_observations(
        &self, frames: &[ArrayView1<f64>],
    ) -> ObsResult<(Array1<f64>, Array1<f64>)> {
        if frames.len() != self.histograms.len() {
            return Err(ObservableError::ObservableCountMismatch {
                expected: self.histograms.len(),
                found: frames.len(),
            });
        }
        let mut values = Vec::with_capacity(self.n_values());
        let mut stds = Vec::with_capacity(self.n_values());
        for (observable, (histogram, seq)) in self.histograms.iter().zip(frames).enumerate() {
            let (density, std) = histogram.observe(seq.view()).map_err(|err| match err {
                ObservableError::EmptyFrames { .. } => ObservableError::EmptyFrames { observable },
                other => other,
            })?;
            values.extend(density.iter().copied());
            stds.extend(std.iter().copied());
        }
        Ok((Array1::from(values), Array1::from(stds)))
    }

    /// `Q(x) = Π exp(−½ z_b²)`.
    pub fn q(&self, values: ArrayView1<f64>) -> ObsResult<f64> {
        self.score(values, Score::Q)
    }

    /// `∂Q/∂x_b = −Q·z_b/σ_b`.
    pub fn q_derivative(&self, values: ArrayView1<f64>) -> ObsResult<Array1<f64>> {
        self.score_derivative(values, Score::Q)
    }

    /// `−½ Σ z_b²`.
    pub fn log_q(&self, values: ArrayView1<f64>) -> ObsResult<f64> {
        self.score(values, Score::LogQ)
    }

    /// `−z_b/σ_b`.
    pub fn log_q_derivative(&self, values: ArrayView1<f64>) -> ObsResult<Array1<f64>> {
        self.score_derivative(values, Score::LogQ)
    }

    pub fn q_functions(&self) -> QFunction<'_> {
        QFunction { set: self, score: Score::Q }
    }

    pub fn log_q_functions(&self) -> QFunction<'_> {
        QFunction { set: self, score: Score::LogQ }
    }

    // ---- Helper Methods ----

    fn stack(&self, part: fn(&HistogramObservable) -> &Array1<f64>) -> Array1<f64> {
        let views: Vec<ArrayView1<f64>> = self.histograms.iter().map(|h| part(h).view()).collect();
        concatenate(Axis(0), &views).unwrap_or_else(|_| Array1::zeros(0))
    }

    /// Standardized residuals and the matching errors.
    fn residuals(&self, values: ArrayView1<f64>) -> ObsResult<(Array1<f64>, Array1<f64>)> {
        let expected = self.n_values();
        if values.len() != expected {
            return Err(ObservableError::CandidateLengthMismatch {
                expected,
                found: values.len(),
            });
        }
        let sigma = self.errors();
        let z = (&values - &self.reference()) / &sigma;
        Ok((z, sigma))
    }

    fn score(&self, values: ArrayView1<f64>, score: Score) -> ObsResult<f64> {
        let (z, _) = self.residuals(values)?;
        Ok(match score {
            Score::Q => (-0.5 * z.dot(&z)).exp(),
            Score::LogQ => -0.5 * z.dot(&z),
        })
    }

    fn score_derivative(&self, values: ArrayView1<f64>, score: Score) -> ObsResult<Array1<f64>> {
        let (z, sigma) = self.residuals(values)?;
        Ok(match score {
            Score::Q => {
                let q = (-0.5 * z.dot(&z)).exp();
                -q * &z / &sigma
            }
            Score::LogQ => -&z / &sigma,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    fn two_histograms() -> ObservableSet {
        let mut set = ObservableSet::new();
        set.push_histogram(
            HistogramObservable::new(
                array![0.0, 1.0, 2.0],
                array![1.0, 3.0],
                Some(array![0.5, 1.0]),
                ErrorModel::Gaussian,
                1.0,
            )
            .expect("histogram should build"),
        );
        set.push_histogram(
            HistogramObservable::new(
                array![0.0, 0.5, 1.0, 1.5],
                array![1.0, 1.0, 2.0],
                None,
                ErrorModel::Gaussian,
                1.0,
            )
            .expect("histogram should build"),
        );
        set
    }

    #[test]
    // Purpose
    // -------
    // The stacked vector concatenates histograms in insertion order and the
    // reference scores Q = 1 and log Q = 0.
    //
    // Given
    // -----
    // - Two histograms with 2 and 3 bins.
    //
    // Expect
    // ------
    // - n_values = 5; Q(r) = 1; log Q(r) = 0; both derivatives vanish.
    fn reference_is_the_unique_perfect_score() {
        // Arrange
        let set = two_histograms();
        let r = set.reference();

        // Act / Assert
        assert_eq!(set.len(), 2);
        assert_eq!(set.n_values(), 5);
        assert_eq!(set.q(r.view()), Ok(1.0));
        assert_eq!(set.log_q(r.view()), Ok(0.0));
        assert!(set.q_derivative(r.view()).expect("derivative").iter().all(|&d| d == 0.0));
        assert!(set.log_q_derivative(r.view()).expect("derivative").iter().all(|&d| d == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Analytic derivatives agree with finite differences.
    //
    // Given
    // -----
    // - A candidate offset from the reference in every bin.
    //
    // Expect
    // ------
    // - Q and log Q derivatives match central differences to 1e-6.
    fn derivatives_match_finite_differences() {
        // Arrange
        let set = two_histograms();
        let x = set.reference() + array![0.05, -0.1, 0.2, -0.15, 0.1];
        let q = set.q_functions();
        let lq = set.log_q_functions();

        // Act
        let fd_q = x.central_diff(&|v: &Array1<f64>| q.value(v.view()).unwrap_or(f64::NAN));
        let fd_lq = x.central_diff(&|v: &Array1<f64>| lq.value(v.view()).unwrap_or(f64::NAN));
        let an_q = q.derivative(x.view()).expect("derivative");
        let an_lq = lq.derivative(x.view()).expect("derivative");

        // Assert
        for b in 0..x.len() {
            assert_relative_eq!(an_q[b], fd_q[b], epsilon = 1e-6);
            assert_relative_eq!(an_lq[b], fd_lq[b], epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // A bin far outside its error keeps a finite score and a gradient even
    // though Q itself underflows.
    //
    // Given
    // -----
    // - A candidate 1e4 errors away from the reference in the first bin and
    //   one error away in the second.
    //
    // Expect
    // ------
    // - log Q = −½(1e8 + 1); every bin keeps −z/σ; Q = 0.
    fn distant_bins_keep_their_gradient() {
        // Arrange
        let set = two_histograms();
        let sigma = set.errors();
        let mut x = set.reference();
        x[0] += 1e4 * sigma[0];
        x[1] += sigma[1];

        // Act
        let lq = set.log_q(x.view()).expect("score");
        let d = set.log_q_derivative(x.view()).expect("derivative");

        // Assert
        assert_relative_eq!(lq, -0.5 * (1e8 + 1.0), max_relative = 1e-12);
        assert_relative_eq!(d[0], -1e4 / sigma[0], max_relative = 1e-12);
        assert_relative_eq!(d[1], -1.0 / sigma[1], epsilon = 1e-12);
        assert_eq!(set.q(x.view()), Ok(0.0));
    }

    #[test]
    // Purpose
    // -------
    // Length mismatches are rejected for frames and candidates.
    //
    // Given
    // -----
    // - One frame sequence for two observables; a 3-vector candidate; an
    //   empty second sequence.
    //
    // Expect
    // ------
    // - `ObservableCountMismatch`, `CandidateLengthMismatch`, and
    //   `EmptyFrames { observable: 1 }`.
    fn mismatched_inputs_are_rejected() {
        // Arrange
        let set = two_histograms();
        let frames = array![0.5, 1.5];
        let empty = Array1::<f64>::zeros(0);

        // Act / Assert
        assert_eq!(
            set.compute_observations(&[frames.view()]),
            Err(ObservableError::ObservableCountMismatch { expected: 2, found: 1 })
        );
        assert_eq!(
            set.q(array![0.0, 0.0, 0.0].view()),
            Err(ObservableError::CandidateLengthMismatch { expected: 5, found: 3 })
        );
        assert_eq!(
            set.compute_observations(&[frames.view(), empty.view()]),
            Err(ObservableError::EmptyFrames { observable: 1 })
        );
    }
}
