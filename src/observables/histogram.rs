//! Reference histograms and numpy-style binning of frames.
//!
//! A [`HistogramObservable`] pairs bin edges with an experimental density
//! and its per-bin Gaussian uncertainty. Both are normalized so the density
//! integrates to one over the edges (`Σ r_b·w_b = 1`), which is also how
//! [`HistogramObservable::observe`] reports simulated frames, so the two can
//! be compared bin by bin.
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1};

use crate::observables::errors::{ObsResult, ObservableError};

/// Noise model of a reference histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorModel {
    /// Independent Gaussian error per bin: `q_b = exp(-½ z_b²)`.
    #[default]
    Gaussian,
}

impl FromStr for ErrorModel {
    type Err = ObservableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(ErrorModel::Gaussian),
            _ => Err(ObservableError::UnknownErrorType { name: s.to_string() }),
        }
    }
}

/// One experimental distribution over a physical coordinate.
///
/// Invariants
/// ----------
/// - `edges` has `n_bins + 1` finite, strictly increasing entries, stored
///   contiguously whatever the layout of the array passed in.
/// - `reference` is non-negative with `Σ reference·widths = 1`.
/// - `errors` are finite and strictly positive, already multiplied by
///   `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramObservable {
    edges: Array1<f64>,
    widths: Array1<f64>,
    reference: Array1<f64>,
    errors: Array1<f64>,
    error_model: ErrorModel,
    scale: f64,
}

impl HistogramObservable {
    /// Build a histogram from raw reference values.
    ///
    /// `values` may be counts or an unnormalized density. When `errors` is
    /// `None` the Gaussian error is taken from counting statistics,
    /// `σ_b = sqrt(max(v_b, 1))`. Values and errors are then divided by
    /// `Σ v_b·w_b` and the errors multiplied by `scale`.
    ///
    /// # Errors
    /// - Edge problems: `TooFewEdges`, `NonFiniteEdge`, `NonMonotonicEdges`.
    /// - `BinCountMismatch` / `ErrorCountMismatch` for length mismatches.
    /// - `NonFiniteReference`, `NegativeReference`, `ZeroReferenceMass`.
    /// - `InvalidError` for a non-finite or non-positive error.
    /// - `InvalidScale` for a non-finite or non-positive scale.
    pub fn new(
        edges: Array1<f64>, values: Array1<f64>, errors: Option<Array1<f64>>,
        error_model: ErrorModel, scale: f64,
    ) -> ObsResult<Self> {
        validate_edges(&edges)?;
        let edges = edges.as_standard_layout().into_owned();
        let n_bins = edges.len() - 1;
        if values.len() != n_bins {
            return Err(ObservableError::BinCountMismatch { bins: n_bins, values: values.len() });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ObservableError::InvalidScale { value: scale });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ObservableError::NonFiniteReference { index, value });
            }
            if value < 0.0 {
                return Err(ObservableError::NegativeReference { index, value });
            }
        }
        let errors = match errors {
            Some(errors) => {
                if errors.len() != n_bins {
                    return Err(ObservableError::ErrorCountMismatch {
                        bins: n_bins,
                        errors: errors.len(),
                    });
                }
                errors
            }
            None => values.mapv(|v| v.max(1.0).sqrt()),
        };
        for (index, &value) in errors.iter().enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ObservableError::InvalidError { index, value });
            }
        }

        let widths = &edges.slice(ndarray::s![1..]) - &edges.slice(ndarray::s![..-1]);
        let mass = values.dot(&widths);
        if !(mass > 0.0) {
            return Err(ObservableError::ZeroReferenceMass);
        }
        let reference = values / mass;
        let errors = errors * (scale / mass);
        Ok(Self { edges, widths, reference, errors, error_model, scale })
    }

    /// Build from a loaded reference table: column 0 holds the values and
    /// an optional column 1 the per-bin uncertainty in the same units.
    ///
    /// # Errors
    /// - Same as [`HistogramObservable::new`].
    pub fn from_table(
        table: &Array2<f64>, edges: Array1<f64>, error_model: ErrorModel, scale: f64,
    ) -> ObsResult<Self> {
        let values = table.column(0).to_owned();
        let errors = (table.ncols() > 1).then(|| table.column(1).to_owned());
        Self::new(edges, values, errors, error_model, scale)
    }

    pub fn n_bins(&self) -> usize {
        self.reference.len()
    }

    pub fn edges(&self) -> &Array1<f64> {
        &self.edges
    }

    pub fn widths(&self) -> &Array1<f64> {
        &self.widths
    }

    /// Normalized reference density.
    pub fn reference(&self) -> &Array1<f64> {
        &self.reference
    }

    /// Normalized, scaled per-bin standard errors.
    pub fn errors(&self) -> &Array1<f64> {
        &self.errors
    }

    pub fn error_model(&self) -> ErrorModel {
        self.error_model
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Bin of `x` with half-open bins `[e_b, e_{b+1})`, except the last bin,
    /// which also holds the right edge. Out-of-range and `NaN` give `None`.
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        let n = self.edges.len();
        let (first, last) = (self.edges[0], self.edges[n - 1]);
        if !(x >= first && x <= last) {
            return None;
        }
        if x == last {
            return Some(n - 2);
        }
        // contiguous since `new`
        let edges = self.edges.as_slice()?;
        Some(edges.partition_point(|&e| e <= x) - 1)
    }

    /// Histogram `frames` into a density and its standard error.
    ///
    /// With `N = frames.len()`, bin `b` gets `n_b / (N·w_b)` and standard
    /// error `sqrt(n_b) / (N·w_b)`. Frames outside the edges are dropped
    /// but still count towards `N`.
    ///
    /// # Errors
    /// - [`ObservableError::EmptyFrames`] (reported as observable 0; the
    ///   set rewrites the index) if `frames` is empty.
    pub fn observe(&self, frames: ArrayView1<f64>) -> ObsResult<(Array1<f64>, Array1<f64>)> {
        if frames.is_empty() {
            return Err(ObservableError::EmptyFrames { observable: 0 });
        }
        let mut counts = Array1::<f64>::zeros(self.n_bins());
        for &x in frames.iter() {
            if let Some(b) = self.bin_index(x) {
                counts[b] += 1.0;
            }
        }
        let norm = &self.widths * frames.len() as f64;
        let density = &counts / &norm;
        let std = counts.mapv(f64::sqrt) / &norm;
        Ok((density, std))
    }
}

fn validate_edges(edges: &Array1<f64>) -> ObsResult<()> {
    if edges.len() < 2 {
        return Err(ObservableError::TooFewEdges { found: edges.len() });
    }
    for (index, &value) in edges.iter().enumerate() {
        if !value.is_finite() {
            return Err(ObservableError::NonFiniteEdge { index, value });
        }
        if index > 0 && value <= edges[index - 1] {
            return Err(ObservableError::NonMonotonicEdges { index });
        }
    }
    Ok(())
}
