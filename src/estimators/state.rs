//! Equilibrium states: frames plus their observed distribution.
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{
    estimators::errors::{EstimatorError, EstimatorResult},
    observables::ObservableSet,
};

/// One equilibrium state of the simulation.
///
/// `data` is `frames × coordinates` in the layout the model reads;
/// `observed` is the stacked observation vector of those frames (see
/// [`ObservableSet::compute_observations`]) and `observed_std` its
/// standard error.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord {
    pub index: usize,
    pub data: Array2<f64>,
    pub observed: Array1<f64>,
    pub observed_std: Array1<f64>,
}

impl StateRecord {
    pub fn new(
        index: usize, data: Array2<f64>, observed: Array1<f64>, observed_std: Array1<f64>,
    ) -> Self {
        Self { index, data, observed, observed_std }
    }

    /// Observe `data` with column `i` feeding observable `i`.
    ///
    /// # Errors
    /// - [`EstimatorError::ColumnMismatch`] if `data` has fewer columns than
    ///   `observables` has histograms.
    /// - [`EstimatorError::EmptyStateData`] if `data` has no rows.
    pub fn from_observable_columns(
        index: usize, data: Array2<f64>, observables: &ObservableSet,
    ) -> EstimatorResult<Self> {
        if data.ncols() < observables.len() {
            return Err(EstimatorError::ColumnMismatch {
                expected: observables.len(),
                found: data.ncols(),
            });
        }
        if data.nrows() == 0 {
            return Err(EstimatorError::EmptyStateData { state: index });
        }
        let frames: Vec<ArrayView1<f64>> =
            (0..observables.len()).map(|i| data.column(i)).collect();
        let (observed, observed_std) = observables.compute_observations(&frames)?;
        Ok(Self::new(index, data, observed, observed_std))
    }

    /// State of a 1-D trajectory: `positions` become an `(n, 1)` data matrix
    /// and feed every observable.
    ///
    /// # Errors
    /// - [`EstimatorError::EmptyStateData`] if `positions` is empty.
    pub fn from_positions(
        index: usize, positions: ArrayView1<f64>, observables: &ObservableSet,
    ) -> EstimatorResult<Self> {
        if positions.is_empty() {
            return Err(EstimatorError::EmptyStateData { state: index });
        }
        let frames = vec![positions; observables.len()];
        let (observed, observed_std) = observables.compute_observations(&frames)?;
        let data = positions.to_owned().insert_axis(Axis(1));
        Ok(Self::new(index, data, observed, observed_std))
    }

    pub fn n_frames(&self) -> usize {
        self.data.nrows()
    }
}
