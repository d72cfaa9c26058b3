//! Discretize a 1-D trajectory into equilibrium states.
//!
//! Frames are binned on `nbins` equal-width intervals spanning
//! `[min, max]` of the trajectory; the maximum lands in the last bin. Each
//! non-empty bin becomes one state.
use ndarray::ArrayView1;

use crate::{
    estimators::{
        errors::{EstimatorError, EstimatorResult},
        state::StateRecord,
    },
    observables::ObservableSet,
};

/// Frames of one occupied bin. `index` is the 0-based bin number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePartition {
    pub index: usize,
    pub frames: Vec<usize>,
}

/// Group frame indices by equal-width bins of their position.
///
/// Bins are returned in increasing order and empty bins are skipped. A
/// constant trajectory forms a single state.
///
/// # Errors
/// - [`EstimatorError::InvalidBinCount`] if `nbins == 0`.
/// - [`EstimatorError::EmptyTrajectory`] if `positions` is empty.
/// - [`EstimatorError::NonFiniteFrame`] for NaN or ±∞ positions.
pub fn partition_by_bins(
    positions: ArrayView1<f64>, nbins: usize,
) -> EstimatorResult<Vec<StatePartition>> {
    if nbins == 0 {
        return Err(EstimatorError::InvalidBinCount { nbins });
    }
    if positions.is_empty() {
        return Err(EstimatorError::EmptyTrajectory);
    }
    if let Some((index, &value)) = positions.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(EstimatorError::NonFiniteFrame { index, value });
    }
    let (lo, hi) = positions
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let width = (hi - lo) / nbins as f64;

    let mut bins: Vec<Vec<usize>> = vec![Vec::new(); nbins];
    for (frame, &x) in positions.iter().enumerate() {
        let bin = if width > 0.0 { (((x - lo) / width) as usize).min(nbins - 1) } else { 0 };
        bins[bin].push(frame);
    }
    Ok(bins
        .into_iter()
        .enumerate()
        .filter(|(_, frames)| !frames.is_empty())
        .map(|(index, frames)| StatePartition { index, frames })
        .collect())
}

/// Partition `positions` and observe every occupied bin.
///
/// # Errors
/// - Errors of [`partition_by_bins`] and
///   [`StateRecord::from_positions`].
pub fn build_state_records(
    positions: ArrayView1<f64>, nbins: usize, observables: &ObservableSet,
) -> EstimatorResult<Vec<StateRecord>> {
    partition_by_bins(positions, nbins)?
        .into_iter()
        .map(|part| {
            let frames = positions.select(ndarray::Axis(0), &part.frames);
            StateRecord::from_positions(part.index, frames.view(), observables)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Equal-width binning puts the maximum in the last bin and skips empty
    // bins.
    //
    // Given
    // -----
    // - Positions (0, 0.1, 0.9, 1.0, 0.95) in 4 bins over [0, 1].
    //
    // Expect
    // ------
    // - Two states: bin 0 with frames {0, 1}; bin 3 with frames {2, 3, 4}.
    fn partition_skips_empty_bins() {
        // Act
        let parts = partition_by_bins(array![0.0, 0.1, 0.9, 1.0, 0.95].view(), 4)
            .expect("partition should succeed");

        // Assert
        assert_eq!(
            parts,
            vec![
                StatePartition { index: 0, frames: vec![0, 1] },
                StatePartition { index: 3, frames: vec![2, 3, 4] },
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // Degenerate inputs are handled or rejected explicitly.
    //
    // Given
    // -----
    // - A constant trajectory, zero bins, an empty trajectory and a NaN.
    //
    // Expect
    // ------
    // - One state holding every frame; then `InvalidBinCount`,
    //   `EmptyTrajectory` and `NonFiniteFrame`.
    fn partition_degenerate_inputs() {
        let constant = partition_by_bins(array![2.0, 2.0, 2.0].view(), 5).expect("partition");
        assert_eq!(constant, vec![StatePartition { index: 0, frames: vec![0, 1, 2] }]);

        assert_eq!(
            partition_by_bins(array![1.0].view(), 0),
            Err(EstimatorError::InvalidBinCount { nbins: 0 })
        );
        assert_eq!(
            partition_by_bins(ndarray::Array1::<f64>::zeros(0).view(), 3),
            Err(EstimatorError::EmptyTrajectory)
        );
        assert!(matches!(
            partition_by_bins(array![1.0, f64::NAN].view(), 3),
            Err(EstimatorError::NonFiniteFrame { index: 1, .. })
        ));
    }
}
