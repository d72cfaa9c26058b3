//! observables — experimental reference distributions and their scores.
//!
//! Purpose
//! -------
//! Hold the experimental histograms a model is fitted against, turn
//! simulated frames into comparable densities, and score a candidate
//! stacked observation vector with Q or log-Q.
//!
//! Key behaviors
//! -------------
//! - [`HistogramObservable`] validates and normalizes one reference table.
//! - [`ObservableSet`] stacks several histograms, bins trajectory frames
//!   numpy-style and evaluates `Q`, `log Q` and their derivatives.
//! - [`QFunction`] is the score/derivative pair handed to estimators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Reference and simulated densities share one normalization
//!   (`Σ density·width = 1` over the edges) when every frame falls inside
//!   the edges; frames outside them lower the simulated mass.
//! - Histograms are immutable once built; scoring never mutates the set.
//!
//! Testing notes
//! -------------
//! - Derivatives are cross-checked against `finitediff` central
//!   differences; log Q keeps its gradient on a bin whose Q underflows.

pub mod errors;
pub mod histogram;
pub mod set;

pub use self::errors::{ObsResult, ObservableError};
pub use self::histogram::{ErrorModel, HistogramObservable};
pub use self::set::{ObservableSet, QFunction, Score};
