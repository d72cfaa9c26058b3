//! odem — max-likelihood fitting of coarse-grained model parameters to
//! experimental distributions.
//!
//! Purpose
//! -------
//! Serve as the crate root. Frames simulated at reference parameters are
//! grouped into equilibrium states, reweighted to candidate parameters
//! ("epsilons"), and scored against experimental histograms with a Q or
//! log-Q likelihood. The epsilons maximizing that score are returned.
//!
//! Key behaviors
//! -------------
//! - [`io`]: plain-text tables for reference data, edges, trajectories and
//!   fitted parameters.
//! - [`observables`]: reference histograms, frame binning and the Q / log-Q
//!   scores with their derivatives.
//! - [`models`]: potential models exposing energies linear in the epsilons
//!   (1-D Langevin, protein contacts).
//! - [`estimators`]: state partitioning, reweighting and
//!   [`max_likelihood_estimate`](estimators::max_likelihood_estimate).
//! - [`optimization`]: the argmin-backed solver layer (Nelder–Mead,
//!   simulated annealing, nonlinear CG, L-BFGS) shared by the estimators.
//!
//! Invariants & assumptions
//! ------------------------
//! - Library code does not panic on bad inputs; every fallible operation
//!   returns a module-level `Result` alias.
//! - Models and observables are read-only during estimation; independent
//!   estimations may run on separate threads.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use odem::{
//!     estimators::{build_state_records, max_likelihood_estimate, EstimatorOptions},
//!     io::{load_vector, write_params},
//!     models::{LangevinModel, PotentialTerm},
//!     observables::ObservableSet,
//! };
//! use ndarray::array;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut obs = ObservableSet::new();
//! obs.add_histogram("exp_data.dat", load_vector("edges.dat")?, "gaussian", 10.0)?;
//!
//! let model = LangevinModel::new(
//!     vec![
//!         PotentialTerm::GaussianWell { center: -1.0, width: 0.3 },
//!         PotentialTerm::GaussianWell { center: 1.0, width: 0.3 },
//!     ],
//!     array![1.0, 1.0],
//!     &[true, true],
//!     1.0,
//! )?;
//! let positions = load_vector("position.dat")?;
//! let states = build_state_records(positions.view(), 200, &obs)?;
//!
//! let fit = max_likelihood_estimate(&states, &obs, &model, &EstimatorOptions::default())?;
//! write_params("params", &fit.new_epsilons)?;
//! # Ok(())
//! # }
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code in every module; `tests/` holds the
//!   end-to-end estimation suite.

pub mod estimators;
pub mod io;
pub mod models;
pub mod observables;
pub mod optimization;

pub mod prelude {
    pub use crate::estimators::prelude::*;
    pub use crate::models::{LangevinModel, PotentialModel, PotentialTerm};
    pub use crate::observables::ObservableSet;
    pub use crate::optimization::prelude::*;
}
