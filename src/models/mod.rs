//! models — parameterized potentials whose epsilons are fitted.
//!
//! Purpose
//! -------
//! Turn a block of simulation frames into a reduced energy `u(ε) = βE(ε)`
//! and its derivative with respect to the tunable parameters, through the
//! [`PotentialModel`] / [`EpsilonPotential`] pair the estimator consumes.
//!
//! Key behaviors
//! -------------
//! - [`LangevinModel`]: 1-D potential from [`PotentialTerm`] basis shapes,
//!   evaluated on data column 0.
//! - [`ContactModel`]: Gaussian native contacts, one per data column.
//! - [`LinearPotential`]: shared evaluator for energies linear in ε; the
//!   derivative is a constant basis matrix returned by borrow.
//!
//! Invariants & assumptions
//! ------------------------
//! - Models are immutable; fitted epsilons are returned by the estimator,
//!   never written back.
//! - Frame blocks are validated (non-empty, expected width, finite) when an
//!   [`EpsilonPotential`] is built, not on every evaluation.
//!
//! Testing notes
//! -------------
//! - Energy derivatives are cross-checked against `finitediff`.

pub mod basis;
pub mod contacts;
pub mod errors;
pub mod langevin;
pub mod linear;
pub mod traits;

pub use self::basis::PotentialTerm;
pub use self::contacts::{Contact, ContactModel};
pub use self::errors::{ModelError, ModelResult};
pub use self::langevin::LangevinModel;
pub use self::linear::LinearPotential;
pub use self::traits::{EpsilonPotential, PotentialModel};
