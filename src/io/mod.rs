//! io — numeric text tables in and out.
//!
//! Purpose
//! -------
//! Load reference histograms, bin edges and trajectories stored as plain
//! columns of floats, and write fitted parameters in the one-value-per-line
//! layout simulation packages read back.
//!
//! Conventions
//! -----------
//! - Readers never guess shapes: a table is rectangular or it is an error.
//! - Paths are reported verbatim in [`IoError`] messages.

pub mod errors;
pub mod table;

pub use self::errors::{IoError, IoResult};
pub use self::table::{load_table, load_vector, write_params};
