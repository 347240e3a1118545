//! Run configuration: solver stopping criteria and experiment options.

pub mod options;
pub use options::{RunOptions, SolverOptions, USAGE};
