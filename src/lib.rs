//! precision-cg: Conjugate Gradient at selectable floating-point precision.
//!
//! This crate runs the same CG iteration over native `f64`, double-double,
//! double-quad and 113-bit quad scalars, recording per-iteration residual and
//! error histories so the effect of working precision on convergence can be
//! compared. Problems are read from Matrix Market files; histories can be
//! exported as JSON.

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod io;
pub mod matrix;
pub mod scalar;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::{PrecisionRun, Problem};
pub use crate::core::traits::{Indexing, InnerProduct, MatVec};
pub use error::*;
pub use matrix::*;
pub use scalar::{Dd, Double, Dq, PrecisionKind, Qx, Real, Scalar};
pub use solver::*;

// Re-export ConvergenceResult at the crate root for convenience
pub use utils::convergence::ConvergenceResult;
