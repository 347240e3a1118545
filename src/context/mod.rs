//! Problem context: owns the system and picks the precision at runtime.
//!
//! The solver and the scalar types are fully generic; this module is the one
//! place where a [`PrecisionKind`] chosen on the command line turns into a
//! concrete `Scalar<B>` instantiation.
//!
//! # Example
//! ```rust,ignore
//! use precision_cg::context::Problem;
//! let problem = Problem::load("bcsstk01.mtx", "bcsstk01")?;
//! let run = problem.run(PrecisionKind::Dd, &SolverOptions::default())?;
//! ```

pub mod problem;

pub use crate::scalar::PrecisionKind;
pub use problem::{PrecisionRun, Problem};
