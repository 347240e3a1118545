//! Solver interfaces.

use crate::utils::convergence::ConvergenceResult;

/// Common interface for solvers that are checked against a known solution.
pub trait LinearSolver<M, V> {
    type Error;
    /// Solve A·x = b, writing the final iterate into `x`.
    /// `x_true` is only used to measure the forward error at every iteration.
    fn solve(
        &mut self,
        a: &M,
        b: &V,
        x: &mut V,
        x_true: &V,
    ) -> Result<ConvergenceResult, Self::Error>;
}

pub mod cg;
pub use cg::CgSolver;
