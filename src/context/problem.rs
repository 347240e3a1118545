//! Runtime selection of the precision a problem is solved in.
//!
//! A [`Problem`] keeps the matrix as `f64` triplets, exactly as read from disk,
//! and lifts it into the requested precision for every run. The reference setup
//! matches the experiments this crate was built for: `x_true` is the all-ones
//! vector, `b = A x_true` is formed in the working precision, and the initial
//! guess is zero.

use std::path::Path;

use log::info;

use crate::config::SolverOptions;
use crate::core::wrappers::to_f64_vec;
use crate::error::KError;
use crate::io::matrix_market::{open_matrix_market, MatrixMarket, Symmetry};
use crate::matrix::CsrMatrix;
use crate::scalar::{Dd, Double, Dq, PrecisionKind, Qx, Real};
use crate::solver::{CgSolver, LinearSolver};
use crate::utils::convergence::ConvergenceResult;

/// Outcome of solving a problem in one precision.
#[derive(Debug, Clone)]
pub struct PrecisionRun {
    pub kind: PrecisionKind,
    pub result: ConvergenceResult,
    /// Final iterate, narrowed to `f64`.
    pub solution: Vec<f64>,
}

/// A square test problem that can be solved in any precision kind.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    source: MatrixMarket,
}

impl Problem {
    /// Wrap a parsed Matrix Market file. The matrix must be square.
    pub fn new(name: impl Into<String>, source: MatrixMarket) -> Result<Self, KError> {
        if source.nrows != source.ncols {
            return Err(KError::DimensionMismatch(format!(
                "CG needs a square matrix, got {}x{}",
                source.nrows, source.ncols
            )));
        }
        Ok(Self { name: name.into(), source })
    }

    /// Build a problem from 0-based, fully stored `f64` triplets.
    pub fn from_triplets(
        name: impl Into<String>,
        n: usize,
        triplets: Vec<(usize, usize, f64)>,
    ) -> Result<Self, KError> {
        let source = MatrixMarket {
            nrows: n,
            ncols: n,
            symmetry: Symmetry::General,
            declared_nnz: triplets.len(),
            triplets,
        };
        Self::new(name, source)
    }

    pub fn load(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, KError> {
        let path = path.as_ref();
        let problem = Self::new(name, open_matrix_market(path)?)?;
        info!("problem '{}' from {}: n={}", problem.name, path.display(), problem.dim());
        Ok(problem)
    }

    pub fn dim(&self) -> usize {
        self.source.nrows
    }

    /// The system matrix in precision `T`.
    pub fn matrix<T: Real>(&self) -> Result<CsrMatrix<T>, KError> {
        self.source.to_csr::<T>()
    }

    /// Solve in precision `T` with the reference setup.
    pub fn solve_as<T: Real>(&self, opts: &SolverOptions) -> Result<PrecisionRun, KError> {
        let a = self.matrix::<T>()?;
        let n = self.dim();
        let x_true = vec![T::one(); n];
        let b = a.mul_vec(&x_true);
        let mut x = vec![T::zero(); n];
        let result = CgSolver::from_options(opts).solve(&a, &b, &mut x, &x_true)?;
        Ok(PrecisionRun { kind: T::KIND, result, solution: to_f64_vec(&x) })
    }

    /// Solve in a precision chosen at runtime.
    pub fn run(&self, kind: PrecisionKind, opts: &SolverOptions) -> Result<PrecisionRun, KError> {
        match kind {
            PrecisionKind::Double => self.solve_as::<Double>(opts),
            PrecisionKind::Dd => self.solve_as::<Dd>(opts),
            PrecisionKind::Dq => self.solve_as::<Dq>(opts),
            PrecisionKind::Qx => self.solve_as::<Qx>(opts),
        }
    }

    /// Solve once per requested precision, in order.
    pub fn run_all(
        &self,
        kinds: &[PrecisionKind],
        opts: &SolverOptions,
    ) -> Result<Vec<PrecisionRun>, KError> {
        kinds.iter().map(|&kind| self.run(kind, opts)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::matrix_market::read_matrix_market;

    fn tridiagonal(n: usize) -> Problem {
        let mut t = Vec::new();
        for i in 0..n {
            t.push((i, i, 4.0));
            if i + 1 < n {
                t.push((i, i + 1, -1.0));
                t.push((i + 1, i, -1.0));
            }
        }
        Problem::from_triplets("tridiag", n, t).unwrap()
    }

    #[test]
    fn runtime_dispatch_reports_the_requested_kind() {
        let p = tridiagonal(5);
        let opts = SolverOptions { max_iter: 50, tolerance: 1e-12 };
        let runs = p.run_all(&PrecisionKind::ALL, &opts).unwrap();
        assert_eq!(runs.len(), 4);
        for (run, kind) in runs.iter().zip(PrecisionKind::ALL) {
            assert_eq!(run.kind, kind);
            assert!(run.result.converged, "{kind} did not converge");
            for xi in &run.solution {
                assert!((xi - 1.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn non_square_matrices_are_rejected() {
        let mm = read_matrix_market("%%MatrixMarket matrix coordinate real general\n2 3 1\n1 1 1.0\n".as_bytes()).unwrap();
        assert!(matches!(Problem::new("rect", mm), Err(KError::DimensionMismatch(_))));
    }
}
