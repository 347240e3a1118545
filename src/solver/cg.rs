//! Conjugate Gradient (unpreconditioned) per Saad §6.1, generic over precision.
//!
//! The iteration runs entirely in the scalar type `T`; only the recorded metrics
//! are narrowed to `f64`. Next to the recurrence residual the solver tracks the
//! forward error against a known solution, both in the 2-norm and in the norm
//! induced by `A`, and recomputes the true residual once the loop is done so that
//! drift between `r_k` and `b − A x_k` shows up in the result.
//!
//! There is no breakdown handling: if `pᵀAp` underflows, α becomes whatever the
//! backend produces and the loop carries on.

use std::time::Instant;

use log::{debug, info, trace, warn};

use crate::config::SolverOptions;
use crate::core::traits::{Indexing, InnerProduct, MatVec};
use crate::core::wrappers::{axmy, axpy, sub, xpby};
use crate::error::KError;
use crate::scalar::Real;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, ConvergenceResult};

pub struct CgSolver {
    pub conv: Convergence,
}

impl CgSolver {
    pub fn new(tol: f64, max_iters: usize) -> Self {
        Self { conv: Convergence { tol, max_iters } }
    }

    pub fn from_options(opts: &SolverOptions) -> Self {
        Self::new(opts.tolerance, opts.max_iter)
    }
}

/// The three per-iteration metrics, narrowed at the moment of recording.
fn metrics<M, T>(
    a: &M,
    rs: &T,
    x: &[T],
    x_true: &[T],
    b_norm: &T,
    x_true_norm: &T,
) -> (f64, f64, f64)
where
    M: MatVec<Vec<T>>,
    T: Real,
{
    let ip = ();
    let relres = (rs.sqrt() / b_norm).to_f64();
    let err = sub(x, x_true);
    let relerr = (ip.norm(&err) / x_true_norm).to_f64();
    let mut a_err = vec![T::zero(); err.len()];
    a.matvec(&err, &mut a_err);
    let relerr_a = (ip.norm(&a_err) / x_true_norm).to_f64();
    (relres, relerr, relerr_a)
}

impl<M, T> LinearSolver<M, Vec<T>> for CgSolver
where
    M: MatVec<Vec<T>> + Indexing,
    T: Real,
{
    type Error = KError;

    fn solve(
        &mut self,
        a: &M,
        b: &Vec<T>,
        x: &mut Vec<T>,
        x_true: &Vec<T>,
    ) -> Result<ConvergenceResult, KError> {
        let n = b.len();
        if a.nrows() != n || x.len() != n || x_true.len() != n {
            return Err(KError::DimensionMismatch(format!(
                "A has {} rows, b has {}, x has {}, x_true has {}",
                a.nrows(),
                n,
                x.len(),
                x_true.len()
            )));
        }
        let max_iters = self.conv.max_iters;
        let start = Instant::now();
        let ip = ();

        let mut ax = vec![T::zero(); n];
        a.matvec(x, &mut ax);
        let mut r = sub(b, &ax);
        let mut p = r.clone();
        let mut rs_old = ip.dot(&r, &r);

        let b_norm = ip.norm(b);
        let x_true_norm = ip.norm(x_true);
        debug!(
            "CG[{}] n={}, ||b||={:e}, ||x_true||={:e}, tol={:e}, max_iter={}",
            T::KIND,
            n,
            b_norm.to_f64(),
            x_true_norm.to_f64(),
            self.conv.tol,
            max_iters
        );

        let mut result = ConvergenceResult::with_capacity(max_iters + 1);
        let (relres, relerr, relerr_a) = metrics(a, &rs_old, x, x_true, &b_norm, &x_true_norm);
        result.record(relres, relerr, relerr_a);

        let mut ap = vec![T::zero(); n];
        for k in 0..max_iters {
            a.matvec(&p, &mut ap);
            let alpha = rs_old.clone() / ip.dot(&p, &ap);

            axpy(&alpha, &p, x);
            axmy(&alpha, &ap, &mut r);

            let rs_new = ip.dot(&r, &r);
            let (relres, relerr, relerr_a) = metrics(a, &rs_new, x, x_true, &b_norm, &x_true_norm);
            result.record(relres, relerr, relerr_a);
            trace!("CG[{}] iter {}: relres={:e}, relerr={:e}", T::KIND, k + 1, relres, relerr);

            if self.conv.check(rs_new.sqrt().to_f64()) {
                result.converged = true;
                result.iterations = k + 1;
                break;
            }

            let beta = rs_new.clone() / &rs_old;
            xpby(&r, &beta, &mut p);
            rs_old = rs_new;

            if k == max_iters - 1 {
                result.converged = false;
                result.iterations = max_iters;
            }
        }
        result.elapsed = start.elapsed().as_secs_f64();

        a.matvec(x, &mut ax);
        let true_residual = sub(&ax, b);
        result.true_relres_2 = (ip.norm(&true_residual) / &b_norm).to_f64();

        if result.converged {
            info!("CG[{}] converged in {} iterations ({:.3}s)", T::KIND, result.iterations, result.elapsed);
        } else {
            info!("CG[{}] not converged after {} iterations ({:.3}s)", T::KIND, result.iterations, result.elapsed);
        }
        if !result.all_finite() {
            warn!("CG[{}] recorded non-finite metrics", T::KIND);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wrappers::{from_f64_slice, to_f64_vec};
    use crate::scalar::{Dd, Double};

    // Simple dense matrix type for testing
    #[derive(Clone)]
    struct DenseMat<T> {
        data: Vec<Vec<T>>,
    }
    impl<T: Real> DenseMat<T> {
        fn from_rows(rows: &[&[f64]]) -> Self {
            Self { data: rows.iter().map(|r| from_f64_slice(r)).collect() }
        }
    }
    impl<T: Real> MatVec<Vec<T>> for DenseMat<T> {
        fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
            for (i, row) in self.data.iter().enumerate() {
                y[i] = row.iter().zip(x.iter()).map(|(a, b)| a.clone() * b).sum();
            }
        }
    }
    impl<T> Indexing for DenseMat<T> {
        fn nrows(&self) -> usize {
            self.data.len()
        }
    }

    #[test]
    fn cg_solves_simple_spd() {
        // SPD system: [[4,1],[1,3]] x = [1,2]
        let a = DenseMat::<Double>::from_rows(&[&[4.0, 1.0], &[1.0, 3.0]]);
        let b = from_f64_slice(&[1.0, 2.0]);
        let x_true = from_f64_slice(&[1.0 / 11.0, 7.0 / 11.0]);
        let mut x = vec![Double::default(); 2];
        let mut solver = CgSolver::new(1e-10, 20);
        let stats = solver.solve(&a, &b, &mut x, &x_true).unwrap();
        let expected = [0.09090909090909091, 0.6363636363636364];
        for (xi, ei) in to_f64_vec(&x).iter().zip(expected.iter()) {
            assert!((xi - ei).abs() < 1e-8, "xi = {}, expected = {}", xi, ei);
        }
        assert!(stats.converged, "CG did not converge");
        assert_eq!(stats.history_len(), stats.iterations + 1);
    }

    #[test]
    fn cg_solves_spd_in_double_double() {
        // A = [[4,1,0],[1,3,1],[0,1,2]], x_true = [1,2,3], b = A * x_true
        let a = DenseMat::<Dd>::from_rows(&[&[4.0, 1.0, 0.0], &[1.0, 3.0, 1.0], &[0.0, 1.0, 2.0]]);
        let x_true: Vec<Dd> = from_f64_slice(&[1.0, 2.0, 3.0]);
        let mut b = vec![Dd::default(); 3];
        a.matvec(&x_true, &mut b);
        let mut x = vec![Dd::default(); 3];
        let mut solver = CgSolver::new(1e-25, 100);
        let stats = solver.solve(&a, &b, &mut x, &x_true).unwrap();
        assert!(stats.converged, "CG did not converge");
        assert!(stats.iterations <= 3);
        assert!(stats.true_relres_2 < 1e-25, "true relres = {:e}", stats.true_relres_2);
    }

    #[test]
    fn zero_iteration_cap_records_only_initial_state() {
        let a = DenseMat::<Double>::from_rows(&[&[2.0, 0.0], &[0.0, 2.0]]);
        let b = from_f64_slice(&[2.0, 2.0]);
        let x_true = from_f64_slice(&[1.0, 1.0]);
        let mut x = vec![Double::default(); 2];
        let stats = CgSolver::new(1e-12, 0).solve(&a, &b, &mut x, &x_true).unwrap();
        assert!(!stats.converged);
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.history_len(), 1);
        assert_eq!(stats.relres_2[0], 1.0);
        assert_eq!(stats.relerr_2[0], 1.0);
    }

    #[test]
    fn dimension_mismatch_is_rejected_before_iterating() {
        let a = DenseMat::<Double>::from_rows(&[&[2.0, 0.0], &[0.0, 2.0]]);
        let b = from_f64_slice(&[2.0, 2.0, 2.0]);
        let x_true = from_f64_slice(&[1.0, 1.0, 1.0]);
        let mut x = vec![Double::default(); 3];
        let err = CgSolver::new(1e-12, 10).solve(&a, &b, &mut x, &x_true).unwrap_err();
        assert!(matches!(err, KError::DimensionMismatch(_)));
    }

    #[test]
    fn zero_rhs_propagates_non_finite_metrics() {
        let a = DenseMat::<Double>::from_rows(&[&[2.0, 0.0], &[0.0, 2.0]]);
        let b = vec![Double::default(); 2];
        let x_true = vec![Double::default(); 2];
        let mut x = vec![Double::default(); 2];
        let stats = CgSolver::new(1e-12, 5).solve(&a, &b, &mut x, &x_true).unwrap();
        assert!(stats.relres_2[0].is_nan());
        assert!(!stats.all_finite());
    }
}
