//! Convergence tracking & tolerance checks for the CG solver.

use serde::Serialize;

/// Stopping criteria.
#[derive(Clone, Copy, Debug)]
pub struct Convergence {
    /// Absolute bound on the narrowed residual 2-norm; the test is strict.
    pub tol: f64,
    pub max_iters: usize,
}

impl Convergence {
    /// True when `res_norm` (already narrowed) is strictly below the tolerance.
    pub fn check(&self, res_norm: f64) -> bool {
        res_norm < self.tol
    }
}

/// Everything one solve records: outcome, timing and per-iteration histories.
///
/// All histories share the same length, `iterations + 1`; entry 0 describes the
/// initial guess. Values are narrowed to `f64` at the moment they are recorded.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConvergenceResult {
    pub iterations: usize,
    pub converged: bool,
    /// Wall-clock seconds spent in the iteration loop.
    pub elapsed: f64,
    /// ‖r_k‖₂ / ‖b‖₂ from the recurrence residual.
    pub relres_2: Vec<f64>,
    /// ‖x_k − x_true‖₂ / ‖x_true‖₂.
    pub relerr_2: Vec<f64>,
    /// ‖A(x_k − x_true)‖₂ / ‖x_true‖₂.
    pub relerr_a: Vec<f64>,
    /// ‖A x − b‖₂ / ‖b‖₂ recomputed from the final iterate.
    pub true_relres_2: f64,
}

impl ConvergenceResult {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            relres_2: Vec::with_capacity(n),
            relerr_2: Vec::with_capacity(n),
            relerr_a: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, relres: f64, relerr: f64, relerr_a: f64) {
        self.relres_2.push(relres);
        self.relerr_2.push(relerr);
        self.relerr_a.push(relerr_a);
    }

    /// Number of recorded history entries.
    pub fn history_len(&self) -> usize {
        self.relres_2.len()
    }

    pub fn final_relres_2(&self) -> f64 {
        self.relres_2.last().copied().unwrap_or(f64::NAN)
    }

    pub fn final_relerr_2(&self) -> f64 {
        self.relerr_2.last().copied().unwrap_or(f64::NAN)
    }

    pub fn final_relerr_a(&self) -> f64 {
        self.relerr_a.last().copied().unwrap_or(f64::NAN)
    }

    /// True when every recorded metric is finite.
    pub fn all_finite(&self) -> bool {
        self.true_relres_2.is_finite()
            && self
                .relres_2
                .iter()
                .chain(&self.relerr_2)
                .chain(&self.relerr_a)
                .all(|v| v.is_finite())
    }
}
