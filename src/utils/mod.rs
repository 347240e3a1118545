//! Convergence bookkeeping shared by solvers, exporter and reporter.

pub mod convergence;
