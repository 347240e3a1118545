//! Command-line or API options for CG runs.
//!
//! This module provides the `SolverOptions` struct, holding the stopping criteria
//! of a single solve, and `RunOptions`, which describes a whole experiment: which
//! matrix to load, which precisions to run, and where to export the histories.
//! `RunOptions::from_args` parses the driver's command line.

use std::path::PathBuf;

use crate::error::KError;
use crate::scalar::PrecisionKind;

/// Stopping criteria for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Iteration cap
    pub max_iter: usize,

    /// Absolute bound on the narrowed residual 2-norm (strict)
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { max_iter: 1000, tolerance: 1e-15 }
    }
}

/// Options for a full experiment run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// Matrix Market file to load
    pub matrix: PathBuf,

    /// Precisions to run, in order
    pub precisions: Vec<PrecisionKind>,

    pub solver: SolverOptions,

    /// Directory for JSON exports; no export when `None`
    pub export_dir: Option<PathBuf>,

    /// Problem label; defaults to the matrix file name
    pub name: String,
}

pub const USAGE: &str = "usage: precision-cg <matrix.mtx> [--precision double|dd|dq|qx|all] \
[--max-iter N] [--tol T] [--export DIR] [--name LABEL]";

impl RunOptions {
    /// Parse options from an argument list that excludes the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, KError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matrix: Option<PathBuf> = None;
        let mut precisions = PrecisionKind::ALL.to_vec();
        let mut solver = SolverOptions::default();
        let mut export_dir = None;
        let mut name = None;

        let mut args = args.into_iter().map(|s| -> String { s.into() });
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next().ok_or_else(|| KError::InvalidOption(format!("{flag} expects a value")))
            };
            match arg.as_str() {
                "--precision" | "-p" => {
                    let v = value("--precision")?;
                    precisions = if v == "all" {
                        PrecisionKind::ALL.to_vec()
                    } else {
                        v.split(',').map(str::parse).collect::<Result<Vec<PrecisionKind>, KError>>()?
                    };
                }
                "--max-iter" => {
                    let v = value("--max-iter")?;
                    solver.max_iter = v
                        .parse()
                        .map_err(|_| KError::InvalidOption(format!("--max-iter: not a count: {v}")))?;
                }
                "--tol" => {
                    let v = value("--tol")?;
                    solver.tolerance = v
                        .parse()
                        .map_err(|_| KError::InvalidOption(format!("--tol: not a number: {v}")))?;
                }
                "--export" => export_dir = Some(PathBuf::from(value("--export")?)),
                "--name" => name = Some(value("--name")?),
                flag if flag.starts_with("--") => {
                    return Err(KError::InvalidOption(format!("unknown flag {flag}")));
                }
                path => {
                    if matrix.replace(PathBuf::from(path)).is_some() {
                        return Err(KError::InvalidOption("more than one matrix path given".to_string()));
                    }
                }
            }
        }

        let matrix = matrix.ok_or_else(|| KError::InvalidOption(USAGE.to_string()))?;
        let name = name.unwrap_or_else(|| {
            matrix
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "problem".to_string())
        });
        Ok(Self { matrix, precisions, solver, export_dir, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_experiments() {
        let opts = RunOptions::from_args(["nos7.mtx"]).unwrap();
        assert_eq!(opts.solver, SolverOptions { max_iter: 1000, tolerance: 1e-15 });
        assert_eq!(opts.precisions, PrecisionKind::ALL.to_vec());
        assert_eq!(opts.name, "nos7");
        assert!(opts.export_dir.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let opts = RunOptions::from_args([
            "--precision", "dd,qx", "--max-iter", "50", "--tol", "1e-20", "a.mtx", "--export", "out", "--name", "lap",
        ])
        .unwrap();
        assert_eq!(opts.precisions, vec![PrecisionKind::Dd, PrecisionKind::Qx]);
        assert_eq!(opts.solver.max_iter, 50);
        assert_eq!(opts.solver.tolerance, 1e-20);
        assert_eq!(opts.export_dir, Some(PathBuf::from("out")));
        assert_eq!(opts.name, "lap");
    }

    #[test]
    fn bad_input_is_an_invalid_option() {
        assert!(matches!(RunOptions::from_args(Vec::<String>::new()), Err(KError::InvalidOption(_))));
        assert!(matches!(RunOptions::from_args(["a.mtx", "--tol"]), Err(KError::InvalidOption(_))));
        assert!(matches!(RunOptions::from_args(["a.mtx", "--max-iter", "x"]), Err(KError::InvalidOption(_))));
        assert!(matches!(RunOptions::from_args(["a.mtx", "-p", "hex"]), Err(KError::UnknownPrecision(_))));
    }
}
