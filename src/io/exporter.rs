//! JSON export of convergence histories.
//!
//! The artifact has two sections: `metadata` (problem, precision and final
//! metrics) and `convergence` (the full per-iteration histories). Non-finite
//! metrics are written as `null`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{error, info};
use serde::Serialize;

use crate::error::KError;
use crate::scalar::PrecisionKind;
use crate::utils::convergence::ConvergenceResult;

#[derive(Debug, Serialize)]
pub struct ExportMetadata<'a> {
    pub matrix_name: &'a str,
    pub precision_name: &'a str,
    pub precision_digits: u32,
    pub converged: bool,
    pub iterations_performed: usize,
    pub computation_time: f64,
    pub final_relres_2norm: f64,
    pub final_true_relres_2norm: f64,
    pub final_relerr_2norm: f64,
    #[serde(rename = "final_relerr_Anorm")]
    pub final_relerr_a_norm: f64,
}

#[derive(Debug, Serialize)]
pub struct ExportHistory<'a> {
    pub hist_iterations: Vec<usize>,
    pub hist_relres_2: &'a [f64],
    pub hist_relerr_2: &'a [f64],
    #[serde(rename = "hist_relerr_A")]
    pub hist_relerr_a: &'a [f64],
    pub iter_final: usize,
}

#[derive(Debug, Serialize)]
pub struct ConvergenceExport<'a> {
    pub metadata: ExportMetadata<'a>,
    pub convergence: ExportHistory<'a>,
}

impl<'a> ConvergenceExport<'a> {
    pub fn new(
        result: &'a ConvergenceResult,
        matrix_name: &'a str,
        precision: PrecisionKind,
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                matrix_name,
                precision_name: precision.label(),
                precision_digits: precision.export_digits(),
                converged: result.converged,
                iterations_performed: result.iterations,
                computation_time: result.elapsed,
                final_relres_2norm: result.final_relres_2(),
                final_true_relres_2norm: result.true_relres_2,
                final_relerr_2norm: result.final_relerr_2(),
                final_relerr_a_norm: result.final_relerr_a(),
            },
            convergence: ExportHistory {
                hist_iterations: (0..result.history_len()).collect(),
                hist_relres_2: &result.relres_2,
                hist_relerr_2: &result.relerr_2,
                hist_relerr_a: &result.relerr_a,
                iter_final: result.iterations,
            },
        }
    }
}

/// Serialize `result` to `writer` as pretty-printed JSON.
pub fn write_convergence<W: Write>(
    writer: W,
    result: &ConvergenceResult,
    matrix_name: &str,
    precision: PrecisionKind,
) -> Result<(), KError> {
    serde_json::to_writer_pretty(writer, &ConvergenceExport::new(result, matrix_name, precision))?;
    Ok(())
}

/// Write `result` to `path`, creating parent directories as needed.
///
/// Failures are logged and returned; they never touch the solve that produced
/// the result.
pub fn export_convergence(
    result: &ConvergenceResult,
    path: impl AsRef<Path>,
    matrix_name: &str,
    precision: PrecisionKind,
) -> Result<(), KError> {
    let path = path.as_ref();
    let status = (|| -> Result<(), KError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        write_convergence(&mut writer, result, matrix_name, precision)?;
        writer.flush().map_err(|e| KError::Export(format!("{}: {e}", path.display())))
    })();
    match &status {
        Ok(()) => info!("exported {} [{}] to {}", matrix_name, precision, path.display()),
        Err(e) => error!("could not export to {}: {e}", path.display()),
    }
    status
}
