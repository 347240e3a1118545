//! Matrix Market coordinate reader.
//!
//! Supports `matrix coordinate` files with `real`, `integer` or `pattern` fields
//! and `general` or `symmetric` storage. Symmetric files store one triangle; the
//! mirrored entries are added here so the returned matrix is fully stored.
//! Values are read as `f64` and then lifted into the requested precision.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::error::KError;
use crate::matrix::CsrMatrix;
use crate::scalar::Real;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    General,
    Symmetric,
}

/// Parsed file contents: the header plus 0-based, fully stored triplets.
#[derive(Debug, Clone)]
pub struct MatrixMarket {
    pub nrows: usize,
    pub ncols: usize,
    pub symmetry: Symmetry,
    /// Entry count declared in the size line (one triangle for symmetric files).
    pub declared_nnz: usize,
    pub triplets: Vec<(usize, usize, f64)>,
}

impl MatrixMarket {
    /// Build a CSR matrix in precision `T`.
    pub fn to_csr<T: Real>(&self) -> Result<CsrMatrix<T>, KError> {
        let triplets = self.triplets.iter().map(|&(i, j, v)| (i, j, T::from_f64(v))).collect();
        CsrMatrix::from_triplets(self.nrows, self.ncols, triplets)
    }
}

fn format_err(line: usize, msg: impl Into<String>) -> KError {
    KError::Format { line, msg: msg.into() }
}

fn parse_header(line: &str) -> Result<(Field, Symmetry), KError> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_ascii_lowercase).collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" {
        return Err(format_err(1, "expected '%%MatrixMarket matrix coordinate <field> <symmetry>'"));
    }
    if tokens[1] != "matrix" || tokens[2] != "coordinate" {
        return Err(format_err(1, format!("unsupported object/format '{} {}'", tokens[1], tokens[2])));
    }
    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" => Field::Pattern,
        other => return Err(format_err(1, format!("unsupported field '{other}'"))),
    };
    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        other => return Err(format_err(1, format!("unsupported symmetry '{other}'"))),
    };
    Ok((field, symmetry))
}

fn parse_usize(tok: Option<&str>, line: usize, what: &str) -> Result<usize, KError> {
    let tok = tok.ok_or_else(|| format_err(line, format!("missing {what}")))?;
    tok.parse().map_err(|_| format_err(line, format!("invalid {what} '{tok}'")))
}

fn parse_value(tok: Option<&str>, line: usize) -> Result<f64, KError> {
    let tok = tok.ok_or_else(|| format_err(line, "missing value"))?;
    // Fortran writers sometimes emit 1.0D+00
    let normalized = tok.replace(['D', 'd'], "e");
    normalized.parse().map_err(|_| format_err(line, format!("invalid value '{tok}'")))
}

/// Parse a Matrix Market stream.
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<MatrixMarket, KError> {
    let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (_, header) = lines.next().ok_or_else(|| format_err(1, "empty input"))?;
    let (field, symmetry) = parse_header(&header?)?;

    let mut size: Option<(usize, usize, usize)> = None;
    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
    let mut seen = 0usize;
    let mut last_line = 1usize;

    for (lineno, line) in lines {
        last_line = lineno;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let mut toks = trimmed.split_whitespace();
        let Some((nrows, ncols, nnz)) = size else {
            let nrows = parse_usize(toks.next(), lineno, "row count")?;
            let ncols = parse_usize(toks.next(), lineno, "column count")?;
            let nnz = parse_usize(toks.next(), lineno, "entry count")?;
            if symmetry == Symmetry::Symmetric && nrows != ncols {
                return Err(format_err(lineno, "symmetric matrix must be square"));
            }
            size = Some((nrows, ncols, nnz));
            triplets.reserve(if symmetry == Symmetry::Symmetric { 2 * nnz } else { nnz });
            continue;
        };

        if seen == nnz {
            return Err(format_err(lineno, format!("more than the declared {nnz} entries")));
        }
        let row = parse_usize(toks.next(), lineno, "row index")?;
        let col = parse_usize(toks.next(), lineno, "column index")?;
        let value = match field {
            Field::Pattern => 1.0,
            Field::Real | Field::Integer => parse_value(toks.next(), lineno)?,
        };
        if row == 0 || col == 0 || row > nrows || col > ncols {
            return Err(KError::IndexOutOfBounds {
                row: row.wrapping_sub(1),
                col: col.wrapping_sub(1),
                nrows,
                ncols,
            });
        }
        let (i, j) = (row - 1, col - 1);
        triplets.push((i, j, value));
        if symmetry == Symmetry::Symmetric && i != j {
            triplets.push((j, i, value));
        }
        seen += 1;
    }

    let (nrows, ncols, declared_nnz) =
        size.ok_or_else(|| format_err(last_line, "missing size line"))?;
    if seen != declared_nnz {
        return Err(format_err(last_line, format!("expected {declared_nnz} entries, found {seen}")));
    }
    debug!("matrix market: {nrows}x{ncols}, {declared_nnz} declared entries, {:?}", symmetry);
    Ok(MatrixMarket { nrows, ncols, symmetry, declared_nnz, triplets })
}

/// Open and parse a Matrix Market file.
pub fn open_matrix_market(path: impl AsRef<Path>) -> Result<MatrixMarket, KError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_matrix_market(BufReader::new(file))
}

/// Load a Matrix Market file into a CSR matrix of precision `T`.
pub fn load_matrix_market<T: Real>(path: impl AsRef<Path>) -> Result<CsrMatrix<T>, KError> {
    let path = path.as_ref();
    let a = open_matrix_market(path)?.to_csr::<T>()?;
    info!(
        "loaded {} as {}: {}x{}, {} stored entries",
        path.display(),
        T::KIND,
        a.nrows(),
        a.ncols(),
        a.nnz()
    );
    Ok(a)
}
