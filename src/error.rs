use thiserror::Error;

// Unified error type for precision-cg

#[derive(Error, Debug)]
pub enum KError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("matrix market format error at line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("index out of bounds: row={row}, col={col} for matrix {nrows}x{ncols}")]
    IndexOutOfBounds { row: usize, col: usize, nrows: usize, ncols: usize },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("export error: {0}")]
    Export(String),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown precision kind: {0}")]
    UnknownPrecision(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
