//! Matrix module: the sparse CSR container shared by every precision kind.

pub mod sparse;
pub use sparse::{CsrMatrix, SparseMatrix};
