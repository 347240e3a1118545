//! Input and output around the solver: Matrix Market loading, JSON export and
//! the text report.

pub mod exporter;
pub mod matrix_market;
pub mod report;

pub use exporter::{export_convergence, write_convergence};
pub use matrix_market::{load_matrix_market, open_matrix_market, read_matrix_market, MatrixMarket};
pub use report::write_report;
