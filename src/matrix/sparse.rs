// SparseMatrix trait and the CSR implementation

use crate::core::traits::{Indexing, MatVec};
use crate::error::KError;
use crate::scalar::Real;

/// A read‐only sparse matrix supporting y = A * x.
pub trait SparseMatrix<T> {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Number of stored entries.
    fn nnz(&self) -> usize;
    /// Compute y = A * x.  `x.len() == ncols()`, `y.len() == nrows()`.
    fn spmv(&self, x: &[T], y: &mut [T]);
}

/// Compressed sparse row matrix over any precision kind.
///
/// The structure is fixed at construction; there is no way to insert or remove
/// entries afterwards.
#[derive(Clone, Debug)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T: Real> CsrMatrix<T> {
    /// Build a CSR matrix from `(row, col, value)` triplets, 0-based.
    ///
    /// Entries sharing a position are summed. Any index outside `nrows × ncols`
    /// is rejected.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self, KError> {
        let mut coords = triplets;
        for (row, col, _) in &coords {
            if *row >= nrows || *col >= ncols {
                return Err(KError::IndexOutOfBounds { row: *row, col: *col, nrows, ncols });
            }
        }
        coords.sort_by_key(|(row, col, _)| (*row, *col));

        let mut row_ptr = vec![0usize; nrows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(coords.len());
        let mut values: Vec<T> = Vec::with_capacity(coords.len());
        let mut last: Option<(usize, usize)> = None;
        for (row, col, value) in coords {
            if last == Some((row, col)) {
                if let Some(v) = values.last_mut() {
                    *v += value;
                }
                continue;
            }
            col_idx.push(col);
            values.push(value);
            row_ptr[row + 1] += 1;
            last = Some((row, col));
        }
        for i in 1..=nrows {
            row_ptr[i] += row_ptr[i - 1];
        }
        Ok(Self { nrows, ncols, row_ptr, col_idx, values })
    }

    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, KError> {
        if row_ptr.first() != Some(&0) {
            return Err(KError::DimensionMismatch("row_ptr must start at 0".to_string()));
        }
        if row_ptr.len() != nrows + 1 {
            return Err(KError::DimensionMismatch(format!(
                "row_ptr has length {}, expected {}",
                row_ptr.len(),
                nrows + 1
            )));
        }
        if col_idx.len() != values.len() || row_ptr[nrows] != values.len() {
            return Err(KError::DimensionMismatch(
                "col_idx, values and row_ptr disagree on nnz".to_string(),
            ));
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(KError::DimensionMismatch("row_ptr is not non-decreasing".to_string()));
        }
        if let Some(k) = col_idx.iter().position(|&c| c >= ncols) {
            let row = row_ptr.partition_point(|&p| p <= k) - 1;
            return Err(KError::IndexOutOfBounds { row, col: col_idx[k], nrows, ncols });
        }
        Ok(Self { nrows, ncols, row_ptr, col_idx, values })
    }

    /// Apply `f` to every stored value, keeping the sparsity structure.
    pub fn map<U: Real>(&self, f: impl Fn(&T) -> U) -> CsrMatrix<U> {
        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr: self.row_ptr.clone(),
            col_idx: self.col_idx.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the stored entry at `(i, j)` or zero.
    pub fn get(&self, i: usize, j: usize) -> T {
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
        match self.col_idx[start..end].binary_search(&j) {
            Ok(k) => self.values[start + k].clone(),
            Err(_) => T::zero(),
        }
    }

    /// Iterate over `(row, col, value)` of the stored entries in row order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.nrows).flat_map(move |i| {
            (self.row_ptr[i]..self.row_ptr[i + 1])
                .map(move |k| (i, self.col_idx[k], &self.values[k]))
        })
    }

    /// Checks structural and numerical symmetry under the scalar's equality.
    pub fn is_symmetric(&self) -> bool {
        self.nrows == self.ncols && self.triplets().all(|(i, j, v)| self.get(j, i) == *v)
    }

    /// Returns `A x` as a new vector.
    pub fn mul_vec(&self, x: &[T]) -> Vec<T> {
        let mut y = vec![T::zero(); self.nrows];
        self.spmv(x, &mut y);
        y
    }
}

impl<T: Real> SparseMatrix<T> for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
    fn nnz(&self) -> usize {
        self.values.len()
    }
    fn spmv(&self, x: &[T], y: &mut [T]) {
        assert_eq!(x.len(), self.ncols);
        assert_eq!(y.len(), self.nrows);
        for (i, yi) in y.iter_mut().enumerate() {
            let mut sum = T::zero();
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                sum += self.values[k].clone() * &x[self.col_idx[k]];
            }
            *yi = sum;
        }
    }
}

impl<T: Real> MatVec<Vec<T>> for CsrMatrix<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        self.spmv(x, y);
    }
}

impl<T> Indexing for CsrMatrix<T> {
    fn nrows(&self) -> usize {
        self.nrows
    }
}
