//! Compressed sparse row matrix.
//!
//! Feature matrices produced by the vectorizer are overwhelmingly zero, so
//! only non-zero entries are stored:
//!
//! ```text
//! indptr:  [0, 2, 2, 3]        row i spans indptr[i]..indptr[i + 1]
//! indices: [0, 4, 1]           column of each stored value
//! data:    [0.6, 0.8, 1.0]     the stored values
//! ```
//!
//! Row 1 above is an all-zero row. Column indices are strictly increasing
//! within a row.

use crate::error::{AffrontError, Result};

/// A sparse matrix in compressed sparse row (CSR) layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// A borrowed view of one matrix row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparseRow<'a> {
    indices: &'a [usize],
    data: &'a [f64],
}

impl<'a> SparseRow<'a> {
    /// Column indices of the stored entries, strictly increasing.
    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    /// Values of the stored entries.
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Iterate over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.indices.iter().copied().zip(self.data.iter().copied())
    }

    /// Value at `col`, zero when nothing is stored there.
    pub fn get(&self, col: usize) -> f64 {
        match self.indices.binary_search(&col) {
            Ok(pos) => self.data[pos],
            Err(_) => 0.0,
        }
    }
}

impl CsrMatrix {
    /// Create an all-zero matrix.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        CsrMatrix {
            n_rows,
            n_cols,
            indptr: vec![0; n_rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create a matrix from raw CSR buffers, validating the layout.
    pub fn new(
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self> {
        if indptr.is_empty() || indptr[0] != 0 {
            return Err(AffrontError::shape_mismatch(
                "indptr starting at 0",
                format!("{indptr:?}"),
            ));
        }
        if indices.len() != data.len() {
            return Err(AffrontError::shape_mismatch(
                format!("{} values", indices.len()),
                format!("{} values", data.len()),
            ));
        }
        if indptr[indptr.len() - 1] != indices.len() {
            return Err(AffrontError::shape_mismatch(
                format!("indptr ending at {}", indices.len()),
                format!("indptr ending at {}", indptr[indptr.len() - 1]),
            ));
        }
        for window in indptr.windows(2) {
            if window[0] > window[1] {
                return Err(AffrontError::shape_mismatch(
                    "non-decreasing indptr",
                    format!("{} followed by {}", window[0], window[1]),
                ));
            }
            let row = &indices[window[0]..window[1]];
            if row.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(AffrontError::shape_mismatch(
                    "strictly increasing column indices within a row",
                    format!("{row:?}"),
                ));
            }
            if let Some(&col) = row.last()
                && col >= n_cols
            {
                return Err(AffrontError::shape_mismatch(
                    format!("column index < {n_cols}"),
                    col,
                ));
            }
        }

        Ok(CsrMatrix {
            n_rows: indptr.len() - 1,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Build a matrix from per-row `(column, value)` entries.
    ///
    /// Entries may come in any order; duplicates within a row are summed and
    /// explicit zeros are dropped.
    pub fn from_rows<I, R>(n_cols: usize, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (usize, f64)>,
    {
        let mut indptr = vec![0];
        let mut indices = Vec::new();
        let mut data = Vec::new();

        for row in rows {
            let mut entries: Vec<(usize, f64)> = row.into_iter().collect();
            entries.sort_by_key(|&(col, _)| col);

            let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
            for (col, value) in entries {
                if col >= n_cols {
                    return Err(AffrontError::shape_mismatch(
                        format!("column index < {n_cols}"),
                        col,
                    ));
                }
                match merged.last_mut() {
                    Some((last_col, last_value)) if *last_col == col => *last_value += value,
                    _ => merged.push((col, value)),
                }
            }

            for (col, value) in merged {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            n_rows: indptr.len() - 1,
            n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Fraction of entries that are stored, in [0, 1].
    pub fn density(&self) -> f64 {
        let cells = self.n_rows * self.n_cols;
        if cells == 0 {
            0.0
        } else {
            self.nnz() as f64 / cells as f64
        }
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row(&self, i: usize) -> SparseRow<'_> {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            data: &self.data[start..end],
        }
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_>> {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// Value at `(row, col)`, zero when nothing is stored there.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.n_rows || col >= self.n_cols {
            return 0.0;
        }
        self.row(row).get(col)
    }

    /// All stored values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Copy the given rows, in the given order, into a new matrix.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        indptr.push(0);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        for &i in rows {
            if i >= self.n_rows {
                return Err(AffrontError::shape_mismatch(
                    format!("row index < {}", self.n_rows),
                    i,
                ));
            }
            let row = self.row(i);
            indices.extend_from_slice(row.indices());
            data.extend_from_slice(row.data());
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            n_rows: rows.len(),
            n_cols: self.n_cols,
            indptr,
            indices,
            data,
        })
    }

    /// Expand row `i` into a dense vector of length `n_cols`.
    pub fn dense_row(&self, i: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.n_cols];
        for (col, value) in self.row(i).iter() {
            dense[col] = value;
        }
        dense
    }
}
