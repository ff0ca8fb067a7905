//! Sparse Jacobian of the CP parameterization, evaluated at a point.
//!
//! Row `t` holds the partial derivatives of `F(t)` with respect to the free
//! factor variables. Since every free variable occurs at most once in each CP
//! product (with exponent one), `dF(t)/dv` is the product of the other factors
//! of the single product containing `v`, and the nonzero columns of a row are
//! exactly the factors of its surviving products.

use crate::cp::CpAssembly;
use crate::index_space::FactorKey;
use feanor_math::ring::*;
use std::collections::HashMap;

/// A sparse row, `(column, coefficient)` sorted by column.
#[derive(Debug)]
pub struct SparseRow<F> {
    /// Nonzero entries, sorted by column index
    pub entries: Vec<(usize, F)>,
}

impl<F> SparseRow<F> {
    /// Empty row with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        SparseRow {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry; call [`Self::sort`] afterwards if out of order
    pub fn push(&mut self, col: usize, coeff: F) {
        self.entries.push((col, coeff));
    }

    /// Sort entries by column
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|(col, _)| *col);
    }

    /// Leftmost nonzero column
    pub fn pivot(&self) -> Option<usize> {
        self.entries.first().map(|(col, _)| *col)
    }

    /// True when no entries remain
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Jacobian rows over a coefficient ring, with the pivot bookkeeping used by
/// [`super::gaussian::reduce_matrix`].
pub struct JacobianMatrix<R>
where
    R: RingStore + Copy,
{
    /// Coefficient ring
    pub ring: R,
    /// One row per tensor entry
    pub rows: Vec<SparseRow<El<R>>>,
    /// Number of free factor variables
    pub num_cols: usize,
    /// `pivot_rows[col] = Some(row)` once `row` has its pivot in `col`
    pub pivot_rows: Vec<Option<usize>>,
}

impl<R> JacobianMatrix<R>
where
    R: RingStore + Copy,
{
    /// Empty matrix with `num_cols` columns
    pub fn new(ring: R, num_cols: usize) -> Self {
        JacobianMatrix {
            ring,
            rows: Vec::new(),
            num_cols,
            pivot_rows: vec![None; num_cols],
        }
    }

    /// Evaluate the Jacobian of `assembly` at `point`, where `point[c]` is the
    /// value of `columns[c]`
    pub fn evaluate(
        ring: R,
        assembly: &CpAssembly,
        columns: &[FactorKey],
        point: &[El<R>],
    ) -> Self {
        let position: HashMap<FactorKey, usize> =
            columns.iter().enumerate().map(|(c, key)| (*key, c)).collect();
        let mut matrix = Self::new(ring, columns.len());

        for (_, expr) in assembly.parameterization() {
            // at most one entry per factor of each surviving product
            let width = expr.terms().iter().map(|term| term.factors().len()).sum();
            let mut row = SparseRow::with_capacity(width);
            for term in expr.terms() {
                let cols: Vec<usize> = term
                    .factors()
                    .iter()
                    .filter_map(|key| position.get(key).copied())
                    .collect();
                for (skip, &col) in cols.iter().enumerate() {
                    let partial = cols
                        .iter()
                        .enumerate()
                        .filter(|(other, _)| *other != skip)
                        .fold(ring.one(), |acc, (_, &c)| ring.mul_ref(&acc, &point[c]));
                    if !ring.is_zero(&partial) {
                        row.push(col, partial);
                    }
                }
            }
            row.sort();
            matrix.add_row(row);
        }
        matrix
    }

    /// Append a row, returning its index
    pub fn add_row(&mut self, row: SparseRow<El<R>>) -> usize {
        let row_idx = self.rows.len();
        self.rows.push(row);
        row_idx
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Record that `row` has its pivot in `col`
    pub fn mark_pivot(&mut self, col: usize, row: usize) {
        if col < self.pivot_rows.len() {
            self.pivot_rows[col] = Some(row);
        }
    }

    /// Whether `col` already has a pivot row
    pub fn has_pivot(&self, col: usize) -> bool {
        self.pivot_rows.get(col).is_some_and(Option::is_some)
    }

    /// Pivot row of `col`
    pub fn get_pivot_row(&self, col: usize) -> Option<usize> {
        self.pivot_rows.get(col).and_then(|&r| r)
    }
}
