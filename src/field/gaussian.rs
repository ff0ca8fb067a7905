//! Row-echelon reduction of sparse matrices over `Z/pZ`.
//!
//! Rows are processed top to bottom. Each row is reduced by the pivot rows
//! found so far until its leading column is free; a nonzero row is then
//! normalized and claims that column. The number of claimed columns is the rank.

use super::matrix::{JacobianMatrix, SparseRow};
use feanor_math::divisibility::{DivisibilityRing, DivisibilityRingStore};
use feanor_math::ring::*;
use log::trace;

/// Reduce `matrix` to row echelon form and return its rank
///
/// Elimination is done in place. Each row is reduced only against the pivot
/// rows claimed before it, so after the pass every pivot row has a distinct
/// leading column and a leading coefficient of 1. Rows that reduce to zero
/// stay in the matrix as empty rows.
///
/// Over `Z/pZ` every nonzero leading coefficient is a unit. The unit check
/// in [`normalize_row`] only matters for rings with zero divisors, where a
/// row whose lead cannot be inverted is left unclaimed rather than scaled.
pub fn reduce_matrix<R>(matrix: &mut JacobianMatrix<R>) -> usize
where
    R: RingStore + Copy,
    R::Type: DivisibilityRing,
{
    let mut rank = 0;

    for row_idx in 0..matrix.num_rows() {
        // Clear every leading entry an earlier pivot row can reach
        reduce_row_by_pivots(matrix, row_idx);

        // A zero row adds nothing to the rank
        let Some(pivot_col) = matrix.rows[row_idx].pivot() else {
            continue;
        };
        if matrix.has_pivot(pivot_col) {
            continue;
        }

        // a leading coefficient without inverse cannot serve as a pivot
        if normalize_row(matrix.ring, &mut matrix.rows[row_idx]) {
            matrix.mark_pivot(pivot_col, row_idx);
            rank += 1;
        }
    }

    trace!(
        "reduced {}x{} Jacobian to rank {}",
        matrix.num_rows(),
        matrix.num_cols,
        rank
    );
    rank
}

/// Eliminate the leading entry of `row_idx` while a pivot row exists for it
///
/// Every subtraction removes the current leading column, so the loop ends
/// after at most `num_cols` steps, either with a zero row or with a leading
/// column that no earlier row has claimed.
fn reduce_row_by_pivots<R>(matrix: &mut JacobianMatrix<R>, row_idx: usize)
where
    R: RingStore + Copy,
    R::Type: DivisibilityRing,
{
    let ring = matrix.ring;

    loop {
        let Some(pivot_col) = matrix.rows[row_idx].pivot() else {
            break;
        };
        // Stop once the leading column has no reducer
        let pivot_row_idx = match matrix.get_pivot_row(pivot_col) {
            Some(idx) if idx != row_idx => idx,
            _ => break,
        };

        // pivot rows are normalized, so the multiplier is the leading coefficient
        let multiplier = ring.clone_el(&matrix.rows[row_idx].entries[0].1);

        // Copy the pivot row out so the target row can be borrowed mutably
        let pivot_row = SparseRow {
            entries: matrix.rows[pivot_row_idx]
                .entries
                .iter()
                .map(|(col, coeff)| (*col, ring.clone_el(coeff)))
                .collect(),
        };

        subtract_scaled_row(ring, &mut matrix.rows[row_idx], &pivot_row, &multiplier);
    }
}

/// Scale `row` so its leading coefficient is 1; false if it is not a unit
fn normalize_row<R>(ring: R, row: &mut SparseRow<El<R>>) -> bool
where
    R: RingStore + Copy,
    R::Type: DivisibilityRing,
{
    let Some(inv) = row.entries.first().and_then(|(_, lead)| ring.invert(lead)) else {
        return false;
    };
    for (_, coeff) in &mut row.entries {
        ring.mul_assign_ref(coeff, &inv);
    }
    true
}

/// `target -= multiplier * source`, merging the sorted column lists
///
/// Both rows are sorted by column. The result is built in one pass over the
/// two entry lists, like the merge step of merge sort, and entries that
/// cancel to zero are dropped so the row stays sparse and sorted.
fn subtract_scaled_row<R>(
    ring: R,
    target: &mut SparseRow<El<R>>,
    source: &SparseRow<El<R>>,
    multiplier: &El<R>,
) where
    R: RingStore + Copy,
{
    let mut result = Vec::with_capacity(target.entries.len() + source.entries.len());
    let mut target_iter = target.entries.iter().peekable();
    let mut source_iter = source.entries.iter().peekable();

    loop {
        match (target_iter.peek(), source_iter.peek()) {
            // Same column: subtract, dropping cancellations
            (Some((tc, tv)), Some((sc, sv))) if tc == sc => {
                let value = ring.sub_ref(tv, &ring.mul_ref(multiplier, sv));
                if !ring.is_zero(&value) {
                    result.push((*tc, value));
                }
                target_iter.next();
                source_iter.next();
            }
            // Column only in the target: keep it
            (Some((tc, tv)), Some((sc, _))) if tc < sc => {
                result.push((*tc, ring.clone_el(tv)));
                target_iter.next();
            }
            (Some((tc, tv)), None) => {
                result.push((*tc, ring.clone_el(tv)));
                target_iter.next();
            }
            // Column only in the source: -multiplier * value
            (_, Some((sc, sv))) => {
                let value = ring.negate(ring.mul_ref(multiplier, sv));
                if !ring.is_zero(&value) {
                    result.push((*sc, value));
                }
                source_iter.next();
            }
            (None, None) => break,
        }
    }

    target.entries = result;
}
