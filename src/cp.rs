//! CP parameterization: one polynomial per tensor entry.
//!
//! Entry `t_(i0,...,iN-1)` is parameterized by `sum_j prod_m v_(m, i_m, j)`.
//! A product that touches a structural zero is omitted from the sum rather
//! than kept as a zero term, so the monomials that can appear reflect the
//! absent latent paths. An empty sum renders as the literal `0`.

use crate::filter::{ConstraintFilter, Factor};
use crate::index_space::{FactorKey, IndexSpace, TensorVar};
use log::debug;
use std::fmt;

/// One surviving rank-one product: a factor per mode, all at the same column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpTerm {
    column: usize,
    factors: Vec<FactorKey>,
}

impl CpTerm {
    /// CP column of this product
    pub fn column(&self) -> usize {
        self.column
    }

    /// Factor variables, one per mode
    pub fn factors(&self) -> &[FactorKey] {
        &self.factors
    }
}

impl fmt::Display for CpTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "{}", Factor::Variable(*key))?;
        }
        Ok(())
    }
}

/// Sum of the surviving products for one tensor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpExpr {
    terms: Vec<CpTerm>,
}

impl CpExpr {
    /// Surviving products in column order
    pub fn terms(&self) -> &[CpTerm] {
        &self.terms
    }

    /// True when every product was dropped
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for CpExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// `tensor_var - cp_expr`, one generator of the CP ideal.
///
/// A nonempty expression is parenthesized so the subtraction applies to the
/// whole sum. An entry whose products were all dropped renders as
/// `t_(..) - 0`; the engine simplifies that generator to `t_(..)`, which
/// forces the entry to vanish on the variety.
#[derive(Debug, Clone, Copy)]
pub struct ObservationEquation<'a> {
    /// Observed entry
    pub tensor: &'a TensorVar,
    /// Its parameterization
    pub expr: &'a CpExpr,
}

impl fmt::Display for ObservationEquation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expr.is_zero() {
            write!(f, "{} - 0", self.tensor)
        } else {
            write!(f, "{} - ({})", self.tensor, self.expr)
        }
    }
}

/// Output of [`CpAssembler::assemble`], in tensor-index order.
///
/// Entry `k` belongs to the `k`-th multi-index of the index space, so
/// lookups by multi-index go through [`IndexSpace::linear_offset`] instead of
/// a map.
#[derive(Debug, Clone)]
pub struct CpAssembly {
    space: IndexSpace,
    entries: Vec<(TensorVar, CpExpr)>,
    dropped: usize,
}

impl CpAssembly {
    /// Parameterization map entries `(t, F(t))`
    pub fn parameterization(&self) -> impl Iterator<Item = (&TensorVar, &CpExpr)> {
        self.entries.iter().map(|(t, e)| (t, e))
    }

    /// Expression for one multi-index, `None` if it lies outside the shape
    pub fn expression(&self, index: &[usize]) -> Option<&CpExpr> {
        let offset = self.space.linear_offset(index)?;
        self.entries.get(offset).map(|(_, e)| e)
    }

    /// Generators `t - F(t)`
    pub fn observation_equations(&self) -> impl Iterator<Item = ObservationEquation<'_>> {
        self.entries
            .iter()
            .map(|(tensor, expr)| ObservationEquation { tensor, expr })
    }

    /// Number of tensor entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty tensor (never produced by a validated shape)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Products omitted because they touched a structural zero
    pub fn dropped_terms(&self) -> usize {
        self.dropped
    }
}

/// Builds the CP parameterization over an index space.
pub struct CpAssembler<'a> {
    space: &'a IndexSpace,
    filter: &'a ConstraintFilter,
}

impl<'a> CpAssembler<'a> {
    /// Assembler for `space` with zeros from `filter`
    pub fn new(space: &'a IndexSpace, filter: &'a ConstraintFilter) -> Self {
        Self { space, filter }
    }

    /// Product at `(index, column)`, or `None` if any factor is zero
    ///
    /// Resolving goes mode by mode, and collecting into `Option` stops at the
    /// first structural zero.
    pub fn term(&self, index: &[usize], column: usize) -> Option<CpTerm> {
        let factors = index
            .iter()
            .enumerate()
            .map(|(mode, &row)| self.filter.resolve(FactorKey::new(mode, row, column)).key())
            .collect::<Option<Vec<_>>>()?;
        Some(CpTerm { column, factors })
    }

    /// Parameterize every tensor entry
    ///
    /// Products are kept in column order. The number of dropped products is
    /// recorded so callers can report how much of the generic parameterization
    /// the constraints removed.
    pub fn assemble(&self) -> CpAssembly {
        let rank = self.space.rank();
        let mut dropped = 0;
        let entries: Vec<_> = self
            .space
            .tensor_indices()
            .map(|index| {
                // one candidate product per CP column; zeros remove it entirely
                let terms: Vec<_> = (0..rank).filter_map(|j| self.term(&index, j)).collect();
                dropped += rank - terms.len();
                (TensorVar(index), CpExpr { terms })
            })
            .collect();
        debug!(
            "assembled {} CP expressions, dropped {} products through structural zeros",
            entries.len(),
            dropped
        );
        CpAssembly {
            space: self.space.clone(),
            entries,
            dropped,
        }
    }
}
