//! Minors of every two-mode slice, added to the CP ideal before elimination.
//!
//! For each mode pair `(a, b)` with `a < b` and each assignment of the
//! remaining modes (first fixed mode slowest), the slice `S` has
//! `S[i][j] = t` at the index with mode `a` at `i`, mode `b` at `j`.

use super::{
    emit_cp_ideal, emit_elimination, emit_header, GenerationContext, StrategyPlanner,
    FRAMED_BETTI_CAPTION, TITLE,
};
use crate::index_space::{mode_pairs, IndexSpace, MultiIndexIter, TensorVar};
use crate::script::{ScriptEmitter, SymbolicScript};
use log::debug;

/// One two-mode slice of the tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceMatrix {
    /// Mode indexing the rows
    pub mode_row: usize,
    /// Mode indexing the columns
    pub mode_col: usize,
    /// Values of the remaining modes, in mode order
    pub fixed: Vec<usize>,
    /// Tensor variables, `rows[i][j]`
    pub rows: Vec<Vec<TensorVar>>,
}

impl SliceMatrix {
    /// `S_{row}_{col}_fixed_{values}`, or `..._fixed_all` for a matrix tensor
    pub fn name(&self) -> String {
        let fixed = if self.fixed.is_empty() {
            "all".to_string()
        } else {
            self.fixed
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("_")
        };
        format!("S_{}_{}_fixed_{}", self.mode_row, self.mode_col, fixed)
    }

    /// `(rows, columns)`
    pub fn size(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }
}

/// Every two-mode slice of `space`, in emission order
pub fn slice_matrices(space: &IndexSpace) -> Vec<SliceMatrix> {
    let dims = space.dims();
    let mut slices = Vec::new();

    for (mode_row, mode_col) in mode_pairs(space.modes()) {
        let fixed_modes: Vec<usize> = (0..dims.len())
            .filter(|&m| m != mode_row && m != mode_col)
            .collect();
        let fixed_dims: Vec<usize> = fixed_modes.iter().map(|&m| dims[m]).collect();

        for fixed in MultiIndexIter::new(&fixed_dims) {
            let mut index = vec![0; dims.len()];
            for (&mode, &value) in fixed_modes.iter().zip(&fixed) {
                index[mode] = value;
            }
            let rows = (0..dims[mode_row])
                .map(|i| {
                    (0..dims[mode_col])
                        .map(|j| {
                            index[mode_row] = i;
                            index[mode_col] = j;
                            TensorVar(index.clone())
                        })
                        .collect()
                })
                .collect();
            slices.push(SliceMatrix {
                mode_row,
                mode_col,
                fixed,
                rows,
            });
        }
    }
    slices
}

/// Slice minors of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct SlicingPlanner {
    minor_size: usize,
}

impl SlicingPlanner {
    /// Planner taking `minor_size` x `minor_size` minors
    pub fn new(minor_size: usize) -> Self {
        Self { minor_size }
    }

    /// Size of the minors
    pub fn minor_size(&self) -> usize {
        self.minor_size
    }
}

impl StrategyPlanner for SlicingPlanner {
    fn name(&self) -> &'static str {
        "slicing"
    }

    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript {
        let slices = slice_matrices(ctx.space());
        debug!(
            "slicing: {} slice matrices, {}x{} minors",
            slices.len(),
            self.minor_size,
            self.minor_size
        );

        let mut emitter = ScriptEmitter::new();
        emit_header(&mut emitter, ctx, TITLE, self.name());
        emit_cp_ideal(&mut emitter, ctx, "I_cp");

        emitter.comment("Constructing all 2D Slices for an N-way tensor");
        for slice in &slices {
            emitter.matrix(&slice.name(), &slice.rows);
        }
        emitter
            .blank()
            .comment(format_args!(
                "{}x{} minors of all 2D slices",
                self.minor_size, self.minor_size
            ))
            .minors_sum(
                "sliceIdeal",
                self.minor_size,
                slices.iter().map(SliceMatrix::name),
            )
            .blank();

        emit_elimination(&mut emitter, ctx, "I_cp + sliceIdeal", FRAMED_BETTI_CAPTION);
        emitter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, Strategy};

    #[test]
    fn test_slice_layout_three_modes() {
        let space = IndexSpace::new(&[2, 3, 4], 1);
        let slices = slice_matrices(&space);
        // (0,1) x 4 + (0,2) x 3 + (1,2) x 2
        assert_eq!(slices.len(), 9);

        let first = &slices[0];
        assert_eq!(first.name(), "S_0_1_fixed_0");
        assert_eq!(first.size(), (2, 3));
        assert_eq!(first.rows[1][2], TensorVar(vec![1, 2, 0]));

        let last = &slices[8];
        assert_eq!(last.name(), "S_1_2_fixed_1");
        assert_eq!(last.size(), (3, 4));
        assert_eq!(last.rows[2][3], TensorVar(vec![1, 2, 3]));
    }

    #[test]
    fn test_matrix_tensor_has_single_slice() {
        let space = IndexSpace::new(&[2, 2], 1);
        let slices = slice_matrices(&space);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].name(), "S_0_1_fixed_all");
    }

    #[test]
    fn test_four_modes_fix_two() {
        let space = IndexSpace::new(&[2, 2, 2, 2], 1);
        let slices = slice_matrices(&space);
        assert_eq!(slices.len(), 6 * 4);
        assert_eq!(slices[3].name(), "S_0_1_fixed_1_1");
        assert_eq!(slices[3].rows[0][1], TensorVar(vec![0, 1, 1, 1]));
    }

    #[test]
    fn test_script_blocks() {
        let config = Configuration::builder()
            .with_shape(&[2, 2])
            .with_rank(1)
            .with_strategy(Strategy::Slicing { minor_size: 2 })
            .build()
            .unwrap();
        let script = SlicingPlanner::new(2)
            .plan(&GenerationContext::new(&config))
            .into_string();
        assert!(script.contains("I_cp = ideal(\n"));
        assert!(script.contains(
            "S_0_1_fixed_all = matrix{\n    {t_(0,0), t_(0,1)},\n    {t_(1,0), t_(1,1)}\n}\n"
        ));
        assert!(script.contains(
            "-- 2x2 minors of all 2D slices\nsliceIdeal = minors(2, S_0_1_fixed_all)\n"
        ));
        assert!(script.contains("J = eliminate(factorVars, I_cp + sliceIdeal)\n"));
        assert!(script.starts_with("-- Graph-Constrained Secant Variety\n"));
        assert!(script.contains("print \"--- Betti Table of the Generators ---\"\n"));
    }
}
