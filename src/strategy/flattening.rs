//! Minors of the mode flattenings, added to the CP ideal before elimination.
//!
//! The mode-`m` flattening has one row per index of mode `m` and one column
//! per assignment of the other modes, in tensor order. A tensor of CP rank
//! `r` has flattenings of rank at most `r`, so their `(r+1)`-minors vanish.

use super::{
    emit_cp_ideal, emit_elimination, emit_header, GenerationContext, StrategyPlanner,
    FRAMED_BETTI_CAPTION, TITLE,
};
use crate::index_space::{IndexSpace, MultiIndexIter, TensorVar};
use crate::script::{ScriptEmitter, SymbolicScript};
use log::debug;

/// Rows of the mode-`mode` flattening of `space`
pub fn flattening(space: &IndexSpace, mode: usize) -> Vec<Vec<TensorVar>> {
    let dims = space.dims();
    let other_dims: Vec<usize> = dims
        .iter()
        .enumerate()
        .filter(|&(m, _)| m != mode)
        .map(|(_, &d)| d)
        .collect();

    (0..dims[mode])
        .map(|row| {
            MultiIndexIter::new(&other_dims)
                .map(|mut rest| {
                    rest.insert(mode, row);
                    TensorVar(rest)
                })
                .collect()
        })
        .collect()
}

/// Flattening minors of a configured size (rank + 1 by default).
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatteningPlanner {
    minor_size: Option<usize>,
}

impl FlatteningPlanner {
    /// Planner with an explicit minor size, or rank + 1 when `None`
    pub fn new(minor_size: Option<usize>) -> Self {
        Self { minor_size }
    }

    /// Minor size used for a CP rank
    pub fn minor_size_for(&self, rank: usize) -> usize {
        self.minor_size.unwrap_or(rank + 1)
    }
}

impl StrategyPlanner for FlatteningPlanner {
    fn name(&self) -> &'static str {
        "flattening"
    }

    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript {
        let space = ctx.space();
        let size = self.minor_size_for(space.rank());
        debug!(
            "flattening: {} flattenings, {}x{} minors",
            space.modes(),
            size,
            size
        );

        let mut emitter = ScriptEmitter::new();
        emit_header(&mut emitter, ctx, TITLE, self.name());
        emit_cp_ideal(&mut emitter, ctx, "I_cp");

        emitter.comment("Mode flattenings");
        let names: Vec<String> = (0..space.modes()).map(|m| format!("Flat_{}", m)).collect();
        for (mode, name) in names.iter().enumerate() {
            emitter.matrix(name, flattening(space, mode));
        }
        emitter
            .blank()
            .comment(format_args!("{}x{} minors of all flattenings", size, size))
            .minors_sum("flatteningIdeal", size, &names)
            .blank();

        emit_elimination(&mut emitter, ctx, "I_cp + flatteningIdeal", FRAMED_BETTI_CAPTION);
        emitter.finish()
    }
}
