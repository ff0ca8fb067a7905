//! Straight elimination of every factor variable from the CP ideal.

use super::{
    emit_cp_ideal, emit_elimination, emit_header, GenerationContext, StrategyPlanner,
    BETTI_CAPTION,
};
use crate::script::{ScriptEmitter, SymbolicScript};

const FULL_TITLE: &str = "Graph-Constrained Secant Variety Generator";

/// No supplemental ideal; exact but the most expensive construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullPlanner;

impl StrategyPlanner for FullPlanner {
    fn name(&self) -> &'static str {
        "full"
    }

    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript {
        let mut emitter = ScriptEmitter::new();
        emit_header(&mut emitter, ctx, FULL_TITLE, self.name());
        emit_cp_ideal(&mut emitter, ctx, "I");
        emit_elimination(&mut emitter, ctx, "I", BETTI_CAPTION);
        emitter
            .comment("print \"The Explicit Polynomials\"")
            .comment("print toString gens J");
        emitter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn plan(dims: &[usize], rank: usize) -> String {
        let config = Configuration::builder()
            .with_shape(dims)
            .with_rank(rank)
            .with_field("QQ")
            .build()
            .unwrap();
        FullPlanner.plan(&GenerationContext::new(&config)).into_string()
    }

    #[test]
    fn test_rank_one_matrix() {
        let expected = "\
-- Graph-Constrained Secant Variety Generator
-- Tensor Shape: [2, 2], CP Rank: 1
-- Strategy: full

kk = QQ
R = kk[v_(0,0,0), v_(0,1,0), v_(1,0,0), v_(1,1,0), t_(0,0), t_(0,1), t_(1,0), t_(1,1)]

I = ideal(
    t_(0,0) - (v_(0,0,0)*v_(1,0,0)),
    t_(0,1) - (v_(0,0,0)*v_(1,1,0)),
    t_(1,0) - (v_(0,1,0)*v_(1,0,0)),
    t_(1,1) - (v_(0,1,0)*v_(1,1,0))
)

-- Implicit equations by elimination of factor variables
factorVars = {v_(0,0,0), v_(0,1,0), v_(1,0,0), v_(1,1,0)}
J = eliminate(factorVars, I)

print \"Betti Table of the Generators\"
print net betti gens J

-- print \"The Explicit Polynomials\"
-- print toString gens J
";
        assert_eq!(plan(&[2, 2], 1), expected);
    }

    #[test]
    fn test_rank_zero_declares_tensors_only() {
        let script = plan(&[2, 2], 0);
        assert!(script.contains("R = kk[t_(0,0), t_(0,1), t_(1,0), t_(1,1)]\n"));
        assert!(script.contains("    t_(1,1) - 0\n"));
        assert!(script.contains("factorVars = {}\n"));
    }
}
