//! Strassen's degree-4 equations for 3x3x3 tensors.
//!
//! With frontal slices `X_k[j][l] = t_(k,j,l)`, the nine entries of
//!
//! ```text
//! S = X_0 * adj(X_1) * X_2 - X_2 * adj(X_1) * X_0
//! ```
//!
//! vanish on the rank-3 secant variety. They are expanded here into explicit
//! integer polynomials over the tensor variables, so the emitted ideal does
//! not depend on engine-side matrix helpers. Any other shape gets the trivial
//! ideal and a note.

use super::{
    emit_cp_ideal, emit_elimination, emit_header, GenerationContext, StrategyPlanner,
    BETTI_CAPTION, TITLE,
};
use crate::index_space::{IndexSpace, TensorVar};
use crate::poly::{adjugate, expand_over_integers, mat_mul, mat_sub, Mat3, SparsePoly};
use crate::script::{ScriptEmitter, SymbolicScript};
use feanor_math::ring::*;
use log::{debug, warn};

/// The only shape Strassen's equations are emitted for
pub const STRASSEN_SHAPE: [usize; 3] = [3, 3, 3];

/// True if `space` has shape exactly 3x3x3
pub fn is_applicable(space: &IndexSpace) -> bool {
    space.dims() == STRASSEN_SHAPE
}

/// The nine entries of the Strassen matrix, row-major, with exponent
/// position `9k + 3j + l` standing for `t_(k,j,l)`
pub fn strassen_polynomials() -> Vec<SparsePoly> {
    expand_over_integers(27, |ring, vars| {
        let slice = |k: usize| -> Mat3<_> {
            std::array::from_fn(|j| {
                std::array::from_fn(|l| ring.clone_el(&vars[9 * k + 3 * j + l]))
            })
        };
        let (x0, x1, x2) = (slice(0), slice(1), slice(2));
        let adj = adjugate(ring, &x1);
        let left = mat_mul(ring, &mat_mul(ring, &x0, &adj), &x2);
        let right = mat_mul(ring, &mat_mul(ring, &x2, &adj), &x0);
        mat_sub(ring, &left, &right).into_iter().flatten().collect()
    })
}

/// Strassen supplement, trivial outside 3x3x3.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrassenPlanner;

impl StrategyPlanner for StrassenPlanner {
    fn name(&self) -> &'static str {
        "strassen"
    }

    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript {
        let mut emitter = ScriptEmitter::new();
        emit_header(&mut emitter, ctx, TITLE, self.name());
        emit_cp_ideal(&mut emitter, ctx, "I_cp");

        if is_applicable(ctx.space()) {
            let vars: Vec<TensorVar> = ctx.tensor_vars().collect();
            let polys = strassen_polynomials();
            debug!(
                "strassen: {} generators of degree {:?}",
                polys.len(),
                polys.iter().filter_map(SparsePoly::degree).max()
            );
            emitter
                .comment("Strassen's equations, frontal slices X_k = t_(k,*,*)")
                .comment("entries of X_0*adj(X_1)*X_2 - X_2*adj(X_1)*X_0")
                .ideal("strassenIdeal", polys.iter().map(|p| p.display(&vars)));
        } else {
            warn!(
                "strassen equations need shape [3, 3, 3], got {}; using the trivial ideal",
                ctx.config().shape()
            );
            emitter
                .comment("Strassen shortcut only applies to 3x3x3 tensors.")
                .ideal("strassenIdeal", std::iter::empty::<String>());
        }
        emitter.blank();

        emit_elimination(&mut emitter, ctx, "I_cp + strassenIdeal", BETTI_CAPTION);
        emitter.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, Strategy};
    use crate::strategy::generate;
    use feanor_math::primitive_int::StaticRing;

    fn eval(poly: &SparsePoly, point: &[i64]) -> i64 {
        poly.terms()
            .iter()
            .map(|(c, exps)| {
                exps.iter()
                    .zip(point)
                    .fold(*c, |acc, (&e, &x)| acc * x.pow(e as u32))
            })
            .sum()
    }

    #[test]
    fn test_nine_homogeneous_quartics() {
        let polys = strassen_polynomials();
        assert_eq!(polys.len(), 9);
        for poly in &polys {
            assert!(!poly.is_zero());
            assert_eq!(poly.degree(), Some(4));
            assert!(poly.is_homogeneous());
        }
    }

    #[test]
    fn test_matches_numeric_commutator() {
        let ring = StaticRing::<i64>::RING;
        let point: Vec<i64> = (0..27).map(|i| (i * 7 % 11) as i64 - 5).collect();
        let slice = |k: usize| -> Mat3<i64> {
            std::array::from_fn(|j| std::array::from_fn(|l| point[9 * k + 3 * j + l]))
        };
        let (x0, x1, x2) = (slice(0), slice(1), slice(2));
        let adj = adjugate(ring, &x1);
        let expected = mat_sub(
            ring,
            &mat_mul(ring, &mat_mul(ring, &x0, &adj), &x2),
            &mat_mul(ring, &mat_mul(ring, &x2, &adj), &x0),
        );

        let polys = strassen_polynomials();
        for (poly, value) in polys.iter().zip(expected.iter().flatten()) {
            assert_eq!(eval(poly, &point), *value);
        }
    }

    #[test]
    fn test_vanishes_on_rank_one() {
        // t_(k,j,l) = a_k * b_j * c_l
        let (a, b, c) = ([1, 2, -1], [3, 1, 2], [2, -2, 5]);
        let point: Vec<i64> = (0..27)
            .map(|i| a[i / 9] * b[(i / 3) % 3] * c[i % 3])
            .collect();
        for poly in strassen_polynomials() {
            assert_eq!(eval(&poly, &point), 0);
        }
    }

    #[test]
    fn test_degenerate_shape_uses_trivial_ideal() {
        let config = Configuration::builder()
            .with_shape(&[2, 3, 3])
            .with_rank(2)
            .build()
            .unwrap();
        let script = StrassenPlanner
            .plan(&GenerationContext::new(&config))
            .into_string();
        assert!(script.contains(
            "-- Strassen shortcut only applies to 3x3x3 tensors.\nstrassenIdeal = ideal(0)\n"
        ));
        assert!(script.contains("J = eliminate(factorVars, I_cp + strassenIdeal)\n"));
    }

    #[test]
    fn test_generate_on_cubic_shape() {
        let config = Configuration::builder()
            .with_shape(&[3, 3, 3])
            .with_rank(3)
            .with_constraint(2, 0, 1)
            .with_constraint(2, 1, 2)
            .with_strategy(Strategy::Strassen)
            .build()
            .unwrap();
        let script = generate(&config).into_string();
        let ideal = script
            .split("strassenIdeal = ideal(\n")
            .nth(1)
            .and_then(|rest| rest.split("\n)\n").next())
            .unwrap();
        assert_eq!(ideal.lines().count(), 9);
        assert!(!script.contains("ideal(0)"));

        // exponent position 9k + 3j + l is the tensor variable t_(k,j,l)
        let ctx = GenerationContext::new(&config);
        for (position, var) in ctx.tensor_vars().enumerate() {
            assert_eq!(var.index(), [position / 9, position / 3 % 3, position % 3]);
        }
        assert!(script.contains("print \"Betti Table of the Generators\"\n"));
        assert!(script.contains("J = eliminate(factorVars, I_cp + strassenIdeal)\n"));
    }
}
