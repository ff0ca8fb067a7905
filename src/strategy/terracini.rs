//! Dimension through the Jacobian rank of the CP parameterization.
//!
//! By Terracini's lemma the dimension of the constrained secant variety is
//! the rank of `dF` at a generic point. The planner draws that point itself,
//! embeds it in the program as an explicit substitution and, when the field
//! descriptor is numeric (`ZZ/p` or `QQ`), evaluates the rank in-process.
//!
//! The expected dimension removes `N - 1` scaling gauges per CP column:
//! `P - rank * (N - 1)`. A rank below that at a random point is evidence of
//! non-identifiability.

use super::{emit_header, GenerationContext, StrategyPlanner, TITLE};
use crate::field::gaussian::reduce_matrix;
use crate::field::matrix::JacobianMatrix;
use crate::field::WorkingField;
use crate::script::{ScriptEmitter, SymbolicScript};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Counts printed by the identifiability report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiabilityReport {
    /// Free (unconstrained) factor variables `P`
    pub total_parameters: usize,
    /// Scaling gauge `R = rank * (N - 1)`
    pub scaling_redundancy: usize,
    /// `P - R`; negative when constraints remove more than the gauge
    pub expected_dimension: i64,
    /// Number of tensor entries
    pub ambient_dimension: usize,
    /// Jacobian rank at the drawn point, when the field is numeric
    pub observed_rank: Option<usize>,
    /// Characteristic the rank was computed in
    pub characteristic: Option<u64>,
}

impl IdentifiabilityReport {
    /// Whether the observed rank reaches the expected dimension
    pub fn is_identifiable(&self) -> Option<bool> {
        self.observed_rank.map(|rank| rank as i64 >= self.expected_dimension)
    }
}

/// Terracini planner with an injected randomness source.
pub struct TerraciniPlanner<G: Rng = StdRng> {
    rng: G,
    report: Option<IdentifiabilityReport>,
}

impl TerraciniPlanner<StdRng> {
    /// Reproducible when `seed` is given, fresh OS entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_rng(StdRng::seed_from_u64(seed)),
            None => Self::with_rng(StdRng::from_os_rng()),
        }
    }
}

impl<G: Rng> TerraciniPlanner<G> {
    /// Planner drawing evaluation points from `rng`
    pub fn with_rng(rng: G) -> Self {
        Self { rng, report: None }
    }

    /// Report of the last plan
    pub fn last_report(&self) -> Option<&IdentifiabilityReport> {
        self.report.as_ref()
    }

    /// Draw a point, rank the Jacobian there; `None` if the field is not numeric
    fn evaluate(&mut self, ctx: &GenerationContext<'_>) -> Option<(WorkingField, Vec<u64>, usize)> {
        let field = match WorkingField::from_spec(ctx.config().field()) {
            Ok(field) => field,
            Err(err) => {
                warn!("terracini: {}; leaving the point to the engine", err);
                return None;
            }
        };
        let point: Vec<u64> = ctx
            .free_factors()
            .iter()
            .map(|_| field.sample(&mut self.rng))
            .collect();
        let values: Vec<_> = point.iter().map(|&v| field.element(v)).collect();

        let mut jacobian =
            JacobianMatrix::evaluate(field.ring(), ctx.assembly(), ctx.free_factors(), &values);
        let rank = reduce_matrix(&mut jacobian);
        debug!(
            "terracini: {}x{} Jacobian over Z/{} has rank {}{}",
            jacobian.num_rows(),
            jacobian.num_cols,
            field.characteristic(),
            rank,
            if field.is_surrogate() { " (QQ surrogate)" } else { "" }
        );
        Some((field, point, rank))
    }
}

impl<G: Rng> StrategyPlanner for TerraciniPlanner<G> {
    fn name(&self) -> &'static str {
        "terracini"
    }

    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript {
        let config = ctx.config();
        let total_parameters = ctx.free_factors().len();
        let scaling_redundancy = config.rank() * (config.shape().modes() - 1);
        let expected_dimension = total_parameters as i64 - scaling_redundancy as i64;
        let evaluation = self.evaluate(ctx);

        let mut emitter = ScriptEmitter::new();
        emit_header(&mut emitter, ctx, TITLE, self.name());
        emitter
            .ring(config.field(), ctx.factor_vars())
            .blank()
            .comment("The CP Parameterization Map")
            .row_matrix("F", ctx.assembly().parameterization().map(|(_, expr)| expr))
            .blank()
            .comment("Compute the symbolic Jacobian")
            .assign("J", "jacobian F")
            .blank()
            .comment("Evaluate the Jacobian at a random numerical point");
        match &evaluation {
            Some((_, point, _)) => {
                let substitutions = ctx
                    .free_factors()
                    .iter()
                    .zip(point)
                    .map(|(key, value)| format!("v_{} => {}", key, value));
                emitter.list("randomVals", substitutions);
            }
            None => {
                emitter.assign("randomVals", "apply(gens R, v -> v => random kk)");
            }
        }
        emitter
            .assign("J_eval", "sub(J, randomVals)")
            .blank()
            .print_text("--- Geometric Identifiability Report ---")
            .print_text(format_args!("Total Free Parameters (Vertices): {}", total_parameters))
            .print_text(format_args!("Scaling Redundancies: {}", scaling_redundancy))
            .print_text(format_args!(
                "Expected Dimension (if identifiable): {}",
                expected_dimension
            ))
            .print_text("")
            .print_text("Actual Dimension of Constrained Variety (Jacobian Rank):")
            .print_expr("rank J_eval");
        if let Some((field, _, rank)) = &evaluation {
            emitter.comment(format_args!(
                "rank at this point over ZZ/{}: {}",
                field.characteristic(),
                rank
            ));
        }

        let report = IdentifiabilityReport {
            total_parameters,
            scaling_redundancy,
            expected_dimension,
            ambient_dimension: ctx.space().tensor_count(),
            observed_rank: evaluation.as_ref().map(|(_, _, rank)| *rank),
            characteristic: evaluation.as_ref().map(|(field, _, _)| field.characteristic()),
        };
        info!(
            "terracini: P = {}, R = {}, expected {}, observed {:?}",
            report.total_parameters,
            report.scaling_redundancy,
            report.expected_dimension,
            report.observed_rank
        );
        self.report = Some(report);
        emitter.finish()
    }

    fn report(&self) -> Option<&IdentifiabilityReport> {
        self.last_report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, Strategy};

    fn config(dims: &[usize], rank: usize, field: &str) -> Configuration {
        Configuration::builder()
            .with_shape(dims)
            .with_rank(rank)
            .with_field(field)
            .with_strategy(Strategy::Terracini { seed: None })
            .build()
            .unwrap()
    }

    #[test]
    fn test_rank_one_matrix_is_identifiable() {
        let config = config(&[2, 2], 1, "ZZ/32003");
        let mut planner = TerraciniPlanner::from_seed(Some(11));
        planner.plan(&GenerationContext::new(&config));
        let report = planner.report().unwrap();
        assert_eq!(report.total_parameters, 4);
        assert_eq!(report.scaling_redundancy, 1);
        assert_eq!(report.expected_dimension, 3);
        assert_eq!(report.ambient_dimension, 4);
        assert_eq!(report.observed_rank, Some(3));
        assert_eq!(report.characteristic, Some(32003));
        assert_eq!(report.is_identifiable(), Some(true));
    }

    #[test]
    fn test_same_seed_same_script() {
        let config = config(&[3, 3, 3], 2, "ZZ/32003");
        let ctx = GenerationContext::new(&config);
        let first = TerraciniPlanner::from_seed(Some(5)).plan(&ctx);
        let second = TerraciniPlanner::from_seed(Some(5)).plan(&ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn test_script_shape() {
        let config = config(&[2, 2], 1, "ZZ/7");
        let script = TerraciniPlanner::from_seed(Some(3))
            .plan(&GenerationContext::new(&config))
            .into_string();
        assert!(script.contains("kk = ZZ/7\nR = kk[v_(0,0,0), v_(0,1,0), v_(1,0,0), v_(1,1,0)]\n"));
        assert!(script.contains(
            "F = matrix{{ v_(0,0,0)*v_(1,0,0), v_(0,0,0)*v_(1,1,0), v_(0,1,0)*v_(1,0,0), v_(0,1,0)*v_(1,1,0) }}\n"
        ));
        assert!(script.contains("J = jacobian F\n"));
        assert!(script.contains("randomVals = {v_(0,0,0) => "));
        assert!(script.contains("print \"Total Free Parameters (Vertices): 4\"\n"));
        assert!(script.contains("print \"Scaling Redundancies: 1\"\n"));
        assert!(script.contains("print \"Expected Dimension (if identifiable): 3\"\n"));
        assert!(script.contains("print rank J_eval\n"));
        assert!(!script.contains("t_("));
    }

    #[test]
    fn test_symbolic_field_falls_back_to_engine_randomness() {
        let config = config(&[2, 2], 1, "GF(9)");
        let mut planner = TerraciniPlanner::from_seed(Some(3));
        let script = planner.plan(&GenerationContext::new(&config)).into_string();
        assert!(script.contains("randomVals = apply(gens R, v -> v => random kk)\n"));
        let report = planner.report().unwrap();
        assert_eq!(report.observed_rank, None);
        assert_eq!(report.is_identifiable(), None);
        assert_eq!(report.expected_dimension, 3);
    }

    #[test]
    fn test_zeroed_mode_leaves_no_rank() {
        // every mode-1 entry zero: no free parameters in mode 1
        let config = Configuration::builder()
            .with_shape(&[2, 2])
            .with_rank(1)
            .with_constraint(1, 0, 0)
            .with_constraint(1, 1, 0)
            .with_constraint(0, 0, 0)
            .with_strategy(Strategy::Terracini { seed: Some(1) })
            .build()
            .unwrap();
        let mut planner = TerraciniPlanner::from_seed(Some(1));
        let script = planner.plan(&GenerationContext::new(&config)).into_string();
        let report = planner.report().unwrap();
        assert_eq!(report.total_parameters, 1);
        assert_eq!(report.observed_rank, Some(0));
        assert!(script.contains("F = matrix{{ 0, 0, 0, 0 }}\n"));
    }
}
