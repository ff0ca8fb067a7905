//! Strategy planners: one Macaulay2 program per construction.
//!
//! Every planner consumes the same [`GenerationContext`] (index space,
//! constraint filter, CP assembly) and emits a complete program. The four
//! elimination strategies share one pipeline:
//!
//! ```text
//! ring -> CP ideal [+ supplement] -> factorVars -> eliminate -> print
//! ```
//!
//! while [`TerraciniPlanner`] declares only the factor ring and reports a
//! Jacobian rank instead of eliminating.

pub mod flattening;
pub mod full;
pub mod slicing;
pub mod strassen;
pub mod terracini;

pub use flattening::FlatteningPlanner;
pub use full::FullPlanner;
pub use slicing::SlicingPlanner;
pub use strassen::StrassenPlanner;
pub use terracini::{IdentifiabilityReport, TerraciniPlanner};

use crate::config::{Configuration, Strategy};
use crate::cp::{CpAssembler, CpAssembly};
use crate::filter::{ConstraintFilter, Factor};
use crate::index_space::{FactorKey, IndexSpace, TensorVar};
use crate::script::{ScriptEmitter, SymbolicScript};
use log::{debug, info};

/// Everything derived from a [`Configuration`] before any strategy runs.
pub struct GenerationContext<'c> {
    config: &'c Configuration,
    space: IndexSpace,
    filter: ConstraintFilter,
    assembly: CpAssembly,
    free_factors: Vec<FactorKey>,
}

impl<'c> GenerationContext<'c> {
    /// Derive index space, filter and CP assembly
    pub fn new(config: &'c Configuration) -> Self {
        let space = IndexSpace::new(config.shape().dims(), config.rank());
        let filter = ConstraintFilter::from_validated(config.constraints());
        let assembly = CpAssembler::new(&space, &filter).assemble();
        let free_factors = filter.free_factors(&space);
        debug!(
            "context for shape {} rank {}: {} free factors, {} tensor entries",
            config.shape(),
            config.rank(),
            free_factors.len(),
            space.tensor_count()
        );
        Self {
            config,
            space,
            filter,
            assembly,
            free_factors,
        }
    }

    /// The run configuration
    pub fn config(&self) -> &Configuration {
        self.config
    }

    /// Index space
    pub fn space(&self) -> &IndexSpace {
        &self.space
    }

    /// Constraint filter
    pub fn filter(&self) -> &ConstraintFilter {
        &self.filter
    }

    /// CP parameterization
    pub fn assembly(&self) -> &CpAssembly {
        &self.assembly
    }

    /// Unconstrained factor keys in declaration order
    pub fn free_factors(&self) -> &[FactorKey] {
        &self.free_factors
    }

    /// Free factor variables as they are declared
    pub fn factor_vars(&self) -> impl Iterator<Item = Factor> + '_ {
        self.free_factors.iter().map(|key| Factor::Variable(*key))
    }

    /// Tensor variables in declaration order
    pub fn tensor_vars(&self) -> impl Iterator<Item = TensorVar> {
        self.space.tensor_vars()
    }

    /// Tensor variable at a full multi-index
    pub fn tensor_var(&self, index: &[usize]) -> TensorVar {
        TensorVar(index.to_vec())
    }
}

/// A construction that turns a context into a program.
pub trait StrategyPlanner {
    /// Strategy tag
    fn name(&self) -> &'static str;

    /// Emit the program
    fn plan(&mut self, ctx: &GenerationContext<'_>) -> SymbolicScript;

    /// Identifiability report of the last [`Self::plan`] call, if the strategy produces one
    fn report(&self) -> Option<&IdentifiabilityReport> {
        None
    }
}

/// Planner for a strategy tag, seeding Terracini from its configured seed or fresh entropy
pub fn planner_for(strategy: Strategy) -> Box<dyn StrategyPlanner> {
    match strategy {
        Strategy::Full => Box::new(FullPlanner),
        Strategy::Slicing { minor_size } => Box::new(SlicingPlanner::new(minor_size)),
        Strategy::Strassen => Box::new(StrassenPlanner),
        Strategy::Terracini { seed } => Box::new(TerraciniPlanner::from_seed(seed)),
        Strategy::Flattening { minor_size } => Box::new(FlatteningPlanner::new(minor_size)),
    }
}

/// Generate the program for `config` with the strategy it names
pub fn generate(config: &Configuration) -> SymbolicScript {
    let mut planner = planner_for(config.strategy());
    generate_with(config, planner.as_mut())
}

/// Generate with an explicitly constructed planner
pub fn generate_with(config: &Configuration, planner: &mut dyn StrategyPlanner) -> SymbolicScript {
    info!(
        "generating {} program for shape {} rank {} with {} constraints over {}",
        planner.name(),
        config.shape(),
        config.rank(),
        config.constraints().len(),
        config.field()
    );
    let ctx = GenerationContext::new(config);
    let script = planner.plan(&ctx);
    debug!("{} program is {} bytes", planner.name(), script.as_str().len());
    script
}

/// Program title used by every strategy except Full
pub(crate) const TITLE: &str = "Graph-Constrained Secant Variety";

/// Caption printed above the Betti table
pub(crate) const BETTI_CAPTION: &str = "Betti Table of the Generators";

/// [`BETTI_CAPTION`] framed the way the slice-based strategies print it
pub(crate) const FRAMED_BETTI_CAPTION: &str = "--- Betti Table of the Generators ---";

/// Header comment: title, shape and rank, strategy tag
pub(crate) fn emit_header(
    emitter: &mut ScriptEmitter,
    ctx: &GenerationContext<'_>,
    title: &str,
    strategy: &str,
) {
    let config = ctx.config();
    emitter
        .comment(title)
        .comment(format_args!(
            "Tensor Shape: {}, CP Rank: {}",
            config.shape(),
            config.rank()
        ))
        .comment(format_args!("Strategy: {}", strategy))
        .blank();
}

/// `kk`/`R` declaring factor then tensor variables, followed by the CP ideal
pub(crate) fn emit_cp_ideal(emitter: &mut ScriptEmitter, ctx: &GenerationContext<'_>, ideal: &str) {
    let factors = ctx.factor_vars().map(|f| f.to_string());
    let tensors = ctx.tensor_vars().map(|t| t.to_string());
    emitter
        .ring(ctx.config().field(), factors.chain(tensors))
        .blank()
        .ideal(ideal, ctx.assembly().observation_equations())
        .blank();
}

/// `factorVars`, `eliminate` and the Betti table print under `caption`
pub(crate) fn emit_elimination(
    emitter: &mut ScriptEmitter,
    ctx: &GenerationContext<'_>,
    ideal_expr: &str,
    caption: &str,
) {
    emitter
        .comment("Implicit equations by elimination of factor variables")
        .list("factorVars", ctx.factor_vars())
        .eliminate("J", "factorVars", ideal_expr)
        .blank()
        .print_text(caption)
        .print_expr("net betti gens J")
        .blank();
}
