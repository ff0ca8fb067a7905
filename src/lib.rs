//! # constrained-secant
//!
//! Generates Macaulay2 programs for graph-constrained secant varieties of
//! CP tensor decompositions.
//!
//! Given a tensor shape, a CP rank and a set of structural zeros on latent
//! factor entries, the crate builds the constrained CP parameterization and
//! emits a program that either eliminates the factor variables (computing the
//! defining ideal) or ranks the Jacobian of the parameterization (computing
//! the dimension). Running the program is left to the caller.
//!
//! ## Features
//!
//! - **Deterministic output**: identical configurations give byte-identical programs
//! - **Typed structural zeros**: constrained factor slots resolve to [`filter::Factor::Zero`],
//!   and every product touching one is dropped from the parameterization
//! - **Five strategies**: full elimination, slice minors, flattening minors,
//!   Strassen's equations (3x3x3) and Terracini's Jacobian rank
//! - **In-process rank**: for `ZZ/p` and `QQ` the Terracini rank is also computed
//!   here, over feanor-math's `Z/pZ`
//!
//! ## Quick Start
//!
//! ```ignore
//! use constrained_secant::*;
//!
//! let config = Configuration::builder()
//!     .with_shape(&[3, 3, 3])
//!     .with_rank(2)
//!     .with_constraint(2, 0, 0)
//!     .build()?;
//!
//! let script = generate(&config);
//! std::fs::write("secant.m2", script.as_str())?;
//! ```
//!
//! ## Identifiability Report
//!
//! ```ignore
//! use constrained_secant::*;
//!
//! let config = Configuration::builder()
//!     .with_shape(&[3, 3, 3])
//!     .with_rank(2)
//!     .with_strategy(Strategy::Terracini { seed: Some(7) })
//!     .build()?;
//!
//! let mut planner = planner_for(config.strategy());
//! let script = generate_with(&config, planner.as_mut());
//! let report = planner.report().unwrap();
//! assert_eq!(report.expected_dimension, 14);
//! assert!(report.observed_rank.unwrap() <= 14);
//! ```
//!
//! ## Variable Naming
//!
//! - Factor variables: `v_(mode,row,col)`, declared mode-major, then row, then column
//! - Tensor variables: `t_(i0,...,iN-1)`, declared with the first mode slowest
//!
//! ## Limitations
//!
//! - Strassen's equations are only emitted for shape exactly 3x3x3
//! - Numeric rank evaluation needs a prime characteristic below 2^31; other
//!   field descriptors leave the random point to the engine

#![feature(allocator_api)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod config;
pub mod cp;
pub mod error;
pub mod field;
pub mod filter;
pub mod index_space;
pub mod poly;
pub mod script;
pub mod strategy;

// Re-export main types
pub use config::{
    parse_rank, Configuration, ConfigurationBuilder, ConstraintSet, FieldSpec, Strategy,
    TensorShape, DEFAULT_FIELD, DEFAULT_SLICE_MINOR_SIZE,
};
pub use cp::{CpAssembler, CpAssembly, CpExpr, CpTerm, ObservationEquation};
pub use error::{ConfigError, FieldError};
pub use filter::{ConstraintFilter, Factor};
pub use index_space::{FactorKey, IndexSpace, TensorVar};
pub use script::{ScriptEmitter, SymbolicScript};
pub use strategy::{
    generate, generate_with, planner_for, GenerationContext, IdentifiabilityReport,
    StrategyPlanner,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        let config = Configuration::builder()
            .with_shape(&[2, 2])
            .with_rank(1)
            .build()
            .unwrap();
        let script = generate(&config);
        assert!(script.as_str().starts_with("-- Graph-Constrained Secant Variety Generator\n"));
        assert!(script.as_str().contains("kk = ZZ/32003\n"));
    }

    #[test]
    fn test_version_info() {
        assert_eq!(NAME, "constrained-secant");
        assert!(!VERSION.is_empty());
    }
}
