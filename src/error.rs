//! Error types for configuration and field handling.

use crate::index_space::FactorKey;
use thiserror::Error;

/// Invalid input detected before any generation work starts.
///
/// A [`crate::Configuration`] can only be built once every check has passed, so
/// none of these are ever produced halfway through emitting a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The shape has fewer than two modes
    #[error("tensor shape needs at least two modes, got {0}")]
    TooFewModes(usize),

    /// A mode was declared with dimension zero
    #[error("mode {mode} has dimension 0")]
    ZeroDimension {
        /// Offending mode
        mode: usize,
    },

    /// Constraint points at a mode the tensor does not have
    #[error("constraint {key} references mode {} but the tensor has {modes} modes", key.mode)]
    ConstraintModeOutOfRange {
        /// Offending constraint
        key: FactorKey,
        /// Number of modes in the shape
        modes: usize,
    },

    /// Constraint row exceeds the dimension of its mode
    #[error("constraint {key} references row {} but mode {} has dimension {dim}", key.row, key.mode)]
    ConstraintRowOutOfRange {
        /// Offending constraint
        key: FactorKey,
        /// Dimension of the constraint's mode
        dim: usize,
    },

    /// Constraint column exceeds the CP rank
    #[error("constraint {key} references column {} but the rank is {rank}", key.col)]
    ConstraintColumnOutOfRange {
        /// Offending constraint
        key: FactorKey,
        /// Configured rank
        rank: usize,
    },

    /// Minor size of zero requested for slicing or flattening
    #[error("minor size must be positive, got {0}")]
    InvalidMinorSize(usize),

    /// Shape string could not be parsed
    #[error("invalid shape '{0}': expected comma-separated positive integers")]
    InvalidShape(String),

    /// Constraint string could not be parsed
    #[error("invalid constraint '{0}': expected 'mode,row,col'")]
    InvalidConstraint(String),

    /// Rank string could not be parsed or was negative
    #[error("invalid rank '{0}': expected a non-negative integer")]
    InvalidRank(String),

    /// Strategy tag not recognised
    #[error("unknown strategy '{0}' (expected full, slicing, strassen, terracini or flattening)")]
    UnknownStrategy(String),
}

/// A field descriptor that cannot be used for in-process arithmetic.
///
/// Script emission never fails on these; they only disable numeric evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Descriptor is not of the form `ZZ/p` or `QQ`
    #[error("field '{0}' has no numeric model")]
    Unsupported(String),

    /// Characteristic is not prime
    #[error("{0} is not prime")]
    NotPrime(u64),

    /// Characteristic does not fit the evaluation ring
    #[error("characteristic {0} exceeds 2^31 - 1")]
    TooLarge(u64),
}
