//! Resolution of factor keys to symbolic variables or the zero constant.

use crate::config::{ConstraintSet, TensorShape};
use crate::error::ConfigError;
use crate::index_space::{FactorKey, IndexSpace};
use std::collections::HashSet;
use std::fmt;

/// A resolved factor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    /// Free factor variable, rendered `v_(mode,row,col)`
    Variable(FactorKey),
    /// Structurally absent entry, rendered `0`
    Zero,
}

impl Factor {
    /// True for the zero constant
    pub fn is_zero(&self) -> bool {
        matches!(self, Factor::Zero)
    }

    /// Key of a free variable
    pub fn key(&self) -> Option<FactorKey> {
        match self {
            Factor::Variable(key) => Some(*key),
            Factor::Zero => None,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Variable(key) => write!(f, "v_{}", key),
            Factor::Zero => write!(f, "0"),
        }
    }
}

/// Maps factor keys to [`Factor`]s using the constraint set.
#[derive(Debug, Clone)]
pub struct ConstraintFilter {
    zeros: HashSet<FactorKey>,
}

impl ConstraintFilter {
    /// Filter for constraints that are known to lie inside `shape` x `rank`
    pub fn new(
        constraints: &ConstraintSet,
        shape: &TensorShape,
        rank: usize,
    ) -> Result<Self, ConfigError> {
        constraints.validate(shape, rank)?;
        Ok(Self {
            zeros: constraints.iter().copied().collect(),
        })
    }

    /// Filter for a constraint set already checked by [`crate::config::Configuration`]
    pub fn from_validated(constraints: &ConstraintSet) -> Self {
        Self {
            zeros: constraints.iter().copied().collect(),
        }
    }

    /// Resolve one key
    pub fn resolve(&self, key: FactorKey) -> Factor {
        if self.zeros.contains(&key) {
            Factor::Zero
        } else {
            Factor::Variable(key)
        }
    }

    /// Whether `key` is forced to zero
    pub fn is_constrained(&self, key: &FactorKey) -> bool {
        self.zeros.contains(key)
    }

    /// Unconstrained keys of `space`, in declaration order
    pub fn free_factors(&self, space: &IndexSpace) -> Vec<FactorKey> {
        space
            .factor_keys()
            .filter(|key| !self.is_constrained(key))
            .collect()
    }
}
