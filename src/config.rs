//! Run configuration: shape, rank, structural zeros, field and strategy.
//!
//! A [`Configuration`] is validated when it is built (or deserialized) and is
//! immutable afterwards, so every generation run starts from consistent input.

use crate::error::ConfigError;
use crate::index_space::FactorKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Field used when none is given
pub const DEFAULT_FIELD: &str = "ZZ/32003";

/// Minor size used by the slicing strategy when none is given
pub const DEFAULT_SLICE_MINOR_SIZE: usize = 3;

/// Dimensions of the observed tensor, one per mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct TensorShape(Vec<usize>);

impl TensorShape {
    /// Validate and wrap a list of mode dimensions
    pub fn new(dims: Vec<usize>) -> Result<Self, ConfigError> {
        if dims.len() < 2 {
            return Err(ConfigError::TooFewModes(dims.len()));
        }
        if let Some(mode) = dims.iter().position(|&d| d == 0) {
            return Err(ConfigError::ZeroDimension { mode });
        }
        Ok(Self(dims))
    }

    /// Mode dimensions
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of modes
    pub fn modes(&self) -> usize {
        self.0.len()
    }

    /// Dimension of `mode`
    pub fn dim(&self, mode: usize) -> Option<usize> {
        self.0.get(mode).copied()
    }

    /// Number of tensor entries
    pub fn volume(&self) -> usize {
        self.0.iter().product()
    }
}

impl TryFrom<Vec<usize>> for TensorShape {
    type Error = ConfigError;

    fn try_from(dims: Vec<usize>) -> Result<Self, ConfigError> {
        Self::new(dims)
    }
}

impl From<TensorShape> for Vec<usize> {
    fn from(shape: TensorShape) -> Self {
        shape.0
    }
}

impl FromStr for TensorShape {
    type Err = ConfigError;

    /// Parse `"3,3,3"`
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let dims = s
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidShape(s.to_string()))?;
        Self::new(dims)
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dim)?;
        }
        write!(f, "]")
    }
}

/// Structural zeros on latent factor entries. Duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet(BTreeSet<FactorKey>);

impl ConstraintSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zero constraint; returns false if it was already present
    pub fn insert(&mut self, key: FactorKey) -> bool {
        self.0.insert(key)
    }

    /// Membership test
    pub fn contains(&self, key: &FactorKey) -> bool {
        self.0.contains(key)
    }

    /// Number of distinct constraints
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is constrained
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constraints in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &FactorKey> {
        self.0.iter()
    }

    /// Reject any key outside `shape` x `rank`
    pub fn validate(&self, shape: &TensorShape, rank: usize) -> Result<(), ConfigError> {
        self.0.iter().try_for_each(|key| validate_key(*key, shape, rank))
    }
}

impl FromIterator<FactorKey> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = FactorKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for ConstraintSet {
    type Err = ConfigError;

    /// Parse `"2,0,0;2,1,2"`. Empty items are skipped; anything else that is
    /// not three non-negative integers is an error.
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let mut set = Self::new();
        for item in s.split(';').map(str::trim).filter(|item| !item.is_empty()) {
            let parts = item
                .split(',')
                .map(|p| p.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ConfigError::InvalidConstraint(item.to_string()))?;
            match parts.as_slice() {
                &[mode, row, col] => {
                    set.insert(FactorKey::new(mode, row, col));
                }
                _ => return Err(ConfigError::InvalidConstraint(item.to_string())),
            }
        }
        Ok(set)
    }
}

fn validate_key(key: FactorKey, shape: &TensorShape, rank: usize) -> Result<(), ConfigError> {
    let dim = shape.dim(key.mode).ok_or(ConfigError::ConstraintModeOutOfRange {
        key,
        modes: shape.modes(),
    })?;
    if key.row >= dim {
        return Err(ConfigError::ConstraintRowOutOfRange { key, dim });
    }
    if key.col >= rank {
        return Err(ConfigError::ConstraintColumnOutOfRange { key, rank });
    }
    Ok(())
}

/// Parse a rank, rejecting negative or non-numeric input
pub fn parse_rank(s: &str) -> Result<usize, ConfigError> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidRank(s.to_string()))
}

/// Coefficient field descriptor, passed to the engine verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec(String);

impl FieldSpec {
    /// Wrap a descriptor such as `ZZ/32003` or `QQ`
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self(descriptor.into())
    }

    /// The descriptor text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which construction to emit, with its own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Strategy {
    /// Eliminate the factor variables from the CP ideal
    Full,
    /// Add minors of every 2-mode slice before eliminating
    Slicing {
        /// Size of the minors taken from each slice
        #[serde(default = "default_slice_minor_size")]
        minor_size: usize,
    },
    /// Add Strassen's degree-4 equations (3x3x3 only) before eliminating
    Strassen,
    /// Jacobian rank of the parameterization at a random point
    Terracini {
        /// Seed for the evaluation point; fresh entropy when absent
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Add minors of every mode flattening before eliminating
    Flattening {
        /// Size of the minors; rank + 1 when absent
        #[serde(default)]
        minor_size: Option<usize>,
    },
}

fn default_slice_minor_size() -> usize {
    DEFAULT_SLICE_MINOR_SIZE
}

impl Strategy {
    /// Strategy for a tag with default parameters
    pub fn from_tag(tag: &str) -> Result<Self, ConfigError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Strategy::Full),
            "slicing" => Ok(Strategy::Slicing {
                minor_size: DEFAULT_SLICE_MINOR_SIZE,
            }),
            "strassen" => Ok(Strategy::Strassen),
            "terracini" => Ok(Strategy::Terracini { seed: None }),
            "flattening" => Ok(Strategy::Flattening { minor_size: None }),
            _ => Err(ConfigError::UnknownStrategy(tag.to_string())),
        }
    }

    /// Lowercase tag of this strategy
    pub fn tag(&self) -> &'static str {
        match self {
            Strategy::Full => "full",
            Strategy::Slicing { .. } => "slicing",
            Strategy::Strassen => "strassen",
            Strategy::Terracini { .. } => "terracini",
            Strategy::Flattening { .. } => "flattening",
        }
    }

    /// Replace the minor size of slicing or flattening; other strategies are unchanged
    pub fn with_minor_size(self, size: usize) -> Self {
        match self {
            Strategy::Slicing { .. } => Strategy::Slicing { minor_size: size },
            Strategy::Flattening { .. } => Strategy::Flattening {
                minor_size: Some(size),
            },
            other => other,
        }
    }

    /// Replace the Terracini seed; other strategies are unchanged
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            Strategy::Terracini { .. } => Strategy::Terracini { seed: Some(seed) },
            other => other,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Strategy::Slicing { minor_size: 0 }
            | Strategy::Flattening {
                minor_size: Some(0),
            } => Err(ConfigError::InvalidMinorSize(0)),
            _ => Ok(()),
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_tag(s)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The single immutable input of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfiguration")]
pub struct Configuration {
    shape: TensorShape,
    rank: usize,
    constraints: ConstraintSet,
    field: FieldSpec,
    strategy: Strategy,
}

#[derive(Deserialize)]
struct RawConfiguration {
    shape: TensorShape,
    rank: usize,
    #[serde(default)]
    constraints: ConstraintSet,
    #[serde(default)]
    field: FieldSpec,
    strategy: Strategy,
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = ConfigError;

    fn try_from(raw: RawConfiguration) -> Result<Self, ConfigError> {
        Configuration::new(raw.shape, raw.rank, raw.constraints, raw.field, raw.strategy)
    }
}

impl Configuration {
    /// Validate all parts together
    pub fn new(
        shape: TensorShape,
        rank: usize,
        constraints: ConstraintSet,
        field: FieldSpec,
        strategy: Strategy,
    ) -> Result<Self, ConfigError> {
        constraints.validate(&shape, rank)?;
        strategy.validate()?;
        Ok(Self {
            shape,
            rank,
            constraints,
            field,
            strategy,
        })
    }

    /// Start a builder
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Tensor shape
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// CP rank
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Structural zeros
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Coefficient field
    pub fn field(&self) -> &FieldSpec {
        &self.field
    }

    /// Selected strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

/// Fluent builder for [`Configuration`]. Validation happens in [`Self::build`].
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    dims: Vec<usize>,
    rank: usize,
    constraints: ConstraintSet,
    field: FieldSpec,
    strategy: Strategy,
}

impl ConfigurationBuilder {
    /// Empty builder using the full strategy over the default field
    pub fn new() -> Self {
        Self {
            dims: Vec::new(),
            rank: 0,
            constraints: ConstraintSet::new(),
            field: FieldSpec::default(),
            strategy: Strategy::Full,
        }
    }

    /// Set the mode dimensions
    pub fn with_shape(mut self, dims: &[usize]) -> Self {
        self.dims = dims.to_vec();
        self
    }

    /// Set the mode dimensions from a parsed shape
    pub fn with_tensor_shape(mut self, shape: TensorShape) -> Self {
        self.dims = shape.0;
        self
    }

    /// Set the CP rank
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    /// Add one structural zero
    pub fn with_constraint(mut self, mode: usize, row: usize, col: usize) -> Self {
        self.constraints.insert(FactorKey::new(mode, row, col));
        self
    }

    /// Replace the constraint set
    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the field descriptor
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = FieldSpec::new(field);
        self
    }

    /// Set the strategy
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<Configuration, ConfigError> {
        let shape = TensorShape::new(self.dims)?;
        Configuration::new(shape, self.rank, self.constraints, self.field, self.strategy)
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Configuration> for ConfigurationBuilder {
    /// Builder pre-filled with an existing configuration, for overriding parts of it
    fn from(config: Configuration) -> Self {
        Self {
            dims: config.shape.0,
            rank: config.rank,
            constraints: config.constraints,
            field: config.field,
            strategy: config.strategy,
        }
    }
}
