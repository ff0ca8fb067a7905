//! Enumeration of factor-variable keys and tensor multi-indices.
//!
//! Both orders are part of the output contract: factor keys run mode-major,
//! then row, then column; tensor indices run lexicographically with the first
//! mode slowest. Variable declarations and generator blocks follow them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of one latent factor entry: `(mode, row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactorKey {
    /// Tensor mode the factor matrix belongs to
    pub mode: usize,
    /// Row within that mode's factor matrix
    pub row: usize,
    /// CP column (rank component)
    pub col: usize,
}

impl FactorKey {
    /// Create a key
    pub const fn new(mode: usize, row: usize, col: usize) -> Self {
        Self { mode, row, col }
    }
}

impl fmt::Display for FactorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.mode, self.row, self.col)
    }
}

/// An observed tensor entry, rendered as `t_(i0,i1,...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorVar(pub Vec<usize>);

impl TensorVar {
    /// Multi-index of this entry
    pub fn index(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for TensorVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t_(")?;
        for (i, coord) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", coord)?;
        }
        write!(f, ")")
    }
}

/// The combinatorial universe of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    dims: Vec<usize>,
    rank: usize,
}

impl IndexSpace {
    /// Index space for a tensor of the given dimensions and CP rank
    pub fn new(dims: &[usize], rank: usize) -> Self {
        Self {
            dims: dims.to_vec(),
            rank,
        }
    }

    /// Mode dimensions
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of modes
    pub fn modes(&self) -> usize {
        self.dims.len()
    }

    /// CP rank
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// All factor keys in mode-major, row-next, column-last order
    pub fn factor_keys(&self) -> impl Iterator<Item = FactorKey> + '_ {
        let rank = self.rank;
        self.dims.iter().enumerate().flat_map(move |(mode, &dim)| {
            (0..dim).flat_map(move |row| (0..rank).map(move |col| FactorKey::new(mode, row, col)))
        })
    }

    /// `sum_m dims[m] * rank`
    pub fn factor_key_count(&self) -> usize {
        self.dims.iter().sum::<usize>() * self.rank
    }

    /// All tensor multi-indices, first mode slowest
    pub fn tensor_indices(&self) -> MultiIndexIter {
        MultiIndexIter::new(&self.dims)
    }

    /// Tensor variables in declaration order
    pub fn tensor_vars(&self) -> impl Iterator<Item = TensorVar> {
        self.tensor_indices().map(TensorVar)
    }

    /// `prod_m dims[m]`
    pub fn tensor_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Position of a multi-index in [`Self::tensor_indices`] order
    pub fn linear_offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for (&coord, &dim) in index.iter().zip(&self.dims) {
            if coord >= dim {
                return None;
            }
            offset = offset * dim + coord;
        }
        Some(offset)
    }
}

/// Odometer over the Cartesian product `range(d0) x ... x range(dk)`.
///
/// The last coordinate turns fastest. An empty dimension list yields exactly
/// one empty index; any zero dimension yields nothing.
#[derive(Debug, Clone)]
pub struct MultiIndexIter {
    dims: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl MultiIndexIter {
    /// Iterate the product of `0..d` for every `d` in `dims`
    pub fn new(dims: &[usize]) -> Self {
        let next = if dims.iter().any(|&d| d == 0) {
            None
        } else {
            Some(vec![0; dims.len()])
        };
        Self {
            dims: dims.to_vec(),
            next,
        }
    }
}

impl Iterator for MultiIndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut succ = current.clone();
        for pos in (0..self.dims.len()).rev() {
            succ[pos] += 1;
            if succ[pos] < self.dims[pos] {
                self.next = Some(succ);
                return Some(current);
            }
            succ[pos] = 0;
        }
        // wrapped past the first coordinate: `current` was the last index
        Some(current)
    }
}

/// Unordered mode pairs `(a, b)` with `a < b`, in ascending order
pub fn mode_pairs(modes: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..modes).flat_map(move |a| (a + 1..modes).map(move |b| (a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_key_order() {
        let space = IndexSpace::new(&[2, 1], 2);
        let keys: Vec<_> = space.factor_keys().collect();
        assert_eq!(
            keys,
            vec![
                FactorKey::new(0, 0, 0),
                FactorKey::new(0, 0, 1),
                FactorKey::new(0, 1, 0),
                FactorKey::new(0, 1, 1),
                FactorKey::new(1, 0, 0),
                FactorKey::new(1, 0, 1),
            ]
        );
        assert_eq!(space.factor_key_count(), keys.len());
    }

    #[test]
    fn test_tensor_indices_lexicographic() {
        let space = IndexSpace::new(&[2, 3], 1);
        let indices: Vec<_> = space.tensor_indices().collect();
        assert_eq!(indices.len(), 6);
        assert_eq!(indices[0], vec![0, 0]);
        assert_eq!(indices[1], vec![0, 1]);
        assert_eq!(indices[3], vec![1, 0]);
        assert_eq!(indices[5], vec![1, 2]);
        for (pos, idx) in indices.iter().enumerate() {
            assert_eq!(space.linear_offset(idx), Some(pos));
        }
    }

    #[test]
    fn test_empty_and_zero_products() {
        assert_eq!(MultiIndexIter::new(&[]).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(MultiIndexIter::new(&[3, 0]).count(), 0);
    }

    #[test]
    fn test_mode_pairs() {
        let pairs: Vec<_> = mode_pairs(4).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(mode_pairs(1).count(), 0);
    }

    #[test]
    fn test_rendering() {
        assert_eq!(TensorVar(vec![0, 2, 1]).to_string(), "t_(0,2,1)");
        assert_eq!(FactorKey::new(2, 0, 1).to_string(), "(2,0,1)");
    }

    #[test]
    fn test_rank_zero_has_no_factor_keys() {
        let space = IndexSpace::new(&[3, 3, 3], 0);
        assert_eq!(space.factor_keys().count(), 0);
        assert_eq!(space.tensor_count(), 27);
    }
}
