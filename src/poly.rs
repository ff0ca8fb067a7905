//! Integer polynomials over the tensor variables.
//!
//! Products are expanded with feanor-math's multivariate ring over `ZZ`; the
//! results are copied into [`SparsePoly`], whose term order is fixed here
//! (descending exponent vector) so rendering does not depend on the internal
//! layout of the ring.

use crate::index_space::TensorVar;
use feanor_math::primitive_int::StaticRing;
use feanor_math::ring::*;
use feanor_math::rings::multivariate::multivariate_impl::MultivariatePolyRingImpl;
use feanor_math::rings::multivariate::*;
use std::alloc::Global;
use std::fmt;

/// 3x3 matrix of ring elements
pub type Mat3<T> = [[T; 3]; 3];

/// `ZZ[x_0, ..., x_{n-1}]`
pub type IntPolyRing = MultivariatePolyRingImpl<StaticRing<i64>>;

/// Element of [`IntPolyRing`]
pub type IntPoly = El<IntPolyRing>;

/// An expanded polynomial: `(coefficient, exponent vector)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparsePoly {
    terms: Vec<(i64, Vec<usize>)>,
}

impl SparsePoly {
    /// Collect terms, dropping zero coefficients and sorting exponents descending
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (i64, Vec<usize>)>,
    {
        let mut terms: Vec<_> = terms.into_iter().filter(|(c, _)| *c != 0).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1));
        Self { terms }
    }

    /// Terms in emission order
    pub fn terms(&self) -> &[(i64, Vec<usize>)] {
        &self.terms
    }

    /// True for the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total degree, `None` for zero
    pub fn degree(&self) -> Option<usize> {
        self.terms.iter().map(|(_, e)| e.iter().sum()).max()
    }

    /// True when every term has the same total degree
    pub fn is_homogeneous(&self) -> bool {
        let mut degrees = self.terms.iter().map(|(_, e)| e.iter().sum::<usize>());
        match degrees.next() {
            Some(first) => degrees.all(|d| d == first),
            None => true,
        }
    }

    /// Render with `vars[i]` naming exponent position `i`
    pub fn display<'a>(&'a self, vars: &'a [TensorVar]) -> PolyDisplay<'a> {
        PolyDisplay { poly: self, vars }
    }
}

/// Macaulay2 rendering of a [`SparsePoly`].
pub struct PolyDisplay<'a> {
    poly: &'a SparsePoly,
    vars: &'a [TensorVar],
}

impl fmt::Display for PolyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.poly.is_zero() {
            return write!(f, "0");
        }
        for (i, (coeff, exps)) in self.poly.terms.iter().enumerate() {
            match (i, *coeff < 0) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            let magnitude = coeff.unsigned_abs();
            let mut factors = exps
                .iter()
                .enumerate()
                .filter(|(_, e)| **e > 0)
                .peekable();
            if factors.peek().is_none() {
                write!(f, "{}", magnitude)?;
                continue;
            }
            let mut first = true;
            if magnitude != 1 {
                write!(f, "{}", magnitude)?;
                first = false;
            }
            for (var, &e) in factors {
                if !first {
                    write!(f, "*")?;
                }
                first = false;
                write!(f, "{}", self.vars[var])?;
                if e > 1 {
                    write!(f, "^{}", e)?;
                }
            }
        }
        Ok(())
    }
}

/// `a * b` for 3x3 matrices over any ring
pub fn mat_mul<P>(ring: P, a: &Mat3<El<P>>, b: &Mat3<El<P>>) -> Mat3<El<P>>
where
    P: RingStore + Copy,
{
    std::array::from_fn(|i| {
        std::array::from_fn(|j| {
            (0..3).fold(ring.zero(), |acc, k| ring.add(acc, ring.mul_ref(&a[i][k], &b[k][j])))
        })
    })
}

/// `a - b` entrywise
pub fn mat_sub<P>(ring: P, a: &Mat3<El<P>>, b: &Mat3<El<P>>) -> Mat3<El<P>>
where
    P: RingStore + Copy,
{
    std::array::from_fn(|i| std::array::from_fn(|j| ring.sub_ref(&a[i][j], &b[i][j])))
}

fn complement(k: usize) -> [usize; 2] {
    match k {
        0 => [1, 2],
        1 => [0, 2],
        _ => [0, 1],
    }
}

fn minor2<P>(ring: P, m: &Mat3<El<P>>, rows: [usize; 2], cols: [usize; 2]) -> El<P>
where
    P: RingStore + Copy,
{
    let [r0, r1] = rows;
    let [c0, c1] = cols;
    ring.sub(
        ring.mul_ref(&m[r0][c0], &m[r1][c1]),
        ring.mul_ref(&m[r0][c1], &m[r1][c0]),
    )
}

/// Classical adjugate: `adj(M)[i][j] = (-1)^(i+j) det(M without row j and column i)`
pub fn adjugate<P>(ring: P, m: &Mat3<El<P>>) -> Mat3<El<P>>
where
    P: RingStore + Copy,
{
    std::array::from_fn(|i| {
        std::array::from_fn(|j| {
            let minor = minor2(ring, m, complement(j), complement(i));
            if (i + j) % 2 == 0 {
                minor
            } else {
                ring.negate(minor)
            }
        })
    })
}

/// Highest total degree [`expand_over_integers`] can represent
///
/// The default ring supports degree 64, which for more than a handful of
/// variables overflows the `u64` monomial ordering table and panics on
/// construction. Every expansion done here stays well below this bound.
pub const MAX_EXPANSION_DEGREE: u16 = 8;

/// Expand `f(ring, x)` where `x[k]` is the `k`-th of `var_count` indeterminates over `ZZ`
///
/// The ring is created with degree bound [`MAX_EXPANSION_DEGREE`] and no
/// precomputed multiplication table; products exceeding the bound panic
/// inside feanor-math.
pub fn expand_over_integers<F>(var_count: usize, f: F) -> Vec<SparsePoly>
where
    F: FnOnce(&IntPolyRing, Vec<IntPoly>) -> Vec<IntPoly>,
{
    let ring = MultivariatePolyRingImpl::new_with_mult_table(
        StaticRing::<i64>::RING,
        var_count,
        MAX_EXPANSION_DEGREE,
        (0, 0),
        Global,
    );
    let vars: Vec<_> = (0..var_count)
        .map(|i| {
            let monomial = ring.create_monomial((0..var_count).map(|j| usize::from(i == j)));
            ring.from_terms([(1, monomial)].into_iter())
        })
        .collect();
    f(&ring, vars)
        .iter()
        .map(|p| {
            SparsePoly::from_terms(ring.terms(p).map(|(c, m)| (*c, ring.expand_monomial(m))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<TensorVar> {
        (0..n).map(|i| TensorVar(vec![i])).collect()
    }

    #[test]
    fn test_rendering() {
        let poly = SparsePoly::from_terms([
            (-2, vec![0, 1, 0]),
            (1, vec![2, 0, 0]),
            (0, vec![0, 0, 1]),
            (5, vec![0, 0, 0]),
        ]);
        let vars = names(3);
        assert_eq!(
            poly.display(&vars).to_string(),
            "t_(0)^2 - 2*t_(1) + 5"
        );
        assert_eq!(poly.degree(), Some(2));
        assert!(!poly.is_homogeneous());
        assert_eq!(SparsePoly::from_terms([]).display(&vars).to_string(), "0");
    }

    #[test]
    fn test_expansion_cancels() {
        // (x + y)(x - y) = x^2 - y^2
        let polys = expand_over_integers(2, |ring, v| {
            let sum = ring.add_ref(&v[0], &v[1]);
            let diff = ring.sub_ref(&v[0], &v[1]);
            vec![ring.mul(sum, diff)]
        });
        assert_eq!(
            polys[0],
            SparsePoly::from_terms([(1, vec![2, 0]), (-1, vec![0, 2])])
        );
    }

    #[test]
    fn test_expansion_over_many_variables() {
        // 27 indeterminates at degree 4, the size of the 3x3x3 Strassen expansion
        let polys = expand_over_integers(27, |ring, v| {
            let quartic = v[..4].iter().fold(ring.one(), |acc, x| ring.mul_ref_snd(acc, x));
            vec![ring.sub_ref_fst(&quartic, ring.pow(ring.clone_el(&v[26]), 4))]
        });
        let mut product = vec![0; 27];
        product[..4].fill(1);
        let mut power = vec![0; 27];
        power[26] = 4;
        assert_eq!(polys[0], SparsePoly::from_terms([(1, product), (-1, power)]));
    }

    #[test]
    fn test_adjugate_identity() {
        // M * adj(M) = det(M) * I over ZZ
        let ring = StaticRing::<i64>::RING;
        let m: Mat3<i64> = [[2, 0, 1], [1, 3, 2], [1, 1, 2]];
        let adj = adjugate(ring, &m);
        let product = mat_mul(ring, &m, &adj);
        let det = 6;
        for (i, row) in product.iter().enumerate() {
            for (j, &entry) in row.iter().enumerate() {
                assert_eq!(entry, if i == j { det } else { 0 });
            }
        }
    }
}
