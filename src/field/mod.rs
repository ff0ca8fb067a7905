//! Numeric model of the coefficient field.
//!
//! The emitted program treats the field descriptor as opaque text. Numeric
//! Jacobian evaluation needs actual arithmetic, which is available for
//! `ZZ/p` (prime `p < 2^31`) and for `QQ`, whose rank is bounded below by the
//! rank modulo a large prime and is evaluated in `ZZ/(2^31 - 1)`.
//!
//! Elements are drawn from an injected [`rand::Rng`], so callers pick between
//! reproducible seeds and fresh entropy.

pub mod gaussian;
pub mod matrix;

use crate::config::FieldSpec;
use crate::error::FieldError;
use feanor_math::homomorphism::Homomorphism;
use feanor_math::ring::*;
use feanor_math::rings::zn::zn_64::Zn;
use rand::Rng;

/// Modulus standing in for `QQ`
pub const RATIONAL_SURROGATE_PRIME: u64 = 2_147_483_647;

/// Largest characteristic the evaluation ring accepts
pub const MAX_CHARACTERISTIC: u64 = i32::MAX as u64;

/// `Z/pZ` for the working field of a run.
#[derive(Clone)]
pub struct WorkingField {
    characteristic: u64,
    surrogate: bool,
    ring: Zn,
}

impl WorkingField {
    /// Interpret a descriptor numerically
    pub fn from_spec(spec: &FieldSpec) -> Result<Self, FieldError> {
        let descriptor = spec.as_str().trim();
        if descriptor == "QQ" {
            return Ok(Self::prime(RATIONAL_SURROGATE_PRIME, true));
        }
        let p = descriptor
            .strip_prefix("ZZ/")
            .and_then(|p| p.trim().parse::<u64>().ok())
            .ok_or_else(|| FieldError::Unsupported(descriptor.to_string()))?;
        if p > MAX_CHARACTERISTIC {
            return Err(FieldError::TooLarge(p));
        }
        if !is_prime(p) {
            return Err(FieldError::NotPrime(p));
        }
        Ok(Self::prime(p, false))
    }

    fn prime(p: u64, surrogate: bool) -> Self {
        Self {
            characteristic: p,
            surrogate,
            ring: Zn::new(p),
        }
    }

    /// Characteristic of the evaluation ring
    pub fn characteristic(&self) -> u64 {
        self.characteristic
    }

    /// True when evaluation happens modulo a prime standing in for `QQ`
    pub fn is_surrogate(&self) -> bool {
        self.surrogate
    }

    /// Evaluation ring
    pub fn ring(&self) -> &Zn {
        &self.ring
    }

    /// Uniform canonical representative in `[0, p)`
    pub fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> u64 {
        rng.random_range(0..self.characteristic)
    }

    /// Ring element of a canonical representative
    pub fn element(&self, value: u64) -> El<Zn> {
        // value < p <= i32::MAX
        self.ring.int_hom().map((value % self.characteristic) as i32)
    }
}

impl std::fmt::Debug for WorkingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WorkingField(Z/{})", self.characteristic)
    }
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_descriptors() {
        let field = WorkingField::from_spec(&FieldSpec::new("ZZ/32003")).unwrap();
        assert_eq!(field.characteristic(), 32003);
        assert!(!field.is_surrogate());

        let rationals = WorkingField::from_spec(&FieldSpec::new("QQ")).unwrap();
        assert_eq!(rationals.characteristic(), RATIONAL_SURROGATE_PRIME);
        assert!(rationals.is_surrogate());
    }

    #[test]
    fn test_rejected_descriptors() {
        assert_eq!(
            WorkingField::from_spec(&FieldSpec::new("GF(2^8)")).unwrap_err(),
            FieldError::Unsupported("GF(2^8)".to_string())
        );
        assert_eq!(
            WorkingField::from_spec(&FieldSpec::new("ZZ/32000")).unwrap_err(),
            FieldError::NotPrime(32000)
        );
        assert_eq!(
            WorkingField::from_spec(&FieldSpec::new("ZZ/4294967311")).unwrap_err(),
            FieldError::TooLarge(4294967311)
        );
    }

    #[test]
    fn test_samples_stay_in_range() {
        let field = WorkingField::from_spec(&FieldSpec::new("ZZ/17")).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(field.sample(&mut rng) < 17);
        }
    }

    #[test]
    fn test_element_arithmetic() {
        let field = WorkingField::from_spec(&FieldSpec::new("ZZ/17")).unwrap();
        let ring = field.ring();
        let product = ring.mul(field.element(5), field.element(7));
        assert!(ring.eq_el(&product, &field.element(1)));
    }

    #[test]
    fn test_primality() {
        assert!(is_prime(2));
        assert!(is_prime(32003));
        assert!(is_prime(RATIONAL_SURROGATE_PRIME));
        assert!(!is_prime(1));
        assert!(!is_prime(32001));
    }
}
