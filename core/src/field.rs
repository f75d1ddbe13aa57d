//! Generic finite-field arithmetic over an arbitrary prime.
//!
//! This type is deliberately not hardcoded to the secp256k1 prime: unit
//! tests exercise the field laws (associativity, distributivity, inverses)
//! over small toy primes, while [`crate::secp256k1`] wires the same type up
//! to the production curve parameters.

use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{CoreError, Result};

/// An element `num` of the field F_p, with the invariant `0 <= num < p`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    num: BigUint,
    prime: BigUint,
}

impl FieldElement {
    /// Constructs a field element, failing with [`CoreError::Range`] if
    /// `num >= prime`.
    pub fn new(num: BigUint, prime: BigUint) -> Result<Self> {
        if num >= prime {
            return Err(CoreError::Range(format!(
                "{num} not in field range 0..{prime}"
            )));
        }
        Ok(Self { num, prime })
    }

    /// Constructs a field element from a small literal, reducing modulo
    /// `prime` rather than rejecting out-of-range input. Useful for the
    /// small integer constants (2, 3, ...) arithmetic formulas need.
    pub fn from_u64(value: u64, prime: &BigUint) -> Self {
        Self {
            num: BigUint::from(value) % prime,
            prime: prime.clone(),
        }
    }

    pub fn num(&self) -> &BigUint {
        &self.num
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    fn check_same_field(&self, other: &Self) -> Result<()> {
        if self.prime != other.prime {
            return Err(CoreError::MismatchedField);
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_field(other)?;
        Ok(Self {
            num: (&self.num + &other.num) % &self.prime,
            prime: self.prime.clone(),
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_field(other)?;
        Ok(Self {
            num: (&self.prime + &self.num - &other.num) % &self.prime,
            prime: self.prime.clone(),
        })
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.check_same_field(other)?;
        Ok(Self {
            num: (&self.num * &other.num) % &self.prime,
            prime: self.prime.clone(),
        })
    }

    /// `self ^ exponent`, first reducing `exponent` modulo `p - 1` (which
    /// correctly handles negative exponents, giving Fermat inverses for
    /// `exponent == -1`).
    pub fn pow(&self, exponent: &BigInt) -> Self {
        let order = BigInt::from_biguint(Sign::Plus, self.prime.clone()) - BigInt::one();
        let reduced = exponent.mod_floor(&order);
        let reduced = reduced
            .to_biguint()
            .expect("mod_floor against a positive modulus is never negative");
        Self {
            num: self.num.modpow(&reduced, &self.prime),
            prime: self.prime.clone(),
        }
    }

    /// `self / other = self * other^(p-2) mod p` (Fermat's little theorem).
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.check_same_field(other)?;
        if other.num.is_zero() {
            return Err(CoreError::Range("division by zero field element".into()));
        }
        let exponent = &self.prime - BigUint::from(2u32);
        let inv = other.num.modpow(&exponent, &self.prime);
        Ok(Self {
            num: (&self.num * inv) % &self.prime,
            prime: self.prime.clone(),
        })
    }

    /// `self ^ ((p+1)/4) mod p`, a square root of `self` valid when
    /// `p ≡ 3 (mod 4)` — true for the secp256k1 prime. The other root is
    /// `p - result`.
    pub fn sqrt(&self) -> Self {
        let exponent = (&self.prime + BigUint::one()) / BigUint::from(4u32);
        Self {
            num: self.num.modpow(&exponent, &self.prime),
            prime: self.prime.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_even(&self) -> bool {
        self.num.is_even()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement_{}({})", self.prime, self.num)
    }
}
