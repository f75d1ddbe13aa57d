//! The secp256k1 curve parameters, frozen for the life of the process.
//!
//! Nothing here re-parameterizes the curve at runtime — these are the one
//! and only curve constants this crate signs or verifies against. Tests
//! exercising field/curve arithmetic laws use the generic types in
//! [`crate::field`]/[`crate::curve`] over small toy primes instead.

use num_bigint::BigUint;
use once_cell::sync::Lazy;

use crate::curve::{Curve, Point};
use crate::field::FieldElement;

fn hex_to_biguint(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("hardcoded curve constant is valid hex")
}

/// The field prime `p = 2^256 - 2^32 - 977`.
pub static P: Lazy<BigUint> = Lazy::new(|| {
    hex_to_biguint("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F")
});

/// The group order `n`.
pub static N: Lazy<BigUint> = Lazy::new(|| {
    hex_to_biguint("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
});

static GX: Lazy<BigUint> = Lazy::new(|| {
    hex_to_biguint("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798")
});

static GY: Lazy<BigUint> = Lazy::new(|| {
    hex_to_biguint("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8")
});

/// The curve `y^2 = x^3 + 7` (a = 0, b = 7).
pub static CURVE: Lazy<Curve> = Lazy::new(|| {
    let a = FieldElement::new(BigUint::from(0u32), P.clone()).expect("0 < p");
    let b = FieldElement::new(BigUint::from(7u32), P.clone()).expect("7 < p");
    Curve::new(a, b)
});

/// The generator point `G`.
pub static GENERATOR: Lazy<Point> = Lazy::new(|| {
    let x = FieldElement::new(GX.clone(), P.clone()).expect("Gx < p");
    let y = FieldElement::new(GY.clone(), P.clone()).expect("Gy < p");
    Point::new(x, y, CURVE.clone()).expect("secp256k1 generator is on-curve by construction")
});

/// Cofactor; secp256k1's cofactor is 1, i.e. the curve's order equals the
/// order of the prime-order subgroup generated by `G`.
pub const COFACTOR: u32 = 1;

pub fn prime() -> BigUint {
    P.clone()
}

pub fn order() -> BigUint {
    N.clone()
}

pub fn generator() -> Point {
    GENERATOR.clone()
}

pub fn curve() -> Curve {
    CURVE.clone()
}

/// Constructs the field element `x` reduced modulo the secp256k1 prime.
pub fn field_element(x: BigUint) -> FieldElement {
    FieldElement::new(x % &*P, P.clone()).expect("reduced modulo p")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        assert!(!GENERATOR.is_infinity());
    }

    #[test]
    fn n_times_g_is_infinity() {
        let result = GENERATOR.scalar_mul(&N).unwrap();
        assert_eq!(result, Point::Infinity);
    }

    #[test]
    fn order_plus_k_times_g_equals_k_times_g() {
        let k = BigUint::from(12345u32);
        let lhs = GENERATOR.scalar_mul(&(&*N + &k)).unwrap();
        let rhs = GENERATOR.scalar_mul(&k).unwrap();
        assert_eq!(lhs, rhs);
    }
}
