//! Generic short Weierstrass curve (`y^2 = x^3 + ax + b`) over an arbitrary
//! [`FieldElement`] field, with affine point arithmetic.
//!
//! [`Point`] is a sum type with an explicit [`Point::Infinity`] variant
//! rather than a sentinel pair of coordinates — every arithmetic branch
//! below matches on it directly instead of re-deriving "is this the
//! identity?" from guard conditions.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::error::{CoreError, Result};
use crate::field::FieldElement;

/// Curve parameters `a`, `b` shared by every point on the curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Curve {
    pub a: FieldElement,
    pub b: FieldElement,
}

impl Curve {
    pub fn new(a: FieldElement, b: FieldElement) -> Self {
        Self { a, b }
    }
}

/// A point on a [`Curve`], either an affine coordinate pair or the
/// point-at-infinity (group identity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point {
    Infinity,
    Affine {
        x: FieldElement,
        y: FieldElement,
        curve: Curve,
    },
}

impl Point {
    /// Constructs an affine point, failing with [`CoreError::BadPoint`] if
    /// it does not satisfy the curve equation.
    pub fn new(x: FieldElement, y: FieldElement, curve: Curve) -> Result<Self> {
        let lhs = y.mul(&y)?;
        let rhs = x.mul(&x)?.mul(&x)?.add(&curve.a.mul(&x)?)?.add(&curve.b)?;
        if lhs != rhs {
            return Err(CoreError::BadPoint);
        }
        Ok(Point::Affine { x, y, curve })
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    pub fn x(&self) -> Option<&FieldElement> {
        match self {
            Point::Affine { x, .. } => Some(x),
            Point::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&FieldElement> {
        match self {
            Point::Affine { y, .. } => Some(y),
            Point::Infinity => None,
        }
    }

    /// Point addition. Each affine case is a
    /// distinct branch rather than a single formula with conditionals, so
    /// the degenerate cases (equal x, equal point, infinity) are explicit.
    pub fn add(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Point::Infinity, p) | (p, Point::Infinity) => Ok(p.clone()),
            (
                Point::Affine { x: x1, y: y1, curve: c1 },
                Point::Affine { x: x2, y: y2, curve: c2 },
            ) => {
                if c1 != c2 {
                    return Err(CoreError::MismatchedField);
                }
                if x1 == x2 && y1 != y2 {
                    return Ok(Point::Infinity);
                }
                if x1 == x2 && y1.is_zero() {
                    return Ok(Point::Infinity);
                }

                let m = if x1 == x2 {
                    let three = FieldElement::from_u64(3, x1.prime());
                    let two = FieldElement::from_u64(2, x1.prime());
                    let numerator = three.mul(&x1.mul(x1)?)?.add(&c1.a)?;
                    let denominator = two.mul(y1)?;
                    numerator.div(&denominator)?
                } else {
                    let numerator = y2.sub(y1)?;
                    let denominator = x2.sub(x1)?;
                    numerator.div(&denominator)?
                };

                let rx = m.mul(&m)?.sub(x1)?.sub(x2)?;
                let ry = m.mul(&x1.sub(&rx)?)?.sub(y1)?;
                Ok(Point::Affine { x: rx, y: ry, curve: c1.clone() })
            }
        }
    }

    /// Double-and-add scalar multiplication. `k` is consumed bit by bit
    /// from the least-significant end; callers working over secp256k1
    /// should reduce `k` modulo the group order first.
    pub fn scalar_mul(&self, k: &BigUint) -> Result<Self> {
        let mut result = Point::Infinity;
        let mut addend = self.clone();
        let mut k = k.clone();
        while !k.is_zero() {
            if k.is_odd() {
                result = result.add(&addend)?;
            }
            addend = addend.add(&addend)?;
            k >>= 1usize;
        }
        Ok(result)
    }
}
