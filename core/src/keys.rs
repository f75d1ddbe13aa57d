//! Private/public key derivation, SEC point encoding, P2PKH address
//! derivation, and WIF import/export.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

use crate::base58;
use crate::config::Network;
use crate::curve::Point;
use crate::error::{CoreError, Result};
use crate::field::FieldElement;
use crate::hash::hash160;
use crate::secp256k1;

/// A secp256k1 private key, an integer `e` with `1 <= e < n`.
///
/// `PrivateKey` deliberately does not implement `Debug`/`Display` so that
/// logging a value that happens to hold a private key can never print its
/// digits by accident (see the crate-level logging policy).
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(BigUint);

impl PrivateKey {
    /// Imports a raw scalar, failing with [`CoreError::Range`] if it is not
    /// in `[1, n)`.
    pub fn from_scalar(e: BigUint) -> Result<Self> {
        let n = secp256k1::order();
        if e.is_zero() || e >= n {
            return Err(CoreError::Range("private key scalar out of [1, n)".into()));
        }
        Ok(Self(e))
    }

    /// Draws a uniform scalar in `[1, n)` from the operating system's
    /// cryptographic RNG, rejecting and retrying draws outside range.
    pub fn random() -> Self {
        let n = secp256k1::order();
        let mut rng = rand::rngs::OsRng;
        loop {
            let mut buf = [0u8; 32];
            rng.fill_bytes(&mut buf);
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate >= BigUint::one() && candidate < n {
                return Self(candidate);
            }
        }
    }

    pub fn scalar(&self) -> &BigUint {
        &self.0
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        let point = secp256k1::generator().scalar_mul(&self.0)?;
        PublicKey::from_point(point)
    }

    /// Exports this key as Wallet Import Format.
    pub fn to_wif(&self, network: Network, compressed: bool) -> String {
        let mut payload = vec![network.wif_version()];
        payload.extend(scalar_to_32_bytes(&self.0));
        if compressed {
            payload.push(0x01);
        }
        base58::encode_check(&payload)
    }

    /// Imports a WIF string, returning the key, whether it requested a
    /// compressed public key, and which network it was minted for.
    ///
    /// The checksum-stripped payload length alone (33 vs 34 bytes)
    /// disambiguates whether the trailing compression-flag byte is present;
    /// there is no separate length parameter at this call site.
    pub fn from_wif(s: &str) -> Result<(Self, bool, Network)> {
        let raw = base58::decode_any_length(s)?;
        let payload_len = raw.len() - 4; // checksum already verified by decode_any_length
        let payload = &raw[..payload_len];

        let (compressed, version, scalar_bytes) = match payload.len() {
            34 if payload[33] == 0x01 => (true, payload[0], &payload[1..33]),
            33 => (false, payload[0], &payload[1..33]),
            _ => {
                return Err(CoreError::BadEncoding(
                    "WIF payload must be 1 + 32 bytes, or 1 + 32 + 1 with a trailing 0x01".into(),
                ))
            }
        };

        let network = Network::from_wif_version(version)?;
        let scalar = BigUint::from_bytes_be(scalar_bytes);
        let key = Self::from_scalar(scalar)?;
        Ok((key, compressed, network))
    }
}

fn scalar_to_32_bytes(n: &BigUint) -> Vec<u8> {
    let raw = n.to_bytes_be();
    let mut out = vec![0u8; 32 - raw.len()];
    out.extend(raw);
    out
}

/// A secp256k1 public key: a point `e * G`, derived once and thereafter
/// immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(Point);

impl PublicKey {
    pub fn from_point(point: Point) -> Result<Self> {
        if point.is_infinity() {
            return Err(CoreError::BadPoint);
        }
        Ok(Self(point))
    }

    pub fn point(&self) -> &Point {
        &self.0
    }

    /// SEC encoding: uncompressed (`0x04 || x || y`) or compressed
    /// (`0x02`/`0x03 || x`, tagged by y's parity).
    pub fn sec(&self, compressed: bool) -> Vec<u8> {
        let x = self.0.x().expect("non-infinity point has coordinates");
        let y = self.0.y().expect("non-infinity point has coordinates");
        let x_bytes = scalar_to_32_bytes(x.num());
        if compressed {
            let mut out = Vec::with_capacity(33);
            out.push(if y.is_even() { 0x02 } else { 0x03 });
            out.extend(x_bytes);
            out
        } else {
            let mut out = Vec::with_capacity(65);
            out.push(0x04);
            out.extend(x_bytes);
            out.extend(scalar_to_32_bytes(y.num()));
            out
        }
    }

    /// Decodes a SEC-encoded point, recomputing `y` from `x` for the
    /// compressed form.
    pub fn from_sec(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(CoreError::BadEncoding("empty SEC point".into()));
        }
        let prime = secp256k1::prime();
        match bytes[0] {
            0x04 => {
                if bytes.len() != 65 {
                    return Err(CoreError::BadEncoding("uncompressed SEC point must be 65 bytes".into()));
                }
                let x = FieldElement::new(decode_biguint(&bytes[1..33]), prime.clone())?;
                let y = FieldElement::new(decode_biguint(&bytes[33..65]), prime)?;
                let point = Point::new(x, y, secp256k1::curve())?;
                Self::from_point(point)
            }
            prefix @ (0x02 | 0x03) => {
                if bytes.len() != 33 {
                    return Err(CoreError::BadEncoding("compressed SEC point must be 33 bytes".into()));
                }
                let x = FieldElement::new(decode_biguint(&bytes[1..33]), prime.clone())?;
                let alpha = x.mul(&x)?.mul(&x)?.add(&secp256k1::curve().b)?;
                let beta = alpha.sqrt();
                let want_odd = prefix == 0x03;
                let y = if beta.is_even() == want_odd {
                    FieldElement::new(&prime - beta.num(), prime)?
                } else {
                    beta
                };
                let point = Point::new(x, y, secp256k1::curve())?;
                Self::from_point(point)
            }
            other => Err(CoreError::BadEncoding(format!("unknown SEC prefix byte 0x{other:02x}"))),
        }
    }

    /// Derives the P2PKH address for this key: `hash160(sec)`, prefixed
    /// with the network's version byte and Base58Check-encoded.
    pub fn address(&self, network: Network, compressed: bool) -> String {
        let h = hash160(&self.sec(compressed));
        let mut payload = vec![network.address_version()];
        payload.extend(h);
        base58::encode_check(&payload)
    }
}

fn decode_biguint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
