//! ECDSA over secp256k1: RFC-6979 deterministic nonce derivation, signing,
//! verification, and DER encoding.

use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::Sha256;

use crate::config::Config;
use crate::curve::Point;
use crate::encoding::Cursor;
use crate::error::{CoreError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::secp256k1;

type HmacSha256 = Hmac<Sha256>;

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts a key of any length");
    for part in parts {
        mac.update(part);
    }
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn to_32_bytes(n: &BigUint) -> Vec<u8> {
    let raw = n.to_bytes_be();
    let mut out = vec![0u8; 32usize.saturating_sub(raw.len())];
    out.extend(raw);
    out
}

/// An ECDSA signature `(r, s)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

/// Stateful RFC-6979 deterministic-k generator (setup plus the retry loop).
struct Rfc6979 {
    k: [u8; 32],
    v: [u8; 32],
}

impl Rfc6979 {
    fn new(private_key: &BigUint, z: &BigUint) -> Self {
        let n = secp256k1::order();
        let mut z = z.clone();
        if z >= n {
            z -= &n;
        }
        let e_bytes = to_32_bytes(private_key);
        let z_bytes = to_32_bytes(&z);

        let v = [0x01u8; 32];
        let k = [0x00u8; 32];
        let k = hmac_sha256(&k, &[&v, &[0x00], &e_bytes, &z_bytes]);
        let v = hmac_sha256(&k, &[&v]);
        let k = hmac_sha256(&k, &[&v, &[0x01], &e_bytes, &z_bytes]);
        let v = hmac_sha256(&k, &[&v]);
        Self { k, v }
    }

    /// Produces the next deterministic candidate in `[1, n)`.
    fn next(&mut self) -> BigUint {
        let n = secp256k1::order();
        loop {
            self.v = hmac_sha256(&self.k, &[&self.v]);
            let candidate = BigUint::from_bytes_be(&self.v);
            if !candidate.is_zero() && candidate < n {
                return candidate;
            }
            self.k = hmac_sha256(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac_sha256(&self.k, &[&self.v]);
        }
    }
}

/// Derives the RFC-6979 nonce `k` for `(private_key, z)`. Exposed for
/// testing determinism independent of the sign path.
pub fn rfc6979_k(private_key: &BigUint, z: &BigUint) -> BigUint {
    Rfc6979::new(private_key, z).next()
}

/// Produces a deterministic, low-s signature over message hash `z`.
///
/// This is the only production signing entry point; it always derives `k`
/// via RFC-6979, never from randomness.
pub fn sign(private_key: &PrivateKey, z: &BigUint) -> Result<Signature> {
    let n = secp256k1::order();
    let mut gen = Rfc6979::new(private_key.scalar(), z);

    loop {
        let k = gen.next();
        let r_point = secp256k1::generator().scalar_mul(&k)?;
        let r = match r_point {
            Point::Infinity => continue,
            Point::Affine { x, .. } => x.num() % &n,
        };
        if r.is_zero() {
            continue;
        }

        let k_inv = k.modpow(&(&n - BigUint::from(2u32)), &n);
        let mut s = ((z + &r * private_key.scalar()) * &k_inv) % &n;
        let half = &n / BigUint::from(2u32);
        if s > half {
            s = &n - &s;
        }
        if s.is_zero() {
            return Err(CoreError::InvalidSig("signing produced s = 0".into()));
        }
        return Ok(Signature { r, s });
    }
}

/// A non-deterministic signing entry point, gated behind its own name so it
/// is never reachable from [`sign`]. Reusing `k` across two signatures
/// under the same private key leaks the key via `e = (s1*z2 - s2*z1) /
/// (r*(s2 - s1))`; this exists only to generate ad hoc test vectors.
#[doc(hidden)]
pub fn sign_with_random_k(private_key: &PrivateKey, z: &BigUint, k: &BigUint) -> Result<Signature> {
    let n = secp256k1::order();
    let r_point = secp256k1::generator().scalar_mul(k)?;
    let r = match r_point {
        Point::Infinity => return Err(CoreError::InvalidSig("k produced point at infinity".into())),
        Point::Affine { x, .. } => x.num() % &n,
    };
    if r.is_zero() {
        return Err(CoreError::InvalidSig("r = 0".into()));
    }
    let k_inv = k.modpow(&(&n - BigUint::from(2u32)), &n);
    let mut s = ((z + &r * private_key.scalar()) * &k_inv) % &n;
    let half = &n / BigUint::from(2u32);
    if s > half {
        s = &n - &s;
    }
    if s.is_zero() {
        return Err(CoreError::InvalidSig("s = 0".into()));
    }
    Ok(Signature { r, s })
}

/// Verifies `sig` over message hash `z` against `public_key` under `config`'s
/// policy: a high-s signature (`s > n/2`) is rejected unless
/// `config.accept_high_s` is set. Production signing always produces low-s,
/// so this only matters for signatures this crate did not itself produce.
pub fn verify_with_config(
    public_key: &PublicKey,
    z: &BigUint,
    sig: &Signature,
    config: &Config,
) -> Result<bool> {
    let n = secp256k1::order();
    if !config.accept_high_s && sig.s > &n / BigUint::from(2u32) {
        log::debug!("signature verification failed: high-s rejected by config");
        return Ok(false);
    }
    verify(public_key, z, sig)
}

/// Verifies `sig` over message hash `z` against `public_key`, accepting any
/// canonical-range `s` regardless of the low-s/high-s convention. Most
/// callers want [`verify_with_config`] instead.
pub fn verify(public_key: &PublicKey, z: &BigUint, sig: &Signature) -> Result<bool> {
    let n = secp256k1::order();
    if sig.r.is_zero() || sig.r >= n {
        return Err(CoreError::Range("signature r not in [1, n)".into()));
    }
    if sig.s.is_zero() || sig.s >= n {
        return Err(CoreError::Range("signature s not in [1, n)".into()));
    }

    let w = sig.s.modpow(&(&n - BigUint::from(2u32)), &n);
    let u = (z * &w) % &n;
    let v = (&sig.r * &w) % &n;

    let total = secp256k1::generator()
        .scalar_mul(&u)?
        .add(&public_key.point().scalar_mul(&v)?)?;

    let accepted = match total {
        Point::Infinity => {
            log::debug!("signature verification failed: R is point at infinity");
            false
        }
        Point::Affine { x, .. } => {
            let matches = (x.num() % &n) == sig.r;
            if !matches {
                log::debug!("signature verification failed: r mismatch");
            }
            matches
        }
    };
    Ok(accepted)
}

/// DER-encodes `(r, s)`: `0x30 len(body) 0x02 len(r) r 0x02 len(s) s`.
pub fn der_encode(sig: &Signature) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(der_encode_integer(&sig.r));
    body.extend(der_encode_integer(&sig.s));

    let mut out = vec![0x30, body.len() as u8];
    out.extend(body);
    out
}

fn der_encode_integer(n: &BigUint) -> Vec<u8> {
    let mut bytes = to_32_bytes(n);
    while bytes.len() > 1 && bytes[0] == 0x00 && bytes[1] < 0x80 {
        bytes.remove(0);
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    let mut out = vec![0x02, bytes.len() as u8];
    out.extend(bytes);
    out
}

/// Strict DER decoding: rejects mismatched lengths, wrong marker bytes and
/// trailing bytes.
pub fn der_decode(bytes: &[u8]) -> Result<Signature> {
    let mut cur = Cursor::new(bytes);
    if cur.read_u8()? != 0x30 {
        return Err(CoreError::BadEncoding("DER signature missing 0x30 marker".into()));
    }
    let total_len = cur.read_u8()? as usize;
    if cur.remaining() != total_len {
        return Err(CoreError::BadEncoding("DER signature length mismatch".into()));
    }

    let r = der_decode_integer(&mut cur)?;
    let s = der_decode_integer(&mut cur)?;

    if !cur.is_empty() {
        return Err(CoreError::BadEncoding("trailing bytes after DER signature".into()));
    }
    Ok(Signature { r, s })
}

fn der_decode_integer(cur: &mut Cursor) -> Result<BigUint> {
    if cur.read_u8()? != 0x02 {
        return Err(CoreError::BadEncoding("DER integer missing 0x02 marker".into()));
    }
    let len = cur.read_u8()? as usize;
    let bytes = cur.read(len)?;
    Ok(BigUint::from_bytes_be(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash256;
    use num_traits::One;

    fn z_of(msg: &[u8]) -> BigUint {
        BigUint::from_bytes_be(&hash256(msg))
    }

    #[test]
    fn rfc6979_is_deterministic() {
        let e = BigUint::one();
        let z = z_of(b"abc");
        assert_eq!(rfc6979_k(&e, &z), rfc6979_k(&e, &z));
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let key = PrivateKey::from_scalar(BigUint::one()).unwrap();
        let pk = key.public_key().unwrap();
        let z = z_of(b"abc");
        let sig = sign(&key, &z).unwrap();
        assert!(verify(&pk, &z, &sig).unwrap());
    }

    #[test]
    fn tampering_with_message_flips_verification() {
        let key = PrivateKey::from_scalar(BigUint::from(12345u32)).unwrap();
        let pk = key.public_key().unwrap();
        let z = z_of(b"abc");
        let sig = sign(&key, &z).unwrap();
        let mut tampered = hash256(b"abc");
        tampered[0] ^= 0x01;
        let bad_z = BigUint::from_bytes_be(&tampered);
        assert!(!verify(&pk, &bad_z, &sig).unwrap());
    }

    #[test]
    fn signatures_are_low_s() {
        let key = PrivateKey::from_scalar(BigUint::from(999u32)).unwrap();
        let z = z_of(b"low-s check");
        let sig = sign(&key, &z).unwrap();
        assert!(sig.s <= &secp256k1::order() / BigUint::from(2u32));
    }

    #[test]
    fn high_s_signature_rejected_unless_config_allows_it() {
        let key = PrivateKey::from_scalar(BigUint::from(2024u32)).unwrap();
        let pk = key.public_key().unwrap();
        let z = z_of(b"high-s check");
        let mut sig = sign(&key, &z).unwrap();
        let n = secp256k1::order();
        sig.s = &n - &sig.s; // flip to the high-s counterpart, still a valid (r, s)

        assert!(verify(&pk, &z, &sig).unwrap());
        assert!(!verify_with_config(&pk, &z, &sig, &Config::default()).unwrap());
        let permissive = Config { accept_high_s: true, ..Config::default() };
        assert!(verify_with_config(&pk, &z, &sig, &permissive).unwrap());
    }

    #[test]
    fn der_round_trip() {
        let key = PrivateKey::from_scalar(BigUint::from(7u32)).unwrap();
        let z = z_of(b"der round trip");
        let sig = sign(&key, &z).unwrap();
        let encoded = der_encode(&sig);
        let decoded = der_decode(&encoded).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn der_decode_rejects_trailing_bytes() {
        let key = PrivateKey::from_scalar(BigUint::from(7u32)).unwrap();
        let z = z_of(b"trailing bytes");
        let sig = sign(&key, &z).unwrap();
        let mut encoded = der_encode(&sig);
        encoded.push(0xFF);
        assert!(der_decode(&encoded).is_err());
    }
}
