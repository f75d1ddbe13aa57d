//! Hash primitives used throughout the codec and key-derivation layers.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// FIPS 180-4 SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&out);
    result
}

/// Double SHA-256, the hash Bitcoin uses for txids, block hashes and
/// Base58Check checksums.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160(SHA-256(data)), used for pubkey and script hashes.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    let out = hasher.finalize();
    let mut result = [0u8; 20];
    result.copy_from_slice(&out);
    result
}

/// Returns true if `s` looks like a hex string (even length, all hex digits).
///
/// This is only a convenience used to disambiguate string inputs at the
/// edges of the crate; every hashing function above takes raw bytes.
pub fn looks_like_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Coerces a string into bytes: hex-decoded if it looks like hex, otherwise
/// its raw UTF-8 bytes.
pub fn coerce_bytes(s: &str) -> Vec<u8> {
    if looks_like_hex(s) {
        hex::decode(s).unwrap_or_else(|_| s.as_bytes().to_vec())
    } else {
        s.as_bytes().to_vec()
    }
}
