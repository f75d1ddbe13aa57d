//! Base58Check: Bitcoin's checksum-guarded variant of Base58, plus WIF
//! (Wallet Import Format) encoding for private keys.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::error::{CoreError, Result};
use crate::hash::hash256;

const ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encodes `bytes` as Base58 (no checksum).
pub fn encode(bytes: &[u8]) -> String {
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    let mut n = BigUint::from_bytes_be(bytes);

    let mut digits = Vec::new();
    while !n.is_zero() {
        let rem = (&n % 58u32).to_u32().expect("remainder mod 58 fits in u32");
        digits.push(ALPHABET[rem as usize]);
        n /= 58u32;
    }
    digits.extend(std::iter::repeat(ALPHABET[0]).take(leading_zeros));
    digits.reverse();
    String::from_utf8(digits).expect("alphabet is ASCII")
}

/// `hash256(bytes)[:4]`.
pub fn checksum(bytes: &[u8]) -> [u8; 4] {
    let digest = hash256(bytes);
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Decodes a Base58 string back into raw bytes, without checksum
/// verification. Leading `'1'` characters are reconstructed as leading
/// `0x00` bytes, symmetric with [`encode`].
fn decode_raw(s: &str) -> Result<Vec<u8>> {
    let leading_ones = s.chars().take_while(|&c| c == '1').count();

    let mut n = BigUint::zero();
    for c in s.chars() {
        let idx = ALPHABET
            .iter()
            .position(|&a| a == c as u8)
            .ok_or_else(|| CoreError::BadEncoding(format!("invalid base58 character: {c}")))?;
        n = n * 58u32 + idx as u32;
    }

    let body = if n.is_zero() { Vec::new() } else { n.to_bytes_be() };
    let mut raw = vec![0u8; leading_ones];
    raw.extend(body);
    Ok(raw)
}

/// Base58Check-decodes `s`, verifying the trailing 4-byte checksum and the
/// total decoded length against `expected_len`.
pub fn decode(s: &str, expected_len: usize) -> Result<Vec<u8>> {
    let raw = decode_raw(s)?;
    if raw.len() != expected_len {
        return Err(CoreError::BadEncoding(format!(
            "base58check payload length {} != expected {}",
            raw.len(),
            expected_len
        )));
    }
    verify_checksum(&raw)?;
    Ok(raw)
}

/// Base58Check-decodes `s` without a fixed expected length, used by WIF
/// import where the payload's own length (33 vs 34 bytes, after the
/// checksum is stripped) disambiguates the compression flag rather than a
/// length supplied by the caller.
pub fn decode_any_length(s: &str) -> Result<Vec<u8>> {
    let raw = decode_raw(s)?;
    if raw.len() < 4 {
        return Err(CoreError::BadEncoding("base58check payload too short".into()));
    }
    verify_checksum(&raw)?;
    Ok(raw)
}

fn verify_checksum(raw: &[u8]) -> Result<()> {
    let (payload, check) = raw.split_at(raw.len() - 4);
    if checksum(payload) != check {
        log::debug!("base58check checksum mismatch");
        return Err(CoreError::ChecksumBad);
    }
    Ok(())
}

/// Base58Check-encodes `payload` (without its checksum).
pub fn encode_check(payload: &[u8]) -> String {
    let mut full = payload.to_vec();
    full.extend(checksum(payload));
    encode(&full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_arbitrary_bytes() {
        let payload = b"hello base58check";
        let encoded = encode_check(payload);
        let decoded = decode(&encoded, payload.len() + 4).unwrap();
        assert_eq!(&decoded[..payload.len()], payload);
    }

    #[test]
    fn leading_zero_bytes_become_leading_ones() {
        let payload = [0u8, 0u8, 1, 2, 3];
        let encoded = encode(&payload);
        assert!(encoded.starts_with("11"));
        let decoded = decode_raw(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn single_bit_flip_triggers_checksum_bad() {
        let payload = vec![0x80u8; 32];
        let mut encoded_bytes = payload.clone();
        encoded_bytes.extend(checksum(&payload));
        let s = encode(&encoded_bytes);
        let decoded = decode(&s, encoded_bytes.len()).unwrap();
        assert_eq!(decoded, encoded_bytes);

        let mut tampered = encoded_bytes.clone();
        tampered[0] ^= 0x01;
        let s2 = encode(&tampered);
        assert_eq!(decode(&s2, tampered.len()), Err(CoreError::ChecksumBad));
    }

    #[test]
    fn rejects_invalid_character() {
        assert!(decode_raw("0OIl").is_err());
    }
}
