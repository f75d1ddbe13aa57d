//! Block header decoding, proof-of-work target/difficulty computation.
//!
//! No block validation beyond header decoding and difficulty derivation is
//! in scope — there is no transaction/Merkle cross-check here, only the
//! 80-byte header and its PoW arithmetic.

use num_bigint::BigUint;

use crate::encoding::{encode_int, Cursor, Endian};
use crate::error::Result;
use crate::hash::hash256;

/// An 80-byte Bitcoin block header.
///
/// `prev_block` and `merkle_root` are stored in natural (display) byte
/// order; the wire form reverses both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub prev_block: [u8; 32],
    pub merkle_root: [u8; 32],
    pub timestamp: u32,
    pub bits: [u8; 4],
    pub nonce: [u8; 4],
}

impl BlockHeader {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = encode_int(self.version as u64, 4, Endian::Little)?;
        let mut prev = self.prev_block;
        prev.reverse();
        out.extend(prev);
        let mut merkle = self.merkle_root;
        merkle.reverse();
        out.extend(merkle);
        out.extend(encode_int(self.timestamp as u64, 4, Endian::Little)?);
        out.extend(self.bits);
        out.extend(self.nonce);
        Ok(out)
    }

    pub fn decode(cur: &mut Cursor) -> Result<Self> {
        let version = cur.read_int(4, Endian::Little)? as u32;
        let mut prev_block = [0u8; 32];
        prev_block.copy_from_slice(cur.read(32)?);
        prev_block.reverse();
        let mut merkle_root = [0u8; 32];
        merkle_root.copy_from_slice(cur.read(32)?);
        merkle_root.reverse();
        let timestamp = cur.read_int(4, Endian::Little)? as u32;
        let mut bits = [0u8; 4];
        bits.copy_from_slice(cur.read(4)?);
        let mut nonce = [0u8; 4];
        nonce.copy_from_slice(cur.read(4)?);
        Ok(Self { version, prev_block, merkle_root, timestamp, bits, nonce })
    }

    /// `bits = coef(3 LE) || exp(1)`; `target = coef * 256^(exp - 3)`.
    pub fn target(&self) -> BigUint {
        let coef = BigUint::from(self.bits[0])
            + (BigUint::from(self.bits[1]) << 8usize)
            + (BigUint::from(self.bits[2]) << 16usize);
        let exp = self.bits[3] as i64;
        if exp >= 3 {
            coef << (8 * (exp - 3)) as usize
        } else {
            coef >> (8 * (3 - exp)) as usize
        }
    }

    /// `difficulty = (0xFFFF * 256^(0x1D - 3)) / target` (integer floor).
    pub fn difficulty(&self) -> BigUint {
        let genesis_numerator = BigUint::from(0xFFFFu32) << (8 * (0x1Du32 as usize - 3));
        genesis_numerator / self.target()
    }

    /// `hash256(header) reversed` interpreted as a little-endian integer,
    /// which must be below `target()` for the header to satisfy PoW.
    pub fn pow_valid(&self) -> Result<bool> {
        let mut digest = hash256(&self.encode()?);
        digest.reverse();
        Ok(BigUint::from_bytes_be(&digest) < self.target())
    }

    /// The header hash in reversed (display) hex, as used for block IDs.
    pub fn id(&self) -> Result<String> {
        let mut digest = hash256(&self.encode()?);
        digest.reverse();
        Ok(hex::encode(digest))
    }
}
