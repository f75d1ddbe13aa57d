//! Bitcoin transaction structure: wire encode/decode (legacy and
//! segwit-marker-aware), txid, sighash pre-image computation, and a P2PKH
//! single-input validation convenience.

use num_bigint::BigUint;

use crate::config::Config;
use crate::encoding::{encode_int, encode_varint, Cursor, Endian};
use crate::error::{CoreError, Result};
use crate::hash::hash256;
use crate::keys::PublicKey;
use crate::script::{Command, Script};
use crate::signature;

/// SIGHASH_ALL: the only sighash type this core produces pre-images for.
pub const SIGHASH_ALL: u32 = 0x01;

/// A reference to a previous output being spent.
///
/// `prev_tx` is stored in natural (big-endian, "display") order; wire
/// encoding reverses it to little-endian, matching how Bitcoin displays
/// txids versus how it serializes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub prev_tx: [u8; 32],
    pub prev_idx: u32,
    pub script_sig: Script,
    pub seq: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub amount_satoshi: u64,
    pub script_pubkey: Script,
}

/// A witness stack: one item per input, each item an arbitrary byte string.
pub type WitnessStack = Vec<Vec<u8>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
    /// Present only if the wire form carried the segwit marker/flag.
    pub witness: Option<Vec<WitnessStack>>,
}

impl Transaction {
    /// Canonical (non-witness) wire encoding used both for broadcast and as
    /// the basis for the sighash pre-image.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = encode_int(self.version as u64, 4, Endian::Little)?;
        out.extend(encode_varint(self.inputs.len() as u64));
        for input in &self.inputs {
            let mut prev_tx_le = input.prev_tx;
            prev_tx_le.reverse();
            out.extend(prev_tx_le);
            out.extend(encode_int(input.prev_idx as u64, 4, Endian::Little)?);
            out.extend(input.script_sig.encode()?);
            out.extend(encode_int(input.seq as u64, 4, Endian::Little)?);
        }
        out.extend(encode_varint(self.outputs.len() as u64));
        for output in &self.outputs {
            out.extend(encode_int(output.amount_satoshi, 8, Endian::Little)?);
            out.extend(output.script_pubkey.encode()?);
        }
        out.extend(encode_int(self.locktime as u64, 4, Endian::Little)?);
        Ok(out)
    }

    /// Decodes a transaction, recognizing the segwit marker/flag if present.
    /// Witness data is preserved but not consumed for signing.
    pub fn decode(cur: &mut Cursor) -> Result<Self> {
        let version = cur.read_int(4, Endian::Little)? as u32;

        let mut segwit = false;
        let first = cur.read_u8()?;
        let input_count = if first == 0x00 {
            let flag = cur.read_u8()?;
            if flag != 0x01 {
                return Err(CoreError::BadEncoding("unsupported segwit flag byte".into()));
            }
            segwit = true;
            cur.read_varint()?
        } else {
            decode_varint_from_first_byte(cur, first)?
        };

        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            let mut prev_tx = cur.read(32)?.to_vec();
            prev_tx.reverse();
            let mut prev_tx_arr = [0u8; 32];
            prev_tx_arr.copy_from_slice(&prev_tx);
            let prev_idx = cur.read_int(4, Endian::Little)? as u32;
            let script_sig = Script::decode(cur)?;
            let seq = cur.read_int(4, Endian::Little)? as u32;
            inputs.push(TxInput { prev_tx: prev_tx_arr, prev_idx, script_sig, seq });
        }

        let output_count = cur.read_varint()?;
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            let amount_satoshi = cur.read_int(8, Endian::Little)?;
            let script_pubkey = Script::decode(cur)?;
            outputs.push(TxOutput { amount_satoshi, script_pubkey });
        }

        let witness = if segwit {
            let mut stacks = Vec::with_capacity(inputs.len());
            for _ in 0..inputs.len() {
                let item_count = cur.read_varint()?;
                let mut items = Vec::with_capacity(item_count as usize);
                for _ in 0..item_count {
                    let len = cur.read_varint()? as usize;
                    items.push(cur.read(len)?.to_vec());
                }
                stacks.push(items);
            }
            Some(stacks)
        } else {
            None
        };

        let locktime = cur.read_int(4, Endian::Little)? as u32;

        Ok(Transaction { version, inputs, outputs, locktime, witness })
    }

    /// `hash256(canonical_encode())` reversed to display order.
    pub fn txid(&self) -> Result<[u8; 32]> {
        let mut id = hash256(&self.encode()?);
        id.reverse();
        Ok(id)
    }

    /// Builds the SIGHASH_ALL pre-image for signing input `i`: every other
    /// input's script_sig is blanked, input `i`'s script_sig becomes the
    /// referenced output's script_pubkey, and the sighash type is appended.
    pub fn sighash(&self, i: usize, prev_script_pubkey: &Script) -> Result<BigUint> {
        if i >= self.inputs.len() {
            return Err(CoreError::Range(format!("input index {i} out of range")));
        }
        let mut stripped = self.clone();
        stripped.witness = None;
        for (idx, input) in stripped.inputs.iter_mut().enumerate() {
            input.script_sig = if idx == i {
                prev_script_pubkey.clone()
            } else {
                Script::default()
            };
        }
        let mut bytes = stripped.encode()?;
        bytes.extend(encode_int(SIGHASH_ALL as u64, 4, Endian::Little)?);
        let digest = hash256(&bytes);
        Ok(BigUint::from_bytes_be(&digest))
    }

    /// Validates a single-input P2PKH spend (the core's intended use case,
    /// not a general script evaluator): checks the revealed pubkey hashes
    /// to the referenced script_pubkey, that outputs do not exceed the
    /// referenced input's amount, and that the ECDSA signature verifies
    /// under `config`'s high-s policy.
    pub fn validate_p2pkh(&self, i: usize, prev_output: &TxOutput, config: &Config) -> Result<bool> {
        let input = self
            .inputs
            .get(i)
            .ok_or_else(|| CoreError::Range(format!("input index {i} out of range")))?;

        let (sig_bytes, pubkey_bytes) = match input.script_sig.commands.as_slice() {
            [Command::Push(sig), Command::Push(pk)] => (sig, pk),
            _ => {
                log::debug!("P2PKH validation failed: script_sig is not <sig> <pubkey>");
                return Ok(false);
            }
        };

        let pubkey_hash = match prev_output.script_pubkey.p2pkh_hash() {
            Some(h) => h,
            None => {
                log::debug!("P2PKH validation failed: prev output is not P2PKH");
                return Ok(false);
            }
        };
        if crate::hash::hash160(pubkey_bytes) != pubkey_hash {
            log::debug!("P2PKH validation failed: pubkey hash mismatch");
            return Ok(false);
        }

        let output_total: u64 = self.outputs.iter().map(|o| o.amount_satoshi).sum();
        if output_total > prev_output.amount_satoshi {
            return Err(CoreError::TxInvalid("output sum exceeds input amount".into()));
        }

        // strip the trailing sighash-type byte the signature was appended with
        let sig_der = &sig_bytes[..sig_bytes.len() - 1];
        let sig = signature::der_decode(sig_der)?;
        let pubkey = PublicKey::from_sec(pubkey_bytes)?;
        let z = self.sighash(i, &prev_output.script_pubkey)?;
        signature::verify_with_config(&pubkey, &z, &sig, config)
    }
}

fn decode_varint_from_first_byte(cur: &mut Cursor, first: u8) -> Result<u64> {
    match first {
        0xFD => cur.read_int(2, Endian::Little),
        0xFE => cur.read_int(4, Endian::Little),
        0xFF => cur.read_int(8, Endian::Little),
        n => Ok(n as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PrivateKey;
    use crate::script::Script;

    fn sample_tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxInput {
                prev_tx: [0xAB; 32],
                prev_idx: 0,
                script_sig: Script::default(),
                seq: 0xFFFF_FFFF,
            }],
            outputs: vec![TxOutput {
                amount_satoshi: 50_000,
                script_pubkey: Script::p2pkh(&[0x11; 20]),
            }],
            locktime: 0,
            witness: None,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let tx = sample_tx();
        let encoded = tx.encode().unwrap();
        let mut cur = Cursor::new(&encoded);
        let decoded = Transaction::decode(&mut cur).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn segwit_marker_round_trips_witness() {
        let mut encoded = vec![0x01, 0x00, 0x00, 0x00]; // version
        encoded.push(0x00); // marker
        encoded.push(0x01); // flag
        encoded.extend(encode_varint(1)); // 1 input
        encoded.extend([0xABu8; 32]);
        encoded.extend([0u8; 4]); // prev_idx
        encoded.extend(Script::default().encode().unwrap());
        encoded.extend([0xFF, 0xFF, 0xFF, 0xFF]); // seq
        encoded.extend(encode_varint(1)); // 1 output
        encoded.extend(50_000u64.to_le_bytes());
        encoded.extend(Script::p2pkh(&[0x11; 20]).encode().unwrap());
        encoded.extend(encode_varint(1)); // 1 witness item
        encoded.extend(encode_varint(3));
        encoded.extend([1, 2, 3]);
        encoded.extend([0u8; 4]); // locktime

        let mut cur = Cursor::new(&encoded);
        let tx = Transaction::decode(&mut cur).unwrap();
        assert_eq!(tx.witness, Some(vec![vec![vec![1, 2, 3]]]));
    }

    #[test]
    fn sign_and_validate_p2pkh_spend() {
        let key = PrivateKey::from_scalar(BigUint::from(12345u32)).unwrap();
        let pubkey = key.public_key().unwrap();
        let sec = pubkey.sec(true);
        let h160 = crate::hash::hash160(&sec);

        let prev_output = TxOutput {
            amount_satoshi: 70_000,
            script_pubkey: Script::p2pkh(&h160),
        };

        let mut tx = sample_tx();
        tx.outputs = vec![
            TxOutput { amount_satoshi: 20_000, script_pubkey: Script::p2pkh(&[0x22; 20]) },
            TxOutput { amount_satoshi: 48_000, script_pubkey: Script::p2pkh(&[0x33; 20]) },
        ];

        let z = tx.sighash(0, &prev_output.script_pubkey).unwrap();
        let sig = signature::sign(&key, &z).unwrap();
        let mut sig_bytes = signature::der_encode(&sig);
        sig_bytes.push(SIGHASH_ALL as u8);

        tx.inputs[0].script_sig = Script::new(vec![
            Command::Push(sig_bytes),
            Command::Push(sec),
        ]);

        assert!(tx.validate_p2pkh(0, &prev_output, &Config::default()).unwrap());
    }

    #[test]
    fn tampered_signature_fails_validation() {
        let key = PrivateKey::from_scalar(BigUint::from(7u32)).unwrap();
        let pubkey = key.public_key().unwrap();
        let sec = pubkey.sec(true);
        let h160 = crate::hash::hash160(&sec);
        let prev_output = TxOutput { amount_satoshi: 1000, script_pubkey: Script::p2pkh(&h160) };

        let mut tx = sample_tx();
        tx.outputs = vec![TxOutput { amount_satoshi: 500, script_pubkey: Script::p2pkh(&[0x99; 20]) }];

        let z = tx.sighash(0, &prev_output.script_pubkey).unwrap();
        let mut sig = signature::sign(&key, &z).unwrap();
        sig.r += BigUint::from(1u32);
        let mut sig_bytes = signature::der_encode(&sig);
        sig_bytes.push(SIGHASH_ALL as u8);

        tx.inputs[0].script_sig = Script::new(vec![
            Command::Push(sig_bytes),
            Command::Push(sec),
        ]);

        assert!(!tx.validate_p2pkh(0, &prev_output, &Config::default()).unwrap());
    }
}
