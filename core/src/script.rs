//! Bitcoin Script: an opcode-tagged command list. Only encoding, decoding
//! and P2PKH template recognition are implemented — there is no script
//! interpreter.

use crate::encoding::{encode_varint, Cursor, Endian};
use crate::error::{CoreError, Result};

pub const OP_DUP: u8 = 118;
pub const OP_HASH160: u8 = 169;
pub const OP_EQUALVERIFY: u8 = 136;
pub const OP_CHECKSIG: u8 = 172;

const OP_PUSHDATA1: u8 = 0x4C;
const OP_PUSHDATA2: u8 = 0x4D;
const MAX_PUSH_LEN: usize = 520;

/// A single Script command: either an opcode or a data push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Opcode(u8),
    Push(Vec<u8>),
}

/// An ordered, non-nested sequence of [`Command`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub commands: Vec<Command>,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// The P2PKH locking script: `OP_DUP OP_HASH160 <h20> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn p2pkh(h160: &[u8; 20]) -> Self {
        Self::new(vec![
            Command::Opcode(OP_DUP),
            Command::Opcode(OP_HASH160),
            Command::Push(h160.to_vec()),
            Command::Opcode(OP_EQUALVERIFY),
            Command::Opcode(OP_CHECKSIG),
        ])
    }

    /// True if this script matches the P2PKH template exactly.
    pub fn is_p2pkh(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [
                Command::Opcode(d),
                Command::Opcode(h),
                Command::Push(hash),
                Command::Opcode(ev),
                Command::Opcode(cs),
            ] if *d == OP_DUP && *h == OP_HASH160 && hash.len() == 20
                && *ev == OP_EQUALVERIFY && *cs == OP_CHECKSIG
        )
    }

    /// Returns the 20-byte pubkey hash of a P2PKH script, if it matches.
    pub fn p2pkh_hash(&self) -> Option<&[u8]> {
        if !self.is_p2pkh() {
            return None;
        }
        match &self.commands[2] {
            Command::Push(hash) => Some(hash.as_slice()),
            _ => None,
        }
    }

    /// Encodes the command stream, prefixed with a varint of its byte length.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        for cmd in &self.commands {
            match cmd {
                Command::Push(data) => {
                    let n = data.len();
                    if n > MAX_PUSH_LEN {
                        return Err(CoreError::ScriptTooLarge);
                    }
                    if n <= 75 {
                        body.push(n as u8);
                    } else if n <= 255 {
                        body.push(OP_PUSHDATA1);
                        body.push(n as u8);
                    } else {
                        body.push(OP_PUSHDATA2);
                        body.extend((n as u16).to_le_bytes());
                    }
                    body.extend(data);
                }
                Command::Opcode(op) => body.push(*op),
            }
        }
        let mut out = encode_varint(body.len() as u64);
        out.extend(body);
        Ok(out)
    }

    /// Decodes a varint-length-prefixed command stream.
    pub fn decode(cur: &mut Cursor) -> Result<Self> {
        let len = cur.read_varint()? as usize;
        let body = cur.read(len)?;
        let mut inner = Cursor::new(body);
        let mut commands = Vec::new();

        while !inner.is_empty() {
            let tag = inner.read_u8()?;
            match tag {
                1..=75 => {
                    let data = inner.read(tag as usize)?;
                    commands.push(Command::Push(data.to_vec()));
                }
                OP_PUSHDATA1 => {
                    let n = inner.read_u8()? as usize;
                    let data = inner.read(n)?;
                    commands.push(Command::Push(data.to_vec()));
                }
                OP_PUSHDATA2 => {
                    let n = inner.read_int(2, Endian::Little)? as usize;
                    let data = inner.read(n)?;
                    commands.push(Command::Push(data.to_vec()));
                }
                op => commands.push(Command::Opcode(op)),
            }
        }
        Ok(Script::new(commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p2pkh_round_trip() {
        let h160 = [0xABu8; 20];
        let script = Script::p2pkh(&h160);
        let encoded = script.encode().unwrap();
        let mut cur = Cursor::new(&encoded);
        let decoded = Script::decode(&mut cur).unwrap();
        assert_eq!(decoded, script);
        assert!(decoded.is_p2pkh());
        assert_eq!(decoded.p2pkh_hash(), Some(h160.as_slice()));
    }

    #[test]
    fn non_p2pkh_is_not_recognized() {
        let script = Script::new(vec![Command::Opcode(OP_CHECKSIG)]);
        assert!(!script.is_p2pkh());
    }

    #[test]
    fn push_over_520_bytes_rejected() {
        let script = Script::new(vec![Command::Push(vec![0u8; 521])]);
        assert_eq!(script.encode(), Err(CoreError::ScriptTooLarge));
    }

    #[test]
    fn pushdata1_boundary_round_trips() {
        let data = vec![0x42u8; 100];
        let script = Script::new(vec![Command::Push(data.clone())]);
        let encoded = script.encode().unwrap();
        let mut cur = Cursor::new(&encoded);
        let decoded = Script::decode(&mut cur).unwrap();
        assert_eq!(decoded.commands, vec![Command::Push(data)]);
    }
}
