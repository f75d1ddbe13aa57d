//! btc-core: the cryptographic and serialization core of a minimal Bitcoin
//! client library.
//!
//! This crate is purely computational — finite-field and elliptic-curve
//! arithmetic over secp256k1, key derivation and address encoding, ECDSA
//! signing/verification with RFC-6979 and DER, and the Bitcoin wire codec
//! for transactions, scripts and block headers. It does not open sockets,
//! touch disk, or know how to talk to a node; [`explorer::BlockExplorer`]
//! describes the one external boundary a caller wires in themselves.
//!
//! Modules are layered leaves-first: [`encoding`] and [`hash`] have no
//! crate-internal dependencies; [`field`] and [`curve`] build the generic
//! arithmetic that [`secp256k1`] specializes; [`keys`] and [`signature`]
//! build on that; [`script`], [`transaction`] and [`block`]/[`merkle`]
//! compose the codec layer on top.

pub mod base58;
pub mod block;
pub mod config;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod explorer;
pub mod field;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod script;
pub mod secp256k1;
pub mod signature;
pub mod transaction;

pub use error::{CoreError, Result};
