//! Error taxonomy for the **btc-core** crate.
//!
//! All fallible operations return [`crate::error::Result`], a convenient
//! alias for `core::result::Result<T, CoreError>`. Each variant corresponds
//! to one failure class: a malformed encoding, an out-of-range scalar, a
//! checksum mismatch, and so on. Nothing in this crate panics on
//! attacker- or network-controlled input.
//!
//! # Examples
//!
//! ```
//! use btc_core::error::{CoreError, Result};
//!
//! fn demo_fn(fail: bool) -> Result<()> {
//!     if fail {
//!         Err(CoreError::ChecksumBad)
//!     } else {
//!         Ok(())
//!     }
//! }
//! ```

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A numeric input fell outside its declared domain (e.g. a field
    /// element >= p, or a signature component not in `[1, n)`).
    #[error("value out of range: {0}")]
    Range(String),

    /// Arithmetic was attempted between field elements of different primes.
    #[error("mismatched field: operands have different moduli")]
    MismatchedField,

    /// A purported point does not satisfy the curve equation.
    #[error("point is not on the curve")]
    BadPoint,

    /// SEC/DER/varint/Base58/Script bytes did not parse canonically.
    #[error("bad encoding: {0}")]
    BadEncoding(String),

    /// Base58Check checksum did not match the payload.
    #[error("base58check checksum mismatch")]
    ChecksumBad,

    /// A stream was exhausted before a decode operation completed.
    #[error("input truncated")]
    Truncated,

    /// A script push exceeded the 520-byte limit.
    #[error("script push too large")]
    ScriptTooLarge,

    /// Signature verification failed, or signing produced r = 0 or s = 0.
    #[error("invalid signature: {0}")]
    InvalidSig(String),

    /// Output value sum exceeded input value sum, or a P2PKH template
    /// mismatch was detected.
    #[error("invalid transaction: {0}")]
    TxInvalid(String),
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CoreError>;
