//! Runtime configuration for **btc-core**.
//!
//! [`Config`] centralises the two things a caller legitimately needs to fix
//! for a session: which network's version bytes addresses/WIF should use,
//! and whether [`crate::signature::verify`] should also accept historical
//! high-s signatures. It is constructed via [`ConfigBuilder`]'s fluent
//! builder, mirroring the shape used elsewhere in this codebase.
//!
//! Curve parameters are never configurable; they are fixed constants in
//! [`crate::secp256k1`].
//!
//! ```
//! use btc_core::config::{Config, Network};
//!
//! let cfg = Config::default();
//! assert_eq!(cfg.network, Network::Mainnet);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Which Bitcoin network's version bytes to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// P2PKH address version byte (0x00 mainnet, 0x6F testnet).
    pub fn address_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6F,
        }
    }

    /// WIF version byte (0x80 mainnet, 0xEF testnet).
    pub fn wif_version(self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet => 0xEF,
        }
    }

    pub fn from_wif_version(byte: u8) -> Result<Self> {
        match byte {
            0x80 => Ok(Network::Mainnet),
            0xEF => Ok(Network::Testnet),
            other => Err(CoreError::BadEncoding(format!("unknown WIF version byte 0x{other:02x}"))),
        }
    }
}

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Which network's address/WIF version bytes to use.
    pub network: Network,

    /// Whether `Signature::verify` also accepts historical high-s
    /// signatures. Production signing always produces low-s; this only
    /// relaxes verification.
    pub accept_high_s: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            accept_high_s: false,
        }
    }
}

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    /// Starts a new builder pre-populated with [`Config::default`].
    pub fn new() -> Self {
        Self { inner: Config::default() }
    }

    pub fn network(mut self, network: Network) -> Self {
        self.inner.network = network;
        self
    }

    pub fn accept_high_s(mut self, accept: bool) -> Self {
        self.inner.accept_high_s = accept;
        self
    }

    /// Consumes the builder returning an immutable configuration value.
    pub fn finish(self) -> Config {
        self.inner
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
