//! btc-wallet: a thin convenience layer over [`btc_core::keys`] for callers
//! that want "a private key plus the network/compression preference it was
//! created with" as a single value, rather than threading those through
//! separately.
//!
//! This crate does not add any cryptography of its own — it is a
//! collaborator over `btc-core`, keeping wallet-level convenience out of
//! the core crate.

use btc_core::config::Network;
use btc_core::error::Result;
use btc_core::keys::{PrivateKey, PublicKey};

/// A private key paired with the network and compression preference that
/// govern how it is exported/addressed.
pub struct Wallet {
    private_key: PrivateKey,
    public_key: PublicKey,
    network: Network,
    compressed: bool,
}

impl Wallet {
    /// Generates a fresh wallet from a cryptographically random private key.
    pub fn generate(network: Network, compressed: bool) -> Result<Self> {
        let private_key = PrivateKey::random();
        let public_key = private_key.public_key()?;
        log::info!("generated a new wallet key for {network:?}");
        Ok(Self { private_key, public_key, network, compressed })
    }

    /// Restores a wallet from a WIF string, taking the network and
    /// compression preference from the WIF payload itself.
    pub fn from_wif(wif: &str) -> Result<Self> {
        let (private_key, compressed, network) = PrivateKey::from_wif(wif)?;
        let public_key = private_key.public_key()?;
        Ok(Self { private_key, public_key, network, compressed })
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn address(&self) -> String {
        self.public_key.address(self.network, self.compressed)
    }

    pub fn to_wif(&self) -> String {
        self.private_key.to_wif(self.network, self.compressed)
    }
}
