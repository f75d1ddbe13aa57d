//! The external block/transaction explorer contract.
//!
//! Fetching transactions and blocks from a testnet explorer over HTTP is
//! out of scope for this crate: only the contract is modeled here, as
//! a trait with one method per operation. A caller supplies their own
//! implementation — typically backed by a blocking HTTP client — to bridge
//! this core to a live explorer. No implementation ships in this crate.

use crate::error::Result;

/// One method per operation an explorer must support. Every method
/// returns a raw string (hex or JSON) so that this crate never takes on a
/// JSON parsing dependency it does not otherwise need; callers parse the
/// JSON-shaped responses with whatever library they already use.
pub trait BlockExplorer {
    /// `GET {base}/tx/{txid}/hex` → the transaction's raw hex encoding.
    fn get_tx_hex(&self, txid: &str) -> Result<String>;

    /// `GET {base}/address/{addr}/txs` → a JSON array of that address's
    /// transactions.
    fn get_address_txs_json(&self, address: &str) -> Result<String>;

    /// `GET {base}/block/{id}/header` → the block header's raw hex encoding.
    fn get_block_header_hex(&self, block_id: &str) -> Result<String>;

    /// `GET {base}/block/{id}/txids` → a JSON array of the block's txids.
    fn get_block_txids_json(&self, block_id: &str) -> Result<String>;

    /// `POST {base}/tx` with the raw transaction hex as the body → the
    /// broadcast transaction's txid.
    fn broadcast_tx(&self, raw_tx_hex: &str) -> Result<String>;
}
