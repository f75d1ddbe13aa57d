//! Merkle tree construction over transaction identifiers.

use crate::error::{CoreError, Result};
use crate::hash::hash256;

/// Computes one level of parent hashes from `hashes`, duplicating the last
/// element first if the input has odd length.
pub fn merkle_parent_level(hashes: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let mut level = hashes.to_vec();
    if level.len() % 2 == 1 {
        level.push(*level.last().expect("odd nonempty input has a last element"));
    }
    level
        .chunks_exact(2)
        .map(|pair| {
            let mut combined = Vec::with_capacity(64);
            combined.extend(pair[0]);
            combined.extend(pair[1]);
            hash256(&combined)
        })
        .collect()
}

/// A binary Merkle tree built bottom-up from leaf hashes.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Builds a tree from raw (already-reversed-to-bytes) leaf hashes.
    pub fn from_leaves(leaves: Vec<[u8; 32]>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(CoreError::Range("merkle tree requires at least one leaf".into()));
        }
        let mut levels = vec![leaves];
        while levels.last().unwrap().len() > 1 {
            let parent = merkle_parent_level(levels.last().unwrap());
            levels.push(parent);
        }
        Ok(Self { levels })
    }

    /// Builds a tree from txid hex strings in network (reversed-display)
    /// order, reversing each to raw bytes before hashing.
    pub fn from_txid_hex(txids: &[String]) -> Result<Self> {
        let leaves = txids
            .iter()
            .map(|hex_id| {
                let mut bytes = hex::decode(hex_id)
                    .map_err(|_| CoreError::BadEncoding(format!("invalid txid hex: {hex_id}")))?;
                if bytes.len() != 32 {
                    return Err(CoreError::BadEncoding("txid must be 32 bytes".into()));
                }
                bytes.reverse();
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes);
                Ok(arr)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_leaves(leaves)
    }

    pub fn levels(&self) -> &[Vec<[u8; 32]>] {
        &self.levels
    }

    /// The tree's root, reversed to display order.
    pub fn root(&self) -> [u8; 32] {
        let mut root = self.levels.last().expect("at least one level")[0];
        root.reverse();
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> [u8; 32] {
        [byte; 32]
    }

    #[test]
    fn three_leaf_tree_duplicates_last_leaf() {
        let tree = MerkleTree::from_leaves(vec![leaf(0xAA), leaf(0xBB), leaf(0xCC)]).unwrap();
        let ab = hash256(&[leaf(0xAA), leaf(0xBB)].concat());
        let cc = hash256(&[leaf(0xCC), leaf(0xCC)].concat());
        let mut expected_root = hash256(&[ab, cc].concat());
        expected_root.reverse();
        assert_eq!(tree.root(), expected_root);
    }

    #[test]
    fn swapping_siblings_changes_root() {
        let tree1 = MerkleTree::from_leaves(vec![leaf(0xAA), leaf(0xBB)]).unwrap();
        let tree2 = MerkleTree::from_leaves(vec![leaf(0xBB), leaf(0xAA)]).unwrap();
        assert_ne!(tree1.root(), tree2.root());
    }

    #[test]
    fn two_leaf_root_matches_direct_hash() {
        let tree = MerkleTree::from_leaves(vec![leaf(0xAA), leaf(0xBB)]).unwrap();
        let mut expected = hash256(&[leaf(0xAA), leaf(0xBB)].concat());
        expected.reverse();
        assert_eq!(tree.root(), expected);
    }
}
