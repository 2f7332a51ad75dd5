use alloy::primitives::B256;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use super::whitelist::{
    address_leaf,
    WhitelistState,
};
use crate::crypto::poseidon::{
    poseidon2,
    poseidon4,
};

/// Maximum supported tree depth (leaf capacity 2^32).
pub const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("tree depth {depth} out of range (1..={MAX_TREE_DEPTH})")]
    DepthOutOfRange { depth: usize },

    #[error("{leaves} leaves exceed the capacity {capacity} of a depth-{depth} tree")]
    TreeOverflow {
        leaves: usize,
        capacity: usize,
        depth: usize,
    },

    #[error("leaf index {index} out of bounds ({leaves} leaves)")]
    LeafIndexOutOfBounds { index: usize, leaves: usize },
}

/// Merkle membership path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    /// Sibling hashes along the path from leaf to root.
    pub siblings: Vec<B256>,
    /// Direction bits, LSB first: 0 = current node is the left child.
    pub indices: Vec<u8>,
    /// The leaf index in the tree.
    pub leaf_index: u64,
}

impl MerklePath {
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Fold the path back up from `leaf`, returning the root it commits to.
    pub fn compute_root(&self, leaf: B256) -> B256 {
        let mut node = leaf;
        for (sibling, bit) in self.siblings.iter().zip(&self.indices) {
            node = if *bit == 0 {
                poseidon2(node, *sibling)
            } else {
                poseidon2(*sibling, node)
            };
        }
        node
    }

    /// All-zero path used to fill unused transaction slots in the circuit.
    pub fn zero(depth: usize) -> Self {
        Self {
            siblings: vec![B256::ZERO; depth],
            indices: vec![0; depth],
            leaf_index: 0,
        }
    }
}

/// Fixed-depth binary Poseidon Merkle tree over one whitelist set.
///
/// Leaves occupy positions by insertion order; positions beyond the last
/// inserted leaf hold the canonical zero leaf up to 2^depth. Only the
/// occupied prefix of each level is materialized; siblings past the prefix
/// come from the per-level zero-subtree hashes, which yields a root
/// byte-identical to a fully padded build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistTree {
    depth: usize,
    /// levels[0] = leaves, levels[depth] = root level (0 or 1 nodes).
    levels: Vec<Vec<B256>>,
    /// zeros[l] = root of an all-zero subtree of height l.
    zeros: Vec<B256>,
}

impl WhitelistTree {
    /// Build a tree over `leaves`, padded to 2^depth.
    ///
    /// Fails before any hashing when the leaves do not fit: overflow is an
    /// error, never a truncation.
    pub fn build(leaves: &[B256], depth: usize) -> Result<Self, MerkleError> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(MerkleError::DepthOutOfRange { depth });
        }

        let capacity = 1usize << depth;
        if leaves.len() > capacity {
            return Err(MerkleError::TreeOverflow {
                leaves: leaves.len(),
                capacity,
                depth,
            });
        }

        let mut zeros = Vec::with_capacity(depth + 1);
        zeros.push(B256::ZERO);
        for level in 0..depth {
            let z = zeros[level];
            zeros.push(poseidon2(z, z));
        }

        let mut levels = Vec::with_capacity(depth + 1);
        levels.push(leaves.to_vec());
        for level in 0..depth {
            let below = &levels[level];
            let mut above = Vec::with_capacity(below.len().div_ceil(2));
            for pair in below.chunks(2) {
                let left = pair[0];
                let right = if pair.len() == 2 { pair[1] } else { zeros[level] };
                above.push(poseidon2(left, right));
            }
            levels.push(above);
        }

        Ok(Self {
            depth,
            levels,
            zeros,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of occupied leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn leaf(&self, index: usize) -> Option<B256> {
        self.levels[0].get(index).copied()
    }

    /// Root of the padded tree. An empty tree commits to the all-zero tree.
    pub fn root(&self) -> B256 {
        self.levels[self.depth]
            .first()
            .copied()
            .unwrap_or(self.zeros[self.depth])
    }

    /// Membership path for the leaf at `leaf_index`, length = depth.
    pub fn path(&self, leaf_index: usize) -> Result<MerklePath, MerkleError> {
        if leaf_index >= self.leaf_count() {
            return Err(MerkleError::LeafIndexOutOfBounds {
                index: leaf_index,
                leaves: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);
        let mut index = leaf_index;
        for level in 0..self.depth {
            let sibling = self.levels[level]
                .get(index ^ 1)
                .copied()
                .unwrap_or(self.zeros[level]);
            siblings.push(sibling);
            indices.push((index & 1) as u8);
            index >>= 1;
        }

        Ok(MerklePath {
            siblings,
            indices,
            leaf_index: leaf_index as u64,
        })
    }
}

/// The two per-policy whitelist trees, built at the same depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistTrees {
    pub contract_calls: WhitelistTree,
    pub value_transfers: WhitelistTree,
}

impl WhitelistTrees {
    pub fn build(state: &WhitelistState, depth: usize) -> Result<Self, MerkleError> {
        Ok(Self {
            contract_calls: WhitelistTree::build(&state.call_leaves(), depth)?,
            value_transfers: WhitelistTree::build(&state.transfer_leaves(), depth)?,
        })
    }
}

/// Commitment binding both whitelist roots to the account and config.
///
/// `root` is the sole public value the circuit checks membership against;
/// it changes exactly when whitelist membership, account, or config change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTree {
    pub root: B256,
    pub calls_root: B256,
    pub transfers_root: B256,
}

impl StateTree {
    /// Combine the tree roots with the account and config identifiers.
    ///
    /// root = poseidon4(calls_root, transfers_root, account, config_id).
    /// The composition order is a wire-compatibility constant shared with
    /// the circuit; changing it requires a new circuit version.
    pub fn build(state: &WhitelistState, trees: &WhitelistTrees) -> Self {
        let calls_root = trees.contract_calls.root();
        let transfers_root = trees.value_transfers.root();
        let root = poseidon4(
            calls_root,
            transfers_root,
            address_leaf(&state.account),
            state.config_id.0,
        );

        Self {
            root,
            calls_root,
            transfers_root,
        }
    }
}
