//! Circuit input encoding for the contract/value whitelist circuit.
//!
//! The prover-input schema emitted by [`CircuitInputs::to_prover_input`] is
//! dictated by the external circuit and versioned through
//! [`CircuitConfig::circuit_version`](crate::config::CircuitConfig). Signal
//! layout, in declaration order:
//!
//! ```text
//! stateRoot                              public, field
//! userOpHash                             public, field (reduced mod order)
//! dest[max_transactions]                 field
//! value[max_transactions]                field
//! functionSelector[max_transactions]     field
//! erc20TransferTo[max_transactions]      field
//! contractCallPathElements[max][depth]   field
//! contractCallPathIndices[max][depth]    bit, LSB first
//! valueTransferPathElements[max][depth]  field
//! valueTransferPathIndices[max][depth]   bit, LSB first
//! ```
//!
//! Field elements serialize as decimal strings of the field-reduced value.
//! Unused transaction slots carry the all-zero transaction with all-zero
//! paths; the circuit skips membership checks for a zero destination.

use std::fmt;

use alloy::primitives::{
    Address,
    B256,
    U256,
};
use serde::Serialize;
use thiserror::Error;

use super::{
    merkle::{
        MerkleError,
        MerklePath,
        StateTree,
        WhitelistTrees,
    },
    transaction::WhitelistTransaction,
    whitelist::{
        address_leaf,
        WhitelistState,
    },
};
use crate::{
    config::CircuitConfig,
    crypto::poseidon::field_decimal,
};

/// Which whitelist tree a membership lookup ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    ContractCalls,
    ValueTransfers,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::ContractCalls => write!(f, "contract-call"),
            TreeKind::ValueTransfers => write!(f, "value-transfer"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WitnessError {
    /// The destination has no leaf in the named tree. The correct caller
    /// response is to refuse the transaction, not to attempt a proof.
    #[error("{address} is not in the {tree} whitelist")]
    NotWhitelisted { address: Address, tree: TreeKind },

    /// One value-recipient path slot exists per transaction; a call moving
    /// both native value and tokens cannot prove both recipients.
    #[error(
        "transaction {index} carries both native value and an ERC-20 recipient"
    )]
    AmbiguousValueRecipient { index: usize },

    #[error("{count} transactions exceed the {max} circuit slots")]
    TooManyTransactions { count: usize, max: usize },

    #[error("trees were built at depth {found}, config expects {expected}")]
    DepthMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Merkle(#[from] MerkleError),
}

/// Per-slot private witness: the transaction's field values plus the
/// membership paths for its destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWitness {
    pub dest: B256,
    pub value: U256,
    pub function_selector: B256,
    pub erc20_transfer_to: B256,
    /// Membership of `dest` in the contract-call tree.
    pub call_path: MerklePath,
    /// Membership of the value recipient in the value-transfer tree;
    /// all-zero when the transaction moves no value.
    pub value_path: MerklePath,
}

impl TransactionWitness {
    fn zero(depth: usize) -> Self {
        Self {
            dest: B256::ZERO,
            value: U256::ZERO,
            function_selector: B256::ZERO,
            erc20_transfer_to: B256::ZERO,
            call_path: MerklePath::zero(depth),
            value_path: MerklePath::zero(depth),
        }
    }
}

/// Ordered circuit inputs for one proof attempt.
///
/// `state_root` and `user_op_hash` are the public inputs, the only values
/// the verifier reads without trusting the prover. Everything else is
/// private witness. Single-use: built per authorization attempt against one
/// consistent (state, trees) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitInputs {
    pub state_root: B256,
    pub user_op_hash: B256,
    /// Exactly `config.max_transactions` slots, zero-padded.
    pub transactions: Vec<TransactionWitness>,
}

impl CircuitInputs {
    /// Encode candidate transactions into circuit inputs.
    ///
    /// Fails fast on any destination without a membership path, so the
    /// prover is never asked to prove a false statement.
    pub fn encode(
        txs: &[WhitelistTransaction],
        user_op_hash: B256,
        state: &WhitelistState,
        trees: &WhitelistTrees,
        config: &CircuitConfig,
    ) -> Result<Self, WitnessError> {
        for tree_depth in [
            trees.contract_calls.depth(),
            trees.value_transfers.depth(),
        ] {
            if tree_depth != config.tree_depth {
                return Err(WitnessError::DepthMismatch {
                    expected: config.tree_depth,
                    found: tree_depth,
                });
            }
        }

        if txs.len() > config.max_transactions {
            return Err(WitnessError::TooManyTransactions {
                count: txs.len(),
                max: config.max_transactions,
            });
        }

        let mut transactions = Vec::with_capacity(config.max_transactions);
        for (index, tx) in txs.iter().enumerate() {
            transactions.push(Self::transaction_witness(index, tx, state, trees)?);
        }
        transactions
            .resize(config.max_transactions, TransactionWitness::zero(config.tree_depth));

        Ok(Self {
            state_root: StateTree::build(state, trees).root,
            user_op_hash,
            transactions,
        })
    }

    fn transaction_witness(
        index: usize,
        tx: &WhitelistTransaction,
        state: &WhitelistState,
        trees: &WhitelistTrees,
    ) -> Result<TransactionWitness, WitnessError> {
        let depth = trees.contract_calls.depth();

        if tx.is_zero() {
            return Ok(TransactionWitness::zero(depth));
        }

        let call_index =
            state
                .call_index(&tx.dest)
                .ok_or(WitnessError::NotWhitelisted {
                    address: tx.dest,
                    tree: TreeKind::ContractCalls,
                })?;
        let call_path = trees.contract_calls.path(call_index)?;

        let value_recipient = match (tx.erc20_transfer_to, tx.value > U256::ZERO) {
            (Some(_), true) => {
                return Err(WitnessError::AmbiguousValueRecipient { index });
            }
            (Some(to), false) => Some(to),
            (None, true) => Some(tx.dest),
            (None, false) => None,
        };

        let value_path = match value_recipient {
            Some(recipient) => {
                let transfer_index = state.transfer_index(&recipient).ok_or(
                    WitnessError::NotWhitelisted {
                        address: recipient,
                        tree: TreeKind::ValueTransfers,
                    },
                )?;
                trees.value_transfers.path(transfer_index)?
            }
            None => MerklePath::zero(depth),
        };

        Ok(TransactionWitness {
            dest: address_leaf(&tx.dest),
            value: tx.value,
            function_selector: B256::left_padding_from(
                tx.function_selector.as_slice(),
            ),
            erc20_transfer_to: tx
                .erc20_transfer_to
                .map(|to| address_leaf(&to))
                .unwrap_or(B256::ZERO),
            call_path,
            value_path,
        })
    }

    /// Serialize into the witness generator's input object.
    pub fn to_prover_input(&self) -> serde_json::Value {
        serde_json::to_value(ProverInput::from(self))
            .expect("failed to serialize prover input")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProverInput {
    state_root: String,
    user_op_hash: String,
    dest: Vec<String>,
    value: Vec<String>,
    function_selector: Vec<String>,
    erc20_transfer_to: Vec<String>,
    contract_call_path_elements: Vec<Vec<String>>,
    contract_call_path_indices: Vec<Vec<u8>>,
    value_transfer_path_elements: Vec<Vec<String>>,
    value_transfer_path_indices: Vec<Vec<u8>>,
}

impl From<&CircuitInputs> for ProverInput {
    fn from(inputs: &CircuitInputs) -> Self {
        let txs = &inputs.transactions;
        Self {
            state_root: field_decimal(inputs.state_root),
            user_op_hash: field_decimal(inputs.user_op_hash),
            dest: txs.iter().map(|t| field_decimal(t.dest)).collect(),
            value: txs.iter().map(|t| t.value.to_string()).collect(),
            function_selector: txs
                .iter()
                .map(|t| field_decimal(t.function_selector))
                .collect(),
            erc20_transfer_to: txs
                .iter()
                .map(|t| field_decimal(t.erc20_transfer_to))
                .collect(),
            contract_call_path_elements: txs
                .iter()
                .map(|t| path_elements(&t.call_path))
                .collect(),
            contract_call_path_indices: txs
                .iter()
                .map(|t| t.call_path.indices.clone())
                .collect(),
            value_transfer_path_elements: txs
                .iter()
                .map(|t| path_elements(&t.value_path))
                .collect(),
            value_transfer_path_indices: txs
                .iter()
                .map(|t| t.value_path.indices.clone())
                .collect(),
        }
    }
}

fn path_elements(path: &MerklePath) -> Vec<String> {
    path.siblings.iter().map(|s| field_decimal(*s)).collect()
}
