use alloy::primitives::{
    Address,
    B256,
};
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use super::session::ConfigId;

#[derive(Debug, Error)]
pub enum WhitelistError {
    #[error("contract-call whitelist is empty")]
    EmptyContractCalls,

    #[error("value-transfer whitelist is empty")]
    EmptyValueTransfers,
}

/// Encode an address as a Merkle leaf: the address interpreted as a
/// big-endian integer, left-padded to 32 bytes. 160 bits always fit in the
/// BN254 scalar field, so no reduction happens here.
pub fn address_leaf(addr: &Address) -> B256 {
    B256::left_padding_from(addr.as_slice())
}

/// The whitelist policy state committed for one session configuration.
///
/// Holds the account it protects, the config id it is stored under, and the
/// two permitted-destination sets: contracts the session may call, and
/// addresses that may receive value. Both sets are deduplicated; insertion
/// order determines leaf position in the derived trees, which matters
/// because proofs reference positional indices.
///
/// Immutable after construction. Adding a destination means building a new
/// state, new trees, and therefore a new committed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistState {
    pub account: Address,
    pub config_id: ConfigId,
    contract_calls: Vec<Address>,
    value_transfers: Vec<Address>,
}

impl WhitelistState {
    /// Build a whitelist state from the permitted destination sets.
    ///
    /// Both sets are required: a policy with no permitted destinations is
    /// treated as a caller mistake rather than an allow-nothing commitment.
    pub fn new(
        account: Address,
        config_id: ConfigId,
        contract_calls: Vec<Address>,
        value_transfers: Vec<Address>,
    ) -> Result<Self, WhitelistError> {
        if contract_calls.is_empty() {
            return Err(WhitelistError::EmptyContractCalls);
        }
        if value_transfers.is_empty() {
            return Err(WhitelistError::EmptyValueTransfers);
        }

        Ok(Self {
            account,
            config_id,
            contract_calls: dedup_preserving_order(contract_calls),
            value_transfers: dedup_preserving_order(value_transfers),
        })
    }

    /// Permitted call destinations, in leaf order.
    pub fn contract_calls(&self) -> &[Address] {
        &self.contract_calls
    }

    /// Permitted value-transfer destinations, in leaf order.
    pub fn value_transfers(&self) -> &[Address] {
        &self.value_transfers
    }

    /// Leaf index of a call destination, if whitelisted.
    pub fn call_index(&self, addr: &Address) -> Option<usize> {
        self.contract_calls.iter().position(|a| a == addr)
    }

    /// Leaf index of a value-transfer destination, if whitelisted.
    pub fn transfer_index(&self, addr: &Address) -> Option<usize> {
        self.value_transfers.iter().position(|a| a == addr)
    }

    /// Leaf encodings of the call destinations, in leaf order.
    pub fn call_leaves(&self) -> Vec<B256> {
        self.contract_calls.iter().map(address_leaf).collect()
    }

    /// Leaf encodings of the value-transfer destinations, in leaf order.
    pub fn transfer_leaves(&self) -> Vec<B256> {
        self.value_transfers.iter().map(address_leaf).collect()
    }
}

fn dedup_preserving_order(addrs: Vec<Address>) -> Vec<Address> {
    let mut out: Vec<Address> = Vec::with_capacity(addrs.len());
    for addr in addrs {
        if !out.contains(&addr) {
            out.push(addr);
        }
    }
    out
}
