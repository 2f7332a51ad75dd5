use alloy::primitives::{
    Address,
    FixedBytes,
    U256,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A candidate session execution to be authorized.
///
/// Constructed per execution attempt, never persisted. The encoder proves
/// `dest` against the contract-call whitelist and the value recipient
/// (`erc20_transfer_to` when present, otherwise `dest` for a nonzero native
/// `value`) against the value-transfer whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistTransaction {
    /// Call destination.
    pub dest: Address,
    /// Native value forwarded with the call.
    pub value: U256,
    /// Function selector of the call; zero for a plain call.
    pub function_selector: FixedBytes<4>,
    /// Recipient of an ERC-20 style token transfer carried by the call.
    pub erc20_transfer_to: Option<Address>,
}

impl WhitelistTransaction {
    /// A plain contract call with no value movement.
    pub fn call(dest: Address, function_selector: FixedBytes<4>) -> Self {
        Self {
            dest,
            value: U256::ZERO,
            function_selector,
            erc20_transfer_to: None,
        }
    }

    /// A call forwarding native value to `dest`.
    pub fn call_with_value(
        dest: Address,
        value: U256,
        function_selector: FixedBytes<4>,
    ) -> Self {
        Self {
            dest,
            value,
            function_selector,
            erc20_transfer_to: None,
        }
    }

    /// A token-transfer-style call moving tokens to `transfer_to`.
    pub fn erc20_transfer(
        dest: Address,
        function_selector: FixedBytes<4>,
        transfer_to: Address,
    ) -> Self {
        Self {
            dest,
            value: U256::ZERO,
            function_selector,
            erc20_transfer_to: Some(transfer_to),
        }
    }

    /// The all-zero transaction used to fill unused circuit slots.
    pub fn zero() -> Self {
        Self {
            dest: Address::ZERO,
            value: U256::ZERO,
            function_selector: FixedBytes::ZERO,
            erc20_transfer_to: None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.dest == Address::ZERO
            && self.value == U256::ZERO
            && self.function_selector == FixedBytes::ZERO
            && self.erc20_transfer_to.is_none()
    }
}
