use std::fmt;

use alloy::{
    primitives::{
        keccak256,
        Address,
        Bytes,
        FixedBytes,
        B256,
        U256,
    },
    sol_types::SolValue,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Deterministic identifier of an enabled session.
///
/// keccak256(abi.encode(session_validator, session_validator_init_data,
/// salt)); the salt is the caller-supplied uniqueness source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionId(pub B256);

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-account key the whitelist state is stored under.
///
/// keccak256(abi.encodePacked(account, permission_id)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigId(pub B256);

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-chain policy reference with its initialization data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyData {
    pub policy: Address,
    pub init_data: Bytes,
}

impl PolicyData {
    pub fn new(policy: Address, init_data: Bytes) -> Self {
        Self { policy, init_data }
    }

    /// A policy that takes no initialization data (e.g. a sudo policy).
    pub fn bare(policy: Address) -> Self {
        Self {
            policy,
            init_data: Bytes::new(),
        }
    }
}

/// ZK-gated user-operation policy referencing a committed whitelist root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkPolicyData {
    pub policy: Address,
    pub state_root: B256,
}

impl ZkPolicyData {
    /// Reference the contract/value whitelist policy at `policy`, committed
    /// to `state_root`.
    pub fn contract_value_whitelist(policy: Address, state_root: B256) -> Self {
        Self { policy, state_root }
    }

    /// Initialization data the on-chain policy is enabled with: the
    /// ABI-encoded committed root.
    pub fn init_data(&self) -> Bytes {
        self.state_root.abi_encode().into()
    }
}

/// ERC-7739 content policies scoped to ERC-1271 signature validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc7739Policies {
    pub allowed_erc7739_content: Vec<String>,
    pub erc1271_policies: Vec<PolicyData>,
}

/// One permitted action: a call target, its function selector, and the
/// policies scoped to that action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionData {
    pub action_target: Address,
    pub action_target_selector: FixedBytes<4>,
    pub action_policies: Vec<PolicyData>,
}

/// A scoped authority grant to a session key, mirroring the ERC-7579
/// smart-sessions module's session definition.
///
/// Immutable once enabled on-chain; any change requires enabling a new
/// session with a new derived [`PermissionId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Validator module checking the session signature.
    pub session_validator: Address,
    /// Validator initialization data (owners + threshold for the ownable
    /// validator, see [`encode_validation_data`]).
    pub session_validator_init_data: Bytes,
    /// Caller-supplied uniqueness salt.
    pub salt: B256,
    /// Traditional (non-ZK) user-operation policies.
    pub user_op_policies: Vec<PolicyData>,
    /// ZK-gated user-operation policies, each committing to a whitelist
    /// state root.
    pub user_op_zk_policies: Vec<ZkPolicyData>,
    /// ERC-1271/ERC-7739 signature policies.
    pub erc7739_policies: Erc7739Policies,
    /// Actions the session key may execute.
    pub actions: Vec<ActionData>,
    pub chain_id: U256,
    pub permit_erc4337_paymaster: bool,
}

impl Session {
    /// Derive the permission identifier for this session.
    ///
    /// Only the validator, its init data, and the salt enter the hash; the
    /// on-chain module derives the same id before the policies are known.
    pub fn permission_id(&self) -> PermissionId {
        let encoded = (
            self.session_validator,
            self.session_validator_init_data.clone(),
            self.salt,
        )
            .abi_encode_params();
        PermissionId(keccak256(encoded))
    }
}

/// Derive the per-account config identifier from a permission id.
pub fn permission_id_to_config_id(
    permission_id: PermissionId,
    account: Address,
) -> ConfigId {
    let mut packed = Vec::with_capacity(20 + 32);
    packed.extend_from_slice(account.as_slice());
    packed.extend_from_slice(permission_id.0.as_slice());
    ConfigId(keccak256(packed))
}

/// ABI-encode an ownable session validator's init data: (threshold, owners),
/// owners in the given order.
pub fn encode_validation_data(threshold: U256, owners: &[Address]) -> Bytes {
    (threshold, owners.to_vec()).abi_encode_params().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(salt_byte: u8) -> Session {
        Session {
            session_validator: Address::repeat_byte(0x11),
            session_validator_init_data: encode_validation_data(
                U256::from(1u64),
                &[Address::repeat_byte(0x22)],
            ),
            salt: B256::repeat_byte(salt_byte),
            user_op_policies: vec![PolicyData::bare(Address::repeat_byte(0x33))],
            user_op_zk_policies: vec![],
            erc7739_policies: Erc7739Policies::default(),
            actions: vec![ActionData {
                action_target: Address::repeat_byte(0x44),
                action_target_selector: FixedBytes::ZERO,
                action_policies: vec![PolicyData::bare(Address::repeat_byte(0x33))],
            }],
            chain_id: U256::from(80002u64),
            permit_erc4337_paymaster: true,
        }
    }

    #[test]
    fn test_permission_id_deterministic() {
        assert_eq!(session(0x01).permission_id(), session(0x01).permission_id());
    }

    #[test]
    fn test_permission_id_changes_with_salt() {
        assert_ne!(session(0x01).permission_id(), session(0x02).permission_id());
    }

    #[test]
    fn test_permission_id_ignores_policies() {
        // the on-chain module derives the id from validator + init data +
        // salt alone; policies attach under the same id
        let mut with_zk = session(0x01);
        with_zk.user_op_zk_policies.push(ZkPolicyData::contract_value_whitelist(
            Address::repeat_byte(0x55),
            B256::repeat_byte(0x66),
        ));
        assert_eq!(with_zk.permission_id(), session(0x01).permission_id());
    }

    #[test]
    fn test_config_id_deterministic() {
        let pid = session(0x01).permission_id();
        let account = Address::repeat_byte(0x77);
        assert_eq!(
            permission_id_to_config_id(pid, account),
            permission_id_to_config_id(pid, account)
        );
    }

    #[test]
    fn test_config_id_changes_with_account() {
        let pid = session(0x01).permission_id();
        assert_ne!(
            permission_id_to_config_id(pid, Address::repeat_byte(0x77)),
            permission_id_to_config_id(pid, Address::repeat_byte(0x78))
        );
    }

    #[test]
    fn test_zk_policy_init_data_is_encoded_root() {
        let root = B256::repeat_byte(0x42);
        let policy =
            ZkPolicyData::contract_value_whitelist(Address::repeat_byte(0x55), root);
        assert_eq!(policy.init_data().as_ref(), root.as_slice());
    }
}
