//! End-to-end test for the whitelist policy pipeline, offline.
//!
//! This test walks the full authorization flow without the external proving
//! artifacts or any chain access:
//! 1. Define a session and derive its permission/config identifiers
//! 2. Commit the whitelists into trees and a state root
//! 3. Attach the ZK policy referencing the root
//! 4. Encode circuit inputs for a candidate execution
//! 5. Use the mock proof to assemble and round-trip the authorization blob
//!
//! Proof generation itself needs the circuit wasm/r1cs/zkey build and is
//! exercised against real artifacts in deployment pipelines, not here.

use alloy::primitives::{
    Address,
    Bytes,
    FixedBytes,
    B256,
    U256,
};
use smart_session_whitelist::{
    adapters::mock_prover::MockProver,
    config::CircuitConfig,
    domain::{
        authorization::SmartSessionAuthorization,
        merkle::{
            StateTree,
            WhitelistTree,
            WhitelistTrees,
        },
        session::{
            encode_validation_data,
            permission_id_to_config_id,
            ActionData,
            Erc7739Policies,
            PolicyData,
            Session,
            ZkPolicyData,
        },
        transaction::WhitelistTransaction,
        whitelist::{
            address_leaf,
            WhitelistState,
        },
        witness::{
            CircuitInputs,
            TreeKind,
            WitnessError,
        },
    },
};

const SESSION_VALIDATOR: Address = Address::repeat_byte(0x11);
const SUDO_POLICY: Address = Address::repeat_byte(0x22);
const WHITELIST_POLICY: Address = Address::repeat_byte(0x33);
const SMART_ACCOUNT: Address = Address::repeat_byte(0x44);

const ACTION_TARGET: Address = Address::repeat_byte(0xA5);
const TRANSFER_RECIPIENT: Address = Address::repeat_byte(0xB9);

fn test_config() -> CircuitConfig {
    CircuitConfig {
        tree_depth: 4,
        max_transactions: 2,
        circuit_version: "contract-value-whitelist-v1".to_string(),
    }
}

fn test_session(session_owner: Address) -> Session {
    Session {
        session_validator: SESSION_VALIDATOR,
        session_validator_init_data: encode_validation_data(
            U256::from(1u64),
            &[session_owner],
        ),
        salt: B256::ZERO,
        user_op_policies: vec![PolicyData::bare(SUDO_POLICY)],
        user_op_zk_policies: vec![],
        erc7739_policies: Erc7739Policies::default(),
        actions: vec![ActionData {
            action_target: ACTION_TARGET,
            action_target_selector: FixedBytes::ZERO,
            action_policies: vec![PolicyData::bare(SUDO_POLICY)],
        }],
        chain_id: U256::from(80002u64),
        permit_erc4337_paymaster: true,
    }
}

#[test]
fn full_offline_authorization_flow() {
    // 1. session + identifiers
    let mut session = test_session(Address::repeat_byte(0x55));
    let permission_id = session.permission_id();
    let config_id = permission_id_to_config_id(permission_id, SMART_ACCOUNT);

    // 2. whitelist commitment
    let state = WhitelistState::new(
        SMART_ACCOUNT,
        config_id,
        vec![ACTION_TARGET],
        vec![TRANSFER_RECIPIENT, ACTION_TARGET],
    )
    .unwrap();
    let config = test_config();
    let trees = WhitelistTrees::build(&state, config.tree_depth).unwrap();
    let state_tree = StateTree::build(&state, &trees);

    // 3. attach the ZK policy referencing the committed root
    session.user_op_zk_policies = vec![ZkPolicyData::contract_value_whitelist(
        WHITELIST_POLICY,
        state_tree.root,
    )];
    assert_eq!(
        session.user_op_zk_policies[0].init_data().as_ref(),
        state_tree.root.as_slice()
    );
    // attaching policies does not move the permission id
    assert_eq!(session.permission_id(), permission_id);

    // 4. encode circuit inputs for "call the action target", padded with an
    //    explicit zero transaction in the second slot
    let user_op_hash = B256::repeat_byte(0x77);
    let txs = [
        WhitelistTransaction::call(ACTION_TARGET, FixedBytes::ZERO),
        WhitelistTransaction::zero(),
    ];
    let inputs =
        CircuitInputs::encode(&txs, user_op_hash, &state, &trees, &config).unwrap();

    assert_eq!(inputs.state_root, state_tree.root);
    assert_eq!(inputs.user_op_hash, user_op_hash);
    assert_eq!(inputs.transactions.len(), config.max_transactions);

    let witness = &inputs.transactions[0];
    assert_eq!(
        witness.call_path.compute_root(address_leaf(&ACTION_TARGET)),
        trees.contract_calls.root()
    );

    // 5. placeholder proof → authorization blob → round trip
    let mock = MockProver::new().prove(&inputs);
    let session_signature = Bytes::from(vec![0x5A; 65]);
    let auth = SmartSessionAuthorization::new(
        session_signature.clone(),
        vec![mock.insecure_into_policy_proof()],
    );

    let encoded = auth.encode().unwrap();
    let decoded = SmartSessionAuthorization::decode(&encoded).unwrap();
    assert_eq!(decoded.signature, session_signature);
    assert_eq!(decoded, auth);
}

#[test]
fn depth_two_scenario() {
    // depth 2, capacity 4: insert A then B
    let a = Address::repeat_byte(0xAA);
    let b = Address::repeat_byte(0xBB);
    let c = Address::repeat_byte(0xCC);

    let forward =
        WhitelistTree::build(&[address_leaf(&a), address_leaf(&b)], 2).unwrap();
    let reversed =
        WhitelistTree::build(&[address_leaf(&b), address_leaf(&a)], 2).unwrap();
    assert_ne!(forward.root(), reversed.root());

    // membership path for A: 2 siblings, leaf index 0, reconstructs the root
    let path = forward.path(0).unwrap();
    assert_eq!(path.siblings.len(), 2);
    assert_eq!(path.leaf_index, 0);
    assert_eq!(path.compute_root(address_leaf(&a)), forward.root());

    // encoding a transaction to C, never inserted, fails NotWhitelisted
    let config_id = permission_id_to_config_id(
        test_session(Address::repeat_byte(0x55)).permission_id(),
        SMART_ACCOUNT,
    );
    let state =
        WhitelistState::new(SMART_ACCOUNT, config_id, vec![a, b], vec![a]).unwrap();
    let config = CircuitConfig {
        tree_depth: 2,
        max_transactions: 2,
        circuit_version: "contract-value-whitelist-v1".to_string(),
    };
    let trees = WhitelistTrees::build(&state, config.tree_depth).unwrap();

    let err = CircuitInputs::encode(
        &[WhitelistTransaction::call(c, FixedBytes::ZERO)],
        B256::ZERO,
        &state,
        &trees,
        &config,
    );
    match err {
        Err(WitnessError::NotWhitelisted { address, tree }) => {
            assert_eq!(address, c);
            assert_eq!(tree, TreeKind::ContractCalls);
        }
        other => panic!("expected NotWhitelisted, got {other:?}"),
    }
}

#[test]
fn config_id_is_a_stable_storage_key() {
    let session = test_session(Address::repeat_byte(0x55));
    let pid = session.permission_id();

    let id1 = permission_id_to_config_id(pid, SMART_ACCOUNT);
    let id2 = permission_id_to_config_id(pid, SMART_ACCOUNT);
    assert_eq!(id1, id2);

    let other_account = permission_id_to_config_id(pid, Address::repeat_byte(0x45));
    assert_ne!(id1, other_account);
}

#[test]
fn rebuilt_state_yields_new_root_and_fresh_paths() {
    // adding a destination is a rebuild: new state, new trees, new root
    let config_id = permission_id_to_config_id(
        test_session(Address::repeat_byte(0x55)).permission_id(),
        SMART_ACCOUNT,
    );
    let config = test_config();

    let before = WhitelistState::new(
        SMART_ACCOUNT,
        config_id,
        vec![ACTION_TARGET],
        vec![TRANSFER_RECIPIENT],
    )
    .unwrap();
    let trees_before = WhitelistTrees::build(&before, config.tree_depth).unwrap();
    let root_before = StateTree::build(&before, &trees_before).root;

    let after = WhitelistState::new(
        SMART_ACCOUNT,
        config_id,
        vec![ACTION_TARGET, Address::repeat_byte(0xD1)],
        vec![TRANSFER_RECIPIENT],
    )
    .unwrap();
    let trees_after = WhitelistTrees::build(&after, config.tree_depth).unwrap();
    let root_after = StateTree::build(&after, &trees_after).root;

    assert_ne!(root_before, root_after);

    // a path generated against the new trees commits to the new root only
    let inputs = CircuitInputs::encode(
        &[WhitelistTransaction::call(ACTION_TARGET, FixedBytes::ZERO)],
        B256::ZERO,
        &after,
        &trees_after,
        &config,
    )
    .unwrap();
    assert_eq!(inputs.state_root, root_after);
}
