//! Off-chain toolkit for ZK-gated smart-session permissions.
//!
//! A smart-contract account grants a time-boxed session key limited
//! authority: which contracts it may call and which addresses may receive
//! value. The limits are not stored on-chain as a list. The owner commits
//! to them once as a small Merkle root, and every session execution carries
//! a Groth16 proof that its destinations are members of the committed
//! whitelists.
//!
//! This crate owns the commitment and proving pipeline:
//!
//! - `domain::whitelist`: the canonical whitelist policy state
//! - `domain::merkle`: fixed-depth Poseidon Merkle trees and the combined
//!   state root
//! - `domain::witness`: circuit input encoding for candidate transactions
//! - `ports::prover` / `adapters::circom_prover`: the proving-system
//!   interface and its circom/Groth16 implementation
//! - `domain::authorization`: the {signature, proofs} wire codec
//! - `domain::session`: session definitions and permission/config id
//!   derivation
//!
//! Transport (bundler RPC, user-operation submission), key custody, and the
//! on-chain validator module are external collaborators and out of scope.

pub mod adapters;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod ports;
