//! Placeholder prover for pipeline development and gas estimation.

use alloy::primitives::Bytes;

use crate::domain::{
    proof::MockProof,
    witness::CircuitInputs,
};

/// Fixed placeholder with the size and shape of an encoded Groth16 proof.
/// The content is a recognizable byte ramp, never a valid proof.
const MOCK_PROOF_BYTES: [u8; 256] = {
    let mut bytes = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        bytes[i] = i as u8;
        i += 1;
    }
    bytes
};

/// Development-only prover that fabricates a [`MockProof`] without touching
/// the proving system.
///
/// Deliberately does not implement
/// [`PolicyProver`](crate::ports::prover::PolicyProver): a mock prover must
/// not be substitutable where a real one is expected. The returned
/// [`MockProof`] enters the authorization codec only through its explicitly
/// insecure conversion.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProver;

impl MockProver {
    pub fn new() -> Self {
        Self
    }

    /// Return the placeholder proof. The inputs are taken only to keep call
    /// sites shaped like the real pipeline; they are not inspected.
    pub fn prove(&self, _inputs: &CircuitInputs) -> MockProof {
        MockProof::new(Bytes::from_static(&MOCK_PROOF_BYTES))
    }
}
