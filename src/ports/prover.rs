use std::future::Future;

use thiserror::Error;

use crate::domain::{
    proof::PolicyProof,
    witness::CircuitInputs,
};

/// Errors that can occur during proof generation.
#[derive(Debug, Error)]
pub enum ProverError {
    /// The witness generator rejected the inputs, e.g. a membership path
    /// that does not hash to the claimed root, or a schema mismatch between
    /// encoder and circuit. A data bug: the encoder's preconditions should
    /// make this unreachable.
    #[error("witness generation failed: {0}")]
    WitnessGeneration(String),

    /// The proving artifacts do not match the circuit version this pipeline
    /// was configured for. A deployment bug, not a data bug.
    #[error("proving key mismatch: expected circuit version {expected}, {found}")]
    ProvingKeyMismatch { expected: String, found: String },

    #[error("proof generation failed: {0}")]
    ProofGeneration(String),

    #[error("input serialization failed: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for generating policy proofs.
///
/// Proof generation is deterministic given identical inputs and artifacts,
/// so retrying the same call only helps against transient resource
/// exhaustion; the port itself holds no retry policy. The returned future
/// may be raced against a timeout and dropped; partial proving work is not
/// resumable and a retry starts witness generation from scratch.
///
/// Implementations:
/// - [`CircomGroth16Prover`](crate::adapters::circom_prover::CircomGroth16Prover)
///   (ark-circom witness generation + Groth16)
///
/// The mock prover deliberately does not implement this trait; see
/// [`MockProver`](crate::adapters::mock_prover::MockProver).
pub trait PolicyProver: Send + Sync {
    fn prove(
        &self,
        inputs: &CircuitInputs,
    ) -> impl Future<Output = Result<PolicyProof, ProverError>> + Send;
}
