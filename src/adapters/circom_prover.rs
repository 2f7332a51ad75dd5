//! Groth16 prover over circom artifacts.
//!
//! The adapter owns exactly four steps: serialize the circuit inputs into
//! the witness generator's input format, run witness generation (the circom
//! wasm, in-process), run Groth16 proof generation with the proving key, and
//! encode the proof into the byte layout the on-chain verifier expects.
//! The constraint system itself is an external, versioned artifact.

use std::{
    fs::File,
    future::Future,
    time::Instant,
};

use ark_bn254::{
    Bn254,
    Fr,
};
use ark_circom::{
    read_zkey,
    CircomBuilder,
    CircomConfig,
};
use ark_ff::{
    BigInteger,
    PrimeField,
};
use ark_groth16::Groth16;
use ark_snark::SNARK;
use ark_std::rand::thread_rng;
use num_bigint::{
    BigInt,
    BigUint,
};
use serde_json::Value;
use tracing::{
    debug,
    info,
};

use crate::{
    config::{
        CircuitArtifacts,
        CircuitConfig,
    },
    crypto::poseidon::b256_to_fr,
    domain::{
        proof::PolicyProof,
        witness::CircuitInputs,
    },
    ports::prover::{
        PolicyProver,
        ProverError,
    },
};

/// Prover backed by ark-circom witness generation and ark-groth16.
///
/// Stateless across calls: artifacts are loaded per proof, so concurrent
/// proving against the same configuration needs no locking.
pub struct CircomGroth16Prover {
    artifacts: CircuitArtifacts,
    config: CircuitConfig,
}

impl CircomGroth16Prover {
    pub fn new(artifacts: CircuitArtifacts, config: CircuitConfig) -> Self {
        Self { artifacts, config }
    }

    fn prove_blocking(
        artifacts: &CircuitArtifacts,
        config: &CircuitConfig,
        inputs: &CircuitInputs,
    ) -> Result<PolicyProof, ProverError> {
        if artifacts.circuit_version != config.circuit_version {
            return Err(ProverError::ProvingKeyMismatch {
                expected: config.circuit_version.clone(),
                found: format!("artifacts declare {}", artifacts.circuit_version),
            });
        }

        let input_json = inputs.to_prover_input();

        debug!(
            wasm = %artifacts.witness_generator.display(),
            "loading witness generator"
        );
        let cfg = CircomConfig::<Fr>::new(
            &artifacts.witness_generator,
            &artifacts.constraint_system,
        )
        .map_err(|err| {
            ProverError::WitnessGeneration(format!("circom config failed: {err:?}"))
        })?;

        let mut builder = CircomBuilder::new(cfg);
        push_inputs(&mut builder, &input_json)?;

        let circuit = builder.build().map_err(|err| {
            ProverError::WitnessGeneration(format!("witness build failed: {err:?}"))
        })?;
        let public_inputs = circuit.get_public_inputs().ok_or_else(|| {
            ProverError::WitnessGeneration("witness has no public inputs".to_string())
        })?;

        // the verifier reads [stateRoot, userOpHash]; anything else here
        // means the encoder's schema and the circuit disagree
        let expected = [b256_to_fr(inputs.state_root), b256_to_fr(inputs.user_op_hash)];
        if public_inputs.len() < expected.len()
            || public_inputs[..expected.len()] != expected
        {
            return Err(ProverError::WitnessGeneration(
                "public inputs do not echo stateRoot/userOpHash".to_string(),
            ));
        }

        let mut zkey_file = File::open(&artifacts.proving_key)?;
        let (pk, _) = read_zkey(&mut zkey_file).map_err(|err| {
            ProverError::ProvingKeyMismatch {
                expected: config.circuit_version.clone(),
                found: format!("proving key unreadable: {err:?}"),
            }
        })?;

        let mut rng = thread_rng();
        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng)
            .map_err(|err| ProverError::ProofGeneration(format!("{err:?}")))?;

        // reject anything the on-chain verifier would reject
        let verified = Groth16::<Bn254>::verify(&pk.vk, &public_inputs, &proof)
            .map_err(|err| ProverError::ProofGeneration(format!("{err:?}")))?;
        if !verified {
            return Err(ProverError::ProofGeneration(
                "generated proof failed self-verification".to_string(),
            ));
        }

        Ok(PolicyProof::from_bytes(encode_proof(&proof).into()))
    }
}

impl PolicyProver for CircomGroth16Prover {
    fn prove(
        &self,
        inputs: &CircuitInputs,
    ) -> impl Future<Output = Result<PolicyProof, ProverError>> + Send {
        let artifacts = self.artifacts.clone();
        let config = self.config.clone();
        let inputs = inputs.clone();

        async move {
            info!(version = %artifacts.circuit_version, "generating policy proof");
            let started = Instant::now();

            let result = tokio::task::spawn_blocking(move || {
                Self::prove_blocking(&artifacts, &config, &inputs)
            })
            .await
            .map_err(|err| {
                ProverError::ProofGeneration(format!("prover task crashed: {err}"))
            })?;

            info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                ok = result.is_ok(),
                "policy proof attempt finished"
            );
            result
        }
    }
}

/// Push a prover-input JSON object into the circom builder.
///
/// Arrays flatten in declaration order, matching how circom consumes
/// multi-dimensional signals.
fn push_inputs(
    builder: &mut CircomBuilder<Fr>,
    input: &Value,
) -> Result<(), ProverError> {
    let object = input.as_object().ok_or_else(|| {
        ProverError::Serialization("prover input must be a JSON object".to_string())
    })?;
    for (name, value) in object {
        push_value(builder, name, value)?;
    }
    Ok(())
}

fn push_value(
    builder: &mut CircomBuilder<Fr>,
    name: &str,
    value: &Value,
) -> Result<(), ProverError> {
    match value {
        Value::String(s) => {
            let big = BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| {
                ProverError::Serialization(format!(
                    "invalid decimal string for signal {name}"
                ))
            })?;
            builder.push_input(name, BigInt::from(big));
            Ok(())
        }
        Value::Number(n) => {
            let big =
                BigUint::parse_bytes(n.to_string().as_bytes(), 10).ok_or_else(|| {
                    ProverError::Serialization(format!(
                        "invalid number for signal {name}"
                    ))
                })?;
            builder.push_input(name, BigInt::from(big));
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                push_value(builder, name, item)?;
            }
            Ok(())
        }
        _ => Err(ProverError::Serialization(format!(
            "unsupported input value for signal {name}"
        ))),
    }
}

fn fq_to_be(fq: &impl BigInteger) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = fq.to_bytes_be();
    let start = 32 - bytes.len();
    out[start..].copy_from_slice(&bytes);
    out
}

fn g1_to_be(point: &ark_bn254::G1Affine) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&fq_to_be(&point.x.into_bigint()));
    out[32..].copy_from_slice(&fq_to_be(&point.y.into_bigint()));
    out
}

/// G2 coordinates serialize c1 before c0, the EVM pairing precompile order.
fn g2_to_be(point: &ark_bn254::G2Affine) -> [u8; 128] {
    let mut out = [0u8; 128];
    let ark_bn254::Fq2 { c0, c1 } = point.x;
    let ark_bn254::Fq2 { c0: y0, c1: y1 } = point.y;
    out[0..32].copy_from_slice(&fq_to_be(&c1.into_bigint()));
    out[32..64].copy_from_slice(&fq_to_be(&c0.into_bigint()));
    out[64..96].copy_from_slice(&fq_to_be(&y1.into_bigint()));
    out[96..128].copy_from_slice(&fq_to_be(&y0.into_bigint()));
    out
}

fn encode_proof(proof: &ark_groth16::Proof<Bn254>) -> Vec<u8> {
    let mut out = Vec::with_capacity(PolicyProof::ENCODED_LEN);
    out.extend_from_slice(&g1_to_be(&proof.a));
    out.extend_from_slice(&g2_to_be(&proof.b));
    out.extend_from_slice(&g1_to_be(&proof.c));
    out
}
