//! Explicit, versioned circuit configuration.
//!
//! Hash choice, tree depth, transaction-slot count, and the input-schema
//! version are wire-compatibility constants shared with the external circuit
//! and the on-chain verifier. They are passed into every builder, encoder,
//! and prover call rather than living as ambient constants, so a version
//! skew fails loudly at the call site instead of producing a proof the
//! verifier silently rejects.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

const DEFAULT_TREE_DEPTH: usize = 17;
const DEFAULT_MAX_TRANSACTIONS: usize = 2;
const DEFAULT_CIRCUIT_VERSION: &str = "contract-value-whitelist-v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Circuit-facing parameters for one policy deployment.
///
/// `tree_depth` trades maximum whitelist size (2^depth destinations) against
/// proving cost; `max_transactions` is the number of execution slots the
/// circuit proves per user operation; `circuit_version` names the artifact
/// generation the encoder's schema matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitConfig {
    #[serde(default = "default_tree_depth")]
    pub tree_depth: usize,
    #[serde(default = "default_max_transactions")]
    pub max_transactions: usize,
    #[serde(default = "default_circuit_version")]
    pub circuit_version: String,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            tree_depth: DEFAULT_TREE_DEPTH,
            max_transactions: DEFAULT_MAX_TRANSACTIONS,
            circuit_version: DEFAULT_CIRCUIT_VERSION.to_string(),
        }
    }
}

impl CircuitConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}

fn default_max_transactions() -> usize {
    DEFAULT_MAX_TRANSACTIONS
}

fn default_circuit_version() -> String {
    DEFAULT_CIRCUIT_VERSION.to_string()
}

/// Versioned references to the external proving artifacts.
///
/// The witness generator (circom wasm), constraint system (r1cs), and
/// proving key (zkey) must all come from the same circuit build as the
/// on-chain verifier; `circuit_version` is checked against the
/// [`CircuitConfig`] at prove time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitArtifacts {
    pub witness_generator: PathBuf,
    pub constraint_system: PathBuf,
    pub proving_key: PathBuf,
    pub circuit_version: String,
}

impl CircuitArtifacts {
    pub fn new(
        witness_generator: PathBuf,
        constraint_system: PathBuf,
        proving_key: PathBuf,
        circuit_version: impl Into<String>,
    ) -> Self {
        Self {
            witness_generator,
            constraint_system,
            proving_key,
            circuit_version: circuit_version.into(),
        }
    }
}
