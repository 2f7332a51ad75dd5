use alloy::primitives::Bytes;
use serde::{
    Deserialize,
    Serialize,
};

/// A Groth16 policy proof in the on-chain verifier's byte layout.
///
/// 256 bytes: `a.x || a.y || b.x.c1 || b.x.c0 || b.y.c1 || b.y.c0 || c.x
/// || c.y`, each coordinate a 32-byte big-endian BN254 base-field element.
/// The G2 coordinate swap (c1 before c0) matches the EVM pairing
/// precompile. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyProof(Bytes);

impl PolicyProof {
    /// Encoded proof size: two G1 points (64 bytes each) and one G2 point
    /// (128 bytes).
    pub const ENCODED_LEN: usize = 256;

    pub fn from_bytes(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// A placeholder proof for pipeline development and gas estimation.
///
/// Deliberately a separate type from [`PolicyProof`]: a mock will never
/// verify on-chain, and keeping it out of the real proof type means it
/// cannot drift into a production authorization path by substitution. The
/// only bridge is [`MockProof::insecure_into_policy_proof`], whose name
/// marks the hazard at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProof(Bytes);

impl MockProof {
    pub(crate) fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Convert into a [`PolicyProof`]-shaped value for encoding.
    ///
    /// The result is not a valid proof. Legitimate use is limited to
    /// populating the authorization field while estimating gas, before the
    /// real proof replaces it.
    pub fn insecure_into_policy_proof(self) -> PolicyProof {
        PolicyProof(self.0)
    }
}
