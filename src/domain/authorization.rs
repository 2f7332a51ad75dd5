//! Wire codec for the smart-session authorization blob.
//!
//! The encoded value is placed into the user operation's signature field and
//! consumed by the on-chain validator module. Layout (all length prefixes
//! big-endian):
//!
//! ```text
//! [4 bytes]  signature length n
//! [n bytes]  session signature
//! [1 byte ]  proof count k
//! k × ( [4 bytes] proof length m, [m bytes] proof )
//! ```
//!
//! Self-describing: decode recovers the inputs byte-identically and rejects
//! truncated input and trailing bytes.

use alloy::primitives::Bytes;
use thiserror::Error;

use super::proof::PolicyProof;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("authorization blob truncated while reading {context}")]
    Truncated { context: &'static str },

    #[error("{remaining} trailing bytes after the last proof")]
    TrailingBytes { remaining: usize },

    #[error("{count} proofs exceed the one-byte proof count")]
    ProofCountOverflow { count: usize },

    #[error("signature length {len} exceeds the four-byte length prefix")]
    SignatureTooLong { len: usize },

    #[error("proof length {len} exceeds the four-byte length prefix")]
    ProofTooLong { len: usize },
}

/// The combined {session signature, policy proofs} authorization value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartSessionAuthorization {
    pub signature: Bytes,
    pub proofs: Vec<PolicyProof>,
}

impl SmartSessionAuthorization {
    pub fn new(signature: Bytes, proofs: Vec<PolicyProof>) -> Self {
        Self { signature, proofs }
    }

    pub fn encode(&self) -> Result<Bytes, CodecError> {
        let sig_len = u32::try_from(self.signature.len())
            .map_err(|_| CodecError::SignatureTooLong {
                len: self.signature.len(),
            })?;
        let count = u8::try_from(self.proofs.len())
            .map_err(|_| CodecError::ProofCountOverflow {
                count: self.proofs.len(),
            })?;

        let mut out = Vec::with_capacity(
            4 + self.signature.len()
                + 1
                + self
                    .proofs
                    .iter()
                    .map(|p| 4 + p.as_bytes().len())
                    .sum::<usize>(),
        );
        out.extend_from_slice(&sig_len.to_be_bytes());
        out.extend_from_slice(&self.signature);
        out.push(count);
        for proof in &self.proofs {
            let bytes = proof.as_bytes();
            let len = u32::try_from(bytes.len())
                .map_err(|_| CodecError::ProofTooLong { len: bytes.len() })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(bytes);
        }

        Ok(out.into())
    }

    pub fn decode(input: &[u8]) -> Result<Self, CodecError> {
        let mut offset = 0usize;

        let sig_len = read_u32(input, &mut offset, "signature length")? as usize;
        let signature =
            Bytes::copy_from_slice(read_bytes(input, &mut offset, sig_len, "signature")?);

        let count = read_bytes(input, &mut offset, 1, "proof count")?[0];

        let mut proofs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let len = read_u32(input, &mut offset, "proof length")? as usize;
            let bytes = read_bytes(input, &mut offset, len, "proof")?;
            proofs.push(PolicyProof::from_bytes(Bytes::copy_from_slice(bytes)));
        }

        if offset != input.len() {
            return Err(CodecError::TrailingBytes {
                remaining: input.len() - offset,
            });
        }

        Ok(Self { signature, proofs })
    }
}

fn read_u32(
    input: &[u8],
    offset: &mut usize,
    context: &'static str,
) -> Result<u32, CodecError> {
    let bytes = read_bytes(input, offset, 4, context)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_bytes<'a>(
    input: &'a [u8],
    offset: &mut usize,
    len: usize,
    context: &'static str,
) -> Result<&'a [u8], CodecError> {
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= input.len())
        .ok_or(CodecError::Truncated { context })?;
    let slice = &input[*offset..end];
    *offset = end;
    Ok(slice)
}
