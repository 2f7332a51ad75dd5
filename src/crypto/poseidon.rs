use alloy::primitives::B256;
use ark_bn254::Fr;
use ark_ff::{
    BigInteger,
    PrimeField,
};
use light_poseidon::{
    Poseidon,
    PoseidonHasher,
};

/// Convert B256 to a BN254 scalar field element.
///
/// Big-endian reduction mod the field order. This is the crate-wide rule for
/// feeding 32-byte values (roots, identifiers, the user-operation hash) into
/// the circuit's field; it must match the on-chain policy's interpretation.
pub fn b256_to_fr(value: B256) -> Fr {
    Fr::from_be_bytes_mod_order(value.as_ref())
}

/// Convert a BN254 field element back to B256.
pub fn fr_to_b256(value: Fr) -> B256 {
    let big_int = value.into_bigint();
    let bytes = big_int.to_bytes_be();
    B256::from_slice(&bytes)
}

/// Decimal string of the field-reduced value, as the circom witness
/// generator consumes it.
pub fn field_decimal(value: B256) -> String {
    b256_to_fr(value).into_bigint().to_string()
}

/// Poseidon hash with 2 inputs (Merkle nodes).
///
/// Uses light-poseidon with the Circom-compatible configuration, matching
/// the whitelist circuit's hash bit-for-bit. Compatibility-critical: a
/// different parameterization yields roots the verifier will reject.
pub fn poseidon2(a: B256, b: B256) -> B256 {
    let mut hasher =
        Poseidon::<Fr>::new_circom(2).expect("Failed to create Poseidon hasher");
    let inputs = [b256_to_fr(a), b256_to_fr(b)];
    let result = hasher
        .hash(&inputs)
        .expect("Failed to compute Poseidon hash");
    fr_to_b256(result)
}

/// Poseidon hash with 4 inputs (state-root composition).
/// Used for: state_root = poseidon4(calls_root, transfers_root, account, config_id)
pub fn poseidon4(a: B256, b: B256, c: B256, d: B256) -> B256 {
    let mut hasher =
        Poseidon::<Fr>::new_circom(4).expect("Failed to create Poseidon hasher");
    let inputs = [b256_to_fr(a), b256_to_fr(b), b256_to_fr(c), b256_to_fr(d)];
    let result = hasher
        .hash(&inputs)
        .expect("Failed to compute Poseidon hash");
    fr_to_b256(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poseidon2_deterministic() {
        let a = B256::repeat_byte(0x01);
        let b = B256::repeat_byte(0x02);
        let hash1 = poseidon2(a, b);
        let hash2 = poseidon2(a, b);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_poseidon2_order_matters() {
        let a = B256::repeat_byte(0x01);
        let b = B256::repeat_byte(0x02);
        let hash1 = poseidon2(a, b);
        let hash2 = poseidon2(b, a);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_poseidon4_deterministic() {
        let a = B256::repeat_byte(0x01);
        let b = B256::repeat_byte(0x02);
        let c = B256::repeat_byte(0x03);
        let d = B256::repeat_byte(0x04);
        let hash1 = poseidon4(a, b, c, d);
        let hash2 = poseidon4(a, b, c, d);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_field_decimal_small_value() {
        let mut bytes = [0u8; 32];
        bytes[31] = 42;
        assert_eq!(field_decimal(B256::from(bytes)), "42");
    }

    #[test]
    fn test_fr_roundtrip_within_field() {
        // values below the modulus survive the round trip unchanged
        let value = B256::repeat_byte(0x11);
        assert_eq!(fr_to_b256(b256_to_fr(value)), value);
    }
}
