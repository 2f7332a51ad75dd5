pub mod circom_prover;
pub mod mock_prover;
