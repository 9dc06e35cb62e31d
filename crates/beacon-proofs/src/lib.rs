//! # Beacon Chain Proofs
//!
//! SSZ Merkle proof generation and verification against the Ethereum beacon
//! chain state, for verifier contracts that only hold a beacon block root.
//! Proves:
//! - whole validator containers against the block root
//! - packed validator balances against the balances root
//! - withdrawals in old blocks, reached through `historical_summaries`
//!
//! Capella, Deneb and Electra container layouts are supported.

pub mod block;
pub mod cache;
pub mod capella;
pub mod config;
pub mod constants;
pub mod containers;
pub mod deneb;
pub mod electra;
pub mod error;
pub mod gindex;
pub mod merkle;
pub mod proof;
pub mod ssz;
pub mod state_prover;
pub mod top_level;
pub mod types;
pub mod versioned;

pub use cache::{Clock, ManualClock, OracleStateCache, SlotCache, SystemClock};
pub use config::{CacheSettings, OracleCacheConfig, ProverConfig};
pub use containers::{compute_pubkey_hash, BeaconBlockHeader, HistoricalSummary, Validator, Withdrawal};
pub use error::{ProofError, ProofStep};
pub use gindex::GindexCalculator;
pub use merkle::{merkleize, mix_in_length, prove_leaf, verify_proof, zero_hashes, MerkleTree};
pub use proof::{
    BalanceProof, ProofGenerator, StateRootProof, ValidatorBalancesRootProof, ValidatorFields,
    VerifyAndProcessWithdrawalCallParams, VerifyCheckpointProofsCallParams,
    VerifyValidatorFieldsCallParams, WithdrawalFields, WithdrawalProof, WithdrawalProofParams,
    WithdrawalStateRootProof,
};
pub use top_level::{prove_field_against_state, BeaconStateTopLevelRoots};
pub use types::{compose_proofs, Chain, ForkVersion, Proof, Root};
pub use versioned::{VersionedBeaconBlock, VersionedBeaconState};
