//! Protocol Constants
//!
//! Mainnet preset limits, container field indices and the tree depths derived
//! from them. Depths are `ceil(log2(chunks))` for the declared capacity.

/// Seconds per slot on every supported network
pub const SECONDS_PER_SLOT: u64 = 12;

// Vector lengths
pub const SLOTS_PER_HISTORICAL_ROOT: usize = 8192;
pub const EPOCHS_PER_HISTORICAL_VECTOR: usize = 65_536;
pub const EPOCHS_PER_SLASHINGS_VECTOR: usize = 8192;
pub const SYNC_COMMITTEE_SIZE: usize = 512;
pub const BYTES_PER_LOGS_BLOOM: usize = 256;

// List limits
pub const HISTORICAL_ROOTS_LIMIT: usize = 1 << 24;
pub const VALIDATOR_REGISTRY_LIMIT: usize = 1 << 40;
pub const ETH1_DATA_VOTES_LIMIT: usize = 2048;
pub const MAX_VALIDATORS_PER_COMMITTEE: usize = 2048;
pub const MAX_COMMITTEES_PER_SLOT: usize = 64;
pub const MAX_PROPOSER_SLASHINGS: usize = 16;
pub const MAX_ATTESTER_SLASHINGS: usize = 2;
pub const MAX_ATTESTATIONS: usize = 128;
pub const MAX_DEPOSITS: usize = 16;
pub const MAX_VOLUNTARY_EXITS: usize = 16;
pub const MAX_BLS_TO_EXECUTION_CHANGES: usize = 16;
pub const MAX_BLOB_COMMITMENTS_PER_BLOCK: usize = 4096;
pub const MAX_WITHDRAWALS_PER_PAYLOAD: usize = 16;
pub const MAX_TRANSACTIONS_PER_PAYLOAD: usize = 1 << 20;
pub const MAX_BYTES_PER_TRANSACTION: usize = 1 << 30;
pub const MAX_EXTRA_DATA_BYTES: usize = 32;

// Electra list limits
pub const MAX_ATTESTER_SLASHINGS_ELECTRA: usize = 1;
pub const MAX_ATTESTATIONS_ELECTRA: usize = 8;
pub const PENDING_DEPOSITS_LIMIT: usize = 1 << 27;
pub const PENDING_PARTIAL_WITHDRAWALS_LIMIT: usize = 1 << 27;
pub const PENDING_CONSOLIDATIONS_LIMIT: usize = 1 << 18;
pub const MAX_DEPOSIT_REQUESTS_PER_PAYLOAD: usize = 8192;
pub const MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD: usize = 16;
pub const MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD: usize = 2;

// BeaconState field indices, stable across Capella, Deneb and Electra
pub const SLOT_INDEX: u64 = 2;
pub const LATEST_BLOCK_HEADER_INDEX: u64 = 4;
pub const BLOCK_ROOTS_INDEX: u64 = 5;
pub const VALIDATORS_INDEX: u64 = 11;
pub const BALANCES_INDEX: u64 = 12;
pub const HISTORICAL_SUMMARIES_INDEX: u64 = 27;

// BeaconBlockHeader field indices
pub const HEADER_SLOT_INDEX: u64 = 0;
pub const HEADER_PROPOSER_INDEX: u64 = 1;
pub const HEADER_PARENT_ROOT_INDEX: u64 = 2;
pub const HEADER_STATE_ROOT_INDEX: u64 = 3;
pub const HEADER_BODY_ROOT_INDEX: u64 = 4;

// BeaconBlockBody and ExecutionPayload field indices
pub const EXECUTION_PAYLOAD_INDEX: u64 = 9;
pub const TIMESTAMP_INDEX: u64 = 9;
pub const WITHDRAWALS_INDEX: u64 = 14;

// HistoricalSummary field index
pub const BLOCK_SUMMARY_ROOT_INDEX: u64 = 0;

// Tree depths
pub const BEACON_BLOCK_HEADER_TREE_DEPTH: u32 = 3;
pub const BEACON_BLOCK_BODY_TREE_DEPTH: u32 = 4;
pub const VALIDATOR_CONTAINER_TREE_DEPTH: u32 = 3;
pub const WITHDRAWAL_CONTAINER_TREE_DEPTH: u32 = 2;
pub const HISTORICAL_SUMMARY_TREE_DEPTH: u32 = 1;
pub const VALIDATOR_TREE_DEPTH: u32 = 40;
/// Balances pack four `u64` per chunk: `log2(2^40 / 4)`
pub const BALANCE_TREE_DEPTH: u32 = 38;
pub const HISTORICAL_SUMMARIES_TREE_DEPTH: u32 = 24;
pub const WITHDRAWALS_TREE_DEPTH: u32 = 4;
pub const BLOCK_ROOTS_TREE_DEPTH: u32 = 13;

/// Number of roots in an expanded validator container
pub const VALIDATOR_FIELD_COUNT: usize = 8;
/// Number of roots in an expanded withdrawal container
pub const WITHDRAWAL_FIELD_COUNT: usize = 4;
