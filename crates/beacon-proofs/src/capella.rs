//! Capella Containers
//!
//! Beacon state (28 fields), block body (11 fields) and execution payload
//! (15 fields) for the Capella fork. Each container lists its field roots as a
//! fixed-size array in declaration order; that array is the leaf set of the
//! container's tree.

use crate::constants::{
    BEACON_BLOCK_BODY_TREE_DEPTH, BYTES_PER_LOGS_BLOOM, EPOCHS_PER_HISTORICAL_VECTOR,
    EPOCHS_PER_SLASHINGS_VECTOR,
    ETH1_DATA_VOTES_LIMIT, HISTORICAL_ROOTS_LIMIT, MAX_ATTESTATIONS, MAX_ATTESTER_SLASHINGS,
    MAX_BLS_TO_EXECUTION_CHANGES, MAX_DEPOSITS, MAX_EXTRA_DATA_BYTES,
    MAX_PROPOSER_SLASHINGS, MAX_VOLUNTARY_EXITS, MAX_WITHDRAWALS_PER_PAYLOAD,
    SLOTS_PER_HISTORICAL_ROOT, VALIDATOR_REGISTRY_LIMIT,
};
use crate::containers::{
    Attestation, AttesterSlashing, BeaconBlockHeader, Checkpoint, Deposit, Eth1Data, Fork,
    HistoricalSummary, ProposerSlashing, SignedBlsToExecutionChange, SignedVoluntaryExit,
    SyncAggregate, SyncCommittee, Validator, Withdrawal,
};
use crate::error::ProofError;
use crate::merkle::merkleize;
use crate::ssz::{
    byte_list_root, container_list_root, element_root, justification_bits_root,
    root_list_root, root_vector_root, transactions_root, uint64_list_root, uint64_root,
    uint64_vector_root,
};
use crate::types::{
    BlsSignature, ExecutionAddress, ForkVersion, Gwei, Root, Slot, ValidatorIndex,
    WithdrawalIndex,
};
use ssz_rs::prelude::Vector;

pub const BEACON_STATE_FIELD_COUNT: usize = 28;
pub const BLOCK_BODY_FIELD_COUNT: usize = 11;
pub const EXECUTION_PAYLOAD_FIELD_COUNT: usize = 15;

const FORK: ForkVersion = ForkVersion::Capella;

/// Capella execution payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPayload {
    pub parent_hash: Root,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Root,
    pub receipts_root: Root,
    pub logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    pub prev_randao: Root,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    /// uint256, little-endian
    pub base_fee_per_gas: [u8; 32],
    pub block_hash: Root,
    pub transactions: Vec<Vec<u8>>,
    pub withdrawals: Vec<Withdrawal>,
}

impl ExecutionPayload {
    /// # Errors
    /// Fails if a list exceeds its limit.
    pub fn field_roots(&self) -> Result<[Root; EXECUTION_PAYLOAD_FIELD_COUNT], ProofError> {
        Ok([
            self.parent_hash,
            element_root(&self.fee_recipient)?,
            self.state_root,
            self.receipts_root,
            element_root(&self.logs_bloom)?,
            self.prev_randao,
            uint64_root(self.block_number),
            uint64_root(self.gas_limit),
            uint64_root(self.gas_used),
            uint64_root(self.timestamp),
            byte_list_root("extra_data", &self.extra_data, MAX_EXTRA_DATA_BYTES)?,
            self.base_fee_per_gas,
            self.block_hash,
            transactions_root(&self.transactions)?,
            container_list_root("withdrawals", &self.withdrawals, MAX_WITHDRAWALS_PER_PAYLOAD)?,
        ])
    }

    /// # Errors
    /// Fails if a list exceeds its limit.
    pub fn hash_tree_root(&self) -> Result<Root, ProofError> {
        merkleize(&self.field_roots()?, FORK.execution_payload_tree_depth())
    }

    /// The header committing to this payload.
    ///
    /// # Errors
    /// Fails if a list exceeds its limit.
    pub fn to_header(&self) -> Result<ExecutionPayloadHeader, ProofError> {
        let roots = self.field_roots()?;
        Ok(ExecutionPayloadHeader {
            parent_hash: self.parent_hash,
            fee_recipient: self.fee_recipient,
            state_root: self.state_root,
            receipts_root: self.receipts_root,
            logs_bloom: self.logs_bloom.clone(),
            prev_randao: self.prev_randao,
            block_number: self.block_number,
            gas_limit: self.gas_limit,
            gas_used: self.gas_used,
            timestamp: self.timestamp,
            extra_data: self.extra_data.clone(),
            base_fee_per_gas: self.base_fee_per_gas,
            block_hash: self.block_hash,
            transactions_root: roots[13],
            withdrawals_root: roots[14],
        })
    }
}

/// Capella execution payload header, as stored in the beacon state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPayloadHeader {
    pub parent_hash: Root,
    pub fee_recipient: ExecutionAddress,
    pub state_root: Root,
    pub receipts_root: Root,
    pub logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    pub prev_randao: Root,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: Vec<u8>,
    pub base_fee_per_gas: [u8; 32],
    pub block_hash: Root,
    pub transactions_root: Root,
    pub withdrawals_root: Root,
}

impl ExecutionPayloadHeader {
    /// # Errors
    /// Fails if `extra_data` exceeds its limit.
    pub fn field_roots(&self) -> Result<[Root; EXECUTION_PAYLOAD_FIELD_COUNT], ProofError> {
        Ok([
            self.parent_hash,
            element_root(&self.fee_recipient)?,
            self.state_root,
            self.receipts_root,
            element_root(&self.logs_bloom)?,
            self.prev_randao,
            uint64_root(self.block_number),
            uint64_root(self.gas_limit),
            uint64_root(self.gas_used),
            uint64_root(self.timestamp),
            byte_list_root("extra_data", &self.extra_data, MAX_EXTRA_DATA_BYTES)?,
            self.base_fee_per_gas,
            self.block_hash,
            self.transactions_root,
            self.withdrawals_root,
        ])
    }

    /// # Errors
    /// Fails if `extra_data` exceeds its limit.
    pub fn hash_tree_root(&self) -> Result<Root, ProofError> {
        merkleize(&self.field_roots()?, FORK.execution_payload_tree_depth())
    }
}

/// Capella block body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: [u8; 32],
    pub proposer_slashings: Vec<ProposerSlashing>,
    pub attester_slashings: Vec<AttesterSlashing>,
    pub attestations: Vec<Attestation>,
    pub deposits: Vec<Deposit>,
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
    pub bls_to_execution_changes: Vec<SignedBlsToExecutionChange>,
}

impl BeaconBlockBody {
    /// # Errors
    /// Fails if an operation list or the payload exceeds a limit.
    pub fn field_roots(&self) -> Result<[Root; BLOCK_BODY_FIELD_COUNT], ProofError> {
        Ok([
            element_root(&self.randao_reveal)?,
            element_root(&self.eth1_data)?,
            self.graffiti,
            container_list_root("proposer_slashings", &self.proposer_slashings, MAX_PROPOSER_SLASHINGS)?,
            container_list_root("attester_slashings", &self.attester_slashings, MAX_ATTESTER_SLASHINGS)?,
            container_list_root("attestations", &self.attestations, MAX_ATTESTATIONS)?,
            container_list_root("deposits", &self.deposits, MAX_DEPOSITS)?,
            container_list_root("voluntary_exits", &self.voluntary_exits, MAX_VOLUNTARY_EXITS)?,
            element_root(&self.sync_aggregate)?,
            self.execution_payload.hash_tree_root()?,
            container_list_root(
                "bls_to_execution_changes",
                &self.bls_to_execution_changes,
                MAX_BLS_TO_EXECUTION_CHANGES,
            )?,
        ])
    }

    /// # Errors
    /// Fails if an operation list or the payload exceeds a limit.
    pub fn hash_tree_root(&self) -> Result<Root, ProofError> {
        merkleize(&self.field_roots()?, BEACON_BLOCK_BODY_TREE_DEPTH)
    }
}

/// Capella beacon block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconBlock {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body: BeaconBlockBody,
}

impl BeaconBlock {
    /// Header of this block, with the body replaced by its root.
    ///
    /// # Errors
    /// Fails if the body cannot be merkleized.
    pub fn header(&self) -> Result<BeaconBlockHeader, ProofError> {
        Ok(BeaconBlockHeader {
            slot: self.slot,
            proposer_index: self.proposer_index,
            parent_root: self.parent_root,
            state_root: self.state_root,
            body_root: self.body.hash_tree_root()?,
        })
    }
}

/// Capella beacon state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconState {
    pub genesis_time: u64,
    pub genesis_validators_root: Root,
    pub slot: Slot,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: Vec<Root>,
    pub state_roots: Vec<Root>,
    pub historical_roots: Vec<Root>,
    pub eth1_data: Eth1Data,
    pub eth1_data_votes: Vec<Eth1Data>,
    pub eth1_deposit_index: u64,
    pub validators: Vec<Validator>,
    pub balances: Vec<Gwei>,
    pub randao_mixes: Vec<Root>,
    pub slashings: Vec<Gwei>,
    pub previous_epoch_participation: Vec<u8>,
    pub current_epoch_participation: Vec<u8>,
    /// `Bitvector[4]` in the low bits
    pub justification_bits: u8,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,
    pub inactivity_scores: Vec<u64>,
    pub current_sync_committee: SyncCommittee,
    pub next_sync_committee: SyncCommittee,
    pub latest_execution_payload_header: ExecutionPayloadHeader,
    pub next_withdrawal_index: WithdrawalIndex,
    pub next_withdrawal_validator_index: ValidatorIndex,
    pub historical_summaries: Vec<HistoricalSummary>,
}

impl Default for BeaconState {
    /// An empty state with every fixed-length vector at its protocol length.
    fn default() -> Self {
        Self {
            genesis_time: 0,
            genesis_validators_root: [0; 32],
            slot: 0,
            fork: Fork::default(),
            latest_block_header: BeaconBlockHeader::default(),
            block_roots: vec![[0; 32]; SLOTS_PER_HISTORICAL_ROOT],
            state_roots: vec![[0; 32]; SLOTS_PER_HISTORICAL_ROOT],
            historical_roots: Vec::new(),
            eth1_data: Eth1Data::default(),
            eth1_data_votes: Vec::new(),
            eth1_deposit_index: 0,
            validators: Vec::new(),
            balances: Vec::new(),
            randao_mixes: vec![[0; 32]; EPOCHS_PER_HISTORICAL_VECTOR],
            slashings: vec![0; EPOCHS_PER_SLASHINGS_VECTOR],
            previous_epoch_participation: Vec::new(),
            current_epoch_participation: Vec::new(),
            justification_bits: 0,
            previous_justified_checkpoint: Checkpoint::default(),
            current_justified_checkpoint: Checkpoint::default(),
            finalized_checkpoint: Checkpoint::default(),
            inactivity_scores: Vec::new(),
            current_sync_committee: SyncCommittee::default(),
            next_sync_committee: SyncCommittee::default(),
            latest_execution_payload_header: ExecutionPayloadHeader::default(),
            next_withdrawal_index: 0,
            next_withdrawal_validator_index: 0,
            historical_summaries: Vec::new(),
        }
    }
}

impl BeaconState {
    /// Roots of all 28 top-level fields in declaration order.
    ///
    /// # Errors
    /// Fails if a vector has the wrong length or a list exceeds its limit.
    pub fn top_level_field_roots(&self) -> Result<[Root; BEACON_STATE_FIELD_COUNT], ProofError> {
        Ok([
            uint64_root(self.genesis_time),
            self.genesis_validators_root,
            uint64_root(self.slot),
            element_root(&self.fork)?,
            element_root(&self.latest_block_header)?,
            root_vector_root("block_roots", &self.block_roots, SLOTS_PER_HISTORICAL_ROOT)?,
            root_vector_root("state_roots", &self.state_roots, SLOTS_PER_HISTORICAL_ROOT)?,
            root_list_root("historical_roots", &self.historical_roots, HISTORICAL_ROOTS_LIMIT)?,
            element_root(&self.eth1_data)?,
            container_list_root("eth1_data_votes", &self.eth1_data_votes, ETH1_DATA_VOTES_LIMIT)?,
            uint64_root(self.eth1_deposit_index),
            container_list_root("validators", &self.validators, VALIDATOR_REGISTRY_LIMIT)?,
            uint64_list_root("balances", &self.balances, VALIDATOR_REGISTRY_LIMIT)?,
            root_vector_root("randao_mixes", &self.randao_mixes, EPOCHS_PER_HISTORICAL_VECTOR)?,
            uint64_vector_root("slashings", &self.slashings, EPOCHS_PER_SLASHINGS_VECTOR)?,
            byte_list_root(
                "previous_epoch_participation",
                &self.previous_epoch_participation,
                VALIDATOR_REGISTRY_LIMIT,
            )?,
            byte_list_root(
                "current_epoch_participation",
                &self.current_epoch_participation,
                VALIDATOR_REGISTRY_LIMIT,
            )?,
            justification_bits_root(self.justification_bits)?,
            element_root(&self.previous_justified_checkpoint)?,
            element_root(&self.current_justified_checkpoint)?,
            element_root(&self.finalized_checkpoint)?,
            uint64_list_root("inactivity_scores", &self.inactivity_scores, VALIDATOR_REGISTRY_LIMIT)?,
            element_root(&self.current_sync_committee)?,
            element_root(&self.next_sync_committee)?,
            self.latest_execution_payload_header.hash_tree_root()?,
            uint64_root(self.next_withdrawal_index),
            uint64_root(self.next_withdrawal_validator_index),
            container_list_root(
                "historical_summaries",
                &self.historical_summaries,
                HISTORICAL_ROOTS_LIMIT,
            )?,
        ])
    }
}
