//! Electra Containers
//!
//! Electra appends nine fields to the beacon state (37 fields, tree depth 6),
//! narrows the attestation lists of the block body and adds execution-layer
//! requests (13 body fields). The execution payload is unchanged from Deneb.

use crate::constants::{
    BEACON_BLOCK_BODY_TREE_DEPTH, EPOCHS_PER_HISTORICAL_VECTOR, EPOCHS_PER_SLASHINGS_VECTOR,
    ETH1_DATA_VOTES_LIMIT, HISTORICAL_ROOTS_LIMIT, MAX_ATTESTATIONS_ELECTRA,
    MAX_ATTESTER_SLASHINGS_ELECTRA, MAX_BLOB_COMMITMENTS_PER_BLOCK, MAX_BLS_TO_EXECUTION_CHANGES,
    MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD, MAX_DEPOSITS, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD,
    MAX_PROPOSER_SLASHINGS, MAX_VOLUNTARY_EXITS, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD,
    PENDING_CONSOLIDATIONS_LIMIT, PENDING_DEPOSITS_LIMIT, PENDING_PARTIAL_WITHDRAWALS_LIMIT,
    SLOTS_PER_HISTORICAL_ROOT, VALIDATOR_REGISTRY_LIMIT,
};
use crate::containers::{
    AttestationElectra, AttesterSlashingElectra, BeaconBlockHeader, Checkpoint, Deposit,
    Eth1Data, Fork, HistoricalSummary, PendingConsolidation, PendingDeposit,
    PendingPartialWithdrawal, ProposerSlashing, SignedBlsToExecutionChange, SignedVoluntaryExit,
    SyncAggregate, SyncCommittee, Validator,
};
use crate::error::ProofError;
use crate::merkle::merkleize;
use crate::ssz::{
    byte_list_root, container_list_root, element_root, justification_bits_root,
    root_list_root, root_vector_root, uint64_list_root, uint64_root, uint64_vector_root,
};
use crate::types::{
    BlsPubkey, BlsSignature, Epoch, ExecutionAddress, Gwei, KzgCommitment, Root, Slot,
    ValidatorIndex, WithdrawalIndex,
};
use ssz_rs::prelude::*;

pub use crate::deneb::{ExecutionPayload, ExecutionPayloadHeader};

pub const BEACON_STATE_FIELD_COUNT: usize = 37;
pub const BLOCK_BODY_FIELD_COUNT: usize = 13;

/// Deposit request from the execution layer
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct DepositRequest {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: [u8; 32],
    pub amount: Gwei,
    pub signature: BlsSignature,
    pub index: u64,
}

/// Withdrawal request from the execution layer
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct WithdrawalRequest {
    pub source_address: ExecutionAddress,
    pub validator_pubkey: BlsPubkey,
    pub amount: Gwei,
}

/// Consolidation request from the execution layer
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct ConsolidationRequest {
    pub source_address: ExecutionAddress,
    pub source_pubkey: BlsPubkey,
    pub target_pubkey: BlsPubkey,
}

/// Requests carried alongside the execution payload
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct ExecutionRequests {
    pub deposits: List<DepositRequest, MAX_DEPOSIT_REQUESTS_PER_PAYLOAD>,
    pub withdrawals: List<WithdrawalRequest, MAX_WITHDRAWAL_REQUESTS_PER_PAYLOAD>,
    pub consolidations: List<ConsolidationRequest, MAX_CONSOLIDATION_REQUESTS_PER_PAYLOAD>,
}

/// Electra block body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconBlockBody {
    pub randao_reveal: BlsSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: [u8; 32],
    pub proposer_slashings: Vec<ProposerSlashing>,
    pub attester_slashings: Vec<AttesterSlashingElectra>,
    pub attestations: Vec<AttestationElectra>,
    pub deposits: Vec<Deposit>,
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
    pub sync_aggregate: SyncAggregate,
    pub execution_payload: ExecutionPayload,
    pub bls_to_execution_changes: Vec<SignedBlsToExecutionChange>,
    pub blob_kzg_commitments: Vec<KzgCommitment>,
    pub execution_requests: ExecutionRequests,
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
            container_list_root(
                "attester_slashings",
                &self.attester_slashings,
                MAX_ATTESTER_SLASHINGS_ELECTRA,
            )?,
            container_list_root("attestations", &self.attestations, MAX_ATTESTATIONS_ELECTRA)?,
            container_list_root("deposits", &self.deposits, MAX_DEPOSITS)?,
            container_list_root("voluntary_exits", &self.voluntary_exits, MAX_VOLUNTARY_EXITS)?,
            element_root(&self.sync_aggregate)?,
            self.execution_payload.hash_tree_root()?,
            container_list_root(
                "bls_to_execution_changes",
                &self.bls_to_execution_changes,
                MAX_BLS_TO_EXECUTION_CHANGES,
            )?,
            container_list_root(
                "blob_kzg_commitments",
                &self.blob_kzg_commitments,
                MAX_BLOB_COMMITMENTS_PER_BLOCK,
            )?,
            element_root(&self.execution_requests)?,
        ])
    }

    /// # Errors
    /// Fails if an operation list or the payload exceeds a limit.
    pub fn hash_tree_root(&self) -> Result<Root, ProofError> {
        merkleize(&self.field_roots()?, BEACON_BLOCK_BODY_TREE_DEPTH)
    }
}

/// Electra beacon block
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

/// Electra beacon state
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
    pub deposit_requests_start_index: u64,
    pub deposit_balance_to_consume: Gwei,
    pub exit_balance_to_consume: Gwei,
    pub earliest_exit_epoch: Epoch,
    pub consolidation_balance_to_consume: Gwei,
    pub earliest_consolidation_epoch: Epoch,
    pub pending_deposits: Vec<PendingDeposit>,
    pub pending_partial_withdrawals: Vec<PendingPartialWithdrawal>,
    pub pending_consolidations: Vec<PendingConsolidation>,
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
            deposit_requests_start_index: u64::MAX,
            deposit_balance_to_consume: 0,
            exit_balance_to_consume: 0,
            earliest_exit_epoch: 0,
            consolidation_balance_to_consume: 0,
            earliest_consolidation_epoch: 0,
            pending_deposits: Vec::new(),
            pending_partial_withdrawals: Vec::new(),
            pending_consolidations: Vec::new(),
        }
    }
}

impl BeaconState {
    /// Roots of all 37 top-level fields in declaration order.
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
            uint64_root(self.deposit_requests_start_index),
            uint64_root(self.deposit_balance_to_consume),
            uint64_root(self.exit_balance_to_consume),
            uint64_root(self.earliest_exit_epoch),
            uint64_root(self.consolidation_balance_to_consume),
            uint64_root(self.earliest_consolidation_epoch),
            container_list_root("pending_deposits", &self.pending_deposits, PENDING_DEPOSITS_LIMIT)?,
            container_list_root(
                "pending_partial_withdrawals",
                &self.pending_partial_withdrawals,
                PENDING_PARTIAL_WITHDRAWALS_LIMIT,
            )?,
            container_list_root(
                "pending_consolidations",
                &self.pending_consolidations,
                PENDING_CONSOLIDATIONS_LIMIT,
            )?,
        ])
    }
}
