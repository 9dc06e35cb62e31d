//! Whole-container roots against `ssz_rs`.
//!
//! The beacon state, block body and execution payload of every fork are
//! merkleized field by field inside the crate. Here the same data is poured
//! into `#[derive(SimpleSerialize)]` containers declared with mainnet limits and
//! hashed by `ssz_rs`; both roots must agree.

use beacon_proofs::constants::{
    BYTES_PER_LOGS_BLOOM, EPOCHS_PER_HISTORICAL_VECTOR, EPOCHS_PER_SLASHINGS_VECTOR,
    ETH1_DATA_VOTES_LIMIT, HISTORICAL_ROOTS_LIMIT, MAX_ATTESTATIONS, MAX_ATTESTATIONS_ELECTRA,
    MAX_ATTESTER_SLASHINGS, MAX_ATTESTER_SLASHINGS_ELECTRA, MAX_BLOB_COMMITMENTS_PER_BLOCK,
    MAX_BLS_TO_EXECUTION_CHANGES, MAX_BYTES_PER_TRANSACTION, MAX_DEPOSITS, MAX_EXTRA_DATA_BYTES,
    MAX_PROPOSER_SLASHINGS, MAX_TRANSACTIONS_PER_PAYLOAD, MAX_VOLUNTARY_EXITS,
    MAX_WITHDRAWALS_PER_PAYLOAD, PENDING_CONSOLIDATIONS_LIMIT, PENDING_DEPOSITS_LIMIT,
    PENDING_PARTIAL_WITHDRAWALS_LIMIT, SLOTS_PER_HISTORICAL_ROOT, VALIDATOR_REGISTRY_LIMIT,
};
use beacon_proofs::containers::{
    Attestation, AttestationData, AttestationElectra, AttesterSlashing, AttesterSlashingElectra,
    BlsToExecutionChange, Checkpoint, Deposit, Eth1Data, Fork, PendingConsolidation,
    PendingDeposit, PendingPartialWithdrawal, ProposerSlashing, SignedBlsToExecutionChange,
    SignedVoluntaryExit, SyncAggregate, SyncCommittee, VoluntaryExit,
};
use beacon_proofs::electra::{DepositRequest, ExecutionRequests, WithdrawalRequest};
use beacon_proofs::types::{BlsPubkey, BlsSignature, KzgCommitment};
use beacon_proofs::{
    capella, deneb, electra, BeaconBlockHeader, HistoricalSummary, Root, Validator,
    VersionedBeaconBlock, VersionedBeaconState, Withdrawal,
};
use ssz_rs::prelude::*;
use std::fmt::Debug;

const GENESIS_TIME: u64 = 1_606_824_023;
const SLOT: u64 = 9_000_123;

type Transaction = List<u8, MAX_BYTES_PER_TRANSACTION>;

fn ssz_root<T: HashTreeRoot>(value: &T) -> Root {
    value.hash_tree_root().expect("ssz_rs root").into()
}

fn list<T: SimpleSerialize + Clone + Debug, const N: usize>(items: &[T]) -> List<T, N> {
    List::try_from(items.to_vec()).expect("within limit")
}

fn vector<T: SimpleSerialize + Clone + Debug, const N: usize>(items: &[T]) -> Vector<T, N> {
    Vector::try_from(items.to_vec()).expect("exact length")
}

fn justification_bits(bits: u8) -> Bitvector<4> {
    let mut vector = Bitvector::<4>::default();
    for i in 0..4 {
        vector.set(i, (bits >> i) & 1 == 1);
    }
    vector
}

fn transactions(txs: &[Vec<u8>]) -> List<Transaction, MAX_TRANSACTIONS_PER_PAYLOAD> {
    list(&txs.iter().map(|tx| list(tx)).collect::<Vec<Transaction>>())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct CapellaPayload {
    parent_hash: [u8; 32],
    fee_recipient: [u8; 20],
    state_root: [u8; 32],
    receipts_root: [u8; 32],
    logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    prev_randao: [u8; 32],
    block_number: u64,
    gas_limit: u64,
    gas_used: u64,
    timestamp: u64,
    extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    base_fee_per_gas: [u8; 32],
    block_hash: [u8; 32],
    transactions: List<Transaction, MAX_TRANSACTIONS_PER_PAYLOAD>,
    withdrawals: List<Withdrawal, MAX_WITHDRAWALS_PER_PAYLOAD>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct DenebPayload {
    parent_hash: [u8; 32],
    fee_recipient: [u8; 20],
    state_root: [u8; 32],
    receipts_root: [u8; 32],
    logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    prev_randao: [u8; 32],
    block_number: u64,
    gas_limit: u64,
    gas_used: u64,
    timestamp: u64,
    extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    base_fee_per_gas: [u8; 32],
    block_hash: [u8; 32],
    transactions: List<Transaction, MAX_TRANSACTIONS_PER_PAYLOAD>,
    withdrawals: List<Withdrawal, MAX_WITHDRAWALS_PER_PAYLOAD>,
    blob_gas_used: u64,
    excess_blob_gas: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct CapellaPayloadHeader {
    parent_hash: [u8; 32],
    fee_recipient: [u8; 20],
    state_root: [u8; 32],
    receipts_root: [u8; 32],
    logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    prev_randao: [u8; 32],
    block_number: u64,
    gas_limit: u64,
    gas_used: u64,
    timestamp: u64,
    extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    base_fee_per_gas: [u8; 32],
    block_hash: [u8; 32],
    transactions_root: [u8; 32],
    withdrawals_root: [u8; 32],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct DenebPayloadHeader {
    parent_hash: [u8; 32],
    fee_recipient: [u8; 20],
    state_root: [u8; 32],
    receipts_root: [u8; 32],
    logs_bloom: Vector<u8, BYTES_PER_LOGS_BLOOM>,
    prev_randao: [u8; 32],
    block_number: u64,
    gas_limit: u64,
    gas_used: u64,
    timestamp: u64,
    extra_data: List<u8, MAX_EXTRA_DATA_BYTES>,
    base_fee_per_gas: [u8; 32],
    block_hash: [u8; 32],
    transactions_root: [u8; 32],
    withdrawals_root: [u8; 32],
    blob_gas_used: u64,
    excess_blob_gas: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct CapellaBody {
    randao_reveal: BlsSignature,
    eth1_data: Eth1Data,
    graffiti: [u8; 32],
    proposer_slashings: List<ProposerSlashing, MAX_PROPOSER_SLASHINGS>,
    attester_slashings: List<AttesterSlashing, MAX_ATTESTER_SLASHINGS>,
    attestations: List<Attestation, MAX_ATTESTATIONS>,
    deposits: List<Deposit, MAX_DEPOSITS>,
    voluntary_exits: List<SignedVoluntaryExit, MAX_VOLUNTARY_EXITS>,
    sync_aggregate: SyncAggregate,
    execution_payload: CapellaPayload,
    bls_to_execution_changes: List<SignedBlsToExecutionChange, MAX_BLS_TO_EXECUTION_CHANGES>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct DenebBody {
    randao_reveal: BlsSignature,
    eth1_data: Eth1Data,
    graffiti: [u8; 32],
    proposer_slashings: List<ProposerSlashing, MAX_PROPOSER_SLASHINGS>,
    attester_slashings: List<AttesterSlashing, MAX_ATTESTER_SLASHINGS>,
    attestations: List<Attestation, MAX_ATTESTATIONS>,
    deposits: List<Deposit, MAX_DEPOSITS>,
    voluntary_exits: List<SignedVoluntaryExit, MAX_VOLUNTARY_EXITS>,
    sync_aggregate: SyncAggregate,
    execution_payload: DenebPayload,
    bls_to_execution_changes: List<SignedBlsToExecutionChange, MAX_BLS_TO_EXECUTION_CHANGES>,
    blob_kzg_commitments: List<KzgCommitment, MAX_BLOB_COMMITMENTS_PER_BLOCK>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
struct ElectraBody {
    randao_reveal: BlsSignature,
    eth1_data: Eth1Data,
    graffiti: [u8; 32],
    proposer_slashings: List<ProposerSlashing, MAX_PROPOSER_SLASHINGS>,
    attester_slashings: List<AttesterSlashingElectra, MAX_ATTESTER_SLASHINGS_ELECTRA>,
    attestations: List<AttestationElectra, MAX_ATTESTATIONS_ELECTRA>,
    deposits: List<Deposit, MAX_DEPOSITS>,
    voluntary_exits: List<SignedVoluntaryExit, MAX_VOLUNTARY_EXITS>,
    sync_aggregate: SyncAggregate,
    execution_payload: DenebPayload,
    bls_to_execution_changes: List<SignedBlsToExecutionChange, MAX_BLS_TO_EXECUTION_CHANGES>,
    blob_kzg_commitments: List<KzgCommitment, MAX_BLOB_COMMITMENTS_PER_BLOCK>,
    execution_requests: ExecutionRequests,
}

/// Declares a beacon state container: the 28 Capella fields, then any extras.
macro_rules! state_container {
    ($name:ident, $header:ty $(, $field:ident: $ty:ty)* $(,)?) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
        struct $name {
            genesis_time: u64,
            genesis_validators_root: [u8; 32],
            slot: u64,
            fork: Fork,
            latest_block_header: BeaconBlockHeader,
            block_roots: Vector<[u8; 32], SLOTS_PER_HISTORICAL_ROOT>,
            state_roots: Vector<[u8; 32], SLOTS_PER_HISTORICAL_ROOT>,
            historical_roots: List<[u8; 32], HISTORICAL_ROOTS_LIMIT>,
            eth1_data: Eth1Data,
            eth1_data_votes: List<Eth1Data, ETH1_DATA_VOTES_LIMIT>,
            eth1_deposit_index: u64,
            validators: List<Validator, VALIDATOR_REGISTRY_LIMIT>,
            balances: List<u64, VALIDATOR_REGISTRY_LIMIT>,
            randao_mixes: Vector<[u8; 32], EPOCHS_PER_HISTORICAL_VECTOR>,
            slashings: Vector<u64, EPOCHS_PER_SLASHINGS_VECTOR>,
            previous_epoch_participation: List<u8, VALIDATOR_REGISTRY_LIMIT>,
            current_epoch_participation: List<u8, VALIDATOR_REGISTRY_LIMIT>,
            justification_bits: Bitvector<4>,
            previous_justified_checkpoint: Checkpoint,
            current_justified_checkpoint: Checkpoint,
            finalized_checkpoint: Checkpoint,
            inactivity_scores: List<u64, VALIDATOR_REGISTRY_LIMIT>,
            current_sync_committee: SyncCommittee,
            next_sync_committee: SyncCommittee,
            latest_execution_payload_header: $header,
            next_withdrawal_index: u64,
            next_withdrawal_validator_index: u64,
            historical_summaries: List<HistoricalSummary, HISTORICAL_ROOTS_LIMIT>,
            $($field: $ty,)*
        }
    };
}

state_container!(CapellaState, CapellaPayloadHeader);
state_container!(DenebState, DenebPayloadHeader);
state_container!(
    ElectraState,
    DenebPayloadHeader,
    deposit_requests_start_index: u64,
    deposit_balance_to_consume: u64,
    exit_balance_to_consume: u64,
    earliest_exit_epoch: u64,
    consolidation_balance_to_consume: u64,
    earliest_consolidation_epoch: u64,
    pending_deposits: List<PendingDeposit, PENDING_DEPOSITS_LIMIT>,
    pending_partial_withdrawals: List<PendingPartialWithdrawal, PENDING_PARTIAL_WITHDRAWALS_LIMIT>,
    pending_consolidations: List<PendingConsolidation, PENDING_CONSOLIDATIONS_LIMIT>,
);

/// Copies the 28 shared state fields into an `ssz_rs` container.
macro_rules! to_state_container {
    ($name:ident, $state:ident, $header:expr $(, $field:ident: $value:expr)* $(,)?) => {
        $name {
            genesis_time: $state.genesis_time,
            genesis_validators_root: $state.genesis_validators_root,
            slot: $state.slot,
            fork: $state.fork.clone(),
            latest_block_header: $state.latest_block_header.clone(),
            block_roots: vector(&$state.block_roots),
            state_roots: vector(&$state.state_roots),
            historical_roots: list(&$state.historical_roots),
            eth1_data: $state.eth1_data.clone(),
            eth1_data_votes: list(&$state.eth1_data_votes),
            eth1_deposit_index: $state.eth1_deposit_index,
            validators: list(&$state.validators),
            balances: list(&$state.balances),
            randao_mixes: vector(&$state.randao_mixes),
            slashings: vector(&$state.slashings),
            previous_epoch_participation: list(&$state.previous_epoch_participation),
            current_epoch_participation: list(&$state.current_epoch_participation),
            justification_bits: justification_bits($state.justification_bits),
            previous_justified_checkpoint: $state.previous_justified_checkpoint.clone(),
            current_justified_checkpoint: $state.current_justified_checkpoint.clone(),
            finalized_checkpoint: $state.finalized_checkpoint.clone(),
            inactivity_scores: list(&$state.inactivity_scores),
            current_sync_committee: $state.current_sync_committee.clone(),
            next_sync_committee: $state.next_sync_committee.clone(),
            latest_execution_payload_header: $header,
            next_withdrawal_index: $state.next_withdrawal_index,
            next_withdrawal_validator_index: $state.next_withdrawal_validator_index,
            historical_summaries: list(&$state.historical_summaries),
            $($field: $value,)*
        }
    };
}

/// Fills the 28 shared state fields with non-default values.
macro_rules! populate_state {
    ($state:ident, $header:expr) => {
        $state.genesis_time = GENESIS_TIME;
        $state.genesis_validators_root = [0x4b; 32];
        $state.slot = SLOT;
        $state.fork = Fork {
            previous_version: [3, 0, 0, 0],
            current_version: [4, 0, 0, 0],
            epoch: 269_568,
        };
        $state.latest_block_header = BeaconBlockHeader {
            slot: SLOT,
            proposer_index: 77,
            parent_root: [0x01; 32],
            state_root: [0; 32],
            body_root: [0x02; 32],
        };
        $state.block_roots = (0..SLOTS_PER_HISTORICAL_ROOT as u64).map(|i| seeded_root(i, 0xb1)).collect();
        $state.state_roots = (0..SLOTS_PER_HISTORICAL_ROOT as u64).map(|i| seeded_root(i, 0x5e)).collect();
        $state.historical_roots = (0..3).map(|i| seeded_root(i, 0x4e)).collect();
        $state.eth1_data = eth1_data(1_234_567);
        $state.eth1_data_votes = vec![eth1_data(1_234_560), eth1_data(1_234_567)];
        $state.eth1_deposit_index = 1_234_000;
        $state.validators = (0..5).map(validator).collect();
        $state.balances = (0..5).map(|i| 32_000_000_000 + i * 1_000).collect();
        $state.randao_mixes[0] = [0x7a; 32];
        $state.randao_mixes[EPOCHS_PER_HISTORICAL_VECTOR - 1] = [0x7b; 32];
        $state.slashings[7] = 64_000_000_000;
        $state.previous_epoch_participation = vec![0b111, 0b011, 0, 0b001, 0b111];
        $state.current_epoch_participation = vec![0b011, 0b011, 0b001, 0, 0b111];
        $state.justification_bits = 0b1011;
        $state.previous_justified_checkpoint = checkpoint(281_259);
        $state.current_justified_checkpoint = checkpoint(281_260);
        $state.finalized_checkpoint = checkpoint(281_258);
        $state.inactivity_scores = vec![0, 4, 0, 16, 0];
        $state.current_sync_committee = SyncCommittee {
            aggregate_pubkey: pubkey(0xc1),
            ..SyncCommittee::default()
        };
        $state.next_sync_committee = SyncCommittee {
            aggregate_pubkey: pubkey(0xc2),
            ..SyncCommittee::default()
        };
        $state.latest_execution_payload_header = $header;
        $state.next_withdrawal_index = 44_000_000;
        $state.next_withdrawal_validator_index = 3;
        $state.historical_summaries = (0..4)
            .map(|i| HistoricalSummary {
                block_summary_root: seeded_root(i, 0xbb),
                state_summary_root: seeded_root(i, 0x55),
            })
            .collect();
    };
}

fn seeded_root(seed: u64, tag: u8) -> Root {
    let mut root = [tag; 32];
    root[..8].copy_from_slice(&seed.to_le_bytes());
    root
}

fn pubkey(seed: u8) -> BlsPubkey {
    vector(&[seed; 48])
}

fn signature(seed: u8) -> BlsSignature {
    vector(&[seed; 96])
}

fn checkpoint(epoch: u64) -> Checkpoint {
    Checkpoint {
        epoch,
        root: seeded_root(epoch, 0xcc),
    }
}

fn eth1_data(deposit_count: u64) -> Eth1Data {
    Eth1Data {
        deposit_root: seeded_root(deposit_count, 0xd0),
        deposit_count,
        block_hash: seeded_root(deposit_count, 0xd1),
    }
}

fn validator(i: u64) -> Validator {
    let mut withdrawal_credentials = [0u8; 32];
    withdrawal_credentials[0] = 0x01;
    withdrawal_credentials[12..].fill(i as u8);
    Validator {
        pubkey: pubkey(0x90 + i as u8),
        withdrawal_credentials,
        effective_balance: 32_000_000_000,
        slashed: i == 2,
        activation_eligibility_epoch: i,
        activation_epoch: i + 1,
        exit_epoch: if i == 4 { 290_000 } else { u64::MAX },
        withdrawable_epoch: if i == 4 { 290_256 } else { u64::MAX },
    }
}

fn withdrawals() -> Vec<Withdrawal> {
    (0..3)
        .map(|i| Withdrawal {
            index: 44_000_000 + i,
            validator_index: i * 7,
            address: [0x5a; 20],
            amount: 1_000_000 + i,
        })
        .collect()
}

fn logs_bloom() -> Vector<u8, BYTES_PER_LOGS_BLOOM> {
    let mut bloom = vec![0u8; BYTES_PER_LOGS_BLOOM];
    bloom[3] = 0x40;
    bloom[BYTES_PER_LOGS_BLOOM - 1] = 0x01;
    vector(&bloom)
}

fn base_fee_per_gas() -> [u8; 32] {
    let mut fee = [0u8; 32];
    fee[..8].copy_from_slice(&13_500_000_000_u64.to_le_bytes());
    fee
}

fn capella_payload() -> capella::ExecutionPayload {
    capella::ExecutionPayload {
        parent_hash: [0x11; 32],
        fee_recipient: [0x22; 20],
        state_root: [0x33; 32],
        receipts_root: [0x44; 32],
        logs_bloom: logs_bloom(),
        prev_randao: [0x55; 32],
        block_number: 19_426_587,
        gas_limit: 30_000_000,
        gas_used: 12_345_678,
        timestamp: GENESIS_TIME + 12 * SLOT,
        extra_data: b"beaconcha.in".to_vec(),
        base_fee_per_gas: base_fee_per_gas(),
        block_hash: [0x66; 32],
        transactions: vec![vec![0x02, 0xf8, 0x6c, 0x01], vec![0xaa; 100]],
        withdrawals: withdrawals(),
    }
}

fn deneb_payload() -> deneb::ExecutionPayload {
    let capella = capella_payload();
    deneb::ExecutionPayload {
        parent_hash: capella.parent_hash,
        fee_recipient: capella.fee_recipient,
        state_root: capella.state_root,
        receipts_root: capella.receipts_root,
        logs_bloom: capella.logs_bloom,
        prev_randao: capella.prev_randao,
        block_number: capella.block_number,
        gas_limit: capella.gas_limit,
        gas_used: capella.gas_used,
        timestamp: capella.timestamp,
        extra_data: capella.extra_data,
        base_fee_per_gas: capella.base_fee_per_gas,
        block_hash: capella.block_hash,
        transactions: capella.transactions,
        withdrawals: capella.withdrawals,
        blob_gas_used: 393_216,
        excess_blob_gas: 78_643_200,
    }
}

fn capella_state() -> capella::BeaconState {
    let mut state = capella::BeaconState::default();
    populate_state!(state, capella_payload().to_header().expect("header"));
    state
}

fn deneb_state() -> deneb::BeaconState {
    let mut state = deneb::BeaconState::default();
    populate_state!(state, deneb_payload().to_header().expect("header"));
    state
}

fn electra_state() -> electra::BeaconState {
    let mut state = electra::BeaconState::default();
    populate_state!(state, deneb_payload().to_header().expect("header"));
    state.deposit_requests_start_index = 1_500_000;
    state.deposit_balance_to_consume = 7_000_000_000;
    state.exit_balance_to_consume = 128_000_000_000;
    state.earliest_exit_epoch = 290_000;
    state.consolidation_balance_to_consume = 256_000_000_000;
    state.earliest_consolidation_epoch = 290_100;
    state.pending_deposits = (0..2)
        .map(|i| PendingDeposit {
            pubkey: pubkey(0xe0 + i as u8),
            withdrawal_credentials: [0x02; 32],
            amount: 1_000_000_000 * (i + 1),
            signature: signature(0xe8),
            slot: SLOT - i,
        })
        .collect();
    state.pending_partial_withdrawals = vec![PendingPartialWithdrawal {
        validator_index: 1,
        amount: 500_000_000,
        withdrawable_epoch: 290_300,
    }];
    state.pending_consolidations = vec![PendingConsolidation {
        source_index: 3,
        target_index: 0,
    }];
    state
}

fn capella_header_container(header: &capella::ExecutionPayloadHeader) -> CapellaPayloadHeader {
    CapellaPayloadHeader {
        parent_hash: header.parent_hash,
        fee_recipient: header.fee_recipient,
        state_root: header.state_root,
        receipts_root: header.receipts_root,
        logs_bloom: header.logs_bloom.clone(),
        prev_randao: header.prev_randao,
        block_number: header.block_number,
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        timestamp: header.timestamp,
        extra_data: list(&header.extra_data),
        base_fee_per_gas: header.base_fee_per_gas,
        block_hash: header.block_hash,
        transactions_root: header.transactions_root,
        withdrawals_root: header.withdrawals_root,
    }
}

fn deneb_header_container(header: &deneb::ExecutionPayloadHeader) -> DenebPayloadHeader {
    DenebPayloadHeader {
        parent_hash: header.parent_hash,
        fee_recipient: header.fee_recipient,
        state_root: header.state_root,
        receipts_root: header.receipts_root,
        logs_bloom: header.logs_bloom.clone(),
        prev_randao: header.prev_randao,
        block_number: header.block_number,
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        timestamp: header.timestamp,
        extra_data: list(&header.extra_data),
        base_fee_per_gas: header.base_fee_per_gas,
        block_hash: header.block_hash,
        transactions_root: header.transactions_root,
        withdrawals_root: header.withdrawals_root,
        blob_gas_used: header.blob_gas_used,
        excess_blob_gas: header.excess_blob_gas,
    }
}

fn capella_payload_container(payload: &capella::ExecutionPayload) -> CapellaPayload {
    CapellaPayload {
        parent_hash: payload.parent_hash,
        fee_recipient: payload.fee_recipient,
        state_root: payload.state_root,
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom.clone(),
        prev_randao: payload.prev_randao,
        block_number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: list(&payload.extra_data),
        base_fee_per_gas: payload.base_fee_per_gas,
        block_hash: payload.block_hash,
        transactions: transactions(&payload.transactions),
        withdrawals: list(&payload.withdrawals),
    }
}

fn deneb_payload_container(payload: &deneb::ExecutionPayload) -> DenebPayload {
    DenebPayload {
        parent_hash: payload.parent_hash,
        fee_recipient: payload.fee_recipient,
        state_root: payload.state_root,
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom.clone(),
        prev_randao: payload.prev_randao,
        block_number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: list(&payload.extra_data),
        base_fee_per_gas: payload.base_fee_per_gas,
        block_hash: payload.block_hash,
        transactions: transactions(&payload.transactions),
        withdrawals: list(&payload.withdrawals),
        blob_gas_used: payload.blob_gas_used,
        excess_blob_gas: payload.excess_blob_gas,
    }
}

fn attestation_data() -> AttestationData {
    AttestationData {
        slot: SLOT - 1,
        index: 3,
        beacon_block_root: [0x41; 32],
        source: checkpoint(281_259),
        target: checkpoint(281_260),
    }
}

fn voluntary_exit() -> SignedVoluntaryExit {
    SignedVoluntaryExit {
        message: VoluntaryExit {
            epoch: 281_000,
            validator_index: 4,
        },
        signature: signature(0x76),
    }
}

fn bls_change() -> SignedBlsToExecutionChange {
    SignedBlsToExecutionChange {
        message: BlsToExecutionChange {
            validator_index: 2,
            from_bls_pubkey: pubkey(0x62),
            to_execution_address: [0x63; 20],
        },
        signature: signature(0x64),
    }
}

fn capella_block() -> capella::BeaconBlock {
    capella::BeaconBlock {
        slot: SLOT,
        proposer_index: 77,
        parent_root: [0x01; 32],
        state_root: [0x03; 32],
        body: capella::BeaconBlockBody {
            randao_reveal: signature(0x61),
            eth1_data: eth1_data(1_234_567),
            graffiti: [0x67; 32],
            proposer_slashings: vec![ProposerSlashing::default()],
            attester_slashings: vec![AttesterSlashing::default()],
            attestations: vec![Attestation {
                data: attestation_data(),
                signature: signature(0x42),
                ..Attestation::default()
            }],
            deposits: vec![Deposit::default()],
            voluntary_exits: vec![voluntary_exit()],
            sync_aggregate: SyncAggregate::default(),
            execution_payload: capella_payload(),
            bls_to_execution_changes: vec![bls_change()],
        },
    }
}

fn blob_commitments() -> Vec<KzgCommitment> {
    (0..3).map(|i| vector(&[0xb0 + i; 48])).collect()
}

fn deneb_block() -> deneb::BeaconBlock {
    let capella = capella_block();
    deneb::BeaconBlock {
        slot: capella.slot,
        proposer_index: capella.proposer_index,
        parent_root: capella.parent_root,
        state_root: capella.state_root,
        body: deneb::BeaconBlockBody {
            randao_reveal: capella.body.randao_reveal,
            eth1_data: capella.body.eth1_data,
            graffiti: capella.body.graffiti,
            proposer_slashings: capella.body.proposer_slashings,
            attester_slashings: capella.body.attester_slashings,
            attestations: capella.body.attestations,
            deposits: capella.body.deposits,
            voluntary_exits: capella.body.voluntary_exits,
            sync_aggregate: capella.body.sync_aggregate,
            execution_payload: deneb_payload(),
            bls_to_execution_changes: capella.body.bls_to_execution_changes,
            blob_kzg_commitments: blob_commitments(),
        },
    }
}

fn electra_block() -> electra::BeaconBlock {
    let deneb = deneb_block();
    electra::BeaconBlock {
        slot: deneb.slot,
        proposer_index: deneb.proposer_index,
        parent_root: deneb.parent_root,
        state_root: deneb.state_root,
        body: electra::BeaconBlockBody {
            randao_reveal: deneb.body.randao_reveal,
            eth1_data: deneb.body.eth1_data,
            graffiti: deneb.body.graffiti,
            proposer_slashings: deneb.body.proposer_slashings,
            attester_slashings: vec![AttesterSlashingElectra::default()],
            attestations: vec![AttestationElectra {
                data: attestation_data(),
                signature: signature(0x43),
                ..AttestationElectra::default()
            }],
            deposits: deneb.body.deposits,
            voluntary_exits: deneb.body.voluntary_exits,
            sync_aggregate: deneb.body.sync_aggregate,
            execution_payload: deneb.body.execution_payload,
            bls_to_execution_changes: deneb.body.bls_to_execution_changes,
            blob_kzg_commitments: deneb.body.blob_kzg_commitments,
            execution_requests: ExecutionRequests {
                deposits: list(&[DepositRequest {
                    pubkey: pubkey(0x71),
                    withdrawal_credentials: [0x72; 32],
                    amount: 32_000_000_000,
                    signature: signature(0x73),
                    index: 1_500_001,
                }]),
                withdrawals: list(&[WithdrawalRequest {
                    source_address: [0x74; 20],
                    validator_pubkey: pubkey(0x75),
                    amount: 0,
                }]),
                ..ExecutionRequests::default()
            },
        },
    }
}

#[test]
fn test_capella_state_root_matches_ssz_rs() {
    let state = capella_state();
    let container = to_state_container!(
        CapellaState,
        state,
        capella_header_container(&state.latest_execution_payload_header)
    );

    assert_eq!(
        VersionedBeaconState::from(state).hash_tree_root(),
        Ok(ssz_root(&container))
    );
}

#[test]
fn test_deneb_state_root_matches_ssz_rs() {
    let state = deneb_state();
    let container = to_state_container!(
        DenebState,
        state,
        deneb_header_container(&state.latest_execution_payload_header)
    );

    assert_eq!(
        VersionedBeaconState::from(state).hash_tree_root(),
        Ok(ssz_root(&container))
    );
}

#[test]
fn test_electra_state_root_matches_ssz_rs() {
    let state = electra_state();
    let container = to_state_container!(
        ElectraState,
        state,
        deneb_header_container(&state.latest_execution_payload_header),
        deposit_requests_start_index: state.deposit_requests_start_index,
        deposit_balance_to_consume: state.deposit_balance_to_consume,
        exit_balance_to_consume: state.exit_balance_to_consume,
        earliest_exit_epoch: state.earliest_exit_epoch,
        consolidation_balance_to_consume: state.consolidation_balance_to_consume,
        earliest_consolidation_epoch: state.earliest_consolidation_epoch,
        pending_deposits: list(&state.pending_deposits),
        pending_partial_withdrawals: list(&state.pending_partial_withdrawals),
        pending_consolidations: list(&state.pending_consolidations),
    );

    assert_eq!(
        VersionedBeaconState::from(state).hash_tree_root(),
        Ok(ssz_root(&container))
    );
}

#[test]
fn test_capella_block_roots_match_ssz_rs() {
    let block = capella_block();
    let body = &block.body;
    let container = CapellaBody {
        randao_reveal: body.randao_reveal.clone(),
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: list(&body.proposer_slashings),
        attester_slashings: list(&body.attester_slashings),
        attestations: list(&body.attestations),
        deposits: list(&body.deposits),
        voluntary_exits: list(&body.voluntary_exits),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: capella_payload_container(&body.execution_payload),
        bls_to_execution_changes: list(&body.bls_to_execution_changes),
    };
    let block = VersionedBeaconBlock::from(block);

    assert_eq!(
        block.execution_payload_root(),
        Ok(ssz_root(&container.execution_payload))
    );
    assert_eq!(block.header().map(|h| h.body_root), Ok(ssz_root(&container)));
}

#[test]
fn test_deneb_block_roots_match_ssz_rs() {
    let block = deneb_block();
    let body = &block.body;
    let container = DenebBody {
        randao_reveal: body.randao_reveal.clone(),
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: list(&body.proposer_slashings),
        attester_slashings: list(&body.attester_slashings),
        attestations: list(&body.attestations),
        deposits: list(&body.deposits),
        voluntary_exits: list(&body.voluntary_exits),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: deneb_payload_container(&body.execution_payload),
        bls_to_execution_changes: list(&body.bls_to_execution_changes),
        blob_kzg_commitments: list(&body.blob_kzg_commitments),
    };
    let block = VersionedBeaconBlock::from(block);

    assert_eq!(
        block.execution_payload_root(),
        Ok(ssz_root(&container.execution_payload))
    );
    assert_eq!(block.header().map(|h| h.body_root), Ok(ssz_root(&container)));
}

#[test]
fn test_electra_block_roots_match_ssz_rs() {
    let block = electra_block();
    let body = &block.body;
    let container = ElectraBody {
        randao_reveal: body.randao_reveal.clone(),
        eth1_data: body.eth1_data.clone(),
        graffiti: body.graffiti,
        proposer_slashings: list(&body.proposer_slashings),
        attester_slashings: list(&body.attester_slashings),
        attestations: list(&body.attestations),
        deposits: list(&body.deposits),
        voluntary_exits: list(&body.voluntary_exits),
        sync_aggregate: body.sync_aggregate.clone(),
        execution_payload: deneb_payload_container(&body.execution_payload),
        bls_to_execution_changes: list(&body.bls_to_execution_changes),
        blob_kzg_commitments: list(&body.blob_kzg_commitments),
        execution_requests: body.execution_requests.clone(),
    };
    let block = VersionedBeaconBlock::from(block);

    assert_eq!(
        block.execution_payload_root(),
        Ok(ssz_root(&container.execution_payload))
    );
    assert_eq!(block.header().map(|h| h.body_root), Ok(ssz_root(&container)));
}

#[test]
fn test_payload_header_commits_to_payload() {
    let capella = capella_payload();
    let deneb = deneb_payload();

    assert_eq!(
        capella.to_header().and_then(|h| h.hash_tree_root()),
        capella.hash_tree_root()
    );
    assert_eq!(
        deneb.to_header().and_then(|h| h.hash_tree_root()),
        deneb.hash_tree_root()
    );
}
