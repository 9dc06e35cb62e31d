//! Beacon Chain SSZ Containers
//!
//! Fixed-shape containers shared by the fork layouts. They derive `ssz_rs`
//! traits, so their roots come straight from `hash_tree_root()`. The large
//! fork-specific containers (state, block body, execution payload) live in the
//! fork modules and reduce their fields through [`crate::ssz`].

use crate::constants::{
    MAX_COMMITTEES_PER_SLOT, MAX_VALIDATORS_PER_COMMITTEE,
    SYNC_COMMITTEE_SIZE, VALIDATOR_FIELD_COUNT, WITHDRAWAL_FIELD_COUNT,
};
use crate::error::ProofError;
use crate::ssz::{bool_root, element_root, uint64_root};
use crate::types::{
    BlsPubkey, BlsSignature, Epoch, ExecutionAddress, Gwei, Root, Slot, ValidatorIndex,
    WithdrawalIndex,
};
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Fork data
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Fork {
    pub previous_version: [u8; 4],
    pub current_version: [u8; 4],
    pub epoch: Epoch,
}

/// Checkpoint for fork choice
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: [u8; 32],
}

/// Eth1 deposit contract snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Eth1Data {
    pub deposit_root: [u8; 32],
    pub deposit_count: u64,
    pub block_hash: [u8; 32],
}

/// Beacon block header
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct BeaconBlockHeader {
    /// Slot number
    pub slot: Slot,
    /// Proposer validator index
    pub proposer_index: ValidatorIndex,
    /// Root of the parent block
    pub parent_root: [u8; 32],
    /// Root of the beacon state
    pub state_root: [u8; 32],
    /// Root of the block body
    pub body_root: [u8; 32],
}

impl BeaconBlockHeader {
    /// The five header field roots in declaration order.
    #[must_use]
    pub fn field_roots(&self) -> [Root; 5] {
        [
            uint64_root(self.slot),
            uint64_root(self.proposer_index),
            self.parent_root,
            self.state_root,
            self.body_root,
        ]
    }

    /// Header root, which is also the block root.
    ///
    /// # Errors
    /// Fails only if the merkleizer does.
    pub fn root(&self) -> Result<Root, ProofError> {
        element_root(self)
    }
}

/// Signed beacon block header
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BlsSignature,
}

/// Validator record
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Validator {
    /// BLS public key (48 bytes)
    pub pubkey: BlsPubkey,
    /// Withdrawal credentials (32 bytes)
    pub withdrawal_credentials: [u8; 32],
    /// Effective balance in Gwei
    pub effective_balance: Gwei,
    /// Whether the validator is slashed
    pub slashed: bool,
    /// Epoch when validator became eligible for activation
    pub activation_eligibility_epoch: Epoch,
    /// Epoch when validator was activated
    pub activation_epoch: Epoch,
    /// Epoch when validator will exit
    pub exit_epoch: Epoch,
    /// Epoch when validator can withdraw
    pub withdrawable_epoch: Epoch,
}

impl Validator {
    /// The eight field roots, in the order verifier contracts expect them.
    ///
    /// # Errors
    /// Fails only if the merkleizer does.
    pub fn field_roots(&self) -> Result<[Root; VALIDATOR_FIELD_COUNT], ProofError> {
        Ok([
            element_root(&self.pubkey)?,
            self.withdrawal_credentials,
            uint64_root(self.effective_balance),
            bool_root(self.slashed),
            uint64_root(self.activation_eligibility_epoch),
            uint64_root(self.activation_epoch),
            uint64_root(self.exit_epoch),
            uint64_root(self.withdrawable_epoch),
        ])
    }

    /// `sha256(pubkey ++ 16 zero bytes)`, the key verifier contracts index
    /// validators by.
    ///
    /// # Errors
    /// Fails if the pubkey cannot be serialized.
    pub fn pubkey_hash(&self) -> Result<Root, ProofError> {
        let bytes = ssz_rs::serialize(&self.pubkey).map_err(|e| ProofError::Ssz(e.to_string()))?;
        Ok(compute_pubkey_hash(&bytes))
    }
}

/// Hash a raw BLS pubkey the way the beacon chain chunks it.
#[must_use]
pub fn compute_pubkey_hash(pubkey: &[u8]) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(pubkey);
    hasher.update([0u8; 16]);
    hasher.finalize().into()
}

/// Execution-layer withdrawal
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Withdrawal {
    pub index: WithdrawalIndex,
    pub validator_index: ValidatorIndex,
    pub address: ExecutionAddress,
    pub amount: Gwei,
}

impl Withdrawal {
    /// The four field roots in declaration order.
    ///
    /// # Errors
    /// Fails only if the merkleizer does.
    pub fn field_roots(&self) -> Result<[Root; WITHDRAWAL_FIELD_COUNT], ProofError> {
        Ok([
            uint64_root(self.index),
            uint64_root(self.validator_index),
            element_root(&self.address)?,
            uint64_root(self.amount),
        ])
    }
}

/// Historical summary: roots of one 8192-slot period of block and state roots
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct HistoricalSummary {
    pub block_summary_root: [u8; 32],
    pub state_summary_root: [u8; 32],
}

/// Sync committee (Altair+)
#[derive(Debug, Clone, PartialEq, Eq, SimpleSerialize)]
pub struct SyncCommittee {
    pub pubkeys: Vector<BlsPubkey, SYNC_COMMITTEE_SIZE>,
    pub aggregate_pubkey: BlsPubkey,
}

impl Default for SyncCommittee {
    fn default() -> Self {
        Self {
            pubkeys: Default::default(),
            aggregate_pubkey: Vector::default(),
        }
    }
}

/// Sync committee aggregate carried in every block body
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct SyncAggregate {
    pub sync_committee_bits: Bitvector<SYNC_COMMITTEE_SIZE>,
    pub sync_committee_signature: BlsSignature,
}

/// Attestation data
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: u64,
    pub beacon_block_root: [u8; 32],
    pub source: Checkpoint,
    pub target: Checkpoint,
}

/// Pre-Electra attestation
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Attestation {
    pub aggregation_bits: Bitlist<MAX_VALIDATORS_PER_COMMITTEE>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

/// Pre-Electra indexed attestation
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct IndexedAttestation {
    pub attesting_indices: List<ValidatorIndex, MAX_VALIDATORS_PER_COMMITTEE>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

/// Pre-Electra attester slashing
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

/// Electra attestation with committee bits
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct AttestationElectra {
    pub aggregation_bits: Bitlist<{ MAX_VALIDATORS_PER_COMMITTEE * MAX_COMMITTEES_PER_SLOT }>,
    pub data: AttestationData,
    pub signature: BlsSignature,
    pub committee_bits: Bitvector<MAX_COMMITTEES_PER_SLOT>,
}

/// Electra indexed attestation
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct IndexedAttestationElectra {
    pub attesting_indices:
        List<ValidatorIndex, { MAX_VALIDATORS_PER_COMMITTEE * MAX_COMMITTEES_PER_SLOT }>,
    pub data: AttestationData,
    pub signature: BlsSignature,
}

/// Electra attester slashing
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct AttesterSlashingElectra {
    pub attestation_1: IndexedAttestationElectra,
    pub attestation_2: IndexedAttestationElectra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct DepositData {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: [u8; 32],
    pub amount: Gwei,
    pub signature: BlsSignature,
}

/// Deposit with its branch in the deposit contract tree
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct Deposit {
    pub proof: Vector<[u8; 32], 33>,
    pub data: DepositData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct VoluntaryExit {
    pub epoch: Epoch,
    pub validator_index: ValidatorIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BlsSignature,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct BlsToExecutionChange {
    pub validator_index: ValidatorIndex,
    pub from_bls_pubkey: BlsPubkey,
    pub to_execution_address: ExecutionAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct SignedBlsToExecutionChange {
    pub message: BlsToExecutionChange,
    pub signature: BlsSignature,
}

/// Pending deposit entry (Electra)
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct PendingDeposit {
    pub pubkey: BlsPubkey,
    pub withdrawal_credentials: [u8; 32],
    pub amount: Gwei,
    pub signature: BlsSignature,
    pub slot: Slot,
}

/// Pending partial withdrawal (Electra)
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct PendingPartialWithdrawal {
    pub validator_index: ValidatorIndex,
    pub amount: Gwei,
    pub withdrawable_epoch: Epoch,
}

/// Pending consolidation entry (Electra)
#[derive(Debug, Clone, Default, PartialEq, Eq, SimpleSerialize)]
pub struct PendingConsolidation {
    pub source_index: ValidatorIndex,
    pub target_index: ValidatorIndex,
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        BEACON_BLOCK_HEADER_TREE_DEPTH, HEADER_BODY_ROOT_INDEX, HEADER_PARENT_ROOT_INDEX,
        HEADER_PROPOSER_INDEX, HEADER_SLOT_INDEX, HEADER_STATE_ROOT_INDEX,
        VALIDATOR_CONTAINER_TREE_DEPTH, WITHDRAWAL_CONTAINER_TREE_DEPTH,
    };
    use crate::merkle::merkleize;

    fn make_validator(i: u8) -> Validator {
        Validator {
            pubkey: Vector::try_from(vec![i; 48]).unwrap(),
            withdrawal_credentials: [i; 32],
            effective_balance: 32_000_000_000,
            slashed: i % 2 == 1,
            activation_eligibility_epoch: 1,
            activation_epoch: 2,
            exit_epoch: u64::MAX,
            withdrawable_epoch: u64::MAX,
        }
    }

    #[test]
    fn test_validator_field_roots_rebuild_hash_tree_root() {
        let validator = make_validator(3);
        let fields = validator.field_roots().expect("fields");
        let expected: [u8; 32] = validator.hash_tree_root().unwrap().into();

        assert_eq!(merkleize(&fields, VALIDATOR_CONTAINER_TREE_DEPTH).expect("root"), expected);
        assert_eq!(fields[1], [3; 32]);
        assert_eq!(fields[3][0], 1);
    }

    #[test]
    fn test_pubkey_hash_matches_pubkey_root() {
        let validator = make_validator(7);
        let expected: [u8; 32] = validator.pubkey.hash_tree_root().unwrap().into();

        assert_eq!(validator.pubkey_hash().expect("hash"), expected);
        assert_eq!(compute_pubkey_hash(&[7; 48]), expected);
    }

    #[test]
    fn test_withdrawal_field_roots_rebuild_hash_tree_root() {
        let withdrawal = Withdrawal {
            index: 12,
            validator_index: 99,
            address: [0xaa; 20],
            amount: 1_000_000,
        };
        let fields = withdrawal.field_roots().expect("fields");
        let expected: [u8; 32] = withdrawal.hash_tree_root().unwrap().into();

        assert_eq!(merkleize(&fields, WITHDRAWAL_CONTAINER_TREE_DEPTH).expect("root"), expected);
        assert_eq!(&fields[2][..20], &[0xaa; 20]);
        assert_eq!(&fields[2][20..], &[0; 12]);
    }

    #[test]
    fn test_header_field_roots_rebuild_root() {
        let header = BeaconBlockHeader {
            slot: 12345,
            proposer_index: 42,
            parent_root: [1u8; 32],
            state_root: [2u8; 32],
            body_root: [3u8; 32],
        };

        let roots = header.field_roots();
        assert_eq!(
            merkleize(&roots, BEACON_BLOCK_HEADER_TREE_DEPTH).expect("root"),
            header.root().expect("root")
        );
        assert_eq!(roots[HEADER_SLOT_INDEX as usize], uint64_root(12345));
        assert_eq!(roots[HEADER_PROPOSER_INDEX as usize], uint64_root(42));
        assert_eq!(roots[HEADER_PARENT_ROOT_INDEX as usize], [1u8; 32]);
        assert_eq!(roots[HEADER_STATE_ROOT_INDEX as usize], [2u8; 32]);
        assert_eq!(roots[HEADER_BODY_ROOT_INDEX as usize], [3u8; 32]);
    }

    #[test]
    fn test_beacon_block_header_ssz_roundtrip() {
        let header = BeaconBlockHeader {
            slot: 12345,
            proposer_index: 42,
            parent_root: [1u8; 32],
            state_root: [2u8; 32],
            body_root: [3u8; 32],
        };

        let encoded = ssz_rs::serialize(&header).expect("serialize");
        let decoded: BeaconBlockHeader = ssz_rs::deserialize(&encoded).expect("deserialize");

        assert_eq!(header, decoded);
    }
}
