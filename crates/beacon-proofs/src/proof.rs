//! Prover entry points and the call-parameter bundles they produce.
//!
//! A [`ProofGenerator`] turns an oracle block header and its beacon state into
//! the proofs verifier contracts consume:
//! 1. validator containers against the block root
//! 2. checkpoint balances against the block root
//! 3. withdrawals, reached through historical summaries
//!
//! The per-slot artifacts (state root, top-level roots, validator and balance
//! trees) go through the [`OracleStateCache`], so proving many facts against
//! one state only builds each tree once.

use crate::block::{
    prove_execution_payload_against_block_header, prove_slot_against_block_header,
    prove_state_root_against_block_header, prove_timestamp_against_execution_payload,
    prove_withdrawal_against_execution_payload,
};
use crate::cache::{Clock, OracleStateCache};
use crate::config::ProverConfig;
use crate::constants::{
    SLOTS_PER_HISTORICAL_ROOT, VALIDATOR_CONTAINER_TREE_DEPTH, WITHDRAWAL_CONTAINER_TREE_DEPTH,
};
use crate::containers::{BeaconBlockHeader, Validator, Withdrawal};
use crate::error::{ProofError, ProofStep};
use crate::merkle::{merkleize, MerkleTree};
use crate::ssz::uint64_root;
use crate::state_prover::{
    balances_tree, get_balance_root, prove_balances_list_against_state,
    prove_block_root_against_beacon_state_via_historical_summaries,
    prove_validator_against_beacon_state, prove_validator_balance_against_balance_list,
    validators_tree, BalancesTree,
};
use crate::top_level::BeaconStateTopLevelRoots;
use crate::types::{
    compose_proofs, hex_bytes32, hex_bytes32_vec, hex_root, Proof, Root, Slot, ValidatorIndex,
};
use crate::versioned::{VersionedBeaconBlock, VersionedBeaconState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

const SLOTS_PER_HISTORICAL_ROOT_U64: u64 = SLOTS_PER_HISTORICAL_ROOT as u64;

/// The eight field roots of a validator, as checked field by field on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorFields(#[serde(with = "hex_bytes32_vec")] pub Vec<Root>);

impl ValidatorFields {
    /// # Errors
    /// Fails if the pubkey cannot be merkleized.
    pub fn from_validator(validator: &Validator) -> Result<Self, ProofError> {
        Ok(Self(validator.field_roots()?.to_vec()))
    }

    /// The validator root, the leaf its proof starts from.
    ///
    /// # Errors
    /// Fails if there are more than eight roots.
    pub fn root(&self) -> Result<Root, ProofError> {
        merkleize(&self.0, VALIDATOR_CONTAINER_TREE_DEPTH)
    }
}

/// The four field roots of a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WithdrawalFields(#[serde(with = "hex_bytes32_vec")] pub Vec<Root>);

impl WithdrawalFields {
    /// # Errors
    /// Fails if the address cannot be merkleized.
    pub fn from_withdrawal(withdrawal: &Withdrawal) -> Result<Self, ProofError> {
        Ok(Self(withdrawal.field_roots()?.to_vec()))
    }

    /// # Errors
    /// Fails if there are more than four roots.
    pub fn root(&self) -> Result<Root, ProofError> {
        merkleize(&self.0, WITHDRAWAL_CONTAINER_TREE_DEPTH)
    }
}

/// State root and its proof against the oracle block root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRootProof {
    #[serde(with = "hex_bytes32")]
    pub beacon_state_root: Root,
    #[serde(rename = "stateRootProof")]
    pub proof: Proof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyValidatorFieldsCallParams {
    pub state_root_proof: StateRootProof,
    pub validator_indices: Vec<ValidatorIndex>,
    pub validator_fields_proofs: Vec<Proof>,
    pub validator_fields: Vec<ValidatorFields>,
}

/// Balances list root and its proof against the oracle block root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorBalancesRootProof {
    #[serde(rename = "validatorBalanceRoot", with = "hex_bytes32")]
    pub balances_root: Root,
    pub proof: Proof,
}

/// One packed balance chunk and its proof against the balances list root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceProof {
    #[serde(with = "hex_bytes32")]
    pub pubkey_hash: Root,
    #[serde(with = "hex_bytes32")]
    pub balance_root: Root,
    pub proof: Proof,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCheckpointProofsCallParams {
    pub validator_balances_root_proof: ValidatorBalancesRootProof,
    pub balance_proofs: Vec<BalanceProof>,
}

/// State root proof of a withdrawal batch; also carries the oracle slot so
/// contracts can check it is recent enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalStateRootProof {
    #[serde(with = "hex_bytes32")]
    pub beacon_state_root: Root,
    pub state_root_proof: Proof,
    pub slot: Slot,
    pub slot_root_proof: Proof,
}

/// Everything needed to verify one withdrawal against the oracle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalProof {
    /// Withdrawal against the execution payload root
    pub withdrawal_proof: Proof,
    /// Slot against the withdrawal block root
    pub slot_proof: Proof,
    /// Execution payload against the withdrawal block root
    pub execution_payload_proof: Proof,
    /// Timestamp against the execution payload root
    pub timestamp_proof: Proof,
    /// Withdrawal block root against the oracle state root
    pub historical_summary_block_root_proof: Proof,
    pub block_root_index: u64,
    pub historical_summary_index: u64,
    pub withdrawal_index: u64,
    #[serde(with = "hex_bytes32")]
    pub block_root: Root,
    #[serde(with = "hex_bytes32")]
    pub slot_root: Root,
    #[serde(with = "hex_bytes32")]
    pub timestamp_root: Root,
    #[serde(with = "hex_bytes32")]
    pub execution_payload_root: Root,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAndProcessWithdrawalCallParams {
    pub oracle_timestamp: u64,
    pub state_root_proof: WithdrawalStateRootProof,
    pub withdrawal_proofs: Vec<WithdrawalProof>,
    pub validator_fields_proofs: Vec<Proof>,
    pub validator_fields: Vec<ValidatorFields>,
    pub withdrawal_fields: Vec<WithdrawalFields>,
}

/// Where a withdrawal's block root lives relative to an oracle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalProofParams {
    /// Slot of the state whose `block_roots` became the summary
    pub historical_summary_state_slot: Slot,
    pub historical_summary_index: u64,
    pub block_root_index: u64,
}

fn to_usize(what: &'static str, index: u64, len: usize) -> Result<usize, ProofError> {
    usize::try_from(index).map_err(|_| ProofError::IndexOutOfRange { what, index, len })
}

/// Generates proof bundles against oracle states, memoizing per slot.
#[derive(Debug)]
pub struct ProofGenerator {
    config: ProverConfig,
    cache: OracleStateCache,
}

impl Default for ProofGenerator {
    fn default() -> Self {
        Self::new(ProverConfig::default())
    }
}

impl ProofGenerator {
    #[must_use]
    pub fn new(config: ProverConfig) -> Self {
        Self {
            cache: OracleStateCache::new(&config.cache),
            config,
        }
    }

    #[must_use]
    pub fn with_clock(config: ProverConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: OracleStateCache::with_clock(&config.cache, clock),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &OracleStateCache {
        &self.cache
    }

    /// # Errors
    /// Fails if a state field violates its length constraints.
    pub fn compute_top_level_roots(
        &self,
        state: &VersionedBeaconState,
    ) -> Result<Arc<BeaconStateTopLevelRoots>, ProofError> {
        self.cache
            .top_level_roots()
            .load_or_compute(state.slot(), || state.top_level_roots().map(Arc::new))
    }

    /// # Errors
    /// Fails if a state field violates its length constraints.
    pub fn compute_beacon_state_root(&self, state: &VersionedBeaconState) -> Result<Root, ProofError> {
        self.cache.state_roots().load_or_compute(state.slot(), || {
            self.compute_top_level_roots(state)?.state_root()
        })
    }

    /// # Errors
    /// Fails on an empty validator registry.
    pub fn compute_validator_tree(&self, state: &VersionedBeaconState) -> Result<Arc<MerkleTree>, ProofError> {
        self.cache.validator_trees().load_or_compute(state.slot(), || {
            let start = Instant::now();
            let tree = validators_tree(state.validators())?;
            debug!(
                slot = state.slot(),
                count = state.validators().len(),
                elapsed_ms = start.elapsed().as_millis(),
                "Built validator tree"
            );
            Ok(Arc::new(tree))
        })
    }

    /// # Errors
    /// Fails on an empty balance list.
    pub fn compute_balances_tree(&self, state: &VersionedBeaconState) -> Result<Arc<BalancesTree>, ProofError> {
        self.cache.balances_trees().load_or_compute(state.slot(), || {
            let start = Instant::now();
            let tree = balances_tree(state.balances())?;
            debug!(
                slot = state.slot(),
                count = state.balances().len(),
                elapsed_ms = start.elapsed().as_millis(),
                "Built balances tree"
            );
            Ok(Arc::new(tree))
        })
    }

    /// The state root, checked against the header that commits to it.
    fn checked_state_root(
        &self,
        header: &BeaconBlockHeader,
        state: &VersionedBeaconState,
    ) -> Result<Root, ProofError> {
        let computed = self.compute_beacon_state_root(state)?;
        if computed != header.state_root {
            return Err(ProofError::StateRootMismatch {
                header: hex_root(&header.state_root),
                computed: hex_root(&computed),
            });
        }
        Ok(computed)
    }

    /// Proofs of whole validator containers against the oracle block root.
    ///
    /// # Errors
    /// Fails on the first validator that cannot be proven.
    #[instrument(skip_all, fields(slot = state.slot(), count = validator_indices.len()))]
    pub fn prove_validator_containers(
        &self,
        header: &BeaconBlockHeader,
        state: &VersionedBeaconState,
        validator_indices: &[ValidatorIndex],
    ) -> Result<VerifyValidatorFieldsCallParams, ProofError> {
        let start = Instant::now();
        let beacon_state_root = self.checked_state_root(header, state)?;
        let state_root_proof = StateRootProof {
            beacon_state_root,
            proof: prove_state_root_against_block_header(header).during("state root in block header")?,
        };

        let top_level_roots = self.compute_top_level_roots(state)?;
        let tree = self.compute_validator_tree(state)?;
        let validators = state.validators();

        let mut validator_fields_proofs = Vec::with_capacity(validator_indices.len());
        let mut validator_fields = Vec::with_capacity(validator_indices.len());
        for &validator_index in validator_indices {
            let index = to_usize("validator", validator_index, validators.len())?;
            validator_fields_proofs.push(prove_validator_against_beacon_state(
                &top_level_roots,
                &tree,
                index,
            )?);
            validator_fields.push(ValidatorFields::from_validator(&validators[index])?);
        }

        info!(elapsed_ms = start.elapsed().as_millis(), "Proved validator containers");
        Ok(VerifyValidatorFieldsCallParams {
            state_root_proof,
            validator_indices: validator_indices.to_vec(),
            validator_fields_proofs,
            validator_fields,
        })
    }

    /// The balances root against the oracle block root, and each validator's
    /// balance chunk against the balances root.
    ///
    /// # Errors
    /// Fails on the first validator that cannot be proven.
    #[instrument(skip_all, fields(slot = state.slot(), count = validator_indices.len()))]
    pub fn prove_checkpoint_proofs(
        &self,
        header: &BeaconBlockHeader,
        state: &VersionedBeaconState,
        validator_indices: &[ValidatorIndex],
    ) -> Result<VerifyCheckpointProofsCallParams, ProofError> {
        let start = Instant::now();
        self.checked_state_root(header, state)?;
        let top_level_roots = self.compute_top_level_roots(state)?;

        let state_root_proof =
            prove_state_root_against_block_header(header).during("state root in block header")?;
        let balances_in_state = prove_balances_list_against_state(&top_level_roots)
            .during("balances list in beacon state")?;
        let validator_balances_root_proof = ValidatorBalancesRootProof {
            balances_root: top_level_roots.balances_root(),
            proof: compose_proofs(balances_in_state, state_root_proof),
        };

        let tree = self.compute_balances_tree(state)?;
        let validators = state.validators();
        let balances = state.balances();

        let mut balance_proofs = Vec::with_capacity(validator_indices.len());
        for &validator_index in validator_indices {
            let index = to_usize("validator", validator_index, validators.len())?;
            let validator = validators.get(index).ok_or(ProofError::IndexOutOfRange {
                what: "validator",
                index: validator_index,
                len: validators.len(),
            })?;
            balance_proofs.push(BalanceProof {
                pubkey_hash: validator.pubkey_hash()?,
                balance_root: get_balance_root(balances, index)?,
                proof: prove_validator_balance_against_balance_list(&tree, index)?,
            });
        }

        info!(elapsed_ms = start.elapsed().as_millis(), "Proved checkpoint balances");
        Ok(VerifyCheckpointProofsCallParams {
            validator_balances_root_proof,
            balance_proofs,
        })
    }

    /// Proofs for a batch of withdrawals. Entry `i` of `historical_block_roots`,
    /// `withdrawal_blocks` and `validator_indices` describe the same withdrawal.
    ///
    /// # Errors
    /// Fails if the inputs differ in length or on the first withdrawal that
    /// cannot be proven.
    #[instrument(skip_all, fields(slot = state.slot(), count = withdrawal_blocks.len()))]
    pub fn prove_withdrawals(
        &self,
        header: &BeaconBlockHeader,
        state: &VersionedBeaconState,
        historical_block_roots: &[Vec<Root>],
        withdrawal_blocks: &[VersionedBeaconBlock],
        validator_indices: &[ValidatorIndex],
    ) -> Result<VerifyAndProcessWithdrawalCallParams, ProofError> {
        let count = withdrawal_blocks.len();
        for (field, actual) in [
            ("historical_block_roots", historical_block_roots.len()),
            ("validator_indices", validator_indices.len()),
        ] {
            if actual != count {
                return Err(ProofError::SizeMismatch {
                    field,
                    expected: count,
                    actual,
                });
            }
        }

        let beacon_state_root = self.checked_state_root(header, state)?;
        let state_root_proof = WithdrawalStateRootProof {
            beacon_state_root,
            state_root_proof: prove_state_root_against_block_header(header)
                .during("state root in block header")?,
            slot: header.slot,
            slot_root_proof: prove_slot_against_block_header(header).during("slot in block header")?,
        };
        let oracle_timestamp = self.slot_timestamp(state.genesis_time(), header.slot)?;

        let top_level_roots = self.compute_top_level_roots(state)?;
        let tree = self.compute_validator_tree(state)?;
        let validators = state.validators();

        let mut params = VerifyAndProcessWithdrawalCallParams {
            oracle_timestamp,
            state_root_proof,
            withdrawal_proofs: Vec::with_capacity(count),
            validator_fields_proofs: Vec::with_capacity(count),
            validator_fields: Vec::with_capacity(count),
            withdrawal_fields: Vec::with_capacity(count),
        };
        for ((block_roots, block), &validator_index) in historical_block_roots
            .iter()
            .zip(withdrawal_blocks)
            .zip(validator_indices)
        {
            let start = Instant::now();
            let withdrawal_proof = self.prove_withdrawal(state, block_roots, block, validator_index)?;
            let withdrawal = &block.withdrawals()[withdrawal_proof.withdrawal_index as usize];
            params
                .withdrawal_fields
                .push(WithdrawalFields::from_withdrawal(withdrawal)?);
            params.withdrawal_proofs.push(withdrawal_proof);

            let index = to_usize("validator", validator_index, validators.len())?;
            params
                .validator_fields_proofs
                .push(prove_validator_against_beacon_state(&top_level_roots, &tree, index)?);
            params
                .validator_fields
                .push(ValidatorFields::from_validator(&validators[index])?);
            debug!(
                validator_index,
                withdrawal_slot = block.slot(),
                elapsed_ms = start.elapsed().as_millis(),
                "Proved withdrawal"
            );
        }

        info!("Proved withdrawals");
        Ok(params)
    }

    /// Proofs for the withdrawal of `validator_index` in `withdrawal_block`.
    ///
    /// `historical_block_roots` is the `block_roots` vector of the state at
    /// [`WithdrawalProofParams::historical_summary_state_slot`].
    ///
    /// # Errors
    /// Fails with [`ProofError::WithdrawalNotFound`] if the block has no
    /// withdrawal for the validator, with
    /// [`ProofError::WithdrawalNotProvable`] if the oracle state cannot reach
    /// the block, with [`ProofError::BlockRootMismatch`] if the block is not
    /// the one in `historical_block_roots`, and with [`ProofError::SubProof`]
    /// if a proof step fails.
    #[instrument(skip_all, fields(withdrawal_slot = withdrawal_block.slot(), validator_index = validator_index))]
    pub fn prove_withdrawal(
        &self,
        state: &VersionedBeaconState,
        historical_block_roots: &[Root],
        withdrawal_block: &VersionedBeaconBlock,
        validator_index: ValidatorIndex,
    ) -> Result<WithdrawalProof, ProofError> {
        let withdrawal_index = withdrawal_block
            .withdrawals()
            .iter()
            .position(|w| w.validator_index == validator_index)
            .ok_or(ProofError::WithdrawalNotFound {
                slot: withdrawal_block.slot(),
                validator_index,
            })?;

        let params = self.withdrawal_proof_params(state.slot(), withdrawal_block.slot())?;
        let top_level_roots = self.compute_top_level_roots(state)?;
        let historical_summary_block_root_proof =
            prove_block_root_against_beacon_state_via_historical_summaries(
                &top_level_roots,
                state.historical_summaries(),
                historical_block_roots,
                to_usize(
                    "historical summary",
                    params.historical_summary_index,
                    state.historical_summaries().len(),
                )?,
                to_usize("block root", params.block_root_index, SLOTS_PER_HISTORICAL_ROOT)?,
            )
            .during("withdrawal block root in beacon state")?;

        let header = withdrawal_block.header().during("withdrawal block header")?;
        let block_root = historical_block_roots[params.block_root_index as usize];
        let computed = header.root()?;
        if computed != block_root {
            return Err(ProofError::BlockRootMismatch {
                slot: header.slot,
                expected: hex_root(&block_root),
                computed: hex_root(&computed),
            });
        }

        Ok(WithdrawalProof {
            withdrawal_proof: prove_withdrawal_against_execution_payload(withdrawal_block, withdrawal_index)
                .during("withdrawal in execution payload")?,
            slot_proof: prove_slot_against_block_header(&header).during("slot in withdrawal block header")?,
            execution_payload_proof: prove_execution_payload_against_block_header(withdrawal_block)?,
            timestamp_proof: prove_timestamp_against_execution_payload(withdrawal_block)
                .during("timestamp in execution payload")?,
            historical_summary_block_root_proof,
            block_root_index: params.block_root_index,
            historical_summary_index: params.historical_summary_index,
            withdrawal_index: withdrawal_index as u64,
            block_root,
            slot_root: uint64_root(withdrawal_block.slot()),
            timestamp_root: uint64_root(withdrawal_block.timestamp()),
            execution_payload_root: withdrawal_block.execution_payload_root()?,
        })
    }

    /// Locate the historical summary and block root index that prove a
    /// withdrawal at `withdrawal_slot` from an oracle state at `oracle_slot`.
    ///
    /// # Errors
    /// Fails with [`ProofError::WithdrawalNotProvable`] if the withdrawal is
    /// after the oracle slot, before Capella, or still inside the oracle
    /// state's own block roots window.
    pub fn withdrawal_proof_params(
        &self,
        oracle_slot: Slot,
        withdrawal_slot: Slot,
    ) -> Result<WithdrawalProofParams, ProofError> {
        let not_provable = |reason| ProofError::WithdrawalNotProvable {
            oracle_slot,
            withdrawal_slot,
            reason,
        };
        let first_capella_slot = self.config.chain.first_capella_slot();

        if withdrawal_slot > oracle_slot {
            return Err(not_provable("withdrawal slot is after the oracle slot"));
        }
        if oracle_slot - withdrawal_slot < SLOTS_PER_HISTORICAL_ROOT_U64 {
            return Err(not_provable(
                "oracle state has no historical summary for the withdrawal slot yet",
            ));
        }
        if withdrawal_slot < first_capella_slot {
            return Err(not_provable("withdrawal slot is before the first Capella slot"));
        }

        let historical_summary_index =
            (withdrawal_slot - first_capella_slot) / SLOTS_PER_HISTORICAL_ROOT_U64;
        Ok(WithdrawalProofParams {
            historical_summary_state_slot: first_capella_slot
                + (historical_summary_index + 1) * SLOTS_PER_HISTORICAL_ROOT_U64,
            historical_summary_index,
            block_root_index: withdrawal_slot % SLOTS_PER_HISTORICAL_ROOT_U64,
        })
    }

    #[must_use]
    pub fn is_provable_withdrawal(&self, oracle_slot: Slot, withdrawal_slot: Slot) -> bool {
        self.withdrawal_proof_params(oracle_slot, withdrawal_slot).is_ok()
    }

    /// Unix timestamp of `slot`.
    ///
    /// # Errors
    /// Fails with [`ProofError::TimestampOverflow`] if the result does not fit in a `u64`.
    pub fn slot_timestamp(&self, genesis_time: u64, slot: Slot) -> Result<u64, ProofError> {
        slot
            .checked_mul(self.config.chain.seconds_per_slot())
            .and_then(|elapsed| genesis_time.checked_add(elapsed))
            .ok_or(ProofError::TimestampOverflow { genesis_time, slot })
    }
}
