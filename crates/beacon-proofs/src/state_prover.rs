//! State-level Proof Composer
//!
//! Proofs that end at the beacon state root. Each one is a list-level branch
//! (validators, balances, historical summaries) joined through
//! [`compose_proofs`] with the branch of that list's root through the
//! top-level state tree.
//!
//! The validator and balance trees are the expensive part, so they are built
//! once per state by [`validators_tree`] and [`balances_tree`] and shared by
//! every proof against that state.

use crate::constants::{
    BALANCES_INDEX, BALANCE_TREE_DEPTH, BLOCK_ROOTS_TREE_DEPTH, HISTORICAL_SUMMARIES_INDEX,
    HISTORICAL_SUMMARIES_TREE_DEPTH, SLOTS_PER_HISTORICAL_ROOT, VALIDATORS_INDEX,
    VALIDATOR_TREE_DEPTH,
};
use crate::containers::{HistoricalSummary, Validator};
use crate::error::{ProofError, ProofStep};
use crate::merkle::MerkleTree;
use crate::ssz::{check_vector_length, element_roots, pack_uint64s};
use crate::top_level::{prove_field_against_state, BeaconStateTopLevelRoots};
use crate::types::{compose_proofs, Gwei, Proof, Root};

/// Tree over the validator registry, one leaf per validator root.
///
/// # Errors
/// Fails on an empty registry.
pub fn validators_tree(validators: &[Validator]) -> Result<MerkleTree, ProofError> {
    MerkleTree::build(element_roots(validators)?, VALIDATOR_TREE_DEPTH)
}

/// Packed balances tree plus the number of balances it holds, which is the
/// length mixed into the list root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancesTree {
    tree: MerkleTree,
    balance_count: usize,
}

impl BalancesTree {
    #[must_use]
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    #[must_use]
    pub fn balance_count(&self) -> usize {
        self.balance_count
    }

    /// Root of the balances list, length mixed in.
    #[must_use]
    pub fn list_root(&self) -> Root {
        crate::merkle::mix_in_length(&self.tree.root(), self.balance_count)
    }
}

/// Tree over the packed balances, four balances per leaf.
///
/// # Errors
/// Fails on an empty balance list.
pub fn balances_tree(balances: &[Gwei]) -> Result<BalancesTree, ProofError> {
    Ok(BalancesTree {
        tree: MerkleTree::build(pack_uint64s(balances), BALANCE_TREE_DEPTH)?,
        balance_count: balances.len(),
    })
}

/// The packed chunk holding the balance of `validator_index`.
///
/// # Errors
/// Fails if there is no balance at that index.
pub fn get_balance_root(balances: &[Gwei], validator_index: usize) -> Result<Root, ProofError> {
    if validator_index >= balances.len() {
        return Err(ProofError::IndexOutOfRange {
            what: "balance",
            index: validator_index as u64,
            len: balances.len(),
        });
    }
    let start = validator_index / 4 * 4;
    let end = (start + 4).min(balances.len());
    let mut chunks = pack_uint64s(&balances[start..end]);
    Ok(chunks.remove(0))
}

/// Proof of `validators[validator_index]` against the validators list root.
///
/// # Errors
/// Fails if the index is outside the registry.
pub fn prove_validator_against_validators_list(
    validators_tree: &MerkleTree,
    validator_index: usize,
) -> Result<Proof, ProofError> {
    if validator_index >= validators_tree.leaf_count() {
        return Err(ProofError::IndexOutOfRange {
            what: "validator",
            index: validator_index as u64,
            len: validators_tree.leaf_count(),
        });
    }
    Ok(validators_tree
        .proof(validator_index)?
        .with_length_mixin(validators_tree.leaf_count()))
}

/// Proof of `validators[validator_index]` against the state root.
///
/// # Errors
/// Fails with [`ProofError::SubProof`] naming the level that could not be built.
pub fn prove_validator_against_beacon_state(
    top_level_roots: &BeaconStateTopLevelRoots,
    validators_tree: &MerkleTree,
    validator_index: usize,
) -> Result<Proof, ProofError> {
    let in_list = prove_validator_against_validators_list(validators_tree, validator_index)
        .during("validator in validators list")?;
    let list_in_state = prove_field_against_state(top_level_roots, VALIDATORS_INDEX)
        .during("validators list in beacon state")?;
    Ok(compose_proofs(in_list, list_in_state))
}

/// Proof of the balance chunk of `validator_index` against the balances list root.
///
/// # Errors
/// Fails if the index has no balance.
pub fn prove_validator_balance_against_balance_list(
    balances_tree: &BalancesTree,
    validator_index: usize,
) -> Result<Proof, ProofError> {
    if validator_index >= balances_tree.balance_count {
        return Err(ProofError::IndexOutOfRange {
            what: "balance",
            index: validator_index as u64,
            len: balances_tree.balance_count,
        });
    }
    Ok(balances_tree
        .tree
        .proof(validator_index / 4)?
        .with_length_mixin(balances_tree.balance_count))
}

/// Proof of the balances list root against the state root.
///
/// # Errors
/// Only if the Merkle engine fails.
pub fn prove_balances_list_against_state(
    top_level_roots: &BeaconStateTopLevelRoots,
) -> Result<Proof, ProofError> {
    prove_field_against_state(top_level_roots, BALANCES_INDEX)
}

/// Proof of the balance chunk of `validator_index` against the state root.
///
/// # Errors
/// Fails with [`ProofError::SubProof`] naming the level that could not be built.
pub fn prove_validator_balance_against_beacon_state(
    top_level_roots: &BeaconStateTopLevelRoots,
    balances_tree: &BalancesTree,
    validator_index: usize,
) -> Result<Proof, ProofError> {
    let in_list = prove_validator_balance_against_balance_list(balances_tree, validator_index)
        .during("balance in balances list")?;
    let list_in_state =
        prove_balances_list_against_state(top_level_roots).during("balances list in beacon state")?;
    Ok(compose_proofs(in_list, list_in_state))
}

/// Proof of an old block root against the current state root, through
/// `historical_summaries[summary_index].block_summary_root`.
///
/// `historical_block_roots` is the `block_roots` vector of the state that
/// closed the summarized period; its root must be the summary's
/// `block_summary_root`.
///
/// # Errors
/// Fails if the block roots are not a full period, if either index is out of
/// range, or if the block roots do not match the summary.
pub fn prove_block_root_against_beacon_state_via_historical_summaries(
    top_level_roots: &BeaconStateTopLevelRoots,
    historical_summaries: &[HistoricalSummary],
    historical_block_roots: &[Root],
    summary_index: usize,
    block_root_index: usize,
) -> Result<Proof, ProofError> {
    check_vector_length(
        "historical_block_roots",
        historical_block_roots.len(),
        SLOTS_PER_HISTORICAL_ROOT,
    )?;
    let summary = historical_summaries
        .get(summary_index)
        .ok_or(ProofError::IndexOutOfRange {
            what: "historical summary",
            index: summary_index as u64,
            len: historical_summaries.len(),
        })?;
    if block_root_index >= SLOTS_PER_HISTORICAL_ROOT {
        return Err(ProofError::IndexOutOfRange {
            what: "block root",
            index: block_root_index as u64,
            len: SLOTS_PER_HISTORICAL_ROOT,
        });
    }

    let block_roots_tree = MerkleTree::from_leaves(historical_block_roots, BLOCK_ROOTS_TREE_DEPTH)?;
    if block_roots_tree.root() != summary.block_summary_root {
        return Err(ProofError::HistoricalSummaryMismatch {
            index: summary_index as u64,
        });
    }

    let in_block_roots = block_roots_tree
        .proof(block_root_index)
        .during("block root in historical block roots")?;
    // block_summary_root is field 0, so the only sibling is state_summary_root
    let in_summary = Proof::from_nodes(vec![summary.state_summary_root]);
    let summary_in_list = MerkleTree::build(
        element_roots(historical_summaries)?,
        HISTORICAL_SUMMARIES_TREE_DEPTH,
    )
    .and_then(|tree| tree.proof(summary_index))
    .map(|proof| proof.with_length_mixin(historical_summaries.len()))
    .during("historical summary in historical summaries list")?;
    let list_in_state = prove_field_against_state(top_level_roots, HISTORICAL_SUMMARIES_INDEX)
        .during("historical summaries list in beacon state")?;

    Ok(compose_proofs(
        compose_proofs(in_block_roots, in_summary),
        compose_proofs(summary_in_list, list_in_state),
    ))
}
