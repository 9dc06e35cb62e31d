//! Generalized Index Computation
//!
//! Two conventions are used for locating a leaf across nested trees:
//!
//! - the *path index* `(parent << child_depth) | child`, which is what
//!   [`crate::merkle::verify_proof`] consumes and what the verifier contracts
//!   hardcode;
//! - the SSZ *generalized index*, which is the path index with a leading 1 bit
//!   above the full depth, as produced by [`GindexCalculator::concat_gindices`].
//!
//! Lists contribute one extra level: their data root is the left child of the
//! list root, so a path through a list of depth `d` shifts by `d + 1`.

use crate::constants::{
    BALANCES_INDEX, BALANCE_TREE_DEPTH, BEACON_BLOCK_BODY_TREE_DEPTH,
    BEACON_BLOCK_HEADER_TREE_DEPTH, BLOCK_ROOTS_TREE_DEPTH, BLOCK_SUMMARY_ROOT_INDEX,
    EXECUTION_PAYLOAD_INDEX, HEADER_BODY_ROOT_INDEX, HEADER_SLOT_INDEX, HEADER_STATE_ROOT_INDEX,
    HISTORICAL_SUMMARIES_INDEX, HISTORICAL_SUMMARIES_TREE_DEPTH, HISTORICAL_SUMMARY_TREE_DEPTH,
    TIMESTAMP_INDEX, VALIDATORS_INDEX, VALIDATOR_TREE_DEPTH, WITHDRAWALS_INDEX,
    WITHDRAWALS_TREE_DEPTH,
};
use crate::types::ForkVersion;

/// Calculator for path indices and generalized indices of every proof family
#[derive(Debug, Clone, Copy)]
pub struct GindexCalculator;

impl GindexCalculator {
    /// Append a child path of `child_depth` levels below `parent`.
    #[must_use]
    pub const fn concat(parent: u64, child: u64, child_depth: u32) -> u64 {
        (parent << child_depth) | child
    }

    /// Generalized index of a path index at the given total depth.
    #[must_use]
    pub const fn to_generalized(path_index: u64, depth: u32) -> u64 {
        (1_u64 << depth) | path_index
    }

    /// Concatenate generalized indices (each with its leading 1 bit).
    #[must_use]
    pub fn concat_gindices(gindices: &[u64]) -> u64 {
        let mut result = 1_u64;
        for &gindex in gindices {
            let depth = Self::gindex_depth(gindex);
            result = (result << depth) | (gindex ^ (1_u64 << depth));
        }
        result
    }

    /// Depth of a generalized index (position of its leading 1 bit)
    #[must_use]
    pub const fn gindex_depth(gindex: u64) -> u32 {
        63 - gindex.leading_zeros()
    }

    /// `validators[i]` relative to the state root.
    #[must_use]
    pub const fn validator_index(validator_index: u64) -> u64 {
        Self::concat(VALIDATORS_INDEX, validator_index, VALIDATOR_TREE_DEPTH + 1)
    }

    /// Balance chunk of validator `i` relative to the state root.
    #[must_use]
    pub const fn balance_index(validator_index: u64) -> u64 {
        Self::concat(BALANCES_INDEX, validator_index / 4, BALANCE_TREE_DEPTH + 1)
    }

    /// `state_root` relative to the block header root.
    #[must_use]
    pub const fn state_root_index() -> u64 {
        HEADER_STATE_ROOT_INDEX
    }

    /// `slot` relative to the block header root.
    #[must_use]
    pub const fn slot_index() -> u64 {
        HEADER_SLOT_INDEX
    }

    /// `body.execution_payload` relative to the block header root.
    #[must_use]
    pub const fn execution_payload_index() -> u64 {
        Self::concat(
            HEADER_BODY_ROOT_INDEX,
            EXECUTION_PAYLOAD_INDEX,
            BEACON_BLOCK_BODY_TREE_DEPTH,
        )
    }

    /// `withdrawals[i]` relative to the execution payload root.
    #[must_use]
    pub const fn withdrawal_in_payload_index(withdrawal_index: u64) -> u64 {
        Self::concat(WITHDRAWALS_INDEX, withdrawal_index, WITHDRAWALS_TREE_DEPTH + 1)
    }

    /// `body.execution_payload.withdrawals[i]` relative to the block header root.
    #[must_use]
    pub const fn withdrawal_index(fork: ForkVersion, withdrawal_index: u64) -> u64 {
        Self::concat(
            Self::execution_payload_index(),
            Self::withdrawal_in_payload_index(withdrawal_index),
            fork.execution_payload_tree_depth() + WITHDRAWALS_TREE_DEPTH + 1,
        )
    }

    /// `body.execution_payload.timestamp` relative to the block header root.
    #[must_use]
    pub const fn timestamp_index(fork: ForkVersion) -> u64 {
        Self::concat(
            Self::execution_payload_index(),
            TIMESTAMP_INDEX,
            fork.execution_payload_tree_depth(),
        )
    }

    /// `historical_summaries[s].block_summary_root[b]` relative to the state root.
    #[must_use]
    pub const fn historical_block_root_index(summary_index: u64, block_root_index: u64) -> u64 {
        let summary = Self::concat(
            HISTORICAL_SUMMARIES_INDEX,
            summary_index,
            HISTORICAL_SUMMARIES_TREE_DEPTH + 1,
        );
        let field = Self::concat(summary, BLOCK_SUMMARY_ROOT_INDEX, HISTORICAL_SUMMARY_TREE_DEPTH);
        Self::concat(field, block_root_index, BLOCK_ROOTS_TREE_DEPTH)
    }

    /// Proof length for `validators[i]` against the state root.
    #[must_use]
    pub const fn validator_proof_length(fork: ForkVersion) -> u32 {
        VALIDATOR_TREE_DEPTH + 1 + fork.beacon_state_tree_depth()
    }

    /// Proof length for a balance chunk against the state root.
    #[must_use]
    pub const fn balance_proof_length(fork: ForkVersion) -> u32 {
        BALANCE_TREE_DEPTH + 1 + fork.beacon_state_tree_depth()
    }

    /// Proof length for a withdrawal against the block header root.
    #[must_use]
    pub const fn withdrawal_proof_length(fork: ForkVersion) -> u32 {
        WITHDRAWALS_TREE_DEPTH
            + 1
            + fork.execution_payload_tree_depth()
            + BEACON_BLOCK_BODY_TREE_DEPTH
            + BEACON_BLOCK_HEADER_TREE_DEPTH
    }

    /// Proof length for a historical block root against the state root.
    #[must_use]
    pub const fn historical_block_root_proof_length(fork: ForkVersion) -> u32 {
        BLOCK_ROOTS_TREE_DEPTH
            + HISTORICAL_SUMMARY_TREE_DEPTH
            + HISTORICAL_SUMMARIES_TREE_DEPTH
            + 1
            + fork.beacon_state_tree_depth()
    }
}
