//! Block-side proofs: header fields, the execution payload inside the body,
//! and withdrawals inside the payload.

use crate::constants::{
    BEACON_BLOCK_BODY_TREE_DEPTH, BEACON_BLOCK_HEADER_TREE_DEPTH, EXECUTION_PAYLOAD_INDEX,
    HEADER_BODY_ROOT_INDEX, HEADER_SLOT_INDEX, HEADER_STATE_ROOT_INDEX, TIMESTAMP_INDEX,
    WITHDRAWALS_INDEX, WITHDRAWALS_TREE_DEPTH,
};
use crate::containers::BeaconBlockHeader;
use crate::error::{ProofError, ProofStep};
use crate::merkle::{prove_leaf, MerkleTree};
use crate::ssz::element_roots;
use crate::types::{compose_proofs, Proof};
use crate::versioned::VersionedBeaconBlock;

fn prove_header_field(header: &BeaconBlockHeader, field_index: u64) -> Result<Proof, ProofError> {
    prove_leaf(
        &header.field_roots(),
        field_index as usize,
        BEACON_BLOCK_HEADER_TREE_DEPTH,
    )
}

/// Proof of `header.state_root` against the header root.
///
/// # Errors
/// Only if the Merkle engine fails.
pub fn prove_state_root_against_block_header(header: &BeaconBlockHeader) -> Result<Proof, ProofError> {
    prove_header_field(header, HEADER_STATE_ROOT_INDEX)
}

/// Proof of `header.slot` against the header root.
///
/// # Errors
/// Only if the Merkle engine fails.
pub fn prove_slot_against_block_header(header: &BeaconBlockHeader) -> Result<Proof, ProofError> {
    prove_header_field(header, HEADER_SLOT_INDEX)
}

/// Proof of `header.body_root` against the header root.
///
/// # Errors
/// Only if the Merkle engine fails.
pub fn prove_block_body_against_block_header(header: &BeaconBlockHeader) -> Result<Proof, ProofError> {
    prove_header_field(header, HEADER_BODY_ROOT_INDEX)
}

/// Proof of `body.execution_payload` against the body root.
///
/// # Errors
/// Fails if a body list exceeds its limit.
pub fn prove_execution_payload_against_block_body(block: &VersionedBeaconBlock) -> Result<Proof, ProofError> {
    prove_leaf(
        &block.body_field_roots()?,
        EXECUTION_PAYLOAD_INDEX as usize,
        BEACON_BLOCK_BODY_TREE_DEPTH,
    )
}

/// Proof of `execution_payload.timestamp` against the payload root.
///
/// # Errors
/// Fails if a payload list exceeds its limit.
pub fn prove_timestamp_against_execution_payload(block: &VersionedBeaconBlock) -> Result<Proof, ProofError> {
    prove_leaf(
        &block.execution_payload_field_roots()?,
        TIMESTAMP_INDEX as usize,
        block.fork().execution_payload_tree_depth(),
    )
}

/// Proof of `execution_payload.withdrawals[withdrawal_index]` against the
/// payload root: the leaf inside the withdrawals list, its length mixin, then
/// the list root inside the payload.
///
/// # Errors
/// Fails if the index is not in the block's withdrawals.
pub fn prove_withdrawal_against_execution_payload(
    block: &VersionedBeaconBlock,
    withdrawal_index: usize,
) -> Result<Proof, ProofError> {
    let withdrawals = block.withdrawals();
    if withdrawal_index >= withdrawals.len() {
        return Err(ProofError::IndexOutOfRange {
            what: "withdrawal",
            index: withdrawal_index as u64,
            len: withdrawals.len(),
        });
    }

    let leaves = element_roots(withdrawals)?;
    let in_list = MerkleTree::build(leaves, WITHDRAWALS_TREE_DEPTH)?
        .proof(withdrawal_index)?
        .with_length_mixin(withdrawals.len());

    let list_in_payload = prove_leaf(
        &block.execution_payload_field_roots()?,
        WITHDRAWALS_INDEX as usize,
        block.fork().execution_payload_tree_depth(),
    )?;

    Ok(compose_proofs(in_list, list_in_payload))
}

/// Full path from `withdrawals[withdrawal_index]` up to the block header root.
///
/// # Errors
/// Fails with [`ProofError::SubProof`] naming the level that could not be built.
pub fn prove_withdrawal_against_block_header(
    block: &VersionedBeaconBlock,
    withdrawal_index: usize,
) -> Result<Proof, ProofError> {
    let header = block.header().during("block header")?;
    let in_payload = prove_withdrawal_against_execution_payload(block, withdrawal_index)
        .during("withdrawal in execution payload")?;
    let payload_in_body =
        prove_execution_payload_against_block_body(block).during("execution payload in block body")?;
    let body_in_header =
        prove_block_body_against_block_header(&header).during("block body in block header")?;

    Ok(compose_proofs(
        in_payload,
        compose_proofs(payload_in_body, body_in_header),
    ))
}

/// Full path from `execution_payload.timestamp` up to the block header root.
///
/// # Errors
/// Fails with [`ProofError::SubProof`] naming the level that could not be built.
pub fn prove_timestamp_against_block_header(block: &VersionedBeaconBlock) -> Result<Proof, ProofError> {
    let header = block.header().during("block header")?;
    let in_payload =
        prove_timestamp_against_execution_payload(block).during("timestamp in execution payload")?;
    let payload_in_body =
        prove_execution_payload_against_block_body(block).during("execution payload in block body")?;
    let body_in_header =
        prove_block_body_against_block_header(&header).during("block body in block header")?;

    Ok(compose_proofs(
        in_payload,
        compose_proofs(payload_in_body, body_in_header),
    ))
}

/// Full path from `body.execution_payload` up to the block header root.
///
/// # Errors
/// Fails with [`ProofError::SubProof`] naming the level that could not be built.
pub fn prove_execution_payload_against_block_header(
    block: &VersionedBeaconBlock,
) -> Result<Proof, ProofError> {
    let header = block.header().during("block header")?;
    let payload_in_body =
        prove_execution_payload_against_block_body(block).during("execution payload in block body")?;
    let body_in_header =
        prove_block_body_against_block_header(&header).during("block body in block header")?;
    Ok(compose_proofs(payload_in_body, body_in_header))
}
