//! SSZ Field-Root Codec
//!
//! Reduces one container field to its 32-byte root. Small fixed-size values
//! fit in a single chunk. Vectors are merkleized at the depth of their fixed
//! length. Lists are merkleized at the depth of their limit and then mixed with
//! their length. Basic types are packed into chunks before merkleizing.
//!
//! Fixed-shape containers reuse `ssz_rs` through [`element_root`]; the rest
//! goes through [`crate::merkle`] so that large collections never materialise
//! a full tree.

use crate::constants::{MAX_BYTES_PER_TRANSACTION, MAX_TRANSACTIONS_PER_PAYLOAD};
use crate::error::ProofError;
use crate::merkle::{depth_for_chunks, merkleize, mix_in_length};
use crate::types::Root;
use ssz_rs::prelude::HashTreeRoot;

/// Little-endian `u64` in a zero-padded chunk.
#[must_use]
pub fn uint64_root(value: u64) -> Root {
    let mut chunk = [0u8; 32];
    chunk[..8].copy_from_slice(&value.to_le_bytes());
    chunk
}

#[must_use]
pub fn bool_root(value: bool) -> Root {
    let mut chunk = [0u8; 32];
    chunk[0] = u8::from(value);
    chunk
}

/// Root of a `Bitvector[4]` stored in the low bits of a byte.
///
/// # Errors
/// Fails if any bit above the fourth is set.
pub fn justification_bits_root(bits: u8) -> Result<Root, ProofError> {
    if bits > 0x0f {
        return Err(ProofError::InvalidEncoding(format!(
            "justification bits {bits:#04x} exceed Bitvector[4]"
        )));
    }
    let mut chunk = [0u8; 32];
    chunk[0] = bits;
    Ok(chunk)
}

/// Root of any `ssz_rs` value.
///
/// # Errors
/// Fails if the value cannot be merkleized.
pub fn element_root<T: HashTreeRoot>(value: &T) -> Result<Root, ProofError> {
    let node = value.hash_tree_root()?;
    Ok(node.into())
}

/// Roots of each element of a collection.
///
/// # Errors
/// Fails if any element cannot be merkleized.
pub fn element_roots<T: HashTreeRoot>(values: &[T]) -> Result<Vec<Root>, ProofError> {
    values.iter().map(element_root).collect()
}

/// # Errors
/// Fails with [`ProofError::SizeMismatch`] unless `actual == expected`.
pub fn check_vector_length(field: &'static str, actual: usize, expected: usize) -> Result<(), ProofError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ProofError::SizeMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// # Errors
/// Fails with [`ProofError::ListTooLong`] if `actual > limit`.
pub fn check_list_length(field: &'static str, actual: usize, limit: usize) -> Result<(), ProofError> {
    if actual > limit {
        Err(ProofError::ListTooLong {
            field,
            limit,
            actual,
        })
    } else {
        Ok(())
    }
}

/// Depth of the data tree of a list or vector of `limit` elements of
/// `element_size` bytes.
#[must_use]
pub fn chunk_depth(limit: usize, element_size: usize) -> u32 {
    depth_for_chunks((limit * element_size).div_ceil(32))
}

/// Split bytes into zero-padded chunks.
#[must_use]
pub fn pack_bytes(bytes: &[u8]) -> Vec<Root> {
    bytes
        .chunks(32)
        .map(|part| {
            let mut chunk = [0u8; 32];
            chunk[..part.len()].copy_from_slice(part);
            chunk
        })
        .collect()
}

/// Pack little-endian `u64` values four to a chunk.
#[must_use]
pub fn pack_uint64s(values: &[u64]) -> Vec<Root> {
    values
        .chunks(4)
        .map(|group| {
            let mut chunk = [0u8; 32];
            for (slot, value) in chunk.chunks_exact_mut(8).zip(group) {
                slot.copy_from_slice(&value.to_le_bytes());
            }
            chunk
        })
        .collect()
}

/// Root of a `Vector[Bytes32, length]`.
///
/// # Errors
/// Fails if `roots` does not hold exactly `length` elements.
pub fn root_vector_root(field: &'static str, roots: &[Root], length: usize) -> Result<Root, ProofError> {
    check_vector_length(field, roots.len(), length)?;
    merkleize(roots, chunk_depth(length, 32))
}

/// Root of a `List[Bytes32, limit]`, length mixed in.
///
/// # Errors
/// Fails if `roots` exceeds `limit`.
pub fn root_list_root(field: &'static str, roots: &[Root], limit: usize) -> Result<Root, ProofError> {
    check_list_length(field, roots.len(), limit)?;
    let data_root = merkleize(roots, chunk_depth(limit, 32))?;
    Ok(mix_in_length(&data_root, roots.len()))
}

/// Root of a `List[C, limit]` of composite elements, length mixed in.
///
/// # Errors
/// Fails if `items` exceeds `limit` or an element cannot be merkleized.
pub fn container_list_root<T: HashTreeRoot>(
    field: &'static str,
    items: &[T],
    limit: usize,
) -> Result<Root, ProofError> {
    check_list_length(field, items.len(), limit)?;
    let roots = element_roots(items)?;
    let data_root = merkleize(&roots, chunk_depth(limit, 32))?;
    Ok(mix_in_length(&data_root, items.len()))
}

/// Root of a `Vector[uint64, length]`.
///
/// # Errors
/// Fails if `values` does not hold exactly `length` elements.
pub fn uint64_vector_root(field: &'static str, values: &[u64], length: usize) -> Result<Root, ProofError> {
    check_vector_length(field, values.len(), length)?;
    merkleize(&pack_uint64s(values), chunk_depth(length, 8))
}

/// Root of a `List[uint64, limit]`, length mixed in.
///
/// # Errors
/// Fails if `values` exceeds `limit`.
pub fn uint64_list_root(field: &'static str, values: &[u64], limit: usize) -> Result<Root, ProofError> {
    check_list_length(field, values.len(), limit)?;
    let data_root = merkleize(&pack_uint64s(values), chunk_depth(limit, 8))?;
    Ok(mix_in_length(&data_root, values.len()))
}

/// Root of a `List[uint8, limit]` or `ByteList[limit]`, length mixed in.
///
/// # Errors
/// Fails if `bytes` exceeds `limit`.
pub fn byte_list_root(field: &'static str, bytes: &[u8], limit: usize) -> Result<Root, ProofError> {
    check_list_length(field, bytes.len(), limit)?;
    let data_root = merkleize(&pack_bytes(bytes), chunk_depth(limit, 1))?;
    Ok(mix_in_length(&data_root, bytes.len()))
}

/// Root of the execution payload `transactions` list.
///
/// # Errors
/// Fails if there are too many transactions or one of them is too large.
pub fn transactions_root(transactions: &[Vec<u8>]) -> Result<Root, ProofError> {
    check_list_length("transactions", transactions.len(), MAX_TRANSACTIONS_PER_PAYLOAD)?;
    let roots = transactions
        .iter()
        .map(|tx| byte_list_root("transaction", tx, MAX_BYTES_PER_TRANSACTION))
        .collect::<Result<Vec<_>, _>>()?;
    root_list_root("transactions", &roots, MAX_TRANSACTIONS_PER_PAYLOAD)
}
