//! Merkle Tree Engine
//!
//! Layered binary Merkle trees over 32-byte leaves, sibling-path proofs and
//! their verification. Missing leaves are the SSZ zero chunk, and an empty
//! subtree of height `k` is represented by `zero_hashes()[k]` so trees with a
//! huge declared capacity (e.g. 2^40 validators) cost only as much as the
//! leaves actually present.
//!
//! Nothing here knows what a leaf means; the codec and the proof composer
//! decide the depth and the leaf order.

use crate::error::ProofError;
use crate::types::{Proof, Root};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Deepest tree the engine can represent.
pub const MAX_TREE_DEPTH: u32 = 64;

/// Precomputed zero hashes for each height.
/// `zero_hashes()[0]` is the all-zero chunk and
/// `zero_hashes()[i] = hash(zero_hashes()[i - 1], zero_hashes()[i - 1])`.
pub fn zero_hashes() -> &'static [Root; MAX_TREE_DEPTH as usize + 1] {
    static ZERO_HASHES: OnceLock<[Root; MAX_TREE_DEPTH as usize + 1]> = OnceLock::new();
    ZERO_HASHES.get_or_init(|| {
        let mut hashes = [[0u8; 32]; MAX_TREE_DEPTH as usize + 1];
        let mut hasher = Sha256::new();
        for i in 1..hashes.len() {
            hasher.update(hashes[i - 1]);
            hasher.update(hashes[i - 1]);
            hashes[i] = hasher.finalize_reset().into();
        }
        hashes
    })
}

/// SHA-256 of two concatenated nodes
#[must_use]
pub fn hash_pair(left: &Root, right: &Root) -> Root {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Smallest depth whose tree holds `chunks` leaves.
#[must_use]
pub fn depth_for_chunks(chunks: usize) -> u32 {
    if chunks <= 1 {
        0
    } else {
        usize::BITS - (chunks - 1).leading_zeros()
    }
}

fn check_shape(leaves: usize, depth: u32) -> Result<(), ProofError> {
    if depth > MAX_TREE_DEPTH {
        return Err(ProofError::DepthTooLarge(depth));
    }
    if depth < usize::BITS && leaves > 1_usize << depth {
        return Err(ProofError::TooManyLeaves { leaves, depth });
    }
    Ok(())
}

/// Pad an odd layer with the zero hash of its height and hash it pairwise.
fn next_layer(layer: &mut Vec<Root>, height: u32) -> Vec<Root> {
    if layer.len() % 2 == 1 {
        layer.push(zero_hashes()[height as usize]);
    }
    layer
        .chunks_exact(2)
        .map(|pair| hash_pair(&pair[0], &pair[1]))
        .collect()
}

/// A fully materialised Merkle tree.
///
/// `layers[0]` holds the leaves and `layers[depth]` the single root. Every
/// layer below the root is padded to even length, so only the non-empty
/// part of the tree is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Root>>,
    leaf_count: usize,
}

impl MerkleTree {
    /// Build a tree of `depth` levels above `leaves`.
    ///
    /// # Errors
    /// Fails on an empty leaf set, a depth above 64 or more leaves than the
    /// depth can hold.
    pub fn build(leaves: Vec<Root>, depth: u32) -> Result<Self, ProofError> {
        if leaves.is_empty() {
            return Err(ProofError::EmptyLeaves);
        }
        check_shape(leaves.len(), depth)?;

        let leaf_count = leaves.len();
        let mut layers = Vec::with_capacity(depth as usize + 1);
        layers.push(leaves);
        for height in 0..depth {
            let parent = next_layer(&mut layers[height as usize], height);
            layers.push(parent);
        }

        Ok(Self { layers, leaf_count })
    }

    /// Build a tree from borrowed leaves.
    ///
    /// # Errors
    /// See [`MerkleTree::build`].
    pub fn from_leaves(leaves: &[Root], depth: u32) -> Result<Self, ProofError> {
        Self::build(leaves.to_vec(), depth)
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn depth(&self) -> u32 {
        (self.layers.len() - 1) as u32
    }

    #[must_use]
    pub fn root(&self) -> Root {
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves the tree was built from, excluding padding.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    #[must_use]
    pub fn leaves(&self) -> &[Root] {
        &self.layers[0][..self.leaf_count]
    }

    #[must_use]
    pub fn leaf(&self, index: usize) -> Option<&Root> {
        self.leaves().get(index)
    }

    /// Sibling path for the leaf at `index`, bottom to top.
    ///
    /// # Errors
    /// Fails if `index` is not one of the input leaves.
    pub fn proof(&self, index: usize) -> Result<Proof, ProofError> {
        if index >= self.leaf_count {
            return Err(ProofError::IndexOutOfRange {
                what: "leaf",
                index: index as u64,
                len: self.leaf_count,
            });
        }

        let depth = self.depth() as usize;
        let mut proof = Proof::with_capacity(depth);
        for (height, layer) in self.layers[..depth].iter().enumerate() {
            let sibling = (index >> height) ^ 1;
            let node = layer
                .get(sibling)
                .copied()
                .unwrap_or(zero_hashes()[height]);
            proof.push(node);
        }
        Ok(proof)
    }
}

/// Root of a tree of `depth` over `leaves`, without keeping its layers.
/// An empty leaf set yields the zero hash of `depth`.
///
/// # Errors
/// Fails on a depth above 64 or more leaves than the depth can hold.
pub fn merkleize(leaves: &[Root], depth: u32) -> Result<Root, ProofError> {
    check_shape(leaves.len(), depth)?;
    if leaves.is_empty() {
        return Ok(zero_hashes()[depth as usize]);
    }

    let mut layer = leaves.to_vec();
    for height in 0..depth {
        layer = next_layer(&mut layer, height);
    }
    Ok(layer[0])
}

/// Build a tree over `leaves` and prove the leaf at `index`.
///
/// # Errors
/// See [`MerkleTree::build`] and [`MerkleTree::proof`].
pub fn prove_leaf(leaves: &[Root], index: usize, depth: u32) -> Result<Proof, ProofError> {
    MerkleTree::from_leaves(leaves, depth)?.proof(index)
}

/// Check that `leaf` sits at `index` under `root`.
///
/// Bit `i` of `index` selects the side at step `i`: 0 hashes the running
/// node on the left, 1 on the right. Bits above `proof.len()` are ignored, so
/// both path indices and generalized indices with a leading 1 verify.
#[must_use]
pub fn verify_proof(root: &Root, proof: &[Root], leaf: &Root, index: u64) -> bool {
    let mut node = *leaf;
    let mut index = index;
    for sibling in proof {
        node = if index & 1 == 0 {
            hash_pair(&node, sibling)
        } else {
            hash_pair(sibling, &node)
        };
        index >>= 1;
    }
    node == *root
}

/// Little-endian element count in a 32-byte chunk.
#[must_use]
pub fn length_root(length: usize) -> Root {
    let mut chunk = [0u8; 32];
    chunk[..8].copy_from_slice(&(length as u64).to_le_bytes());
    chunk
}

/// Combine a list's data root with its element count.
#[must_use]
pub fn mix_in_length(data_root: &Root, length: usize) -> Root {
    hash_pair(data_root, &length_root(length))
}
