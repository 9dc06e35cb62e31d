//! Top-Level State Index
//!
//! The ordered roots of every beacon-state field for one fork. They are the
//! leaves of the whole-state tree, so any proof that ends at the state root
//! finishes with a branch through them.

use crate::capella;
use crate::constants::{
    BALANCES_INDEX, BLOCK_ROOTS_INDEX, HISTORICAL_SUMMARIES_INDEX, LATEST_BLOCK_HEADER_INDEX,
    SLOT_INDEX, VALIDATORS_INDEX,
};
use crate::electra;
use crate::error::ProofError;
use crate::merkle::{merkleize, MerkleTree};
use crate::types::{hex_bytes32_vec, ForkVersion, Proof, Root};
use crate::versioned::VersionedBeaconState;
use serde::{Deserialize, Serialize};

/// Top-level field roots of a beacon state, one fixed-size array per fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopLevelRootsJson", into = "TopLevelRootsJson")]
pub enum BeaconStateTopLevelRoots {
    Capella([Root; capella::BEACON_STATE_FIELD_COUNT]),
    Deneb([Root; capella::BEACON_STATE_FIELD_COUNT]),
    Electra([Root; electra::BEACON_STATE_FIELD_COUNT]),
}

impl BeaconStateTopLevelRoots {
    /// Run the field codec over every top-level field of `state`.
    ///
    /// # Errors
    /// Fails if any field violates its length constraints.
    pub fn from_state(state: &VersionedBeaconState) -> Result<Self, ProofError> {
        Ok(match state {
            VersionedBeaconState::Capella(state) => Self::Capella(state.top_level_field_roots()?),
            VersionedBeaconState::Deneb(state) => Self::Deneb(state.top_level_field_roots()?),
            VersionedBeaconState::Electra(state) => Self::Electra(state.top_level_field_roots()?),
        })
    }

    #[must_use]
    pub fn fork(&self) -> ForkVersion {
        match self {
            Self::Capella(_) => ForkVersion::Capella,
            Self::Deneb(_) => ForkVersion::Deneb,
            Self::Electra(_) => ForkVersion::Electra,
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[Root] {
        match self {
            Self::Capella(roots) | Self::Deneb(roots) => roots.as_slice(),
            Self::Electra(roots) => roots.as_slice(),
        }
    }

    #[must_use]
    pub fn tree_depth(&self) -> u32 {
        self.fork().beacon_state_tree_depth()
    }

    /// Root of the field at `index`.
    ///
    /// # Errors
    /// Fails if the fork has no such field.
    pub fn field(&self, index: u64) -> Result<Root, ProofError> {
        let roots = self.roots();
        usize::try_from(index)
            .ok()
            .and_then(|i| roots.get(i))
            .copied()
            .ok_or(ProofError::IndexOutOfRange {
                what: "beacon state field",
                index,
                len: roots.len(),
            })
    }

    #[must_use]
    pub fn slot_root(&self) -> Root {
        self.roots()[SLOT_INDEX as usize]
    }

    #[must_use]
    pub fn latest_block_header_root(&self) -> Root {
        self.roots()[LATEST_BLOCK_HEADER_INDEX as usize]
    }

    #[must_use]
    pub fn block_roots_root(&self) -> Root {
        self.roots()[BLOCK_ROOTS_INDEX as usize]
    }

    #[must_use]
    pub fn validators_root(&self) -> Root {
        self.roots()[VALIDATORS_INDEX as usize]
    }

    #[must_use]
    pub fn balances_root(&self) -> Root {
        self.roots()[BALANCES_INDEX as usize]
    }

    #[must_use]
    pub fn historical_summaries_root(&self) -> Root {
        self.roots()[HISTORICAL_SUMMARIES_INDEX as usize]
    }

    /// The beacon state root.
    ///
    /// # Errors
    /// Never fails for a well-formed value; the error is the engine's.
    pub fn state_root(&self) -> Result<Root, ProofError> {
        merkleize(self.roots(), self.tree_depth())
    }

    /// # Errors
    /// Never fails for a well-formed value; the error is the engine's.
    pub fn tree(&self) -> Result<MerkleTree, ProofError> {
        MerkleTree::from_leaves(self.roots(), self.tree_depth())
    }
}

/// Proof that top-level field `field_index` is included in the state root.
///
/// # Errors
/// Fails if the fork has no such field.
pub fn prove_field_against_state(
    top_level_roots: &BeaconStateTopLevelRoots,
    field_index: u64,
) -> Result<Proof, ProofError> {
    top_level_roots.field(field_index)?;
    top_level_roots.tree()?.proof(field_index as usize)
}

#[derive(Serialize, Deserialize)]
struct TopLevelRootsJson {
    fork: ForkVersion,
    #[serde(with = "hex_bytes32_vec")]
    roots: Vec<Root>,
}

impl From<BeaconStateTopLevelRoots> for TopLevelRootsJson {
    fn from(value: BeaconStateTopLevelRoots) -> Self {
        Self {
            fork: value.fork(),
            roots: value.roots().to_vec(),
        }
    }
}

impl TryFrom<TopLevelRootsJson> for BeaconStateTopLevelRoots {
    type Error = ProofError;

    fn try_from(value: TopLevelRootsJson) -> Result<Self, Self::Error> {
        let expected = value.fork.beacon_state_field_count();
        let actual = value.roots.len();
        let mismatch = || ProofError::SizeMismatch {
            field: "top_level_roots",
            expected,
            actual,
        };
        Ok(match value.fork {
            ForkVersion::Capella => Self::Capella(value.roots.try_into().map_err(|_| mismatch())?),
            ForkVersion::Deneb => Self::Deneb(value.roots.try_into().map_err(|_| mismatch())?),
            ForkVersion::Electra => Self::Electra(value.roots.try_into().map_err(|_| mismatch())?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::Validator;
    use crate::deneb;
    use crate::merkle::verify_proof;

    fn deneb_roots() -> BeaconStateTopLevelRoots {
        let mut state = deneb::BeaconState::default();
        state.slot = 9_000_000;
        state.validators.push(Validator::default());
        state.balances.push(32_000_000_000);
        BeaconStateTopLevelRoots::from_state(&state.into()).expect("roots")
    }

    #[test]
    fn test_every_field_proves_against_state_root() {
        let roots = deneb_roots();
        let state_root = roots.state_root().expect("state root");

        for index in 0..roots.roots().len() as u64 {
            let proof = prove_field_against_state(&roots, index).expect("proof");
            assert_eq!(proof.len(), 5);
            assert!(verify_proof(
                &state_root,
                proof.nodes(),
                &roots.field(index).expect("field"),
                index
            ));
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let roots = deneb_roots();
        assert!(matches!(
            prove_field_against_state(&roots, 28),
            Err(ProofError::IndexOutOfRange { index: 28, len: 28, .. })
        ));
    }

    #[test]
    fn test_electra_tree_depth() {
        let state = electra::BeaconState::default();
        let roots = BeaconStateTopLevelRoots::from_state(&state.into()).expect("roots");
        let proof = prove_field_against_state(&roots, 36).expect("proof");

        assert_eq!(roots.tree_depth(), 6);
        assert_eq!(proof.len(), 6);
    }

    #[test]
    fn test_json_roundtrip_checks_field_count() {
        let roots = deneb_roots();
        let json = serde_json::to_string(&roots).expect("serialize");
        assert!(json.contains("\"fork\":\"deneb\""));

        let decoded: BeaconStateTopLevelRoots = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, roots);

        let electra_json = json.replace("deneb", "electra");
        assert!(serde_json::from_str::<BeaconStateTopLevelRoots>(&electra_json).is_err());
    }

    #[test]
    fn test_named_accessors() {
        let roots = deneb_roots();
        assert_eq!(roots.slot_root(), crate::ssz::uint64_root(9_000_000));
        assert_eq!(
            roots.latest_block_header_root(),
            crate::containers::BeaconBlockHeader::default().root().expect("header root")
        );
        assert_eq!(roots.validators_root(), roots.roots()[11]);
        assert_eq!(roots.balances_root(), roots.roots()[12]);
        assert_eq!(roots.historical_summaries_root(), roots.roots()[27]);
    }
}
