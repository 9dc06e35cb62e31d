//! Core Types
//!
//! Primitive aliases shared by every container, the [`Proof`] sibling path with
//! its wire encoding, and the fork and chain selectors.

use crate::constants::SECONDS_PER_SLOT;
use crate::error::ProofError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_rs::prelude::Vector;
use std::fmt;
use std::str::FromStr;

/// A 32-byte Merkle node.
pub type Root = [u8; 32];
pub type Slot = u64;
pub type Epoch = u64;
pub type Gwei = u64;
pub type ValidatorIndex = u64;
pub type WithdrawalIndex = u64;
pub type ExecutionAddress = [u8; 20];
pub type BlsPubkey = Vector<u8, 48>;
pub type BlsSignature = Vector<u8, 96>;
pub type KzgCommitment = Vector<u8, 48>;

/// Format a root as `0x`-prefixed lowercase hex.
#[must_use]
pub fn hex_root(root: &Root) -> String {
    format!("0x{}", hex::encode(root))
}

fn parse_root(s: &str) -> Result<Root, ProofError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ProofError::InvalidEncoding("missing 0x prefix".to_string()))?;
    let bytes = hex::decode(digits).map_err(|e| ProofError::InvalidEncoding(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| ProofError::InvalidEncoding("expected 32 bytes".to_string()))
}

/// A Merkle branch, ordered from the leaf's sibling up to the child of the root.
///
/// A branch through a variable-length list carries the little-endian element
/// count as one extra node at the point where the list root is mixed in. The
/// JSON form is `0x` followed by the concatenated hex of every node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Proof(Vec<Root>);

impl Proof {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_nodes(nodes: Vec<Root>) -> Self {
        Self(nodes)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, node: Root) {
        self.0.push(node);
    }

    /// Append the length mixin of a list holding `length` elements.
    #[must_use]
    pub fn with_length_mixin(mut self, length: usize) -> Self {
        self.0.push(crate::merkle::length_root(length));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Root] {
        &self.0
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Root> {
        self.0
    }

    /// Concatenated byte form, as passed to verifier contracts.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.concat()
    }

    /// Parse the concatenated byte form.
    ///
    /// # Errors
    /// Fails if the length is not a multiple of 32.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() % 32 != 0 {
            return Err(ProofError::InvalidEncoding(format!(
                "proof of {} bytes is not a multiple of 32",
                bytes.len()
            )));
        }
        let nodes = bytes
            .chunks_exact(32)
            .map(|chunk| {
                let mut node = [0u8; 32];
                node.copy_from_slice(chunk);
                node
            })
            .collect();
        Ok(Self(nodes))
    }
}

/// Join two branches. `inner` is the path closer to the proven leaf and
/// `outer` continues from the root `inner` proves against.
///
/// Every multi-level proof is assembled through this function so the
/// bottom-to-top order is decided in one place.
#[must_use]
pub fn compose_proofs(inner: Proof, outer: Proof) -> Proof {
    let mut nodes = inner.0;
    nodes.extend(outer.0);
    Proof(nodes)
}

impl From<Vec<Root>> for Proof {
    fn from(nodes: Vec<Root>) -> Self {
        Self(nodes)
    }
}

impl AsRef<[Root]> for Proof {
    fn as_ref(&self) -> &[Root] {
        &self.0
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for Proof {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ProofError::InvalidEncoding("missing 0x prefix".to_string()))?;
        if digits.len() % 64 != 0 {
            return Err(ProofError::InvalidEncoding(format!(
                "proof of {} hex characters is not a multiple of 64",
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|e| ProofError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Proof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Proof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Beacon chain fork whose container layouts are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkVersion {
    Capella,
    Deneb,
    Electra,
}

impl ForkVersion {
    /// Mainnet fork version bytes.
    #[must_use]
    pub const fn version_bytes(self) -> [u8; 4] {
        match self {
            Self::Capella => [3, 0, 0, 0],
            Self::Deneb => [4, 0, 0, 0],
            Self::Electra => [5, 0, 0, 0],
        }
    }

    /// Number of top-level fields in the beacon state.
    #[must_use]
    pub const fn beacon_state_field_count(self) -> usize {
        match self {
            Self::Capella | Self::Deneb => 28,
            Self::Electra => 37,
        }
    }

    #[must_use]
    pub const fn beacon_state_tree_depth(self) -> u32 {
        match self {
            Self::Capella | Self::Deneb => 5,
            Self::Electra => 6,
        }
    }

    #[must_use]
    pub const fn block_body_field_count(self) -> usize {
        match self {
            Self::Capella => 11,
            Self::Deneb => 12,
            Self::Electra => 13,
        }
    }

    #[must_use]
    pub const fn execution_payload_field_count(self) -> usize {
        match self {
            Self::Capella => 15,
            Self::Deneb | Self::Electra => 17,
        }
    }

    #[must_use]
    pub const fn execution_payload_tree_depth(self) -> u32 {
        match self {
            Self::Capella => 4,
            Self::Deneb | Self::Electra => 5,
        }
    }
}

impl fmt::Display for ForkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Capella => "capella",
            Self::Deneb => "deneb",
            Self::Electra => "electra",
        };
        f.write_str(name)
    }
}

impl FromStr for ForkVersion {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "capella" => Ok(Self::Capella),
            "deneb" => Ok(Self::Deneb),
            "electra" => Ok(Self::Electra),
            _ => Err(ProofError::UnsupportedFork(s.to_string())),
        }
    }
}

impl TryFrom<[u8; 4]> for ForkVersion {
    type Error = ProofError;

    fn try_from(version: [u8; 4]) -> Result<Self, Self::Error> {
        [Self::Capella, Self::Deneb, Self::Electra]
            .into_iter()
            .find(|fork| fork.version_bytes() == version)
            .ok_or_else(|| ProofError::UnsupportedFork(format!("0x{}", hex::encode(version))))
    }
}

/// Networks with known Capella activation slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Mainnet,
    Goerli,
    Holesky,
}

impl Chain {
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Goerli => 5,
            Self::Holesky => 17_000,
        }
    }

    /// First slot of the Capella fork, where historical summaries begin.
    #[must_use]
    pub const fn first_capella_slot(self) -> Slot {
        match self {
            Self::Mainnet => 6_209_536,
            Self::Goerli => 5_193_728,
            Self::Holesky => 8_192,
        }
    }

    #[must_use]
    pub const fn seconds_per_slot(self) -> u64 {
        SECONDS_PER_SLOT
    }
}

impl TryFrom<u64> for Chain {
    type Error = ProofError;

    fn try_from(chain_id: u64) -> Result<Self, Self::Error> {
        match chain_id {
            1 => Ok(Self::Mainnet),
            5 => Ok(Self::Goerli),
            17_000 => Ok(Self::Holesky),
            other => Err(ProofError::UnsupportedChain(other.to_string())),
        }
    }
}

impl FromStr for Chain {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "goerli" => Ok(Self::Goerli),
            "holesky" => Ok(Self::Holesky),
            _ => s
                .parse::<u64>()
                .map_err(|_| ProofError::UnsupportedChain(s.to_string()))
                .and_then(Self::try_from),
        }
    }
}

/// Serde helper for a root as a `0x` hex string.
pub mod hex_bytes32 {
    use super::{parse_root, Root};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Root, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::hex_root(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Root, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_root(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for a list of roots as `0x` hex strings.
pub mod hex_bytes32_vec {
    use super::{parse_root, Root};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(roots: &[Root], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(roots.iter().map(super::hex_root))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Root>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .iter()
            .map(|s| parse_root(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
