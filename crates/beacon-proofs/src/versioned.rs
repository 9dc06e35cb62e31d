//! Fork-tagged beacon states and blocks.
//!
//! Proof code is written once against these enums; each accessor dispatches
//! to the fork layout that owns the field.

use crate::containers::{BeaconBlockHeader, HistoricalSummary, Validator, Withdrawal};
use crate::error::ProofError;
use crate::merkle::merkleize;
use crate::top_level::BeaconStateTopLevelRoots;
use crate::types::{ForkVersion, Gwei, Root, Slot};
use crate::{capella, deneb, electra};

/// A beacon state of any supported fork
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedBeaconState {
    Capella(Box<capella::BeaconState>),
    Deneb(Box<deneb::BeaconState>),
    Electra(Box<electra::BeaconState>),
}

macro_rules! by_fork {
    ($self:ident, $inner:ident => $expr:expr) => {
        match $self {
            Self::Capella($inner) => $expr,
            Self::Deneb($inner) => $expr,
            Self::Electra($inner) => $expr,
        }
    };
}

impl VersionedBeaconState {
    #[must_use]
    pub fn fork(&self) -> ForkVersion {
        match self {
            Self::Capella(_) => ForkVersion::Capella,
            Self::Deneb(_) => ForkVersion::Deneb,
            Self::Electra(_) => ForkVersion::Electra,
        }
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        by_fork!(self, state => state.slot)
    }

    #[must_use]
    pub fn genesis_time(&self) -> u64 {
        by_fork!(self, state => state.genesis_time)
    }

    #[must_use]
    pub fn validators(&self) -> &[Validator] {
        by_fork!(self, state => &state.validators)
    }

    #[must_use]
    pub fn balances(&self) -> &[Gwei] {
        by_fork!(self, state => &state.balances)
    }

    #[must_use]
    pub fn block_roots(&self) -> &[Root] {
        by_fork!(self, state => &state.block_roots)
    }

    #[must_use]
    pub fn historical_summaries(&self) -> &[HistoricalSummary] {
        by_fork!(self, state => &state.historical_summaries)
    }

    /// # Errors
    /// Fails if any field violates its length constraints.
    pub fn top_level_roots(&self) -> Result<BeaconStateTopLevelRoots, ProofError> {
        BeaconStateTopLevelRoots::from_state(self)
    }

    /// # Errors
    /// Fails if any field violates its length constraints.
    pub fn hash_tree_root(&self) -> Result<Root, ProofError> {
        self.top_level_roots()?.state_root()
    }
}

impl From<capella::BeaconState> for VersionedBeaconState {
    fn from(state: capella::BeaconState) -> Self {
        Self::Capella(Box::new(state))
    }
}

impl From<deneb::BeaconState> for VersionedBeaconState {
    fn from(state: deneb::BeaconState) -> Self {
        Self::Deneb(Box::new(state))
    }
}

impl From<electra::BeaconState> for VersionedBeaconState {
    fn from(state: electra::BeaconState) -> Self {
        Self::Electra(Box::new(state))
    }
}

/// A beacon block of any supported fork
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedBeaconBlock {
    Capella(Box<capella::BeaconBlock>),
    Deneb(Box<deneb::BeaconBlock>),
    Electra(Box<electra::BeaconBlock>),
}

impl VersionedBeaconBlock {
    #[must_use]
    pub fn fork(&self) -> ForkVersion {
        match self {
            Self::Capella(_) => ForkVersion::Capella,
            Self::Deneb(_) => ForkVersion::Deneb,
            Self::Electra(_) => ForkVersion::Electra,
        }
    }

    #[must_use]
    pub fn slot(&self) -> Slot {
        by_fork!(self, block => block.slot)
    }

    /// # Errors
    /// Fails if the body cannot be merkleized.
    pub fn header(&self) -> Result<BeaconBlockHeader, ProofError> {
        by_fork!(self, block => block.header())
    }

    /// Block body field roots in declaration order.
    ///
    /// # Errors
    /// Fails if an operation list or the payload exceeds a limit.
    pub fn body_field_roots(&self) -> Result<Vec<Root>, ProofError> {
        by_fork!(self, block => Ok(block.body.field_roots()?.to_vec()))
    }

    /// Execution payload field roots in declaration order.
    ///
    /// # Errors
    /// Fails if a payload list exceeds its limit.
    pub fn execution_payload_field_roots(&self) -> Result<Vec<Root>, ProofError> {
        by_fork!(self, block => Ok(block.body.execution_payload.field_roots()?.to_vec()))
    }

    /// # Errors
    /// Fails if a payload list exceeds its limit.
    pub fn execution_payload_root(&self) -> Result<Root, ProofError> {
        merkleize(
            &self.execution_payload_field_roots()?,
            self.fork().execution_payload_tree_depth(),
        )
    }

    #[must_use]
    pub fn withdrawals(&self) -> &[Withdrawal] {
        by_fork!(self, block => &block.body.execution_payload.withdrawals)
    }

    #[must_use]
    pub fn timestamp(&self) -> u64 {
        by_fork!(self, block => block.body.execution_payload.timestamp)
    }
}

impl From<capella::BeaconBlock> for VersionedBeaconBlock {
    fn from(block: capella::BeaconBlock) -> Self {
        Self::Capella(Box::new(block))
    }
}

impl From<deneb::BeaconBlock> for VersionedBeaconBlock {
    fn from(block: deneb::BeaconBlock) -> Self {
        Self::Deneb(Box::new(block))
    }
}

impl From<electra::BeaconBlock> for VersionedBeaconBlock {
    fn from(block: electra::BeaconBlock) -> Self {
        Self::Electra(Box::new(block))
    }
}
