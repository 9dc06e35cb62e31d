//! Proof generation errors.
//!
//! Every failure is terminal for the proof request that produced it. Composite
//! proofs wrap the failing sub-step in [`ProofError::SubProof`] so callers can
//! tell which level of the path could not be built.

use thiserror::Error;

/// Errors that can occur while computing roots or building proofs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("Cannot build a Merkle tree from zero leaves")]
    EmptyLeaves,

    #[error("{leaves} leaves do not fit in a tree of depth {depth}")]
    TooManyLeaves { leaves: usize, depth: u32 },

    #[error("Tree depth {0} exceeds the maximum supported depth of 64")]
    DepthTooLarge(u32),

    #[error("{field}: expected {expected} elements, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field}: {actual} elements exceed the limit of {limit}")]
    ListTooLong {
        field: &'static str,
        limit: usize,
        actual: usize,
    },

    #[error("{what} index {index} out of range (length {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: u64,
        len: usize,
    },

    #[error("Unsupported fork version: {0}")]
    UnsupportedFork(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Block header state root {header} does not match the computed state root {computed}")]
    StateRootMismatch { header: String, computed: String },

    #[error("Block at slot {slot} hashes to {computed}, not to the historical block root {expected}")]
    BlockRootMismatch {
        slot: u64,
        expected: String,
        computed: String,
    },

    #[error("Block roots do not hash to the block summary root of historical summary {index}")]
    HistoricalSummaryMismatch { index: u64 },

    #[error("Block at slot {slot} has no withdrawal for validator {validator_index}")]
    WithdrawalNotFound { slot: u64, validator_index: u64 },

    #[error("Withdrawal at slot {withdrawal_slot} cannot be proven from oracle slot {oracle_slot}: {reason}")]
    WithdrawalNotProvable {
        oracle_slot: u64,
        withdrawal_slot: u64,
        reason: &'static str,
    },

    #[error("Timestamp of slot {slot} overflows from genesis time {genesis_time}")]
    TimestampOverflow { genesis_time: u64, slot: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("SSZ merkleization error: {0}")]
    Ssz(String),

    #[error("Failed to prove {step}: {source}")]
    SubProof {
        step: &'static str,
        #[source]
        source: Box<ProofError>,
    },
}

impl ProofError {
    /// The innermost error, skipping any [`ProofError::SubProof`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &ProofError {
        match self {
            Self::SubProof { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<ssz_rs::MerkleizationError> for ProofError {
    fn from(err: ssz_rs::MerkleizationError) -> Self {
        Self::Ssz(err.to_string())
    }
}

/// Attaches the name of a composition step to a failed sub-proof.
pub trait ProofStep<T> {
    /// Wrap an error in [`ProofError::SubProof`] naming `step`.
    fn during(self, step: &'static str) -> Result<T, ProofError>;
}

impl<T> ProofStep<T> for Result<T, ProofError> {
    fn during(self, step: &'static str) -> Result<T, ProofError> {
        self.map_err(|source| ProofError::SubProof {
            step,
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_during_wraps_and_preserves_source() {
        let failed: Result<(), ProofError> = Err(ProofError::EmptyLeaves);
        let err = failed.during("validator list").unwrap_err();

        assert_eq!(err.to_string(), "Failed to prove validator list: Cannot build a Merkle tree from zero leaves");
        assert_eq!(err.root_cause(), &ProofError::EmptyLeaves);

        let source = std::error::Error::source(&err).expect("has source");
        assert_eq!(source.to_string(), ProofError::EmptyLeaves.to_string());
    }

    #[test]
    fn test_nested_steps_unwrap_to_root_cause() {
        let inner: Result<(), ProofError> = Err(ProofError::IndexOutOfRange {
            what: "validator",
            index: 9,
            len: 4,
        });
        let err = inner.during("validator list").during("state").unwrap_err();

        assert!(matches!(
            err.root_cause(),
            ProofError::IndexOutOfRange { index: 9, .. }
        ));
    }
}
