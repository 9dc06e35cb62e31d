//! Prover configuration.

use crate::error::ProofError;
use crate::types::Chain;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacity and time-to-live of one per-slot cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    /// Maximum number of slots kept
    pub capacity: usize,
    /// Seconds an entry stays valid after it was computed
    pub ttl_secs: u64,
}

impl CacheSettings {
    #[must_use]
    pub const fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self { capacity, ttl_secs }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

const DEFAULT_TTL_SECS: u64 = 60 * 60;

/// Settings of the four oracle state caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OracleCacheConfig {
    pub state_root: CacheSettings,
    pub top_level_roots: CacheSettings,
    pub validator_tree: CacheSettings,
    pub balances_tree: CacheSettings,
}

impl OracleCacheConfig {
    /// # Errors
    /// Fails if any cache has zero capacity.
    pub fn validate(&self) -> Result<(), ProofError> {
        for (name, settings) in [
            ("stateRoot", self.state_root),
            ("topLevelRoots", self.top_level_roots),
            ("validatorTree", self.validator_tree),
            ("balancesTree", self.balances_tree),
        ] {
            if settings.capacity == 0 {
                return Err(ProofError::InvalidConfig(format!(
                    "cache.{name}.capacity must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

impl Default for OracleCacheConfig {
    fn default() -> Self {
        Self {
            state_root: CacheSettings::new(16, DEFAULT_TTL_SECS),
            top_level_roots: CacheSettings::new(16, DEFAULT_TTL_SECS),
            // trees over the full registry are large, keep only a few
            validator_tree: CacheSettings::new(4, DEFAULT_TTL_SECS),
            balances_tree: CacheSettings::new(4, DEFAULT_TTL_SECS),
        }
    }
}

/// Configuration of a [`crate::proof::ProofGenerator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProverConfig {
    pub chain: Chain,
    pub cache: OracleCacheConfig,
}

impl ProverConfig {
    #[must_use]
    pub fn for_chain(chain: Chain) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Parse a possibly partial JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// Fails on malformed JSON, an unknown chain or a zero cache capacity.
    pub fn from_json_str(json: &str) -> Result<Self, ProofError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ProofError::InvalidEncoding(e.to_string()))?;
        config.cache.validate()?;
        Ok(config)
    }
}
