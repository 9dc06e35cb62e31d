//! Oracle State Cache
//!
//! Per-slot memoization of the expensive intermediate artifacts of proof
//! generation. Each [`SlotCache`] is an LRU bounded by capacity whose entries
//! also expire a fixed time after they were computed, regardless of how often
//! they are read.
//!
//! Concurrent callers asking for the same slot are serialised behind a
//! per-slot lock so the value is computed once; other slots proceed in
//! parallel.

use crate::config::{CacheSettings, OracleCacheConfig};
use crate::merkle::MerkleTree;
use crate::state_prover::BalancesTree;
use crate::top_level::BeaconStateTopLevelRoots;
use crate::types::{Root, Slot};
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Source of the current time for TTL checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Used to test expiry.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock()
    }
}

#[derive(Debug)]
struct CachedEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// LRU cache keyed by slot with a fixed time-to-live per entry.
pub struct SlotCache<V> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<LruCache<Slot, CachedEntry<V>>>,
    in_flight: DashMap<Slot, Arc<Mutex<()>>>,
}

impl<V> fmt::Debug for SlotCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("len", &self.entries.lock().len())
            .finish_non_exhaustive()
    }
}

impl<V: Clone> SlotCache<V> {
    #[must_use]
    pub fn new(name: &'static str, settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(settings.capacity).unwrap_or_else(|| {
            warn!(cache = name, "Cache capacity of 0 raised to 1");
            NonZeroUsize::MIN
        });
        Self {
            name,
            ttl: settings.ttl(),
            clock,
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: DashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of stored entries, expired ones included until they are looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached value for `slot`, if present and not expired.
    pub fn get(&self, slot: Slot) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let cached = entries.peek(&slot).map(|entry| {
            (now.duration_since(entry.inserted_at) < self.ttl).then(|| entry.value.clone())
        });

        match cached {
            Some(Some(value)) => {
                metrics::counter!("beacon_proofs_cache_hits_total", "cache" => self.name)
                    .increment(1);
                debug!(cache = self.name, slot, "Cache hit");
                Some(value)
            }
            Some(None) => {
                entries.pop(&slot);
                metrics::counter!("beacon_proofs_cache_expired_total", "cache" => self.name)
                    .increment(1);
                debug!(cache = self.name, slot, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Store `value` for `slot`, replacing any previous entry. When full, the
    /// oldest entry is evicted.
    pub fn insert(&self, slot: Slot, value: V) {
        let entry = CachedEntry {
            value,
            inserted_at: self.clock.now(),
        };
        if let Some((evicted, _)) = self.entries.lock().push(slot, entry) {
            if evicted != slot {
                debug!(cache = self.name, slot = evicted, "Cache entry evicted");
            }
        }
    }

    /// Return the cached value for `slot` or compute, store and return it.
    ///
    /// At most one computation per slot runs at a time; callers that arrive
    /// while it runs wait and then read its result. Errors are returned to the
    /// caller that computed them and are not cached.
    ///
    /// # Errors
    /// Whatever `compute` returns.
    pub fn load_or_compute<E, F>(&self, slot: Slot, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(slot) {
            return Ok(value);
        }

        let lock = self.in_flight.entry(slot).or_default().clone();
        let result = {
            let _guard = lock.lock();
            match self.get(slot) {
                Some(value) => Ok(value),
                None => {
                    metrics::counter!("beacon_proofs_cache_misses_total", "cache" => self.name)
                        .increment(1);
                    debug!(cache = self.name, slot, "Cache miss, computing");

                    let result = compute();
                    if let Ok(value) = &result {
                        self.insert(slot, value.clone());
                    }
                    result
                }
            }
        };

        // The last caller out removes the slot lock; waiters keep it alive.
        drop(lock);
        self.in_flight.remove_if(&slot, |_, lock| Arc::strong_count(lock) == 1);
        result
    }
}

/// The four per-slot caches used by the prover
#[derive(Debug)]
pub struct OracleStateCache {
    state_roots: SlotCache<Root>,
    top_level_roots: SlotCache<Arc<BeaconStateTopLevelRoots>>,
    validator_trees: SlotCache<Arc<MerkleTree>>,
    balances_trees: SlotCache<Arc<BalancesTree>>,
}

impl OracleStateCache {
    #[must_use]
    pub fn new(config: &OracleCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: &OracleCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state_roots: SlotCache::new("state_root", config.state_root, clock.clone()),
            top_level_roots: SlotCache::new("top_level_roots", config.top_level_roots, clock.clone()),
            validator_trees: SlotCache::new("validator_tree", config.validator_tree, clock.clone()),
            balances_trees: SlotCache::new("balances_tree", config.balances_tree, clock),
        }
    }

    #[must_use]
    pub fn state_roots(&self) -> &SlotCache<Root> {
        &self.state_roots
    }

    #[must_use]
    pub fn top_level_roots(&self) -> &SlotCache<Arc<BeaconStateTopLevelRoots>> {
        &self.top_level_roots
    }

    #[must_use]
    pub fn validator_trees(&self) -> &SlotCache<Arc<MerkleTree>> {
        &self.validator_trees
    }

    #[must_use]
    pub fn balances_trees(&self) -> &SlotCache<Arc<BalancesTree>> {
        &self.balances_trees
    }
}

impl Default for OracleStateCache {
    fn default() -> Self {
        Self::new(&OracleCacheConfig::default())
    }
}
