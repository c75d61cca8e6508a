//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with an eviction order and
//! dual time / hit-count expiration.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, Clock, EntryPolicy, EvictionOrder, OnFullPolicy, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// A store shared between concurrent callers.
///
/// Every mutating operation, including `get`, takes the write lock.
pub type SharedStore = Arc<RwLock<CacheStore>>;

// == Cache Store ==
/// Main cache storage with capacity enforcement and lazy expiration.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Eviction candidates, oldest first
    order: EvictionOrder,
    /// Maximum number of entries allowed (0 = unbounded)
    max_entries: usize,
    /// Behavior when a new key arrives at capacity
    on_full: OnFullPolicy,
    /// Policy used by callers that do not pass their own
    default_policy: EntryPolicy,
    /// Time source for expiration checks
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and full policy.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the cache can hold (0 = unbounded)
    /// * `on_full` - What to do when a new key arrives at capacity
    pub fn new(max_entries: usize, on_full: OnFullPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            order: EvictionOrder::new(),
            max_entries,
            on_full,
            default_policy: EntryPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut store = Self::new(config.max_entries, config.on_full).with_default_policy(
            EntryPolicy::new(config.default_ttl, config.default_hit_limit, false),
        );
        if config.total_entries > 0 {
            store.entries.reserve(config.total_entries);
        }
        store
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the policy returned by [`default_policy`](Self::default_policy).
    pub fn with_default_policy(mut self, policy: EntryPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Wraps the store for sharing between concurrent callers.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    // == Add ==
    /// Stores a payload under `key` with the given expiration policy.
    ///
    /// An existing entry for the key is overwritten, which never needs a free
    /// slot. A new key at capacity is rejected with `CacheFull` or makes room
    /// by evicting, depending on the full policy. A rejected add leaves the
    /// store unchanged.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `payload` - The bytes to store
    /// * `policy` - TTL, hit limit and delete-on-expire settings
    pub fn add(
        &mut self,
        key: impl Into<String>,
        payload: impl Into<Vec<u8>>,
        policy: EntryPolicy,
    ) -> Result<()> {
        let key = key.into();

        if let Some(previous) = self.entries.get(&key) {
            self.order.remove(previous.seq);
        } else if self.is_full() {
            match self.on_full {
                OnFullPolicy::Reject => {
                    return Err(CacheError::CacheFull(format!(
                        "no space left for '{}' ({} entries)",
                        key, self.max_entries
                    )));
                }
                OnFullPolicy::EvictOldest | OnFullPolicy::EvictLeastRecentlyUsed => {
                    let evicted = self.order.pop_oldest().ok_or_else(|| {
                        CacheError::CacheFull("Cache is full and eviction failed".to_string())
                    })?;
                    self.entries.remove(&evicted);
                    debug!(key = %evicted, policy = %self.on_full, "evicted entry");
                }
            }
        }

        let mut entry = CacheEntry::new(payload.into(), policy, self.clock.now_secs());
        entry.seq = self.order.push(&key);
        self.entries.insert(key, entry);

        Ok(())
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// Time expiration is checked first, then hit-count expiration. For an
    /// expired entry with `delete_on_expire` set, the entry is removed and the
    /// expiry error returned. Otherwise `repopulate = false` returns the expiry
    /// error and keeps the entry, while `repopulate = true` renews it
    /// (restarting the TTL window or the hit count) and serves the payload.
    /// Every successful read counts one hit.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    /// * `repopulate` - Renew an expired entry instead of reporting the expiry
    pub fn get(&mut self, key: &str, repopulate: bool) -> Result<Vec<u8>> {
        let now = self.clock.now_secs();
        let Some(entry) = self.entries.get_mut(key) else {
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired(now) {
            if entry.policy.delete_on_expire {
                self.remove_entry(key);
                debug!(key, "removed time-expired entry");
                return Err(CacheError::Expired(key.to_string()));
            }
            if !repopulate {
                return Err(CacheError::Expired(key.to_string()));
            }
            entry.renew(now);
            debug!(key, "renewed time-expired entry");
        }

        if entry.is_count_expired() {
            if entry.policy.delete_on_expire {
                self.remove_entry(key);
                debug!(key, "removed count-expired entry");
                return Err(CacheError::CountExpired(key.to_string()));
            }
            if !repopulate {
                return Err(CacheError::CountExpired(key.to_string()));
            }
            entry.reset_hits();
            debug!(key, "reset hit count of count-expired entry");
        }

        entry.hit_count += 1;
        if self.on_full == OnFullPolicy::EvictLeastRecentlyUsed {
            entry.seq = self.order.touch(entry.seq);
        }

        Ok(entry.payload.clone())
    }

    /// Retrieves a payload that was stored as text.
    ///
    /// Behaves like [`get`](Self::get); a payload that is not valid UTF-8
    /// yields `DecodeFailed`.
    pub fn get_text(&mut self, key: &str, repopulate: bool) -> Result<String> {
        let payload = self.get(key, repopulate)?;
        String::from_utf8(payload).map_err(|e| CacheError::DecodeFailed(e.to_string()))
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Deleting a missing key is not an error. Returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Exists ==
    /// Returns true if an entry is stored under `key`, expired or not.
    ///
    /// Does not count as a hit.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the hit count of the entry under `key`, if any.
    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.hit_count)
    }

    /// Returns the policy for callers that do not pass their own.
    pub fn default_policy(&self) -> EntryPolicy {
        self.default_policy
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn on_full(&self) -> OnFullPolicy {
        self.on_full
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_full(&self) -> bool {
        self.max_entries > 0 && self.entries.len() >= self.max_entries
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(entry.seq);
                true
            }
            None => false,
        }
    }
}
