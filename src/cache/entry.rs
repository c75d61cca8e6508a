//! Cache Entry Module
//!
//! Defines individual cache entries and their expiration policy.

// == Entry Policy ==
/// Expiration settings attached to an entry when it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryPolicy {
    /// Seconds after creation or renewal before the entry expires (0 = never)
    pub ttl_seconds: u64,
    /// Number of reads the entry serves before it expires (0 = unlimited)
    pub hit_limit: u64,
    /// Remove the entry on any expiration instead of allowing repopulation
    pub delete_on_expire: bool,
}

impl EntryPolicy {
    /// Creates a policy from its three settings.
    pub fn new(ttl_seconds: u64, hit_limit: u64, delete_on_expire: bool) -> Self {
        Self {
            ttl_seconds,
            hit_limit,
            delete_on_expire,
        }
    }

    /// A policy under which the entry never expires.
    pub fn never_expires() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn with_hit_limit(mut self, hit_limit: u64) -> Self {
        self.hit_limit = hit_limit;
        self
    }

    pub fn delete_on_expire(mut self, delete_on_expire: bool) -> Self {
        self.delete_on_expire = delete_on_expire;
        self
    }
}

// == Cache Entry ==
/// Represents a single cache entry with its payload and expiration metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub payload: Vec<u8>,
    /// Creation or last renewal timestamp (Unix seconds)
    pub created_at: u64,
    /// Successful reads since creation or last reset
    pub hit_count: u64,
    /// Expiration settings
    pub policy: EntryPolicy,
    /// Position in the store's eviction order
    pub(crate) seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry created at `now` with no hits.
    pub fn new(payload: Vec<u8>, policy: EntryPolicy, now: u64) -> Self {
        Self {
            payload,
            created_at: now,
            hit_count: 0,
            policy,
            seq: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the time-to-live has elapsed.
    ///
    /// Boundary condition: the entry stays valid through the second
    /// `created_at + ttl_seconds` and is expired strictly after it.
    pub fn is_expired(&self, now: u64) -> bool {
        self.policy.ttl_seconds > 0
            && now > self.created_at.saturating_add(self.policy.ttl_seconds)
    }

    // == Is Count Expired ==
    /// Checks whether the entry has already served `hit_limit` reads.
    pub fn is_count_expired(&self) -> bool {
        self.policy.hit_limit > 0 && self.hit_count >= self.policy.hit_limit
    }

    /// Restarts the time-to-live window at `now`.
    pub fn renew(&mut self, now: u64) {
        self.created_at = now;
    }

    /// Restarts the hit count.
    pub fn reset_hits(&mut self) {
        self.hit_count = 0;
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no time expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining)` if the entry is still within its window
    /// - `None` if the entry has no TTL
    pub fn ttl_remaining(&self, now: u64) -> Option<u64> {
        if self.policy.ttl_seconds == 0 {
            return None;
        }
        let expires = self.created_at.saturating_add(self.policy.ttl_seconds);
        Some(expires.saturating_sub(now))
    }
}
