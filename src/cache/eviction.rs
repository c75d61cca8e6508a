//! Eviction Order Module
//!
//! Tracks which entry to remove when a full cache must make room.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// == On Full Policy ==
/// Behavior when a new key is added to a cache that is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnFullPolicy {
    /// Refuse the new key with `CacheError::CacheFull`
    #[default]
    Reject,
    /// Remove the entry that was inserted longest ago
    EvictOldest,
    /// Remove the entry that was inserted or read longest ago
    EvictLeastRecentlyUsed,
}

impl OnFullPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnFullPolicy::Reject => "reject",
            OnFullPolicy::EvictOldest => "evict-oldest",
            OnFullPolicy::EvictLeastRecentlyUsed => "evict-lru",
        }
    }
}

impl fmt::Display for OnFullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnFullPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(OnFullPolicy::Reject),
            "evict-oldest" | "oldest" => Ok(OnFullPolicy::EvictOldest),
            "evict-lru" | "lru" => Ok(OnFullPolicy::EvictLeastRecentlyUsed),
            other => Err(format!("unknown on-full policy: {}", other)),
        }
    }
}

// == Eviction Order ==
/// Orders keys by a monotonically increasing sequence number.
///
/// Each entry remembers the sequence number it was given; the smallest number
/// in the map is the next eviction candidate. All operations are O(log n).
#[derive(Debug, Default)]
pub struct EvictionOrder {
    /// Sequence number to key, oldest first
    order: BTreeMap<u64, String>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl EvictionOrder {
    // == Constructor ==
    /// Creates a new empty eviction order.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Appends a key as the newest and returns its sequence number.
    pub fn push(&mut self, key: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.to_string());
        seq
    }

    // == Touch ==
    /// Moves the key at `seq` to the newest position and returns its new sequence number.
    ///
    /// An unknown `seq` is left alone and returned unchanged.
    pub fn touch(&mut self, seq: u64) -> u64 {
        match self.order.remove(&seq) {
            Some(key) => {
                let new_seq = self.next_seq;
                self.next_seq += 1;
                self.order.insert(new_seq, key);
                new_seq
            }
            None => seq,
        }
    }

    // == Remove ==
    /// Removes the key at `seq`, returning it if present.
    pub fn remove(&mut self, seq: u64) -> Option<String> {
        self.order.remove(&seq)
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if the order is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
