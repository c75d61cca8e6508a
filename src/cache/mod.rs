//! Cache Module
//!
//! Provides in-memory caching with time-based and hit-count expiration, and
//! configurable behavior when the cache is full.

mod clock;
mod entry;
mod eviction;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryPolicy};
pub use eviction::{EvictionOrder, OnFullPolicy};
pub use store::{CacheStore, SharedStore};
