//! Memo Cache - An in-process cache with request memoization
//!
//! Provides a key-value store with time-based and hit-count expiration, and a
//! gateway that memoizes an expensive computation behind a request key.

pub mod api;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;

pub use api::AppState;
pub use cache::{CacheStore, EntryPolicy, OnFullPolicy};
pub use config::Config;
pub use error::{CacheError, Result};
pub use gateway::MemoGateway;
