//! Memoization Gateway
//!
//! Turns an expensive computation keyed by a request identity into a memoized
//! one. Each call either serves a cached result or computes, stores and emits
//! a fresh one.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{EntryPolicy, SharedStore};
use crate::codec::{JsonEnvelopeCodec, PayloadCodec};
use crate::error::{CacheError, Result};

// == Memo Gateway ==
/// Memoizes results in a shared [`CacheStore`](crate::cache::CacheStore).
///
/// Cloning the gateway shares the underlying store.
#[derive(Debug, Clone)]
pub struct MemoGateway<C = JsonEnvelopeCodec> {
    store: SharedStore,
    codec: C,
}

impl MemoGateway<JsonEnvelopeCodec> {
    /// Creates a gateway storing results as JSON envelopes.
    pub fn new(store: SharedStore) -> Self {
        Self::with_codec(store, JsonEnvelopeCodec)
    }
}

impl<C: PayloadCodec> MemoGateway<C> {
    /// Creates a gateway with a custom payload codec.
    pub fn with_codec(store: SharedStore, codec: C) -> Self {
        Self { store, codec }
    }

    /// Returns the shared store behind this gateway.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    // == Handle ==
    /// Serves `key` from the cache or computes it, then passes the result to `emit`.
    ///
    /// 1. A stored, unexpired entry is decoded and used as the result.
    ///    An expired or missing entry is a miss.
    /// 2. On a miss, `compute` runs with no lock held. Its result is encoded
    ///    and added under `policy`; a full cache fails the call before emitting.
    /// 3. `emit` receives the result. A value cached in step 2 stays cached
    ///    even if `emit` fails.
    ///
    /// # Errors
    /// - `ComputeFailed` / `EmitFailed` carry the callback's error as their source
    /// - `CacheFull` when the result cannot be stored
    /// - `EncodeFailed` / `DecodeFailed` from the codec
    pub async fn handle<T, R, F, Fut, E, EFut>(
        &self,
        key: &str,
        policy: EntryPolicy,
        compute: F,
        emit: E,
    ) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        E: FnOnce(T) -> EFut,
        EFut: Future<Output = anyhow::Result<R>>,
    {
        let value = match self.lookup(key).await? {
            Some(value) => {
                debug!(key, "memo hit");
                value
            }
            None => {
                debug!(key, "memo miss");
                self.compute_and_store(key, policy, compute).await?
            }
        };

        emit(value).await.map_err(|e| {
            warn!(key, error = %e, "emit failed");
            CacheError::EmitFailed(e.into())
        })
    }

    /// Like [`handle`](Self::handle), using the store's default entry policy.
    pub async fn handle_default<T, R, F, Fut, E, EFut>(
        &self,
        key: &str,
        compute: F,
        emit: E,
    ) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        E: FnOnce(T) -> EFut,
        EFut: Future<Output = anyhow::Result<R>>,
    {
        let policy = self.store.read().await.default_policy();
        self.handle(key, policy, compute, emit).await
    }

    /// Drops the memoized result for `key`. Returns whether one was stored.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Reads a still-valid result for `key`, decoding it after the lock is released.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let payload = {
            let mut store = self.store.write().await;
            if !store.exists(key) {
                None
            } else {
                match store.get(key, false) {
                    Ok(payload) => Some(payload),
                    Err(e) if e.is_miss() => {
                        debug!(key, reason = %e, "cached entry not usable");
                        None
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        payload
            .map(|payload| self.codec.decode(&payload))
            .transpose()
    }

    async fn compute_and_store<T, F, Fut>(&self, key: &str, policy: EntryPolicy, compute: F) -> Result<T>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let value = compute().await.map_err(|e| {
            warn!(key, error = %e, "compute failed");
            CacheError::ComputeFailed(e.into())
        })?;

        let payload = self.codec.encode(&value)?;
        self.store.write().await.add(key, payload, policy)?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, ManualClock, OnFullPolicy};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn test_gateway(max_entries: usize) -> (MemoGateway, ManualClock) {
        let clock = ManualClock::new(10_000);
        let store = CacheStore::new(max_entries, OnFullPolicy::Reject)
            .with_clock(Arc::new(clock.clone()))
            .into_shared();
        (MemoGateway::new(store), clock)
    }

    /// Runs one memoized call that computes `value` and returns what emit received.
    async fn call(
        gateway: &MemoGateway,
        key: &str,
        policy: EntryPolicy,
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> Result<u32> {
        let calls = Arc::clone(calls);
        gateway
            .handle(
                key,
                policy,
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(value)
                },
                |v: u32| async move { Ok(v) },
            )
            .await
    }

    #[tokio::test]
    async fn test_computes_once_then_serves_cache() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let captured = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let sink = Arc::clone(&captured);
            gateway
                .handle(
                    "/x",
                    EntryPolicy::new(60, 0, false),
                    move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(42u32)
                    },
                    move |value: u32| async move {
                        sink.lock().unwrap().push(value);
                        Ok(())
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*captured.lock().unwrap(), vec![42, 42]);
        assert!(gateway.store().read().await.exists("/x"));
    }

    #[tokio::test]
    async fn test_stores_encoded_envelope() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));

        call(&gateway, "/x", EntryPolicy::default(), &calls, 42).await.unwrap();

        let text = gateway.store().write().await.get_text("/x", false).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["payload"], 42);
        assert_eq!(json["status"], "success");
    }

    #[tokio::test]
    async fn test_recomputes_after_ttl() {
        let (gateway, clock) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = EntryPolicy::new(30, 0, false);

        assert_eq!(call(&gateway, "/x", policy, &calls, 1).await.unwrap(), 1);
        clock.advance(30);
        assert_eq!(call(&gateway, "/x", policy, &calls, 2).await.unwrap(), 1);
        clock.advance(1);
        assert_eq!(call(&gateway, "/x", policy, &calls, 3).await.unwrap(), 3);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_recomputes_after_hit_limit() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let policy = EntryPolicy::new(0, 2, true);

        assert_eq!(call(&gateway, "/x", policy, &calls, 1).await.unwrap(), 1);
        assert_eq!(call(&gateway, "/x", policy, &calls, 2).await.unwrap(), 1);
        assert_eq!(call(&gateway, "/x", policy, &calls, 3).await.unwrap(), 1);
        // Two cached reads served; the next call recomputes
        assert_eq!(call(&gateway, "/x", policy, &calls, 4).await.unwrap(), 4);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_compute_failure_caches_nothing() {
        let (gateway, _) = test_gateway(10);
        let emitted = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&emitted);

        let result = gateway
            .handle(
                "/fail",
                EntryPolicy::default(),
                || async { Err::<u32, _>(anyhow::anyhow!("upstream unavailable")) },
                move |_: u32| async move {
                    sink.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .await;

        match result {
            Err(CacheError::ComputeFailed(source)) => {
                assert_eq!(source.to_string(), "upstream unavailable")
            }
            other => panic!("expected ComputeFailed, got {:?}", other),
        }
        assert_eq!(emitted.load(Ordering::SeqCst), 0);
        assert!(!gateway.store().read().await.exists("/fail"));
    }

    #[tokio::test]
    async fn test_emit_failure_keeps_cached_value() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let result = gateway
            .handle(
                "/x",
                EntryPolicy::default(),
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(7u32)
                },
                |_: u32| async { Err::<(), _>(anyhow::anyhow!("client went away")) },
            )
            .await;

        assert!(matches!(result, Err(CacheError::EmitFailed(_))));
        assert_eq!(call(&gateway, "/x", EntryPolicy::default(), &calls, 8).await.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_full_propagates() {
        let (gateway, _) = test_gateway(1);
        let calls = Arc::new(AtomicUsize::new(0));

        call(&gateway, "/a", EntryPolicy::default(), &calls, 1).await.unwrap();
        let result = call(&gateway, "/b", EntryPolicy::default(), &calls, 2).await;

        assert!(matches!(result, Err(CacheError::CacheFull(_))));
        assert!(!gateway.store().read().await.exists("/b"));
    }

    #[tokio::test]
    async fn test_corrupt_payload_fails_decode() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));

        gateway
            .store()
            .write()
            .await
            .add("/x", "garbage", EntryPolicy::default())
            .unwrap();

        let result = call(&gateway, "/x", EntryPolicy::default(), &calls, 1).await;
        assert!(matches!(result, Err(CacheError::DecodeFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compute_runs_without_store_lock() {
        let (gateway, _) = test_gateway(10);
        let store = Arc::clone(gateway.store());

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            gateway.handle(
                "/x",
                EntryPolicy::default(),
                move || async move {
                    // Would deadlock if the gateway held the lock here
                    let len = store.write().await.len();
                    Ok(len)
                },
                |len: usize| async move { Ok(len) },
            ),
        )
        .await;

        assert_eq!(result.expect("compute should not block on the store").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_handle_default_uses_store_policy() {
        let clock = ManualClock::new(0);
        let store = CacheStore::new(10, OnFullPolicy::Reject)
            .with_clock(Arc::new(clock.clone()))
            .with_default_policy(EntryPolicy::new(5, 0, true))
            .into_shared();
        let gateway = MemoGateway::new(store);

        gateway
            .handle_default("/x", || async { Ok(1u8) }, |_: u8| async { Ok(()) })
            .await
            .unwrap();
        clock.advance(6);
        gateway
            .handle_default("/y", || async { Ok(2u8) }, |_: u8| async { Ok(()) })
            .await
            .unwrap();

        let mut store = gateway.store().write().await;
        assert!(matches!(store.get("/x", false), Err(CacheError::Expired(_))));
        assert!(!store.exists("/x"));
    }

    #[tokio::test]
    async fn test_invalidate() {
        let (gateway, _) = test_gateway(10);
        let calls = Arc::new(AtomicUsize::new(0));

        call(&gateway, "/x", EntryPolicy::default(), &calls, 1).await.unwrap();
        assert!(gateway.invalidate("/x").await);
        assert!(!gateway.invalidate("/x").await);
        assert_eq!(call(&gateway, "/x", EntryPolicy::default(), &calls, 2).await.unwrap(), 2);
    }

    #[test]
    fn test_handle_outside_tokio_runtime() {
        let (gateway, _) = test_gateway(10);

        let value = tokio_test::block_on(gateway.handle(
            "/sync",
            EntryPolicy::default(),
            || async { Ok("computed".to_string()) },
            |v: String| async move { Ok(v.len()) },
        ))
        .unwrap();

        assert_eq!(value, 8);
    }
}
