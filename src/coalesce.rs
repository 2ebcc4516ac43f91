//! Debounced write-behind for values that change in quick bursts
//!
//! Each `submit` restarts the window for its key. When a window expires without a
//! newer submission, only the latest value is flushed to the sink.

use crate::errors::{PollaError, PollaResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Downstream writer for coalesced values
#[async_trait]
pub trait CoalescedSink<K, V>: Send + Sync {
    async fn flush(&self, key: &K, value: V) -> PollaResult<()>;
}

struct Pending<V> {
    generation: u64,
    value: V,
}

struct Inner<K, V> {
    sink: Arc<dyn CoalescedSink<K, V>>,
    window: Duration,
    generation: AtomicU64,
    pending: DashMap<K, Pending<V>>,
    /// Held from taking a pending value until its write returns, so writes for one key
    /// land in generation order
    write_locks: DashMap<K, Arc<Mutex<()>>>,
    /// Background flush failures not yet reported to the caller
    failures: DashMap<K, String>,
}

impl<K, V> Inner<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn write_lock(&self, key: &K) -> Arc<Mutex<()>> {
        self.write_locks.entry(key.clone()).or_default().clone()
    }

    async fn flush_if_current(&self, key: K, generation: u64) {
        let lock = self.write_lock(&key);
        let _guard = lock.lock().await;
        let Some((key, pending)) = self
            .pending
            .remove_if(&key, |_, pending| pending.generation == generation)
        else {
            return;
        };
        // Failure is already logged and recorded for take_failures
        let _ = self.write(key, pending.value).await;
    }

    async fn flush_key(&self, key: K) -> Option<PollaError> {
        let lock = self.write_lock(&key);
        let _guard = lock.lock().await;
        let (key, pending) = self.pending.remove(&key)?;
        self.write(key, pending.value).await.err()
    }

    async fn write(&self, key: K, value: V) -> PollaResult<()> {
        match self.sink.flush(&key, value).await {
            Ok(()) => {
                debug!(key = ?key, "Flushed coalesced write");
                self.failures.remove(&key);
                Ok(())
            }
            Err(e) => {
                warn!(key = ?key, error = %e, "Coalesced write failed");
                self.failures.insert(key, e.to_string());
                Err(e)
            }
        }
    }
}

pub struct WriteCoalescer<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> WriteCoalescer<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(sink: Arc<dyn CoalescedSink<K, V>>, window: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink,
                window,
                generation: AtomicU64::new(0),
                pending: DashMap::new(),
                write_locks: DashMap::new(),
                failures: DashMap::new(),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Queue `value` for `key`, superseding anything still pending for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, key: K, value: V) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.pending.insert(key.clone(), Pending { generation, value });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.window).await;
            inner.flush_if_current(key, generation).await;
        });
    }

    /// Write every pending value immediately and return the failures
    pub async fn flush_now(&self) -> Vec<(K, PollaError)> {
        let keys: Vec<K> = self.inner.pending.iter().map(|entry| entry.key().clone()).collect();
        let mut failures = Vec::new();
        for key in keys {
            if let Some(e) = self.inner.flush_key(key.clone()).await {
                failures.push((key, e));
            }
        }
        failures
    }

    /// Drain failures of background flushes since the last call
    pub fn take_failures(&self) -> Vec<(K, String)> {
        let keys: Vec<K> = self.inner.failures.iter().map(|entry| entry.key().clone()).collect();
        keys.into_iter()
            .filter_map(|key| self.inner.failures.remove(&key))
            .collect()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.pending.len()
    }
}
