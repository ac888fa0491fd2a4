//! In-memory key-value store.

use crate::{CacheError, KeyValueStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    write_delay: Option<Duration>,
    writes: u64,
}

/// Process-local store backed by a `HashMap`.
///
/// Clones share the same map, so a test can hand one clone to a consumer and
/// inspect what it wrote through another. Reads and writes can be made to
/// fail to exercise degraded paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.lock() {
            inner.values.insert(key.into(), value.into());
        }
        store
    }

    /// Make subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_reads = fail;
        }
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Delay every write by `delay` before it lands.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.write_delay = delay;
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, CacheError> {
        self.inner
            .lock()
            .map_err(|_| CacheError::StoreError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(CacheError::StoreError(format!("read of {key} refused")));
        }
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let delay = self.lock()?.write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(CacheError::StoreError(format!("write of {key} refused")));
        }
        inner.values.insert(key.to_string(), value);
        inner.writes += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(CacheError::StoreError(format!("delete of {key} refused")));
        }
        inner.values.remove(key);
        Ok(())
    }
}
