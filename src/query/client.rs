use super::QueryKey;
use log::debug;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// Shared cache of decoded reads
///
/// Entries past the stale time are dropped on the next write.
pub struct QueryClient {
    stale_time: Duration,
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    /// Bumped under the entries lock by every invalidation
    epoch: AtomicU64,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: RwLock::new(HashMap::new()),
            epoch: AtomicU64::new(0),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert<T>(&self, entries: &mut HashMap<QueryKey, CacheEntry>, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let stale_time = self.stale_time;
        entries.retain(|_, entry| entry.stored_at.elapsed() < stale_time);
        entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// The cached value for `key` if it is still fresh and of type `T`
    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.stale_time {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    pub fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let mut entries = self.write();
        self.insert(&mut entries, key, value);
    }

    /// Serve `key` from the cache or run `loader` and store its result
    ///
    /// Failed loads leave the cache untouched, and so does a load that
    /// was still running when the cache got invalidated.
    pub async fn fetch<T, E, F, Fut>(&self, key: &QueryKey, loader: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key) {
            debug!("query {} served from cache", key);
            return Ok(value);
        }

        debug!("query {} loading", key);
        let epoch = self.epoch.load(Ordering::SeqCst);
        let value = loader().await?;

        let mut entries = self.write();
        if self.epoch.load(Ordering::SeqCst) == epoch {
            self.insert(&mut entries, key.clone(), value.clone());
        } else {
            debug!("query {} invalidated while loading, not cached", key);
        }
        Ok(value)
    }

    /// Drop every entry under `prefix`; returns how many were removed
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.write();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("invalidated {} queries under {}", removed, prefix);
        }
        removed
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.write();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        entries.clear();
        debug!("query cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
