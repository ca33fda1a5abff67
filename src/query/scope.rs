use super::{QueryClient, QueryKey};
use log::debug;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// What a view currently shows for its read
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub key: Option<QueryKey>,
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            key: None,
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// A mounted view reading through the shared cache
///
/// Only the latest read issued through the scope may update its state,
/// and nothing does once the scope is unmounted. In-flight reads borrow
/// the scope, so dropping it discards them as well.
pub struct ViewScope<T> {
    queries: Arc<QueryClient>,
    mounted: AtomicBool,
    generation: AtomicU64,
    state: Mutex<QueryState<T>>,
}

impl<T> ViewScope<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(queries: Arc<QueryClient>) -> Self {
        Self {
            queries,
            mounted: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            state: Mutex::new(QueryState::default()),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Stop accepting results
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Snapshot of the view's state
    pub fn state(&self) -> QueryState<T> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load `key` and apply the outcome to the view
    ///
    /// Returns `false` when the result was discarded because the scope was
    /// unmounted or a newer read was issued in the meantime.
    pub async fn query<E, F, Fut>(&self, key: QueryKey, loader: F) -> bool
    where
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.key = Some(key.clone());
            state.is_loading = true;
        }

        let result = self.queries.fetch(&key, loader).await;

        if !self.is_mounted() || self.generation.load(Ordering::SeqCst) != ticket {
            debug!("discarding late result for {}", key);
            return false;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.is_loading = false;
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(err) => state.error = Some(err.to_string()),
        }
        true
    }
}

/// Local "request outstanding" flag of a mutation
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag; `None` while another mutation holds it
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the [`InFlight`] flag when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
