//! Keyed, deduplicating fetch layer in front of a [`UserRecordSource`].
//!
//! Page instances never call the source directly. They ask the cache for a
//! key and receive a `watch` subscription to that key's entry:
//!
//! - while a fetch for the key is in flight, or within `dedupe_interval` of
//!   the last one starting, requests join the existing entry;
//! - afterwards a request revalidates: the entry keeps serving its previous
//!   data while the new fetch runs, and a failed revalidation keeps the data
//!   alongside the new error.
//!
//! Fetches run on spawned tasks and are never cancelled by callers that stop
//! waiting, so a slow upstream only delays the first render.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::ports::{UserRecordSource, UserRecordSourceError};
use crate::domain::{FetchOutcome, RecordKey, TraceId, UserRecord};

/// Default window during which repeated requests share one fetch.
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_secs(2);
/// Default number of keys retained.
pub const DEFAULT_CAPACITY: usize = 1024;

/// State of one cache entry as observed by subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntryState {
    /// Last successfully loaded record.
    pub data: Option<UserRecord>,
    /// Failure of the most recent fetch, cleared by the next success.
    pub error: Option<UserRecordSourceError>,
    /// Whether a fetch is in flight.
    pub validating: bool,
}

impl CacheEntryState {
    /// Whether the entry has something to render: either no fetch is in
    /// flight, or previously loaded data can be served meanwhile.
    pub fn is_settled(&self) -> bool {
        !self.validating || self.data.is_some()
    }

    /// Convert into the outcome applied to a page subscription.
    pub fn into_outcome(self) -> FetchOutcome<UserRecord, UserRecordSourceError> {
        FetchOutcome {
            data: self.data,
            error: self.error,
        }
    }
}

struct Entry {
    tx: Arc<watch::Sender<CacheEntryState>>,
    started_at: Instant,
}

/// Shared fetch layer used by every page instance.
pub struct RecordCache {
    source: Arc<dyn UserRecordSource>,
    entries: Mutex<HashMap<RecordKey, Entry>>,
    dedupe_interval: Duration,
    capacity: usize,
}

impl RecordCache {
    /// Cache over `source` with default dedupe interval and capacity.
    pub fn new(source: Arc<dyn UserRecordSource>) -> Self {
        Self::with_settings(source, DEFAULT_DEDUPE_INTERVAL, DEFAULT_CAPACITY)
    }

    /// Cache over `source` with explicit settings. A zero capacity is
    /// treated as one.
    pub fn with_settings(
        source: Arc<dyn UserRecordSource>,
        dedupe_interval: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
            dedupe_interval,
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to `key`, starting a fetch when none is fresh.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, key: &RecordKey) -> watch::Receiver<CacheEntryState> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if let Some(entry) = entries.get_mut(key) {
            let in_flight = entry.tx.borrow().validating;
            let fresh = now.duration_since(entry.started_at) < self.dedupe_interval;
            if in_flight || fresh {
                debug!(key = %key, in_flight, "joining cached user record fetch");
                return entry.tx.subscribe();
            }
            entry.started_at = now;
            entry.tx.send_modify(|state| state.validating = true);
            let rx = entry.tx.subscribe();
            debug!(key = %key, "revalidating user record");
            self.spawn_fetch(key.clone(), Arc::clone(&entry.tx));
            return rx;
        }

        while entries.len() >= self.capacity {
            evict_oldest(&mut entries);
        }
        let (tx, rx) = watch::channel(CacheEntryState {
            validating: true,
            ..CacheEntryState::default()
        });
        let tx = Arc::new(tx);
        entries.insert(
            key.clone(),
            Entry {
                tx: Arc::clone(&tx),
                started_at: now,
            },
        );
        debug!(key = %key, "fetching user record");
        self.spawn_fetch(key.clone(), tx);
        rx
    }

    /// Number of keys currently retained.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no keys are retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait up to `wait` for `rx` to settle and return its latest state.
    ///
    /// Returning early never cancels the underlying fetch.
    pub async fn wait_settled(
        mut rx: watch::Receiver<CacheEntryState>,
        wait: Duration,
    ) -> CacheEntryState {
        let waited = tokio::time::timeout(wait, async {
            rx.wait_for(CacheEntryState::is_settled).await.is_ok()
        })
        .await;
        if !matches!(waited, Ok(true)) {
            debug!(?wait, "user record still pending after render wait");
        }
        rx.borrow().clone()
    }

    fn spawn_fetch(&self, key: RecordKey, tx: Arc<watch::Sender<CacheEntryState>>) {
        let source = Arc::clone(&self.source);
        tokio::spawn(TraceId::in_current_scope(async move {
            let result = source.get_user_by_id(&key).await;
            if let Err(error) = &result {
                warn!(key = %key, %error, "user record fetch failed");
            }
            tx.send_modify(move |state| {
                state.validating = false;
                match result {
                    Ok(record) => {
                        state.data = Some(record);
                        state.error = None;
                    }
                    Err(error) => state.error = Some(error),
                }
            });
        }));
    }
}

/// Drop the settled entry that started longest ago, or the oldest entry
/// overall when every fetch is still in flight. An evicted in-flight fetch
/// still completes for the subscribers it already has.
fn evict_oldest(entries: &mut HashMap<RecordKey, Entry>) {
    let oldest_of = |settled_only: bool| {
        entries
            .iter()
            .filter(|(_, entry)| !settled_only || !entry.tx.borrow().validating)
            .min_by_key(|(_, entry)| entry.started_at)
            .map(|(key, _)| key.clone())
    };
    let oldest = oldest_of(true).or_else(|| oldest_of(false));
    if let Some(key) = oldest {
        debug!(key = %key, "evicting user record from cache");
        entries.remove(&key);
    }
}
