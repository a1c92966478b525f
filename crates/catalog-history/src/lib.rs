//! catalog-history
//!
//! Bounded, deduplicated log of search queries, written through a
//! [`PersistenceProvider`] after every mutation. Storage failures never reach
//! the caller: they are logged and the log keeps working in memory.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use catalog_core::traits::{Clock, PersistenceProvider};
use catalog_core::types::HistoryRecord;

pub const DEFAULT_MAX_ENTRIES: usize = 50;
pub const DEFAULT_STORAGE_KEY: &str = "catalog.search-history";

pub struct SearchHistory {
    state: Mutex<State>,
    store: Option<Arc<dyn PersistenceProvider>>,
    key: String,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

struct State {
    // oldest first
    records: Vec<HistoryRecord>,
    persistent: bool,
}

impl SearchHistory {
    pub fn in_memory(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State { records: Vec::new(), persistent: false }),
            store: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_entries,
            clock,
        }
    }

    /// Load history stored under `key`. Unreadable stores and malformed
    /// documents both start from an empty log.
    pub fn open(
        store: Arc<dyn PersistenceProvider>,
        key: impl Into<String>,
        max_entries: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let key = key.into();
        let (records, persistent) = match store.get(&key) {
            Ok(None) => (Vec::new(), true),
            Ok(Some(json)) => match serde_json::from_str::<Vec<HistoryRecord>>(&json) {
                Ok(records) => (sanitize(records, max_entries), true),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding malformed search history");
                    (Vec::new(), true)
                }
            },
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "search history unavailable, keeping it in memory");
                (Vec::new(), false)
            }
        };
        tracing::debug!(key = %key, records = records.len(), "search history loaded");
        Self {
            state: Mutex::new(State { records, persistent }),
            store: Some(store),
            key,
            max_entries,
            clock,
        }
    }

    /// Append `query` unless it is blank or already logged. Returns whether a record was added.
    pub fn record(&self, query: &str, result_count: usize) -> bool {
        let query = query.trim();
        if query.is_empty() { return false; }
        let mut state = self.state.lock();
        if state.records.iter().any(|r| r.query == query) { return false; }
        state.records.push(HistoryRecord {
            query: query.to_string(),
            timestamp_millis: self.clock.now_millis(),
            result_count,
        });
        let overflow = state.records.len().saturating_sub(self.max_entries);
        if overflow > 0 { state.records.drain(..overflow); }
        self.persist(&mut state);
        true
    }

    /// Records, newest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.state.lock().records.iter().rev().cloned().collect()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.records.clear();
        self.persist(&mut state);
    }

    pub fn len(&self) -> usize { self.state.lock().records.len() }

    pub fn is_empty(&self) -> bool { self.state.lock().records.is_empty() }

    /// False once the store has failed, or when no store was configured.
    pub fn is_persistent(&self) -> bool { self.state.lock().persistent }

    pub fn max_entries(&self) -> usize { self.max_entries }

    fn persist(&self, state: &mut State) {
        let Some(store) = self.store.as_ref() else { return };
        if !state.persistent { return; }
        let json = match serde_json::to_string(&state.records) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize search history");
                return;
            }
        };
        if let Err(e) = store.set(&self.key, &json) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist search history, continuing in memory");
            state.persistent = false;
        }
    }
}

impl std::fmt::Debug for SearchHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SearchHistory")
            .field("key", &self.key)
            .field("records", &state.records.len())
            .field("persistent", &state.persistent)
            .finish()
    }
}

fn sanitize(records: Vec<HistoryRecord>, max_entries: usize) -> Vec<HistoryRecord> {
    let mut seen = HashSet::new();
    let mut kept: Vec<HistoryRecord> = records
        .into_iter()
        .filter_map(|mut r| {
            r.query = r.query.trim().to_string();
            (!r.query.is_empty() && seen.insert(r.query.clone())).then_some(r)
        })
        .collect();
    let overflow = kept.len().saturating_sub(max_entries);
    kept.drain(..overflow);
    kept
}
