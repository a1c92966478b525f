use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_core::cache::ResultCache;
use catalog_core::traits::Clock;
use catalog_core::types::{Catalog, SearchOptions, SearchResult, Suggestion};
use catalog_history::SearchHistory;

use crate::index::SearchIndex;
use crate::ranking::{Scorer, WeightedScorer};
use crate::suggest::suggest;

pub const DEFAULT_CACHE_CAPACITY: usize = 50;
pub const DEFAULT_CACHE_TTL_MS: i64 = 120_000;

pub type SearchCache = ResultCache<String, Vec<SearchResult>>;

pub fn default_cache(clock: Arc<dyn Clock>) -> SearchCache {
    ResultCache::new(DEFAULT_CACHE_CAPACITY, Some(DEFAULT_CACHE_TTL_MS), clock)
}

/// Ranked search over the active index. Results are cached per
/// `(query, options)` and every non-blank query is written to history.
pub struct SearchEngine<S = WeightedScorer> {
    // generation and index change together; the generation is part of every cache key
    index: RwLock<(u64, Arc<SearchIndex>)>,
    scorer: S,
    cache: Mutex<SearchCache>,
    history: Arc<SearchHistory>,
}

impl SearchEngine<WeightedScorer> {
    pub fn new(catalog: &Catalog, history: Arc<SearchHistory>, cache: SearchCache) -> Self {
        Self::with_scorer(catalog, WeightedScorer, history, cache)
    }
}

impl<S: Scorer> SearchEngine<S> {
    pub fn with_scorer(catalog: &Catalog, scorer: S, history: Arc<SearchHistory>, cache: SearchCache) -> Self {
        Self {
            index: RwLock::new((0, Arc::new(SearchIndex::build(catalog)))),
            scorer,
            cache: Mutex::new(cache),
            history,
        }
    }

    /// Build an index for `catalog` and swap it in. Cached results are dropped.
    pub fn rebuild(&self, catalog: &Catalog) {
        let index = Arc::new(SearchIndex::build(catalog));
        {
            let mut current = self.index.write();
            *current = (current.0 + 1, index);
        }
        self.cache.lock().clear();
    }

    pub fn index(&self) -> Arc<SearchIndex> { self.index.read().1.clone() }

    fn snapshot(&self) -> (u64, Arc<SearchIndex>) {
        let current = self.index.read();
        (current.0, current.1.clone())
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let (generation, index) = self.snapshot();
        if query.trim().is_empty() {
            return index
                .entries()
                .iter()
                .map(|entry| SearchResult { entry: Arc::clone(entry), score: 1.0, matched_fields: BTreeSet::new() })
                .collect();
        }

        let key = cache_key(generation, query, options);
        let cached = self.cache.lock().get(&key);
        let results = match cached {
            Some(results) => {
                tracing::debug!(query, "search cache hit");
                results
            }
            None => {
                let results = self.scorer.score(&index, query, options);
                self.cache.lock().set(key, results.clone());
                results
            }
        };
        self.history.record(query, results.len());
        results
    }

    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        suggest(&self.index(), &self.history, partial, limit)
    }

    pub fn history(&self) -> &Arc<SearchHistory> { &self.history }

    pub fn clear_cache(&self) { self.cache.lock().clear(); }

    pub fn cached_queries(&self) -> usize { self.cache.lock().len() }
}

fn cache_key(generation: u64, query: &str, options: &SearchOptions) -> String {
    serde_json::to_string(&(generation, query, options))
        .unwrap_or_else(|_| format!("{generation}\u{1f}{query}\u{1f}{options:?}"))
}
