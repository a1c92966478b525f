//! catalog-engine
//!
//! One object the presentation layer owns: ranked search, suggestions and
//! history from `catalog-text`, filtering and sorting from `catalog-facets`,
//! all over the same catalog snapshot.

use std::sync::Arc;

use catalog_core::cache::ResultCache;
use catalog_core::config::Settings;
use catalog_core::error::Result;
use catalog_core::traits::{CatalogProvider, Clock, PersistenceProvider};
use catalog_core::types::{
    Catalog, CatalogEntry, FilterCriteria, FilterResult, HistoryRecord, SearchOptions, SearchResult, SortField,
    SortOrder, Suggestion,
};
use catalog_facets::{sort_entries, FilterEngine};
use catalog_history::SearchHistory;
use catalog_text::{Scorer, SearchEngine, WeightedScorer};

pub struct CatalogEngine<S = WeightedScorer> {
    search: SearchEngine<S>,
    filter: FilterEngine,
    history: Arc<SearchHistory>,
    options: SearchOptions,
    suggest_limit: usize,
}

impl CatalogEngine<WeightedScorer> {
    /// History is loaded from and written to `store` under the configured key.
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn PersistenceProvider>,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let history = SearchHistory::open(
            store,
            settings.history.storage_key.clone(),
            settings.history.max_entries,
            clock.clone(),
        );
        Self::with_scorer(catalog, WeightedScorer, Arc::new(history), settings, clock)
    }

    /// History lives only as long as the engine.
    pub fn in_memory(catalog: Catalog, settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        let history = SearchHistory::in_memory(settings.history.max_entries, clock.clone());
        Self::with_scorer(catalog, WeightedScorer, Arc::new(history), settings, clock)
    }

    pub fn from_provider(
        provider: &dyn CatalogProvider,
        store: Arc<dyn PersistenceProvider>,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let catalog = provider.current_catalog()?;
        Ok(Self::new(catalog, store, settings, clock))
    }
}

impl<S: Scorer> CatalogEngine<S> {
    pub fn with_scorer(
        catalog: Catalog,
        scorer: S,
        history: Arc<SearchHistory>,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let search_cache =
            ResultCache::new(settings.search.cache_capacity, Some(settings.search.cache_ttl_ms), clock.clone());
        let filter_cache = ResultCache::new(settings.filter.cache_capacity, None, clock);
        let search = SearchEngine::with_scorer(&catalog, scorer, history.clone(), search_cache);
        let filter = FilterEngine::new(catalog, settings.filter.versions.clone(), filter_cache);
        tracing::info!(entries = search.index().len(), "catalog engine ready");
        Self {
            search,
            filter,
            history,
            options: settings.search.default_options(),
            suggest_limit: settings.suggest.limit,
        }
    }

    /// Search with the configured default options.
    pub fn search(&self, query: &str) -> Vec<SearchResult> { self.search.search(query, &self.options) }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        self.search.search(query, options)
    }

    pub fn suggest(&self, partial: &str) -> Vec<Suggestion> { self.search.suggest(partial, self.suggest_limit) }

    pub fn suggest_with_limit(&self, partial: &str, limit: usize) -> Vec<Suggestion> {
        self.search.suggest(partial, limit)
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> FilterResult { self.filter.filter(criteria) }

    pub fn sort(&self, entries: &[Arc<CatalogEntry>], field: SortField, order: SortOrder) -> Vec<Arc<CatalogEntry>> {
        sort_entries(entries, field, order)
    }

    /// Newest first.
    pub fn history(&self) -> Vec<HistoryRecord> { self.history.history() }

    pub fn clear_history(&self) { self.history.clear(); }

    pub fn catalog(&self) -> Catalog { self.filter.catalog() }

    pub fn default_options(&self) -> &SearchOptions { &self.options }

    /// Rebuild the index for `catalog`, swap it in and drop both result caches.
    pub fn replace_catalog(&self, catalog: Catalog) {
        self.search.rebuild(&catalog);
        let entries = catalog.len();
        self.filter.replace_catalog(catalog);
        tracing::info!(entries, "catalog replaced");
    }

    /// Pull a fresh snapshot from `provider`. The current catalog stays active on error.
    pub fn refresh(&self, provider: &dyn CatalogProvider) -> Result<()> {
        let catalog = provider.current_catalog()?;
        self.replace_catalog(catalog);
        Ok(())
    }
}
