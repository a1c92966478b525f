use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use catalog_core::cache::ResultCache;
use catalog_core::traits::Clock;
use catalog_core::types::{capitalize, Catalog, CatalogEntry, FilterCriteria, FilterResult};

use crate::facets::compute_facets;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Version label to the availability flags an entry must have set.
pub type VersionMap = BTreeMap<String, Vec<String>>;

pub type FilterCache = ResultCache<String, FilterResult>;

pub fn default_cache(clock: Arc<dyn Clock>) -> FilterCache {
    ResultCache::new(DEFAULT_CACHE_CAPACITY, None, clock)
}

/// Composable filtering over the full catalog snapshot, with facet counts over
/// whatever survives. Results are cached per criteria.
pub struct FilterEngine {
    catalog: RwLock<Catalog>,
    versions: VersionMap,
    cache: Mutex<FilterCache>,
}

impl FilterEngine {
    pub fn new(catalog: Catalog, versions: VersionMap, cache: FilterCache) -> Self {
        Self { catalog: RwLock::new(catalog), versions, cache: Mutex::new(cache) }
    }

    pub fn catalog(&self) -> Catalog { self.catalog.read().clone() }

    pub fn versions(&self) -> &VersionMap { &self.versions }

    pub fn replace_catalog(&self, catalog: Catalog) {
        let mut current = self.catalog.write();
        *current = catalog;
        self.cache.lock().clear();
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> FilterResult {
        // held across lookup and store so a concurrent replace cannot be cached over
        let catalog = self.catalog.read();
        let key = serde_json::to_string(criteria).unwrap_or_else(|_| format!("{criteria:?}"));
        if let Some(hit) = self.cache.lock().get(&key) {
            tracing::debug!(key, "filter cache hit");
            return hit;
        }
        let result = apply(&catalog, criteria, &self.versions);
        self.cache.lock().set(key, result.clone());
        result
    }

    pub fn clear_cache(&self) { self.cache.lock().clear(); }

    pub fn cached_filters(&self) -> usize { self.cache.lock().len() }
}

/// Apply `criteria` to `catalog` without caching.
pub fn apply(catalog: &Catalog, criteria: &FilterCriteria, versions: &VersionMap) -> FilterResult {
    let mut entries: Vec<Arc<CatalogEntry>> = catalog.entries().to_vec();
    let mut applied = Vec::new();

    if let Some(text) = criteria.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let needle = text.to_lowercase();
        entries.retain(|entry| matches_text(entry, &needle));
        applied.push(format!("Search: \"{text}\""));
    }

    if let Some(category) = &criteria.category {
        entries.retain(|entry| entry.category.as_str() == category);
        applied.push(format!("Category: {category}"));
    }

    for (flag, wanted) in &criteria.flags {
        entries.retain(|entry| entry.flag(flag) == *wanted);
        applied.push(format!("{}: {}", capitalize(flag), if *wanted { "Yes" } else { "No" }));
    }

    if let Some(dependency) = &criteria.dependency {
        entries.retain(|entry| entry.dependency_identifiers().any(|id| id == dependency));
        applied.push(format!("Dependency: {dependency}"));
    }

    if let Some(version) = &criteria.version {
        match versions.get(version) {
            Some(required) => entries.retain(|entry| required.iter().all(|flag| entry.flag(flag))),
            None => entries.clear(),
        }
        applied.push(format!("Version: {version}"));
    }

    let facets = compute_facets(&entries);
    FilterResult {
        total_count: catalog.len(),
        filtered_count: entries.len(),
        entries,
        applied_filters: applied,
        facets,
    }
}

fn matches_text(entry: &CatalogEntry, needle: &str) -> bool {
    entry.name.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
        || entry.category.as_str().to_lowercase().contains(needle)
        || entry.dependency_identifiers().any(|id| id.to_lowercase().contains(needle))
}
