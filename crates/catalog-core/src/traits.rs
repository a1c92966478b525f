use crate::error::Result;
use crate::types::Catalog;

/// Supplies immutable catalog snapshots. Calling it again yields a fresh snapshot.
pub trait CatalogProvider: Send + Sync {
    fn current_catalog(&self) -> Result<Catalog>;
}

/// Plain key-value string store used to persist search history.
pub trait PersistenceProvider: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Millisecond wall clock used for cache expiry and history timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

impl CatalogProvider for Catalog {
    fn current_catalog(&self) -> Result<Catalog> {
        Ok(self.clone())
    }
}
