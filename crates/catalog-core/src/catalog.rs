use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::CatalogProvider;
use crate::types::{Catalog, CatalogEntry};

/// Reads a catalog snapshot from a JSON array of entries. The file is re-read
/// on every call, so edits show up on the next refresh.
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    path: PathBuf,
}

impl JsonCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }
}

impl CatalogProvider for JsonCatalogProvider {
    fn current_catalog(&self) -> Result<Catalog> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!("catalog file {}", self.path.display())));
        }
        let content = fs::read_to_string(&self.path)?;
        let catalog = parse_catalog(&content)?;
        tracing::debug!(path = %self.path.display(), entries = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}

/// Parse and validate a JSON catalog: ids and names must be non-empty, ids unique.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    validate_entries(&entries)?;
    Ok(Catalog::new(entries))
}

fn validate_entries(entries: &[CatalogEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    for (position, entry) in entries.iter().enumerate() {
        if entry.id.trim().is_empty() {
            return Err(Error::InvalidCatalog(format!("entry #{position} has an empty id")));
        }
        if entry.name.trim().is_empty() {
            return Err(Error::InvalidCatalog(format!("entry '{}' has an empty name", entry.id)));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(Error::InvalidCatalog(format!("duplicate entry id '{}'", entry.id)));
        }
    }
    Ok(())
}
