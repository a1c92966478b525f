//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `catalog.toml` +
//! `catalog.<env>.toml` + `CATALOG_*` env vars (`__` separates nested keys,
//! e.g. `CATALOG_SEARCH__MAX_RESULTS=20`). Provides helpers to expand `~` and
//! `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::SearchOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub search: SearchSettings,
    pub suggest: SuggestSettings,
    pub history: HistorySettings,
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_results: usize,
    pub min_score: f64,
    pub fuzzy: bool,
    pub cache_capacity: usize,
    pub cache_ttl_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_entries: usize,
    pub storage_key: String,
    pub store_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub cache_capacity: usize,
    /// Version selector label -> availability flags that must all be set.
    pub versions: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: "catalog.json".to_string() }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 100, min_score: 0.0, fuzzy: true, cache_capacity: 50, cache_ttl_ms: 120_000 }
    }
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_entries: 50,
            storage_key: "catalog.search-history".to_string(),
            store_dir: "~/.local/share/catalog".to_string(),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        let mut versions = BTreeMap::new();
        versions.insert("v3".to_string(), vec!["v3".to_string()]);
        versions.insert("v4".to_string(), vec!["v4".to_string()]);
        versions.insert("both".to_string(), vec!["v3".to_string(), "v4".to_string()]);
        Self { cache_capacity: 100, versions }
    }
}

impl SearchSettings {
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions { max_results: self.max_results, min_score: self.min_score, fuzzy: self.fuzzy }
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file("catalog.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("catalog.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("catalog.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("catalog.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("CATALOG_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a single TOML file; no env lookup.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config = Self { figment: Self::defaults().merge(Toml::file(path)) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        let invalid = |msg: String| anyhow::Error::new(Error::InvalidConfig(msg));
        if settings.search.max_results == 0 {
            return Err(invalid("search.max_results must be greater than zero".into()));
        }
        if settings.search.min_score < 0.0 {
            return Err(invalid(format!("search.min_score must not be negative, got {}", settings.search.min_score)));
        }
        if settings.search.cache_ttl_ms < 0 {
            return Err(invalid("search.cache_ttl_ms must not be negative".into()));
        }
        if settings.history.storage_key.trim().is_empty() {
            return Err(invalid("history.storage_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
