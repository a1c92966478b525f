//! Domain types shared by the search, history and faceting engines.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Error;

pub type EntryId = String;

/// Category of a catalog entry. Unknown strings are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Basic,
    Layout,
    Form,
    Overlay,
    Navigation,
    Feedback,
    Data,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Basic => "basic",
            Category::Layout => "layout",
            Category::Form => "form",
            Category::Overlay => "overlay",
            Category::Navigation => "navigation",
            Category::Feedback => "feedback",
            Category::Data => "data",
            Category::Other(s) => s,
        }
    }

    /// Display label, e.g. `"Basic"` for `basic`.
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "basic" => Category::Basic,
            "layout" => Category::Layout,
            "form" => Category::Form,
            "overlay" => Category::Overlay,
            "navigation" => Category::Navigation,
            "feedback" => Category::Feedback,
            "data" => Category::Data,
            _ => Category::Other(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One building block in the catalog.
///
/// - `dependencies`: other catalog entries this one is composed from
/// - `packages`: package-style identifiers (e.g. `@radix-ui/react-dialog`)
/// - `availability`: named boolean flags such as variant availability (`v3`, `v4`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub availability: BTreeMap<String, bool>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            dependencies: Vec::new(),
            packages: Vec::new(),
            availability: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.availability.insert(name.into(), value);
        self
    }

    /// Dependencies followed by packages, in declaration order.
    pub fn dependency_identifiers(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().chain(self.packages.iter()).map(String::as_str)
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len() + self.packages.len()
    }

    /// A flag that is not declared counts as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.availability.get(name).copied().unwrap_or(false)
    }

    pub fn availability_score(&self) -> usize {
        self.availability.values().filter(|v| **v).count()
    }
}

/// Immutable, ordered snapshot handed out by a catalog provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<Arc<CatalogEntry>>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        entries.into_iter().collect()
    }

    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self { entries: iter.into_iter().map(Arc::new).collect() }
    }
}

/// Indexed text fields, in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Category,
    Description,
    Dependency,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Name,
        SearchField::Category,
        SearchField::Description,
        SearchField::Dependency,
    ];

    pub fn weight(self) -> f64 {
        match self {
            SearchField::Name => 10.0,
            SearchField::Category => 5.0,
            SearchField::Description => 3.0,
            SearchField::Dependency => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Category => "category",
            SearchField::Description => "description",
            SearchField::Dependency => "dependency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub max_results: usize,
    pub min_score: f64,
    pub fuzzy: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_results: 100, min_score: 0.0, fuzzy: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entry: Arc<CatalogEntry>,
    pub score: f64,
    pub matched_fields: BTreeSet<SearchField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    EntryName,
    Category,
    Dependency,
    RecentQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EntryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub query: String,
    pub timestamp_millis: i64,
    pub result_count: usize,
}

/// Filter criteria. Every field is optional; the default value is the identity filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    pub flags: BTreeMap<String, bool>,
    pub dependency: Option<String>,
    pub version: Option<String>,
}

impl FilterCriteria {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// Facet buckets per filterable dimension, computed over the filtered entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub category: Vec<FacetCount>,
    pub dependency: Vec<FacetCount>,
    pub availability: Vec<FacetCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub entries: Vec<Arc<CatalogEntry>>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub applied_filters: Vec<String>,
    pub facets: Facets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    Name,
    Category,
    DependencyCount,
    AvailabilityScore,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "category" => Ok(SortField::Category),
            "dependencies" | "dependency-count" => Ok(SortField::DependencyCount),
            "availability" | "availability-score" => Ok(SortField::AvailabilityScore),
            other => Err(Error::InvalidArgument(format!("sort field '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(Error::InvalidArgument(format!("sort order '{other}'"))),
        }
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
