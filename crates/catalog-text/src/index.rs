use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use catalog_core::types::{Catalog, CatalogEntry, SearchField};

use crate::tokenizer::tokenize;

/// Token -> positions of the entries containing it, in catalog order.
/// A position repeats once per occurrence of the token in the field.
pub type Postings = BTreeMap<String, Vec<usize>>;

/// Inverted index over one catalog snapshot. Built once and never mutated;
/// a new snapshot gets a new index.
#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<Arc<CatalogEntry>>,
    by_id: HashMap<String, usize>,
    fields: [Postings; 4],
    keywords: BTreeSet<String>,
    categories: Vec<String>,
    dependency_names: Vec<String>,
}

impl SearchIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = SearchIndex::default();
        let mut seen_categories = HashSet::new();
        let mut seen_dependencies = HashSet::new();

        for (position, entry) in catalog.iter().enumerate() {
            index.by_id.insert(entry.id.clone(), position);
            index.add_text(SearchField::Name, &entry.name, position);
            index.add_text(SearchField::Description, &entry.description, position);
            index.add_text(SearchField::Category, entry.category.as_str(), position);
            for dependency in entry.dependency_identifiers() {
                index.add_text(SearchField::Dependency, dependency, position);
                if seen_dependencies.insert(dependency.to_string()) {
                    index.dependency_names.push(dependency.to_string());
                }
            }
            if seen_categories.insert(entry.category.as_str().to_string()) {
                index.categories.push(entry.category.as_str().to_string());
            }
            index.entries.push(Arc::clone(entry));
        }

        tracing::debug!(
            entries = index.entries.len(),
            keywords = index.keywords.len(),
            "built search index"
        );
        index
    }

    fn add_text(&mut self, field: SearchField, text: &str, position: usize) {
        for token in tokenize(text) {
            self.keywords.insert(token.clone());
            self.fields[slot(field)].entry(token).or_default().push(position);
        }
    }

    pub fn entries(&self) -> &[Arc<CatalogEntry>] { &self.entries }

    pub fn entry(&self, id: &str) -> Option<&Arc<CatalogEntry>> {
        self.by_id.get(id).and_then(|&position| self.entries.get(position))
    }

    pub fn entry_at(&self, position: usize) -> Option<&Arc<CatalogEntry>> { self.entries.get(position) }

    pub fn postings(&self, field: SearchField) -> &Postings { &self.fields[slot(field)] }

    pub fn keywords(&self) -> &BTreeSet<String> { &self.keywords }

    /// Distinct category values, first-seen order.
    pub fn categories(&self) -> &[String] { &self.categories }

    /// Distinct dependency identifiers (dependencies and packages), first-seen order.
    pub fn dependency_names(&self) -> &[String] { &self.dependency_names }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn slot(field: SearchField) -> usize {
    match field {
        SearchField::Name => 0,
        SearchField::Category => 1,
        SearchField::Description => 2,
        SearchField::Dependency => 3,
    }
}
