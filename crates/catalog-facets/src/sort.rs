use std::cmp::Ordering;
use std::sync::Arc;

use catalog_core::types::{CatalogEntry, SortField, SortOrder};

/// Sort a copy of `entries`. `order` flips the primary comparison; ties are
/// always broken by name, A to Z.
///
/// Primary comparisons in ascending order:
/// - `Name`: case-insensitive, then raw
/// - `Category`: category value
/// - `DependencyCount`: most dependency identifiers first
/// - `AvailabilityScore`: most availability flags set first
pub fn sort_entries(entries: &[Arc<CatalogEntry>], field: SortField, order: SortOrder) -> Vec<Arc<CatalogEntry>> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        let primary = primary(a, b, field);
        let primary = match order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        primary.then_with(|| by_name(a, b))
    });
    sorted
}

fn primary(a: &CatalogEntry, b: &CatalogEntry, field: SortField) -> Ordering {
    match field {
        SortField::Name => by_name(a, b),
        SortField::Category => a.category.as_str().cmp(b.category.as_str()),
        SortField::DependencyCount => b.dependency_count().cmp(&a.dependency_count()),
        SortField::AvailabilityScore => b.availability_score().cmp(&a.availability_score()),
    }
}

fn by_name(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
}
