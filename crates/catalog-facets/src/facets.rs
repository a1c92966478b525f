use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use catalog_core::types::{CatalogEntry, FacetCount, Facets};

/// Availability bucket for entries with no flag set.
pub const NO_FLAGS: &str = "none";

/// Count facet buckets over `entries`. Category and availability buckets
/// partition the entries; an entry is counted once under each of its distinct
/// dependency identifiers.
pub fn compute_facets(entries: &[Arc<CatalogEntry>]) -> Facets {
    let mut category = BTreeMap::new();
    let mut dependency = BTreeMap::new();
    let mut availability = BTreeMap::new();

    for entry in entries {
        bump(&mut category, entry.category.as_str(), || entry.category.label());

        let mut seen = HashSet::new();
        for identifier in entry.dependency_identifiers() {
            if seen.insert(identifier) {
                bump(&mut dependency, identifier, || identifier.to_string());
            }
        }

        let set: Vec<&str> = entry.availability.iter().filter(|(_, on)| **on).map(|(name, _)| name.as_str()).collect();
        if set.is_empty() {
            bump(&mut availability, NO_FLAGS, || "None".to_string());
        } else {
            bump(&mut availability, &set.join("+"), || set.join(" + "));
        }
    }

    Facets { category: sorted(category), dependency: sorted(dependency), availability: sorted(availability) }
}

fn bump(buckets: &mut BTreeMap<String, FacetCount>, value: &str, label: impl FnOnce() -> String) {
    buckets
        .entry(value.to_string())
        .or_insert_with(|| FacetCount { value: value.to_string(), label: label(), count: 0 })
        .count += 1;
}

/// Highest count first, ties by value.
fn sorted(buckets: BTreeMap<String, FacetCount>) -> Vec<FacetCount> {
    let mut facets: Vec<FacetCount> = buckets.into_values().collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}
