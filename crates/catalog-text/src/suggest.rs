use catalog_core::types::{Suggestion, SuggestionKind};
use catalog_history::SearchHistory;

use crate::index::SearchIndex;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;
const RECENT_QUERY_DAMPING: f64 = 0.8;

/// Autocomplete candidates for `partial`: entry names, categories, dependency
/// identifiers and earlier queries containing it (case-insensitive). An earlier
/// query equal to `partial` ignoring case and surrounding whitespace is left out.
pub fn suggest(index: &SearchIndex, history: &SearchHistory, partial: &str, limit: usize) -> Vec<Suggestion> {
    let text = partial.trim();
    if text.is_empty() || limit == 0 { return Vec::new(); }
    let needle = text.to_lowercase();
    let mut suggestions = Vec::new();

    for entry in index.entries() {
        if let Some(score) = match_score(&entry.name, &needle) {
            suggestions.push(Suggestion {
                text: entry.name.clone(),
                kind: SuggestionKind::EntryName,
                score,
                metadata: Some(entry.id.clone()),
            });
        }
    }
    for category in index.categories() {
        if let Some(score) = match_score(category, &needle) {
            suggestions.push(Suggestion { text: category.clone(), kind: SuggestionKind::Category, score, metadata: None });
        }
    }
    for dependency in index.dependency_names() {
        if let Some(score) = match_score(dependency, &needle) {
            suggestions.push(Suggestion { text: dependency.clone(), kind: SuggestionKind::Dependency, score, metadata: None });
        }
    }
    for record in history.history() {
        if record.query.to_lowercase() == needle { continue; }
        if let Some(score) = match_score(&record.query, &needle) {
            suggestions.push(Suggestion {
                text: record.query,
                kind: SuggestionKind::RecentQuery,
                score: score * RECENT_QUERY_DAMPING,
                metadata: None,
            });
        }
    }

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(limit);
    suggestions
}

/// `None` when `candidate` does not contain `needle` (already lowercased).
fn match_score(candidate: &str, needle: &str) -> Option<f64> {
    let candidate = candidate.to_lowercase();
    if !candidate.contains(needle) { return None; }
    Some(relevance(&candidate, needle))
}

fn relevance(candidate: &str, needle: &str) -> f64 {
    if candidate == needle {
        100.0
    } else if candidate.starts_with(needle) {
        80.0
    } else if candidate.contains(needle) {
        60.0
    } else {
        40.0 * (needle.chars().count() as f64 / candidate.chars().count().max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::relevance;

    #[test]
    fn relevance_tiers() {
        assert_eq!(relevance("button", "button"), 100.0);
        assert_eq!(relevance("button", "but"), 80.0);
        assert_eq!(relevance("button", "tto"), 60.0);
        assert_eq!(relevance("button", "xyz"), 20.0);
    }
}
