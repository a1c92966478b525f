use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_core::types::{Catalog, CatalogEntry, SearchField, SearchOptions, SearchResult};
use catalog_core::ManualClock;
use catalog_history::SearchHistory;
use catalog_text::search::default_cache;
use catalog_text::{rank, SearchEngine, SearchIndex};

fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new("button", "Button", "basic")
            .with_description("Displays a button or a component that looks like a button.")
            .with_packages(["@radix-ui/react-slot"])
            .with_flag("v3", true)
            .with_flag("v4", true),
        CatalogEntry::new("badge", "Badge", "basic")
            .with_description("Displays a badge or a component that looks like a badge.")
            .with_flag("v3", true)
            .with_flag("v4", true),
        CatalogEntry::new("card", "Card", "layout")
            .with_description("Displays a card with header, content, and footer.")
            .with_flag("v4", true),
        CatalogEntry::new("dialog", "Dialog", "overlay")
            .with_description("A window overlaid on either the primary window or another dialog window.")
            .with_dependencies(["button"])
            .with_packages(["@radix-ui/react-dialog"])
            .with_flag("v3", true),
        CatalogEntry::new("select", "Select", "basic")
            .with_description("Displays a list of options for the user to pick from, triggered by a button.")
            .with_dependencies(["button"])
            .with_packages(["@radix-ui/react-select"])
            .with_flag("v4", true),
    ])
}

fn engine(catalog: &Catalog) -> SearchEngine {
    let clock = Arc::new(ManualClock::new(0));
    let history = Arc::new(SearchHistory::in_memory(50, clock.clone()));
    SearchEngine::new(catalog, history, default_cache(clock))
}

fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.entry.id.as_str()).collect()
}

fn score_of(results: &[SearchResult], id: &str) -> Option<f64> {
    results.iter().find(|r| r.entry.id == id).map(|r| r.score)
}

#[test]
fn blank_query_returns_every_entry_with_unit_score() {
    let catalog = sample_catalog();
    let engine = engine(&catalog);
    for query in ["", "   "] {
        let results = engine.search(query, &SearchOptions::default());
        assert_eq!(ids(&results), vec!["button", "badge", "card", "dialog", "select"]);
        assert!(results.iter().all(|r| r.score == 1.0 && r.matched_fields.is_empty()));
    }
    assert!(engine.history().is_empty(), "blank queries are not recorded");
}

#[test]
fn prefix_on_name_ranks_button_first() {
    let catalog = sample_catalog();
    let results = engine(&catalog).search("but", &SearchOptions::default());
    assert_eq!(ids(&results), vec!["button", "select", "dialog"]);
    // name prefix 10 + description prefix 3 twice
    assert_eq!(results[0].score, 16.0);
    assert_eq!(
        results[0].matched_fields,
        BTreeSet::from([SearchField::Name, SearchField::Description])
    );
    assert_eq!(results[2].matched_fields, BTreeSet::from([SearchField::Dependency]));
}

#[test]
fn typo_is_matched_by_edit_distance_below_exact_score() {
    let catalog = sample_catalog();
    let engine = engine(&catalog);
    let exact = engine.search("button", &SearchOptions::default());
    let typo = engine.search("buton", &SearchOptions::default());

    assert_eq!(typo[0].entry.id, "button");
    let typo_score = score_of(&typo, "button").unwrap();
    assert!(typo_score > 0.0);
    // one edit: 1/2 per posting, name + two description postings
    assert_eq!(typo_score, 1.5);
    assert!(typo_score < score_of(&exact, "button").unwrap());
}

#[test]
fn typo_beyond_threshold_is_not_matched() {
    let catalog = sample_catalog();
    let results = engine(&catalog).search("bxtxn", &SearchOptions::default());
    assert!(score_of(&results, "button").is_none());
}

#[test]
fn fuzzy_matching_can_be_disabled() {
    let catalog = sample_catalog();
    let options = SearchOptions { fuzzy: false, ..SearchOptions::default() };
    assert!(engine(&catalog).search("buton", &options).is_empty());
}

#[test]
fn search_is_case_insensitive() {
    let catalog = sample_catalog();
    let engine = engine(&catalog);
    for query in ["dialog", "Select button", "radix"] {
        let lower = engine.search(query, &SearchOptions::default());
        let upper = engine.search(&query.to_uppercase(), &SearchOptions::default());
        assert_eq!(lower, upper, "query: {query}");
    }
}

#[test]
fn exact_beats_prefix_beats_substring() {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("stab", "Stab", "basic"),
        CatalogEntry::new("table", "Table", "basic"),
        CatalogEntry::new("tab", "Tab", "basic"),
    ]);
    let index = SearchIndex::build(&catalog);
    let options = SearchOptions { fuzzy: false, ..SearchOptions::default() };
    let results = rank(&index, "tab", &options);
    assert_eq!(ids(&results), vec!["tab", "table", "stab"]);
    assert_eq!(results.iter().map(|r| r.score).collect::<Vec<_>>(), vec![20.0, 10.0, 5.0]);
}

#[test]
fn repeated_tokens_count_twice() {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("one", "Alpha", "data").with_description("grid"),
        CatalogEntry::new("two", "Beta", "data").with_description("grid with a grid"),
    ]);
    let results = rank(&SearchIndex::build(&catalog), "grid", &SearchOptions::default());
    assert_eq!(ids(&results), vec!["two", "one"]);
    assert_eq!(score_of(&results, "two"), Some(12.0));
    assert_eq!(score_of(&results, "one"), Some(6.0));
}

#[test]
fn category_and_package_tokens_are_searchable() {
    let catalog = sample_catalog();
    let engine = engine(&catalog);

    let overlay = engine.search("overlay", &SearchOptions::default());
    assert_eq!(overlay[0].entry.id, "dialog");
    assert!(overlay[0].matched_fields.contains(&SearchField::Category));

    let exact_only = SearchOptions { fuzzy: false, ..SearchOptions::default() };
    let radix = engine.search("react-select", &exact_only);
    assert_eq!(ids(&radix), vec!["select"]);
    assert_eq!(radix[0].score, 4.0);
    assert_eq!(radix[0].matched_fields, BTreeSet::from([SearchField::Dependency]));
}

#[test]
fn min_score_and_max_results_trim_the_list() {
    let catalog = sample_catalog();
    let engine = engine(&catalog);

    let strict = SearchOptions { min_score: 10.0, ..SearchOptions::default() };
    assert_eq!(ids(&engine.search("but", &strict)), vec!["button"]);

    let short = SearchOptions { max_results: 2, ..SearchOptions::default() };
    assert_eq!(ids(&engine.search("but", &short)), vec!["button", "select"]);
}

#[test]
fn empty_catalog_yields_no_results() {
    let catalog = Catalog::default();
    let engine = engine(&catalog);
    assert!(engine.search("button", &SearchOptions::default()).is_empty());
    assert!(engine.search("", &SearchOptions::default()).is_empty());
}

#[test]
fn unmatched_query_yields_no_results() {
    let catalog = sample_catalog();
    assert!(engine(&catalog).search("zzzz qqqq", &SearchOptions::default()).is_empty());
}
