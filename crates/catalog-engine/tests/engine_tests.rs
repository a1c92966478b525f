use std::fs;
use std::sync::Arc;

use catalog_core::catalog::JsonCatalogProvider;
use catalog_core::config::Settings;
use catalog_core::error::Error;
use catalog_core::store::MemoryStore;
use catalog_core::traits::PersistenceProvider;
use catalog_core::types::{Catalog, CatalogEntry, FilterCriteria, SearchOptions, SortField, SortOrder};
use catalog_core::ManualClock;
use catalog_engine::CatalogEngine;

fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new("button", "Button", "basic")
            .with_description("Displays a button or a component that looks like a button.")
            .with_flag("v3", true)
            .with_flag("v4", true),
        CatalogEntry::new("badge", "Badge", "basic").with_flag("v4", true),
        CatalogEntry::new("card", "Card", "layout").with_flag("v4", true),
        CatalogEntry::new("dialog", "Dialog", "overlay")
            .with_dependencies(["button"])
            .with_packages(["@radix-ui/react-dialog"])
            .with_flag("v3", true),
        CatalogEntry::new("select", "Select", "basic").with_dependencies(["button"]).with_flag("v4", true),
    ])
}

fn clock() -> Arc<ManualClock> { Arc::new(ManualClock::new(1_000)) }

#[test]
fn end_to_end_search_and_filter() {
    let engine = CatalogEngine::in_memory(catalog(), &Settings::default(), clock());

    let basic = engine.filter(&FilterCriteria::default().with_category("basic"));
    assert_eq!(basic.filtered_count, 3);
    assert_eq!(basic.applied_filters, vec!["Category: basic"]);

    let but = engine.search("but");
    assert_eq!(but[0].entry.name, "Button");

    let exact = engine.search("button");
    let typo = engine.search("buton");
    let typo_score = typo.iter().find(|r| r.entry.id == "button").map(|r| r.score);
    assert!(typo_score.is_some());
    assert!(typo_score < Some(exact[0].score));
}

#[test]
fn configured_defaults_drive_search_and_suggest() {
    let mut settings = Settings::default();
    settings.search.max_results = 1;
    settings.suggest.limit = 1;
    let engine = CatalogEngine::in_memory(catalog(), &settings, clock());

    assert_eq!(engine.search("but").len(), 1);
    assert_eq!(engine.search_with("but", &SearchOptions::default()).len(), 3);
    assert_eq!(engine.suggest("b").len(), 1);
    // Button, Badge, basic, button and the recorded "but"
    assert_eq!(engine.suggest_with_limit("b", 10).len(), 5);
}

#[test]
fn history_survives_a_new_engine_on_the_same_store() {
    let store: Arc<dyn PersistenceProvider> = Arc::new(MemoryStore::new());
    let settings = Settings::default();

    let first = CatalogEngine::new(catalog(), store.clone(), &settings, clock());
    first.search("dialog");
    first.search("card");
    first.search("   ");
    assert_eq!(first.history().len(), 2);

    let second = CatalogEngine::new(catalog(), store.clone(), &settings, clock());
    let queries: Vec<String> = second.history().into_iter().map(|r| r.query).collect();
    assert_eq!(queries, vec!["card", "dialog"]);
    assert_eq!(second.history()[0].timestamp_millis, 1_000);

    second.clear_history();
    assert!(second.history().is_empty());
    assert_eq!(store.get(&settings.history.storage_key).unwrap().as_deref(), Some("[]"));
}

#[test]
fn recent_queries_feed_suggestions() {
    let engine = CatalogEngine::in_memory(catalog(), &Settings::default(), clock());
    engine.search("dialog window");
    let texts: Vec<String> = engine.suggest("window").into_iter().map(|s| s.text).collect();
    assert_eq!(texts, vec!["dialog window"]);
}

#[test]
fn replace_catalog_invalidates_search_and_filter() {
    let engine = CatalogEngine::in_memory(catalog(), &Settings::default(), clock());
    assert!(engine.search("tooltip").is_empty());
    assert_eq!(engine.filter(&FilterCriteria::default().with_category("overlay")).filtered_count, 1);

    let mut entries: Vec<CatalogEntry> = catalog().iter().map(|e| (**e).clone()).collect();
    entries.push(CatalogEntry::new("tooltip", "Tooltip", "overlay"));
    engine.replace_catalog(Catalog::new(entries));

    assert_eq!(engine.search("tooltip")[0].entry.id, "tooltip");
    let overlay = engine.filter(&FilterCriteria::default().with_category("overlay"));
    assert_eq!(overlay.filtered_count, 2);
    assert_eq!(overlay.total_count, 6);
    assert_eq!(engine.catalog().len(), 6);
}

#[test]
fn sort_orders_filtered_entries() {
    let engine = CatalogEngine::in_memory(catalog(), &Settings::default(), clock());
    let basic = engine.filter(&FilterCriteria::default().with_category("basic"));
    let sorted = engine.sort(&basic.entries, SortField::Name, SortOrder::Descending);
    let names: Vec<&str> = sorted.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Select", "Button", "Badge"]);
}

#[test]
fn engine_loads_and_refreshes_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, r#"[{"id":"button","name":"Button","category":"basic"}]"#).unwrap();
    let provider = JsonCatalogProvider::new(&path);
    let store: Arc<dyn PersistenceProvider> = Arc::new(MemoryStore::new());

    let engine = CatalogEngine::from_provider(&provider, store, &Settings::default(), clock()).unwrap();
    assert_eq!(engine.catalog().len(), 1);

    fs::write(
        &path,
        r#"[{"id":"button","name":"Button","category":"basic"},{"id":"card","name":"Card","category":"layout"}]"#,
    )
    .unwrap();
    engine.refresh(&provider).unwrap();
    assert_eq!(engine.search("card")[0].entry.id, "card");

    // a broken file leaves the current snapshot in place
    fs::write(&path, "not json").unwrap();
    assert!(engine.refresh(&provider).is_err());
    assert_eq!(engine.catalog().len(), 2);
}

#[test]
fn missing_catalog_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let provider = JsonCatalogProvider::new(dir.path().join("absent.json"));
    let store: Arc<dyn PersistenceProvider> = Arc::new(MemoryStore::new());
    let result = CatalogEngine::from_provider(&provider, store, &Settings::default(), clock());
    assert!(matches!(result, Err(Error::NotFound(_))));
}
