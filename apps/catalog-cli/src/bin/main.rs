use std::env;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use tracing_subscriber::EnvFilter;

use catalog_core::catalog::JsonCatalogProvider;
use catalog_core::config::{expand_path, Config};
use catalog_core::store::FileStore;
use catalog_core::types::{FilterCriteria, SearchOptions, SortField, SortOrder};
use catalog_core::SystemClock;
use catalog_engine::CatalogEngine;

const USAGE: &str = "Usage: catalog <command> [args...]

Commands:
  search <query> [--limit N] [--min-score X] [--no-fuzzy] [--json]
  suggest <text> [--limit N]
  filter [--query q] [--category c] [--flag name=true|false]... [--dependency d]
         [--version v] [--sort field[:desc]] [--json]
  history
  clear-history";

#[derive(Debug, PartialEq)]
enum Command {
    Search { query: String, limit: Option<usize>, min_score: Option<f64>, fuzzy: bool, json: bool },
    Suggest { text: String, limit: Option<usize> },
    Filter { criteria: FilterCriteria, sort: Option<(SortField, SortOrder)>, json: bool },
    History,
    ClearHistory,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;
    tracing::debug!(catalog = %settings.catalog.path, history = %settings.history.store_dir, "settings loaded");
    let provider = JsonCatalogProvider::new(expand_path(&settings.catalog.path));
    let store = Arc::new(FileStore::new(expand_path(&settings.history.store_dir)));
    let engine = CatalogEngine::from_provider(&provider, store, &settings, Arc::new(SystemClock))
        .with_context(|| format!("loading catalog from {}", provider.path().display()))?;
    tracing::debug!(entries = engine.catalog().len(), "catalog loaded");

    run(&engine, command)
}

fn run(engine: &CatalogEngine, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search { query, limit, min_score, fuzzy, json } => {
            let defaults = engine.default_options();
            let options = SearchOptions {
                max_results: limit.unwrap_or(defaults.max_results),
                min_score: min_score.unwrap_or(defaults.min_score),
                fuzzy: fuzzy && defaults.fuzzy,
            };
            let results = engine.search_with(&query, &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }
            println!("Found {} results for \"{}\"", results.len(), query);
            for (i, result) in results.iter().enumerate() {
                let fields: Vec<&str> = result.matched_fields.iter().map(|f| f.as_str()).collect();
                println!(
                    "  {}. {:<24} score={:.2}  category={}  matched={}",
                    i + 1,
                    result.entry.name,
                    result.score,
                    result.entry.category.as_str(),
                    fields.join(",")
                );
            }
        }
        Command::Suggest { text, limit } => {
            let suggestions = match limit {
                Some(limit) => engine.suggest_with_limit(&text, limit),
                None => engine.suggest(&text),
            };
            for suggestion in suggestions {
                println!("{:<32} {:>6.1}  {:?}", suggestion.text, suggestion.score, suggestion.kind);
            }
        }
        Command::Filter { criteria, sort, json } => {
            let mut result = engine.filter(&criteria);
            if let Some((field, order)) = sort {
                result.entries = engine.sort(&result.entries, field, order);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            println!("{} of {} entries", result.filtered_count, result.total_count);
            for description in &result.applied_filters {
                println!("  [{description}]");
            }
            for entry in &result.entries {
                println!("  {:<24} {}", entry.name, entry.category.as_str());
            }
            println!("\nFacets:");
            for (dimension, buckets) in [
                ("category", &result.facets.category),
                ("dependency", &result.facets.dependency),
                ("availability", &result.facets.availability),
            ] {
                println!("  {dimension}:");
                for bucket in buckets {
                    println!("    {}: {}", bucket.label, bucket.count);
                }
            }
        }
        Command::History => {
            for record in engine.history() {
                println!("{:>14}  {:>4} results  {}", record.timestamp_millis, record.result_count, record.query);
            }
        }
        Command::ClearHistory => {
            engine.clear_history();
            println!("Search history cleared");
        }
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let (cmd, rest) = args.split_first().ok_or_else(|| anyhow!("Missing command"))?;
    let mut positional: Vec<&str> = Vec::new();
    let mut limit = None;
    let mut min_score = None;
    let mut fuzzy = true;
    let mut json = false;
    let mut criteria = FilterCriteria::default();
    let mut sort = None;

    let mut i = 0;
    while i < rest.len() {
        let flag = rest[i].as_str();
        let value = || rest.get(i + 1).map(String::as_str).ok_or_else(|| anyhow!("{flag} requires a value"));
        match flag {
            "--limit" => {
                limit = Some(value()?.parse::<usize>().with_context(|| format!("{flag} expects a number"))?);
                i += 2;
            }
            "--min-score" => {
                min_score = Some(value()?.parse::<f64>().with_context(|| format!("{flag} expects a number"))?);
                i += 2;
            }
            "--no-fuzzy" => { fuzzy = false; i += 1; }
            "--json" => { json = true; i += 1; }
            "--query" => { criteria.query = Some(value()?.to_string()); i += 2; }
            "--category" => { criteria.category = Some(value()?.to_string()); i += 2; }
            "--dependency" => { criteria.dependency = Some(value()?.to_string()); i += 2; }
            "--version" => { criteria.version = Some(value()?.to_string()); i += 2; }
            "--flag" => {
                let (name, wanted) = parse_flag(value()?)?;
                criteria.flags.insert(name, wanted);
                i += 2;
            }
            "--sort" => { sort = Some(parse_sort(value()?)?); i += 2; }
            s if s.starts_with("--") => bail!("Unknown flag: {s}"),
            s => { positional.push(s); i += 1; }
        }
    }

    let command = match cmd.as_str() {
        "search" => Command::Search { query: positional.join(" "), limit, min_score, fuzzy, json },
        "suggest" => {
            if positional.is_empty() { bail!("Missing <text> argument"); }
            Command::Suggest { text: positional.join(" "), limit }
        }
        "filter" => Command::Filter { criteria, sort, json },
        "history" => Command::History,
        "clear-history" => Command::ClearHistory,
        other => bail!("Unknown command: {other}"),
    };
    Ok(command)
}

fn parse_flag(arg: &str) -> anyhow::Result<(String, bool)> {
    let (name, value) = arg.split_once('=').ok_or_else(|| anyhow!("--flag expects name=true|false, got '{arg}'"))?;
    let wanted = match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" => false,
        other => bail!("--flag value must be true or false, got '{other}'"),
    };
    Ok((name.to_string(), wanted))
}

fn parse_sort(arg: &str) -> anyhow::Result<(SortField, SortOrder)> {
    let (field, order) = match arg.split_once(':') {
        Some((field, order)) => (field, order.parse::<SortOrder>()?),
        None => (arg, SortOrder::default()),
    };
    Ok((field.parse::<SortField>()?, order))
}
