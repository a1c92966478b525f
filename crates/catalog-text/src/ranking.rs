use std::collections::BTreeSet;
use std::ops::Bound;

use catalog_core::types::{SearchField, SearchOptions, SearchResult};

use crate::index::SearchIndex;
use crate::tokenizer::tokenize;

pub const EXACT_MULTIPLIER: f64 = 2.0;
pub const PREFIX_MULTIPLIER: f64 = 1.0;
pub const SUBSTRING_MULTIPLIER: f64 = 0.5;
/// Query tokens shorter than this are never fuzzy matched.
pub const FUZZY_MIN_TOKEN_LEN: usize = 3;

/// The scoring step of a search, separated from caching and history so it can
/// be swapped out or observed.
pub trait Scorer: Send + Sync {
    fn score(&self, index: &SearchIndex, query: &str, options: &SearchOptions) -> Vec<SearchResult>;
}

/// Field-weighted exact/prefix/substring scoring with optional edit-distance matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScorer;

impl Scorer for WeightedScorer {
    fn score(&self, index: &SearchIndex, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        rank(index, query, options)
    }
}

pub fn rank(index: &SearchIndex, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    let mut scores = Accumulator::new(index.len());
    for token in tokenize(query) {
        for field in SearchField::ALL {
            score_field(index, field, &token, &mut scores);
        }
        if options.fuzzy {
            score_fuzzy(index, &token, &mut scores);
        }
    }
    scores.into_results(index, options)
}

fn score_field(index: &SearchIndex, field: SearchField, token: &str, scores: &mut Accumulator) {
    let postings = index.postings(field);
    let weight = field.weight();

    if let Some(positions) = postings.get(token) {
        scores.add(positions, EXACT_MULTIPLIER * weight, field);
    }

    // keys sharing the prefix sit right after `token` in the ordered map
    let after = postings.range::<str, _>((Bound::Excluded(token), Bound::Unbounded));
    for (_, positions) in after.take_while(|(indexed, _)| indexed.starts_with(token)) {
        scores.add(positions, PREFIX_MULTIPLIER * weight, field);
    }

    for (_, positions) in postings
        .iter()
        .filter(|(indexed, _)| !indexed.starts_with(token) && indexed.contains(token))
    {
        scores.add(positions, SUBSTRING_MULTIPLIER * weight, field);
    }
}

fn score_fuzzy(index: &SearchIndex, token: &str, scores: &mut Accumulator) {
    let token_len = token.chars().count();
    if token_len < FUZZY_MIN_TOKEN_LEN { return; }
    let max_distance = token_len / 3;

    for keyword in index.keywords() {
        if keyword.chars().count().abs_diff(token_len) > max_distance { continue; }
        let distance = strsim::levenshtein(token, keyword);
        if distance == 0 || distance > max_distance { continue; }
        let bonus = 1.0 / (distance as f64 + 1.0);
        for field in SearchField::ALL {
            if let Some(positions) = index.postings(field).get(keyword) {
                scores.add(positions, bonus, field);
            }
        }
    }
}

struct Accumulator {
    scores: Vec<f64>,
    fields: Vec<BTreeSet<SearchField>>,
}

impl Accumulator {
    fn new(len: usize) -> Self {
        Self { scores: vec![0.0; len], fields: vec![BTreeSet::new(); len] }
    }

    fn add(&mut self, positions: &[usize], amount: f64, field: SearchField) {
        for &position in positions {
            self.scores[position] += amount;
            self.fields[position].insert(field);
        }
    }

    fn into_results(self, index: &SearchIndex, options: &SearchOptions) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .scores
            .into_iter()
            .zip(self.fields)
            .enumerate()
            .filter(|(_, (score, fields))| !fields.is_empty() && *score >= options.min_score)
            .filter_map(|(position, (score, matched_fields))| {
                index.entry_at(position).map(|entry| SearchResult {
                    entry: entry.clone(),
                    score,
                    matched_fields,
                })
            })
            .collect();
        // stable: equal scores keep catalog order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(options.max_results);
        results
    }
}
