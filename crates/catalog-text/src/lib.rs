//! catalog-text
//!
//! Tokenizer, inverted index, weighted/fuzzy ranking and autocomplete over a
//! catalog snapshot. See `search::SearchEngine` for the cached entry point.

pub mod index;
pub mod ranking;
pub mod search;
pub mod suggest;
pub mod tokenizer;

pub use index::SearchIndex;
pub use ranking::{rank, Scorer, WeightedScorer};
pub use search::SearchEngine;
pub use suggest::suggest;
pub use tokenizer::tokenize;
