//! catalog-facets
//!
//! Criteria filtering, facet counting and sorting over a catalog snapshot.

pub mod facets;
pub mod filter;
pub mod sort;

pub use facets::compute_facets;
pub use filter::{FilterEngine, VersionMap};
pub use sort::sort_entries;
