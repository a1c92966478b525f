//! catalog-core
//!
//! Shared domain types, configuration, the bounded result cache and the
//! provider traits (catalog, persistence, clock) used by the search, history
//! and faceting crates.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use cache::ResultCache;
pub use clock::{ManualClock, SystemClock};
pub use error::{Error, Result};
