//! DJ-ADB catalog search.
//!
//! Loads the static search index document, runs fuzzy matching, exact filters
//! and stable sorts over it, and provides the derived display values and
//! listing aggregates used by the catalog pages. The `djadb` binary wraps
//! these for the command line and also produces the index document from the
//! catalog data cache.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod derived;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod search;

pub use error::{AppError, Result};
