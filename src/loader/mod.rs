//! Index loading.
//!
//! The index document is a JSON array of abbreviated [`SearchRecord`](crate::models::SearchRecord)
//! objects. An [`IndexSource`] fetches the raw bytes, [`RecordSet`] decodes them
//! (skipping malformed records) and [`IndexRepository`] memoizes the result for
//! the lifetime of the session. [`FeatureCatalog`] loads the curated feature
//! documents the same way.
//!
//! # Example
//!
//! ```no_run
//! use djadb_catalog::loader::{FileSource, IndexRepository};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let repo = IndexRepository::new(Arc::new(FileSource::new("public/data/search-index.json")));
//! let records = repo.ensure_loaded().await;
//! println!("{} records, state {:?}", records.len(), repo.state());
//! # }
//! ```

pub mod error;
pub mod features;
pub mod record_set;
pub mod repository;
pub mod source;

pub use error::LoadError;
pub use features::{latest, Dated, FeatureCatalog, FeatureSources};
pub use record_set::RecordSet;
pub use repository::{IndexRepository, LoadState};
pub use source::{create_source, FileSource, HttpSource, IndexSource, StaticSource};
