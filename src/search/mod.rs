//! In-memory catalog search
//!
//! This module turns the loaded record collection into listing pages:
//!
//! - **Fuzzy Matching**: weighted, typo tolerant matching over title, author, circle and tags
//! - **Exact Filters**: on-sale only, price ceiling, tag and circle predicates
//! - **Stable Sorting**: rank, newest, discount, price, rating, review count, deadline
//! - **Sessions**: URL driven query state with "show more" pagination
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │      SearchService / SearchSession              │
//! │  - search()  - get()  - set_*()  - show_more()  │
//! └─────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────────┐
//! │   Sort( Filter( Match(records, query) ) )       │
//! │   Matcher → RecordFilter → SortStrategy         │
//! └─────────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────────┐
//! │      IndexRepository (loaded once, shared)      │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use djadb_catalog::loader::{FileSource, IndexRepository};
//! use djadb_catalog::search::{PriceCeiling, SearchConfig, SearchQuery, SearchService, SortStrategy};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = Arc::new(IndexRepository::new(Arc::new(FileSource::new(
//!         "public/data/search-index.json",
//!     ))));
//!     let search = SearchService::new(repo, SearchConfig::default())?;
//!
//!     let query = SearchQuery::new("放課後")
//!         .with_max_price(PriceCeiling::Yen1000)
//!         .with_sort(SortStrategy::Rating)
//!         .with_limit(20);
//!
//!     let results = search.search(&query).await?;
//!     println!("Found {} works", results.total_hits);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod filter;
mod matcher;
mod pager;
mod query;
mod service;
mod session;
mod sort;

pub use config::{FieldWeights, SearchConfig, SearchConfigBuilder};
pub use error::{SearchError, SearchResult};
pub use filter::{PriceCeiling, RecordFilter};
pub use matcher::{approximate_distance, normalize, tokenize, MatchHit, Matcher};
pub use pager::Pager;
pub use query::{QueryState, SearchQuery};
pub use service::{run_pipeline, SearchHit, SearchResponse, SearchService};
pub use session::SearchSession;
pub use sort::{sort_by_strategy, sort_records, SortStrategy};
