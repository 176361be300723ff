//! Query execution over the loaded index

use crate::loader::IndexRepository;
use crate::metrics::{SEARCH_DURATION_SECONDS, SEARCH_QUERIES_TOTAL};
use crate::models::SearchRecord;
use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::filter::RecordFilter;
use crate::search::matcher::{MatchHit, Matcher};
use crate::search::query::SearchQuery;
use crate::search::sort::{sort_by_strategy, SortStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// A single search result hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matched record
    pub record: SearchRecord,

    /// Match relevance, zero for an empty query
    pub score: f64,
}

/// Search response with results and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Search results
    pub hits: Vec<SearchHit>,

    /// Number of hits before pagination, capped at `max_results`
    pub total_hits: usize,

    /// Search query that was executed
    pub query: String,

    /// Search execution time in milliseconds
    pub search_time_ms: u64,

    /// Offset used for pagination
    pub offset: usize,

    /// Effective page size after clamping to `max_results`
    pub limit: usize,
}

/// `Sort(Filter(Match(records, query)))`.
///
/// Sorting only reorders; it never changes which records are included. With
/// equal sort keys the match relevance order is kept.
pub fn run_pipeline<'a>(
    matcher: &Matcher,
    records: &'a [SearchRecord],
    query: &str,
    filter: &RecordFilter,
    sort: SortStrategy,
) -> Vec<MatchHit<'a>> {
    let mut hits: Vec<MatchHit<'a>> = matcher
        .search(records, query)
        .into_iter()
        .filter(|hit| filter.accepts(hit.record))
        .collect();
    sort_by_strategy(&mut hits, sort, |hit| hit.record);
    hits
}

/// Main search service
pub struct SearchService {
    /// Record collection
    repository: Arc<IndexRepository>,

    matcher: Matcher,

    /// Configuration
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service
    pub fn new(repository: Arc<IndexRepository>, config: SearchConfig) -> SearchResult<Self> {
        let config = config.validated()?;
        Ok(Self {
            repository,
            matcher: Matcher::new(&config),
            config,
        })
    }

    /// Search the catalog
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<SearchResponse> {
        let start_time = Instant::now();
        let records = self.repository.ensure_loaded().await;

        let hits = run_pipeline(
            &self.matcher,
            records.records(),
            &query.query,
            &query.filters,
            query.sort,
        );

        let total_hits = hits.len().min(self.config.max_results);
        let limit = query.limit.min(self.config.max_results);
        let hits: Vec<SearchHit> = hits
            .into_iter()
            .take(total_hits)
            .skip(query.offset)
            .take(limit)
            .map(|hit| SearchHit {
                record: hit.record.clone(),
                score: hit.score,
            })
            .collect();

        let elapsed = start_time.elapsed();
        let sort_label = query.sort.to_string();
        SEARCH_QUERIES_TOTAL
            .with_label_values(&[sort_label.as_str()])
            .inc();
        SEARCH_DURATION_SECONDS.observe(elapsed.as_secs_f64());

        tracing::debug!(
            query = %query.query,
            sort = %query.sort,
            total_hits,
            returned = hits.len(),
            "Search executed"
        );

        Ok(SearchResponse {
            hits,
            total_hits,
            query: query.query.clone(),
            search_time_ms: elapsed.as_millis() as u64,
            offset: query.offset,
            limit,
        })
    }

    /// Look up a single record by id
    pub async fn get(&self, id: u64) -> SearchResult<SearchRecord> {
        self.repository
            .ensure_loaded()
            .await
            .get(id)
            .cloned()
            .ok_or(SearchError::RecordNotFound(id))
    }

    pub fn repository(&self) -> &Arc<IndexRepository> {
        &self.repository
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
