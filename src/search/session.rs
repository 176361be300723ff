//! Interactive search state for one listing page

use crate::loader::{IndexRepository, RecordSet};
use crate::models::SearchRecord;
use crate::search::config::SearchConfig;
use crate::search::error::SearchResult;
use crate::search::filter::PriceCeiling;
use crate::search::matcher::Matcher;
use crate::search::pager::Pager;
use crate::search::query::QueryState;
use crate::search::service::run_pipeline;
use crate::search::sort::SortStrategy;

/// Holds `{query, sort, on_sale_only, max_price}` and the derived result list.
///
/// Every setter recomputes the full pipeline and resets the visible window.
/// [`show_more`](Self::show_more) only slices the cached result.
#[derive(Debug, Clone)]
pub struct SearchSession {
    records: RecordSet,
    matcher: Matcher,
    state: QueryState,
    results: Vec<u64>,
    pager: Pager,
}

impl SearchSession {
    pub fn new(records: RecordSet, config: &SearchConfig) -> SearchResult<Self> {
        Self::with_state(records, config, QueryState::default())
    }

    /// Start from a parsed URL state
    pub fn with_state(
        records: RecordSet,
        config: &SearchConfig,
        state: QueryState,
    ) -> SearchResult<Self> {
        let config = config.clone().validated()?;
        let mut session = Self {
            records,
            matcher: Matcher::new(&config),
            state,
            results: Vec::new(),
            pager: Pager::from_config(&config),
        };
        session.recompute();
        Ok(session)
    }

    /// Wait for the repository and start a session over its records
    pub async fn from_repository(
        repository: &IndexRepository,
        config: &SearchConfig,
        state: QueryState,
    ) -> SearchResult<Self> {
        let records = repository.ensure_loaded().await;
        Self::with_state(records, config, state)
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn set_state(&mut self, state: QueryState) {
        self.state = state;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortStrategy) {
        self.state.sort = sort;
        self.recompute();
    }

    pub fn set_on_sale_only(&mut self, on_sale_only: bool) {
        self.state.on_sale_only = on_sale_only;
        self.recompute();
    }

    pub fn set_max_price(&mut self, max_price: PriceCeiling) {
        self.state.max_price = max_price;
        self.recompute();
    }

    /// Rebuild the result list from the current state
    pub fn recompute(&mut self) {
        let filter = self.state.filter();
        self.results = run_pipeline(
            &self.matcher,
            self.records.records(),
            &self.state.query,
            &filter,
            self.state.sort,
        )
        .into_iter()
        .map(|hit| hit.record.id)
        .collect();
        self.pager.reset();

        tracing::debug!(
            query = %self.state.query,
            sort = %self.state.sort,
            on_sale_only = self.state.on_sale_only,
            max_price = %self.state.max_price,
            total = self.results.len(),
            "Session recomputed"
        );
    }

    /// Ids of every result, in display order
    pub fn result_ids(&self) -> &[u64] {
        &self.results
    }

    /// Every result, in display order
    pub fn results(&self) -> Vec<&SearchRecord> {
        self.resolve(&self.results)
    }

    /// Results inside the visible window
    pub fn visible(&self) -> Vec<&SearchRecord> {
        self.resolve(self.pager.window(&self.results))
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.total())
    }

    pub fn remaining(&self) -> usize {
        self.pager.remaining(self.total())
    }

    /// Whether results exist beyond the display cap
    pub fn is_capped(&self) -> bool {
        self.pager.is_capped(self.total())
    }

    /// Extend the visible window; returns how many results became visible
    pub fn show_more(&mut self) -> usize {
        self.pager.show_more(self.results.len())
    }

    /// Whether the underlying collection holds anything at all
    pub fn catalog_is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn resolve(&self, ids: &[u64]) -> Vec<&SearchRecord> {
        ids.iter().filter_map(|&id| self.records.get(id)).collect()
    }
}
