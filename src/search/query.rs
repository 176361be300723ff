//! Search query building and URL parameter parsing

use crate::search::filter::{PriceCeiling, RecordFilter};
use crate::search::sort::SortStrategy;
use serde::{Deserialize, Serialize};

/// Main search query structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text; whitespace separated tokens are ANDed
    pub query: String,

    /// Filters to apply
    pub filters: RecordFilter,

    /// Sorting criteria
    pub sort: SortStrategy,

    /// Number of results to return
    pub limit: usize,

    /// Offset for pagination
    pub offset: usize,
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: RecordFilter::default(),
            sort: SortStrategy::default(),
            limit: 50,
            offset: 0,
        }
    }

    /// Set filters
    pub fn with_filters(mut self, filters: RecordFilter) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_on_sale_only(mut self, on_sale_only: bool) -> Self {
        self.filters.on_sale_only = on_sale_only;
        self
    }

    pub fn with_max_price(mut self, max_price: PriceCeiling) -> Self {
        self.filters.max_price = max_price;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.filters.tag = Some(tag.into());
        self
    }

    pub fn with_circle(mut self, circle: impl Into<String>) -> Self {
        self.filters.circle = Some(circle.into());
        self
    }

    /// Set sorting
    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = sort;
        self
    }

    /// Set limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new("")
    }
}

/// User-editable state of a search page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub query: String,
    pub sort: SortStrategy,
    pub on_sale_only: bool,
    pub max_price: PriceCeiling,
}

impl QueryState {
    /// Read state from URL query pairs (`q`, `sort`, `max`, `sale`).
    ///
    /// Unknown keys are ignored and unrecognized tokens fall back to the
    /// defaults; this never fails.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::default();
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "q" => state.query = value.to_string(),
                "sort" => state.sort = SortStrategy::from_token(value),
                "max" => state.max_price = PriceCeiling::from_token(value),
                "sale" => state.on_sale_only = parse_flag(value),
                _ => {}
            }
        }
        state
    }

    /// Read state from the query string of a page URL
    pub fn from_url(url: &reqwest::Url) -> Self {
        Self::from_params(url.query_pairs())
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::new()
            .on_sale_only(self.on_sale_only)
            .max_price(self.max_price)
    }

    /// Unpaginated query for this state
    pub fn to_search_query(&self) -> SearchQuery {
        SearchQuery::new(self.query.clone())
            .with_filters(self.filter())
            .with_sort(self.sort)
            .with_limit(usize::MAX)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_builder() {
        let query = SearchQuery::new("巨乳 制服")
            .with_on_sale_only(true)
            .with_max_price(PriceCeiling::Yen500)
            .with_sort(SortStrategy::Price)
            .with_limit(20)
            .with_offset(40);

        assert_eq!(query.query, "巨乳 制服");
        assert!(query.filters.on_sale_only);
        assert_eq!(query.filters.max_price, PriceCeiling::Yen500);
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 40);
    }

    #[test]
    fn test_state_from_params() {
        let state = QueryState::from_params([
            ("q", "放課後"),
            ("sort", "discount"),
            ("max", "1000"),
            ("sale", "1"),
            ("utm_source", "x"),
        ]);

        assert_eq!(state.query, "放課後");
        assert_eq!(state.sort, SortStrategy::DiscountRate);
        assert_eq!(state.max_price, PriceCeiling::Yen1000);
        assert!(state.on_sale_only);
    }

    #[test]
    fn test_unknown_tokens_fall_back_to_defaults() {
        let state = QueryState::from_params([("sort", "popular"), ("max", "999")]);
        assert_eq!(state.sort, SortStrategy::Rank);
        assert_eq!(state.max_price, PriceCeiling::NoLimit);
        assert!(!state.on_sale_only);
    }

    #[test]
    fn test_state_from_url_decodes_percent_encoding() {
        let url = reqwest::Url::parse(
            "https://example.com/search?q=%E5%88%B6%E6%9C%8D+%E5%B7%A8%E4%B9%B3&sort=new",
        )
        .unwrap();
        let state = QueryState::from_url(&url);

        assert_eq!(state.query, "制服 巨乳");
        assert_eq!(state.sort, SortStrategy::Newest);
    }
}
