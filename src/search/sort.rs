//! Named, stable sort strategies over search records

use crate::models::SearchRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString};

/// Ordering applied to the filtered result set.
///
/// Parses the URL tokens used by the listing and sale pages; several
/// strategies accept an alias.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SortStrategy {
    /// Rank ascending, unranked last
    #[default]
    #[strum(to_string = "rank")]
    Rank,

    /// Id descending
    #[strum(to_string = "new", serialize = "newest")]
    Newest,

    /// Discount descending, no discount counts as 0
    #[strum(to_string = "discount", serialize = "discountRate", serialize = "discount_rate")]
    DiscountRate,

    /// Current price ascending
    #[strum(to_string = "price", serialize = "price_asc")]
    Price,

    /// Rating descending, unrated counts as 0
    #[strum(to_string = "rating")]
    Rating,

    /// Review count descending, none counts as 0
    #[strum(to_string = "review_count", serialize = "reviewCount")]
    ReviewCount,

    /// Sale end ascending, no end date last
    #[strum(to_string = "deadline", serialize = "deadlineSoonest")]
    DeadlineSoonest,
}

impl SortStrategy {
    /// Parse a URL token, falling back to [`SortStrategy::Rank`]
    pub fn from_token(token: &str) -> Self {
        token.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(token, "Unknown sort token, using default");
            Self::default()
        })
    }

    /// Human readable label used by the listing pages
    pub fn label(&self) -> &'static str {
        match self {
            SortStrategy::Rank => "ランキング順",
            SortStrategy::Newest => "新着順",
            SortStrategy::DiscountRate => "割引率順",
            SortStrategy::Price => "価格が安い順",
            SortStrategy::Rating => "評価順",
            SortStrategy::ReviewCount => "レビュー数順",
            SortStrategy::DeadlineSoonest => "終了が近い順",
        }
    }

    /// Compare two records under this strategy
    pub fn compare(&self, a: &SearchRecord, b: &SearchRecord) -> Ordering {
        match self {
            SortStrategy::Rank => missing_last(a.rank, b.rank),
            SortStrategy::Newest => b.id.cmp(&a.id),
            SortStrategy::DiscountRate => b
                .discount_rate
                .unwrap_or(0)
                .cmp(&a.discount_rate.unwrap_or(0)),
            SortStrategy::Price => a.current_price.cmp(&b.current_price),
            SortStrategy::Rating => b
                .rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0)),
            SortStrategy::ReviewCount => b
                .review_count
                .unwrap_or(0)
                .cmp(&a.review_count.unwrap_or(0)),
            SortStrategy::DeadlineSoonest => missing_last(a.sale_end, b.sale_end),
        }
    }
}

/// Ascending, with `None` treated as +infinity
fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of arbitrary items that wrap a record
pub fn sort_by_strategy<T, F>(items: &mut [T], strategy: SortStrategy, record: F)
where
    F: Fn(&T) -> &SearchRecord,
{
    items.sort_by(|a, b| strategy.compare(record(a), record(b)));
}

/// Stable sort of record references
pub fn sort_records(records: &mut [&SearchRecord], strategy: SortStrategy) {
    sort_by_strategy(records, strategy, |r| *r);
}
