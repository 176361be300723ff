//! Exact, composable record predicates

use crate::models::SearchRecord;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Fixed set of price ceilings offered by the listing pages
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum PriceCeiling {
    #[default]
    #[strum(serialize = "all")]
    #[serde(rename = "all")]
    NoLimit,

    #[strum(serialize = "100")]
    #[serde(rename = "100")]
    Yen100,

    #[strum(serialize = "300")]
    #[serde(rename = "300")]
    Yen300,

    #[strum(serialize = "500")]
    #[serde(rename = "500")]
    Yen500,

    #[strum(serialize = "1000")]
    #[serde(rename = "1000")]
    Yen1000,

    #[strum(serialize = "1500")]
    #[serde(rename = "1500")]
    Yen1500,

    #[strum(serialize = "2000")]
    #[serde(rename = "2000")]
    Yen2000,
}

impl PriceCeiling {
    /// Parse a URL token, falling back to no limit
    pub fn from_token(token: &str) -> Self {
        token.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(token, "Unknown price ceiling token, using no limit");
            Self::default()
        })
    }

    /// Ceiling in yen, `None` for no limit
    pub fn limit(&self) -> Option<u32> {
        match self {
            PriceCeiling::NoLimit => None,
            PriceCeiling::Yen100 => Some(100),
            PriceCeiling::Yen300 => Some(300),
            PriceCeiling::Yen500 => Some(500),
            PriceCeiling::Yen1000 => Some(1000),
            PriceCeiling::Yen1500 => Some(1500),
            PriceCeiling::Yen2000 => Some(2000),
        }
    }

    pub fn label(&self) -> String {
        match self.limit() {
            None => "指定なし".to_string(),
            Some(limit) => format!("〜{}円", crate::derived::group_thousands(limit)),
        }
    }

    pub fn admits(&self, price: u32) -> bool {
        self.limit().map_or(true, |limit| price <= limit)
    }
}

/// Conjunction of exact predicates; every field is independent, so the order
/// in which they are applied never changes the result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Keep only records with a discount greater than zero
    pub on_sale_only: bool,

    /// Keep only records whose current price is within the ceiling
    pub max_price: PriceCeiling,

    /// Keep only records carrying this exact tag
    pub tag: Option<String>,

    /// Keep only records from this exact circle
    pub circle: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sale_only(mut self, on_sale_only: bool) -> Self {
        self.on_sale_only = on_sale_only;
        self
    }

    pub fn max_price(mut self, max_price: PriceCeiling) -> Self {
        self.max_price = max_price;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn circle(mut self, circle: impl Into<String>) -> Self {
        self.circle = Some(circle.into());
        self
    }

    /// No predicate is active
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn accepts(&self, record: &SearchRecord) -> bool {
        if self.on_sale_only && !record.is_on_sale() {
            return false;
        }
        if !self.max_price.admits(record.current_price) {
            return false;
        }
        if let Some(ref tag) = self.tag {
            if !record.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(ref circle) = self.circle {
            if record.circle_name != *circle {
                return false;
            }
        }
        true
    }

    /// Keep accepted records, preserving input order
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a SearchRecord>
    where
        I: IntoIterator<Item = &'a SearchRecord>,
    {
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }
}
