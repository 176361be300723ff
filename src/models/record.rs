//! The flat, denormalized search record published in the index document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One searchable projection of a catalog work.
///
/// Field names on the wire are abbreviated (`t` for title, `p` for price, ...).
/// Absent and `null` optional fields both decode to `None`; zero values are
/// kept as `Some(0)` so "no rating" and "rated zero" stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Work identifier, unique within an index document
    pub id: u64,

    /// Display title
    #[serde(rename = "t")]
    pub title: String,

    /// Publishing circle
    #[serde(rename = "c", default, deserialize_with = "null_as_default")]
    pub circle_name: String,

    /// Creator name (may be empty)
    #[serde(rename = "a", default, deserialize_with = "null_as_default")]
    pub author_name: String,

    /// Genre labels
    #[serde(rename = "tg", default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Price shown and sorted on (post-discount while on sale)
    #[serde(rename = "p")]
    pub current_price: u32,

    /// Pre-discount reference price
    #[serde(rename = "dp")]
    pub list_price: u32,

    /// Percentage off, present only while on sale
    #[serde(rename = "dr", default)]
    pub discount_rate: Option<u32>,

    #[serde(rename = "img", default, deserialize_with = "null_as_default")]
    pub thumbnail_url: String,

    #[serde(rename = "pg", default, deserialize_with = "null_as_default")]
    pub page_count: u32,

    /// 0.0 - 5.0
    #[serde(rename = "rt", default)]
    pub rating: Option<f64>,

    #[serde(rename = "rc", default)]
    pub review_count: Option<u32>,

    /// Popularity rank, lower is more popular
    #[serde(rename = "rk", default)]
    pub rank: Option<u32>,

    /// End of the running sale
    #[serde(rename = "saleEnd", default, with = "sale_end_format")]
    pub sale_end: Option<DateTime<Utc>>,
}

impl SearchRecord {
    /// Create a regular-priced record with empty optional fields
    pub fn new(id: u64, title: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            title: title.into(),
            circle_name: String::new(),
            author_name: String::new(),
            tags: Vec::new(),
            current_price: price,
            list_price: price,
            discount_rate: None,
            thumbnail_url: String::new(),
            page_count: 0,
            rating: None,
            review_count: None,
            rank: None,
            sale_end: None,
        }
    }

    pub fn with_circle(mut self, circle: impl Into<String>) -> Self {
        self.circle_name = circle.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author_name = author.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Put the record on sale: `current_price` becomes the sale price and the
    /// previous price is kept as `list_price`.
    pub fn with_sale(mut self, sale_price: u32, discount_rate: u32) -> Self {
        self.list_price = self.list_price.max(sale_price);
        self.current_price = sale_price;
        self.discount_rate = Some(discount_rate);
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: Option<u32>) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn with_sale_end(mut self, end: DateTime<Utc>) -> Self {
        self.sale_end = Some(end);
        self
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.page_count = pages;
        self
    }

    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_review_count(mut self, count: Option<u32>) -> Self {
        self.review_count = count;
        self
    }

    pub fn with_rank(mut self, rank: Option<u32>) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    /// On sale when a discount is present and non-zero
    pub fn is_on_sale(&self) -> bool {
        matches!(self.discount_rate, Some(rate) if rate > 0)
    }

    /// Whether the rank qualifies for a ranking badge (top 100)
    pub fn has_rank_badge(&self) -> bool {
        matches!(self.rank, Some(rank) if rank > 0 && rank <= 100)
    }

    /// Price invariant: `current_price <= list_price` on sale, equal otherwise
    pub fn price_is_consistent(&self) -> bool {
        if self.is_on_sale() {
            self.current_price <= self.list_price
        } else {
            self.current_price == self.list_price
        }
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a storefront timestamp.
///
/// RFC 3339 values keep their offset; naive values are Asia/Tokyo local time.
pub fn parse_storefront_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    chrono_tz::Asia::Tokyo
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

mod sale_end_format {
    use super::parse_storefront_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let parsed = raw.as_deref().and_then(parse_storefront_timestamp);
        if parsed.is_none() {
            if let Some(raw) = raw.as_deref().filter(|s| !s.trim().is_empty()) {
                tracing::debug!(value = raw, "Ignoring unparseable saleEnd");
            }
        }
        Ok(parsed)
    }
}
