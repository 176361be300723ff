//! Catalog shapes read from the JSON data cache.

use serde::{Deserialize, Serialize};

const STOREFRONT_DETAIL_BASE: &str = "https://www.dmm.co.jp/dc/doujin/-/detail/=/cid=";

/// A catalog work as exported by the data cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub id: u64,

    /// Storefront content id, used for affiliate links
    #[serde(default)]
    pub fanza_content_id: String,

    pub title: String,

    /// List price
    #[serde(default)]
    pub price: u32,

    #[serde(default)]
    pub sale_price: Option<u32>,

    #[serde(default)]
    pub discount_rate: Option<u32>,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub circle_id: Option<u64>,

    #[serde(default)]
    pub circle_name: Option<String>,

    #[serde(default)]
    pub author_name: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: Option<u32>,

    #[serde(default)]
    pub page_count: Option<u32>,

    #[serde(default)]
    pub ranking: Option<u32>,

    #[serde(default)]
    pub sale_end_date: Option<String>,

    #[serde(default)]
    pub genre_tags: Option<Vec<String>>,
}

impl Work {
    /// Affiliate detail page on the storefront
    pub fn storefront_url(&self) -> Option<String> {
        storefront_url(&self.fanza_content_id)
    }
}

/// Build the storefront detail URL for a content id
pub fn storefront_url(content_id: &str) -> Option<String> {
    let content_id = content_id.trim();
    if content_id.is_empty() {
        None
    } else {
        Some(format!("{STOREFRONT_DETAIL_BASE}{content_id}/"))
    }
}

/// A publishing circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub work_count: u32,
}
