//! Works shown on curated feature pages, and the curated feature documents.

use crate::models::record::null_as_default;
use crate::models::SearchRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Display fields shared by every featured work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSummary {
    pub id: u64,
    pub title: String,
    pub circle_name: String,
    pub thumbnail_url: String,
    pub price: u32,
    pub page_count: u32,
    pub rating: Option<f64>,
    pub rank: Option<u32>,
}

/// Sale-only details; only reachable through [`FeatureWork::OnSale`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInfo {
    pub list_price: u32,
    pub discount_rate: NonZeroU32,
    pub ends_at: Option<DateTime<Utc>>,
}

/// A featured work, either at its regular price or on sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureWork {
    Regular(WorkSummary),
    OnSale { work: WorkSummary, sale: SaleInfo },
}

impl FeatureWork {
    pub fn summary(&self) -> &WorkSummary {
        match self {
            FeatureWork::Regular(work) => work,
            FeatureWork::OnSale { work, .. } => work,
        }
    }

    pub fn id(&self) -> u64 {
        self.summary().id
    }

    pub fn sale(&self) -> Option<&SaleInfo> {
        match self {
            FeatureWork::Regular(_) => None,
            FeatureWork::OnSale { sale, .. } => Some(sale),
        }
    }
}

impl From<&SearchRecord> for FeatureWork {
    fn from(record: &SearchRecord) -> Self {
        let work = WorkSummary {
            id: record.id,
            title: record.title.clone(),
            circle_name: record.circle_name.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            price: record.current_price,
            page_count: record.page_count,
            rating: record.rating,
            rank: record.rank,
        };

        match record.discount_rate.and_then(NonZeroU32::new) {
            Some(discount_rate) => FeatureWork::OnSale {
                work,
                sale: SaleInfo {
                    list_price: record.list_price,
                    discount_rate,
                    ends_at: record.sale_end,
                },
            },
            None => FeatureWork::Regular(work),
        }
    }
}

/// Daily sale feature document (one per target date)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleFeature {
    pub id: u64,
    pub target_date: Option<NaiveDate>,

    pub main_work_id: Option<u64>,
    pub main_headline: Option<String>,
    pub main_reason: Option<String>,

    pub sub1_work_id: Option<u64>,
    pub sub1_one_liner: Option<String>,
    pub sub2_work_id: Option<u64>,
    pub sub2_one_liner: Option<String>,

    #[serde(default)]
    pub cheapest_work_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub high_discount_work_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub high_rating_work_ids: Option<Vec<u64>>,

    #[serde(default)]
    pub total_sale_count: u32,
    #[serde(default)]
    pub max_discount_rate: u32,
}

/// A work entry inside a curated feature document.
///
/// Circle features add `page_count`; daily recommendations add the circle and
/// author names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedWork {
    pub work_id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price: u32,

    #[serde(default)]
    pub rating: Option<f64>,

    /// Editorial blurb
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub target_audience: String,

    #[serde(default)]
    pub page_count: Option<u32>,

    #[serde(default)]
    pub circle_name: Option<String>,

    #[serde(default)]
    pub author_name: Option<String>,
}

/// Circle spotlight document, addressed by `slug`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleFeature {
    pub id: u64,

    #[serde(default)]
    pub circle_id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub circle_name: String,

    pub slug: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_sales: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub work_count: u32,

    #[serde(default)]
    pub avg_rating: Option<f64>,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub works: Vec<CuratedWork>,
}

impl CircleFeature {
    pub fn work_ids(&self) -> Vec<u64> {
        self.works.iter().map(|w| w.work_id).collect()
    }
}

/// Daily recommendation document (one per target date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecommendation {
    pub id: u64,
    pub target_date: NaiveDate,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_works_count: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub works: Vec<CuratedWork>,
}

impl DailyRecommendation {
    pub fn work_ids(&self) -> Vec<u64> {
        self.works.iter().map(|w| w.work_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_record_has_no_sale_info() {
        let record = SearchRecord::new(1, "通常作品", 770).with_discount_rate(Some(0));
        let feature = FeatureWork::from(&record);

        assert!(matches!(feature, FeatureWork::Regular(_)));
        assert!(feature.sale().is_none());
        assert_eq!(feature.summary().price, 770);
    }

    #[test]
    fn test_sale_record_exposes_sale_info() {
        let record = SearchRecord::new(2, "セール作品", 1100).with_sale(550, 50);
        let feature = FeatureWork::from(&record);

        match feature {
            FeatureWork::OnSale { work, sale } => {
                assert_eq!(work.price, 550);
                assert_eq!(sale.list_price, 1100);
                assert_eq!(sale.discount_rate.get(), 50);
            }
            FeatureWork::Regular(_) => panic!("expected an on-sale work"),
        }
    }

    #[test]
    fn test_decode_circle_feature_with_nulls() {
        let feature: CircleFeature = serde_json::from_value(serde_json::json!({
            "id": 3,
            "circle_id": 12,
            "circle_name": null,
            "slug": "sakura-do",
            "headline": "さくら堂の作品を紹介",
            "description": null,
            "avg_rating": 4.2,
            "thumbnail_url": null,
            "works": [
                {"work_id": 10, "title": "a", "price": 880, "rating": 4.5,
                 "reason": "r", "target_audience": "t", "page_count": 32},
                {"work_id": 11, "reason": null}
            ]
        }))
        .unwrap();

        assert_eq!(feature.circle_name, "");
        assert_eq!(feature.description, "");
        assert_eq!(feature.work_ids(), vec![10, 11]);
        assert_eq!(feature.works[0].page_count, Some(32));
        assert_eq!(feature.works[1].reason, "");
    }

    #[test]
    fn test_daily_recommendation_requires_date() {
        let ok = serde_json::from_value::<DailyRecommendation>(serde_json::json!({
            "id": 1, "target_date": "2024-06-01", "headline": "今日の3本",
            "works": [{"work_id": 5, "circle_name": "さくら堂", "author_name": null}]
        }))
        .unwrap();
        assert_eq!(ok.target_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(ok.works[0].circle_name.as_deref(), Some("さくら堂"));

        assert!(serde_json::from_value::<DailyRecommendation>(serde_json::json!({
            "id": 2, "headline": "no date"
        }))
        .is_err());
    }
}
