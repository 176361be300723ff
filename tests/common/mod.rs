//! Common test fixtures
//!
//! A small catalog covering every optional field combination, plus helpers for
//! serving it through the loader and for reading Prometheus output.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use djadb_catalog::loader::{IndexRepository, RecordSet, StaticSource};
use djadb_catalog::models::SearchRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed "current instant" for time dependent assertions
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Six works in producer order (rank ascending, unranked newest first)
pub fn sample_records() -> Vec<SearchRecord> {
    vec![
        SearchRecord::new(3, "Winter Romance", 1100)
            .with_circle("Snow Works")
            .with_author("Yuki")
            .with_tags(vec!["巨乳"])
            .with_rank(Some(1))
            .with_rating(Some(4.8))
            .with_review_count(Some(100)),
        SearchRecord::new(4, "Summer Vacation", 2200)
            .with_circle("さくら堂")
            .with_author("Taro")
            .with_tags(vec!["巨乳", "制服"])
            .with_sale(1540, 30)
            .with_sale_end(now() + Duration::hours(5))
            .with_pages(60)
            .with_rank(Some(2))
            .with_rating(Some(4.0))
            .with_review_count(Some(5)),
        SearchRecord::new(1, "放課後の秘密", 880)
            .with_circle("さくら堂")
            .with_author("桜井")
            .with_tags(vec!["制服", "学園もの"])
            .with_pages(32)
            .with_rank(Some(3))
            .with_rating(Some(4.5))
            .with_review_count(Some(20)),
        SearchRecord::new(6, "触手の森", 1000)
            .with_circle("ひまわり工房")
            .with_author("森田")
            .with_tags(vec!["触手"])
            .with_sale(100, 90)
            .with_sale_end(now() + Duration::days(10))
            .with_rank(Some(5)),
        SearchRecord::new(5, "放課後ラプソディ", 550)
            .with_circle("Snow Works")
            .with_tags(vec!["学園もの"])
            .with_discount_rate(Some(0))
            .with_rating(Some(0.0)),
        SearchRecord::new(2, "夏休みの思い出", 1320)
            .with_circle("ひまわり工房")
            .with_tags(vec!["ラブラブ・あまあま"])
            .with_sale(660, 50)
            .with_sale_end(now() + Duration::days(2)),
    ]
}

pub fn sample_set() -> RecordSet {
    RecordSet::from_records(sample_records())
}

/// The sample catalog as an index document
pub fn sample_document() -> Vec<u8> {
    serde_json::to_vec(&sample_records()).unwrap()
}

/// Repository that decodes the sample document on first use
pub fn sample_repository() -> Arc<IndexRepository> {
    Arc::new(IndexRepository::new(Arc::new(StaticSource::new(
        sample_document(),
    ))))
}

pub fn ids<'a, I>(records: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    records.into_iter().map(|r| r.id).collect()
}

/// Helper function to parse Prometheus exposition format
/// Returns a map of metric lines for easy assertion
pub fn parse_prometheus_output(output: &str) -> HashMap<String, Vec<String>> {
    let mut metrics = HashMap::new();
    let mut current_metric = String::new();

    for line in output.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        // HELP and TYPE comments
        if line.starts_with("# HELP") || line.starts_with("# TYPE") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                current_metric = parts[2].to_string();
                metrics
                    .entry(current_metric.clone())
                    .or_insert_with(Vec::new)
                    .push(line.to_string());
            }
        }
        // Metric values
        else if !line.starts_with('#') && !current_metric.is_empty() {
            metrics
                .entry(current_metric.clone())
                .or_insert_with(Vec::new)
                .push(line.to_string());
        }
    }

    metrics
}
