//! Curated feature documents: loading, latest selection and resolution

mod common;

use chrono::NaiveDate;
use common::sample_set;
use djadb_catalog::catalog::{CircleSpotlight, DailyPicks, SaleHighlights};
use djadb_catalog::config::FeaturesConfig;
use djadb_catalog::loader::features::{
    CIRCLE_FEATURES_FILE, DAILY_RECOMMENDATIONS_FILE, SALE_FEATURES_FILE,
};
use djadb_catalog::loader::{FeatureCatalog, FeatureSources, StaticSource};
use djadb_catalog::models::FeatureWork;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

fn write_features(dir: &Path) {
    let circles = json!([
        {"id": 1, "circle_id": 7, "circle_name": "さくら堂", "slug": "sakura-do",
         "headline": "さくら堂の作品を2本紹介", "description": "学園もの中心",
         "works": [{"work_id": 1, "page_count": 32}, {"work_id": 999}, {"work_id": 4}]},
        {"id": 2, "circle_name": "Snow Works", "slug": "snow-works",
         "headline": "Snow Works、全力で推せる！", "works": [{"work_id": 3}]},
        {"id": 3, "headline": "no slug"}
    ]);
    let daily = json!([
        {"id": 10, "target_date": "2024-05-31", "headline": "昨日の3本",
         "works": [{"work_id": 5}]},
        {"id": 11, "target_date": "2024-06-01", "headline": "今日の3本",
         "works": [{"work_id": 2, "circle_name": "ひまわり工房"}, {"work_id": 6}, {"work_id": 12345}]},
        {"id": 12, "target_date": "2024-06-01", "headline": "同日の別版", "works": []},
        {"id": 13, "target_date": "not a date", "headline": "broken"}
    ]);
    std::fs::write(dir.join(CIRCLE_FEATURES_FILE), circles.to_string()).unwrap();
    std::fs::write(dir.join(DAILY_RECOMMENDATIONS_FILE), daily.to_string()).unwrap();
    // sale_features.json intentionally absent
}

async fn load_from(dir: &Path) -> FeatureCatalog {
    let sources = FeatureSources::from_config(&FeaturesConfig {
        location: dir.to_string_lossy().into_owned(),
        timeout_secs: 5,
    })
    .unwrap();
    FeatureCatalog::load(&sources).await
}

fn ids(works: &[FeatureWork]) -> Vec<u64> {
    works.iter().map(FeatureWork::id).collect()
}

#[tokio::test]
async fn test_latest_daily_recommendation() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let features = load_from(dir.path()).await;

    assert_eq!(features.daily_recommendations().len(), 3);
    let latest = features.latest_daily_recommendation().unwrap();
    assert_eq!(latest.id, 11);
    assert_eq!(latest.target_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

    let picks = DailyPicks::resolve(latest, &sample_set());
    assert_eq!(ids(&picks.works), vec![2, 6]);
    assert!(matches!(picks.works[0], FeatureWork::OnSale { .. }));
}

#[tokio::test]
async fn test_malformed_and_missing_documents_degrade() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let features = load_from(dir.path()).await;

    // one circle feature without a slug, one daily entry with a bad date
    assert_eq!(features.dropped(), 2);
    assert_eq!(features.circle_features().len(), 2);
    assert!(features.sale_features().is_empty());
    assert!(features.latest_sale_feature().is_none());
}

#[tokio::test]
async fn test_circle_feature_by_slug() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let features = load_from(dir.path()).await;

    assert!(features.circle_feature_by_slug("unknown-circle").is_none());

    let feature = features.circle_feature_by_slug("sakura-do").unwrap();
    let spotlight = CircleSpotlight::resolve(feature, &sample_set());
    assert_eq!(spotlight.label, "さくら堂");
    assert_eq!(ids(&spotlight.works), vec![1, 4]);

    let snow = features.circle_feature_by_slug("snow-works").unwrap();
    assert_eq!(CircleSpotlight::resolve(snow, &sample_set()).label, "Snow Works");
}

#[tokio::test]
async fn test_latest_sale_feature_resolves_highlights() {
    let sale = json!([
        {"id": 1, "target_date": "2024-05-01", "main_work_id": 4},
        {"id": 2, "target_date": "2024-06-01", "main_work_id": 2,
         "sub1_work_id": 6, "sub2_work_id": 777,
         "cheapest_work_ids": [6, 888, 2], "high_rating_work_ids": null,
         "total_sale_count": 3, "max_discount_rate": 90}
    ]);
    let sources = FeatureSources {
        circle_features: Arc::new(StaticSource::new("[]")),
        daily_recommendations: Arc::new(StaticSource::new("{}")),
        sale_features: Arc::new(StaticSource::new(sale.to_string())),
    };
    let features = FeatureCatalog::load(&sources).await;
    assert!(features.daily_recommendations().is_empty());

    let latest = features.latest_sale_feature().unwrap();
    assert_eq!(latest.id, 2);

    let highlights = SaleHighlights::resolve(latest, &sample_set());
    assert_eq!(highlights.main.as_ref().map(FeatureWork::id), Some(2));
    assert_eq!(ids(&highlights.sub), vec![6]);
    assert_eq!(ids(&highlights.cheapest), vec![6, 2]);
    assert!(highlights.high_rating.is_empty());
}

#[tokio::test]
async fn test_http_feature_documents() {
    let mut server = mockito::Server::new_async().await;
    let _circles = server
        .mock("GET", "/data/circle_features.json")
        .with_status(200)
        .with_body(r#"[{"id": 1, "slug": "a", "headline": "A特集"}]"#)
        .create_async()
        .await;
    let _daily = server
        .mock("GET", "/data/daily_recommendations.json")
        .with_status(500)
        .create_async()
        .await;
    let _sale = server
        .mock("GET", "/data/sale_features.json")
        .with_status(404)
        .create_async()
        .await;

    let sources = FeatureSources::from_config(&FeaturesConfig {
        location: format!("{}/data/", server.url()),
        timeout_secs: 5,
    })
    .unwrap();
    let features = FeatureCatalog::load(&sources).await;

    assert_eq!(features.circle_features().len(), 1);
    assert!(features.latest_daily_recommendation().is_none());
    assert!(features.sale_features().is_empty());
}
