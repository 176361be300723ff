//! End to end: catalog data cache -> index document -> loader

use djadb_catalog::config::ProducerConfig;
use djadb_catalog::loader::{FileSource, IndexRepository, LoadState, RecordSet};
use djadb_catalog::producer::{self, UNKNOWN_CIRCLE};
use djadb_catalog::search::{SearchConfig, SearchSession, SortStrategy};
use serde_json::json;
use std::sync::Arc;

fn write_catalog(dir: &std::path::Path) {
    let works = json!([
        {"id": 100, "title": "放課後の秘密", "price": 880, "ranking": 2, "circle_id": 1,
         "author_name": "桜井", "page_count": 44, "rating": 4.5, "review_count": 10,
         "genre_tags": ["制服", "学園もの"]},
        {"id": 101, "title": "夏休みの思い出", "price": 1320, "sale_price": 660, "discount_rate": 50,
         "sale_end_date": "2024-06-30 23:59:59", "ranking": 1, "circle_id": 2},
        {"id": 102, "title": "触手の森", "price": 500, "ranking": 0, "circle_name": "直書き"},
        {"id": 103, "title": "新作", "price": 300, "rating": 0, "review_count": 0}
    ]);
    let circles = json!([
        {"id": 1, "name": "さくら堂", "work_count": 1},
        {"id": 2, "name": "ひまわり工房", "work_count": 1}
    ]);
    std::fs::write(dir.join(producer::WORKS_FILE), works.to_string()).unwrap();
    std::fs::write(dir.join(producer::CIRCLES_FILE), circles.to_string()).unwrap();
}

#[tokio::test]
async fn test_generated_index_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let output = dir.path().join("public/data/search-index.json");

    let config = ProducerConfig {
        catalog_dir: dir.path().to_path_buf(),
        output: output.clone(),
    };
    assert_eq!(producer::run(&config).await.unwrap(), 4);

    let records = RecordSet::from_json(&std::fs::read(&output).unwrap()).unwrap();
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![101, 100, 103, 102]);
    assert_eq!(records.dropped(), 0);

    let sale = records.get(101).unwrap();
    assert_eq!(sale.circle_name, "ひまわり工房");
    assert_eq!(sale.current_price, 660);
    assert_eq!(sale.list_price, 1320);
    assert!(sale.sale_end.is_some());

    let regular = records.get(100).unwrap();
    assert_eq!(regular.circle_name, "さくら堂");
    assert_eq!(regular.page_count, 44);
    assert_eq!(regular.tags, vec!["制服".to_string(), "学園もの".to_string()]);

    assert_eq!(records.get(102).unwrap().circle_name, "直書き");
    assert_eq!(records.get(102).unwrap().rank, None);

    let fresh = records.get(103).unwrap();
    assert_eq!(fresh.circle_name, UNKNOWN_CIRCLE);
    assert_eq!(fresh.rating, None);
    assert_eq!(fresh.review_count, None);
}

#[tokio::test]
async fn test_session_over_generated_index() {
    let dir = tempfile::tempdir().unwrap();
    write_catalog(dir.path());
    let output = dir.path().join("search-index.json");
    producer::run(&ProducerConfig {
        catalog_dir: dir.path().to_path_buf(),
        output: output.clone(),
    })
    .await
    .unwrap();

    let repo = IndexRepository::new(Arc::new(FileSource::new(&output)));
    let mut session = SearchSession::from_repository(&repo, &SearchConfig::default(), Default::default())
        .await
        .unwrap();
    assert_eq!(
        repo.state(),
        LoadState::Loaded {
            records: 4,
            dropped: 0
        }
    );

    session.set_query("放課後");
    assert_eq!(session.result_ids(), &[100]);

    session.set_query("");
    session.set_sort(SortStrategy::Price);
    assert_eq!(session.result_ids(), &[103, 102, 101, 100]);
}

#[tokio::test]
async fn test_missing_catalog_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = producer::run(&ProducerConfig {
        catalog_dir: dir.path().join("absent"),
        output: dir.path().join("out.json"),
    })
    .await;

    assert!(result.is_err());
    assert!(!dir.path().join("out.json").exists());
}
