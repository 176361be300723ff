//! Tests for the interactive search session

mod common;

use common::{ids, sample_repository, sample_set};
use djadb_catalog::loader::RecordSet;
use djadb_catalog::models::SearchRecord;
use djadb_catalog::search::*;

fn large_catalog(n: u64) -> RecordSet {
    RecordSet::from_records(
        (1..=n)
            .map(|id| {
                SearchRecord::new(id, format!("作品{id}"), 100 + (id as u32 % 20) * 100)
                    .with_rank(if id % 4 == 0 { None } else { Some(id as u32) })
            })
            .collect(),
    )
}

#[test]
fn test_default_state_lists_everything_by_rank() {
    let session = SearchSession::new(sample_set(), &SearchConfig::default()).unwrap();
    assert_eq!(session.state(), &QueryState::default());
    assert_eq!(ids(session.visible()), vec![3, 4, 1, 6, 5, 2]);
    assert!(!session.has_more());
}

#[test]
fn test_state_changes_recompute_in_pipeline_order() {
    let mut session = SearchSession::new(sample_set(), &SearchConfig::default()).unwrap();

    session.set_query("の");
    let matched = session.result_ids().to_vec();
    assert!(!matched.is_empty());

    session.set_on_sale_only(true);
    assert!(session.results().iter().all(|r| r.is_on_sale()));
    assert!(session.result_ids().iter().all(|id| matched.contains(id)));

    session.set_sort(SortStrategy::Price);
    let prices: Vec<u32> = session.results().iter().map(|r| r.current_price).collect();
    let mut sorted = prices.clone();
    sorted.sort();
    assert_eq!(prices, sorted);

    session.set_max_price(PriceCeiling::Yen100);
    assert_eq!(session.result_ids(), &[6]);

    session.set_query("");
    session.set_on_sale_only(false);
    session.set_max_price(PriceCeiling::NoLimit);
    assert_eq!(session.total(), 6);
}

#[test]
fn test_url_state_seeds_session() {
    let state = QueryState::from_params([("sort", "deadline"), ("sale", "1"), ("max", "bogus")]);
    let session = SearchSession::with_state(sample_set(), &SearchConfig::default(), state).unwrap();
    assert_eq!(session.result_ids(), &[4, 2, 6]);
}

#[test]
fn test_show_more_pages_up_to_display_cap() {
    let mut session = SearchSession::new(large_catalog(400), &SearchConfig::default()).unwrap();
    assert_eq!(session.total(), 400);
    assert_eq!(session.visible().len(), 50);

    let all = session.result_ids().to_vec();
    let mut steps = 0;
    while session.has_more() {
        let before = session.visible().len();
        let added = session.show_more();
        assert_eq!(session.visible().len(), before + added);
        steps += 1;
    }

    assert_eq!(steps, 5);
    assert_eq!(session.visible().len(), 300);
    assert!(session.is_capped());
    assert_eq!(ids(session.visible()), all[..300].to_vec());
    // paging never reorders
    assert_eq!(session.result_ids(), &all[..]);
}

#[test]
fn test_setter_resets_visible_window() {
    let mut session = SearchSession::new(large_catalog(200), &SearchConfig::default()).unwrap();
    session.show_more();
    session.show_more();
    assert_eq!(session.visible().len(), 150);

    session.set_sort(SortStrategy::Newest);
    assert_eq!(session.visible().len(), 50);
    assert_eq!(session.visible()[0].id, 200);
    assert_eq!(session.remaining(), 150);
}

#[test]
fn test_recompute_twice_is_identical() {
    let mut session = SearchSession::new(large_catalog(120), &SearchConfig::default()).unwrap();
    session.set_query("作品1");
    let first = serde_json::to_string(&session.results()).unwrap();
    session.recompute();
    let second = serde_json::to_string(&session.results()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_custom_page_sizes() {
    let config = SearchConfigBuilder::new()
        .initial_page_size(10)
        .page_step(5)
        .max_display_results(22)
        .build()
        .unwrap();
    let mut session = SearchSession::new(large_catalog(100), &config).unwrap();

    assert_eq!(session.visible().len(), 10);
    assert_eq!(session.show_more(), 5);
    assert_eq!(session.show_more(), 5);
    assert_eq!(session.show_more(), 2);
    assert_eq!(session.show_more(), 0);
    assert!(session.is_capped());
}

#[tokio::test]
async fn test_session_from_repository() {
    let repo = sample_repository();
    let session = SearchSession::from_repository(&repo, &SearchConfig::default(), QueryState::default())
        .await
        .unwrap();
    assert_eq!(session.total(), 6);
    assert!(!session.catalog_is_empty());
}

#[test]
fn test_empty_catalog_session() {
    let session = SearchSession::new(RecordSet::empty(), &SearchConfig::default()).unwrap();
    assert_eq!(session.total(), 0);
    assert!(session.visible().is_empty());
    assert!(session.catalog_is_empty());
    assert!(!session.has_more());
}
