//! Builds the search index document from the catalog data cache.
//!
//! Input is `works.json` and `circles.json` in the catalog directory; output
//! is a pretty-printed JSON array of [`SearchRecord`]s in default display
//! order (rank ascending, then unranked newest first).

use crate::config::ProducerConfig;
use crate::error::{AppError, Result};
use crate::models::{parse_storefront_timestamp, Circle, SearchRecord, Work};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// Circle name used when neither the work nor the circle table has one
pub const UNKNOWN_CIRCLE: &str = "不明";

pub const WORKS_FILE: &str = "works.json";
pub const CIRCLES_FILE: &str = "circles.json";

/// Raw catalog tables
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub works: Vec<Work>,
    pub circles: Vec<Circle>,
}

impl Catalog {
    /// Read both tables from `dir`
    pub async fn load(dir: &Path) -> Result<Self> {
        let works: Vec<Work> = read_json(&dir.join(WORKS_FILE)).await?;
        let circles: Vec<Circle> = read_json(&dir.join(CIRCLES_FILE)).await?;
        tracing::info!(
            works = works.len(),
            circles = circles.len(),
            dir = %dir.display(),
            "Catalog loaded"
        );
        Ok(Self { works, circles })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::Load(format!("failed to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Project every work into a record, in default display order
pub fn build_index(catalog: &Catalog) -> Vec<SearchRecord> {
    let circle_names: HashMap<u64, &str> = catalog
        .circles
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut works: Vec<&Work> = catalog.works.iter().collect();
    works.sort_by(|a, b| display_order(a, b));

    works
        .into_iter()
        .map(|work| {
            let circle = work
                .circle_id
                .and_then(|id| circle_names.get(&id).copied())
                .filter(|name| !name.is_empty())
                .or_else(|| work.circle_name.as_deref().filter(|name| !name.is_empty()))
                .unwrap_or(UNKNOWN_CIRCLE);
            project(work, circle)
        })
        .collect()
}

/// Rank ascending, unranked after ranked, unranked by id descending
fn display_order(a: &Work, b: &Work) -> Ordering {
    match (ranking(a), ranking(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    }
}

/// A ranking of zero means unranked in the data cache
fn ranking(work: &Work) -> Option<u32> {
    work.ranking.filter(|&rank| rank > 0)
}

/// Map one catalog work onto the abbreviated index record
pub fn project(work: &Work, circle_name: &str) -> SearchRecord {
    let current_price = work.sale_price.filter(|&p| p > 0).unwrap_or(work.price);
    let list_price = if work.price > 0 { work.price } else { current_price };
    let discount_rate = work.discount_rate.filter(|&rate| rate > 0);

    let sale_end = discount_rate
        .and(work.sale_end_date.as_deref())
        .and_then(parse_storefront_timestamp);

    let mut record = SearchRecord::new(work.id, work.title.clone(), current_price)
        .with_circle(circle_name)
        .with_author(work.author_name.clone().unwrap_or_default())
        .with_tags(work.genre_tags.clone().unwrap_or_default())
        .with_discount_rate(discount_rate)
        .with_thumbnail(work.thumbnail_url.clone().unwrap_or_default())
        .with_pages(work.page_count.unwrap_or(0))
        .with_rating(work.rating.filter(|&r| r > 0.0))
        .with_review_count(work.review_count.filter(|&n| n > 0))
        .with_rank(ranking(work));
    record.list_price = list_price;
    record.sale_end = sale_end;
    record
}

/// Write the index as pretty JSON, creating parent directories
pub async fn write_index(path: &Path, records: &[SearchRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Load the catalog, build the index and write it; returns the record count
pub async fn run(config: &ProducerConfig) -> Result<usize> {
    let catalog = Catalog::load(&config.catalog_dir).await?;
    let records = build_index(&catalog);
    write_index(&config.output, &records).await?;

    tracing::info!(
        records = records.len(),
        output = %config.output.display(),
        "Search index generated"
    );
    Ok(records.len())
}
