//! Aggregates for the circle, tag and feature listing pages

use crate::loader::RecordSet;
use crate::models::{CircleFeature, DailyRecommendation, FeatureWork, SaleFeature, SearchRecord};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of related tags shown on a tag page
pub const RELATED_TAG_LIMIT: usize = 10;

/// Tags that have a dedicated genre feature page
const GENRE_SLUGS: &[(&str, &str)] = &[
    ("フェラ", "fellatio"),
    ("巨乳", "big-breasts"),
    ("おっぱい", "big-breasts"),
    ("寝取り・寝取られ・NTR", "ntr"),
    ("制服", "uniform"),
    ("アナル", "anal"),
    ("処女", "virgin"),
    ("学園もの", "school"),
    ("パイズリ", "paizuri"),
    ("ラブラブ・あまあま", "lovey-dovey"),
    ("性転換・女体化", "gender-bender"),
    ("人妻・主婦", "married-woman"),
    ("ぶっかけ", "bukkake"),
    ("熟女", "mature"),
    ("ビッチ", "bitch"),
    ("野外・露出", "outdoor"),
    ("ハーレム", "harem"),
    ("学生", "student"),
    ("オナニー", "masturbation"),
    ("ベスト・総集編", "best-collection"),
    ("妊娠・孕ませ", "pregnancy"),
    ("お尻・ヒップ", "ass"),
    ("触手", "tentacle"),
];

lazy_static! {
    /// Decorations appended to circle feature headlines
    static ref HEADLINE_SUFFIXES: [Regex; 3] = [
        Regex::new(r"の作品.*$").expect("valid headline pattern"),
        Regex::new(r"特集$").expect("valid headline pattern"),
        Regex::new(r"、全力で推せる！$").expect("valid headline pattern"),
    ];
}

/// A name with the number of works carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub name: String,
    pub count: usize,
}

/// Circles by work count (desc), then name
pub fn circle_counts<'a, I>(records: I) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    count_names(
        records
            .into_iter()
            .map(|r| r.circle_name.as_str())
            .filter(|name| !name.is_empty()),
    )
}

/// Tags by work count (desc), then name
pub fn tag_counts<'a, I>(records: I) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    count_names(
        records
            .into_iter()
            .flat_map(|r| r.tags.iter().map(String::as_str)),
    )
}

/// Tags that co-occur with `tag`, most frequent first
pub fn related_tags<'a, I>(records: I, tag: &str, limit: usize) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a SearchRecord>,
{
    let mut related = count_names(
        records
            .into_iter()
            .filter(|r| r.tags.iter().any(|t| t == tag))
            .flat_map(|r| r.tags.iter().map(String::as_str))
            .filter(|t| *t != tag),
    );
    related.truncate(limit);
    related
}

fn count_names<'a, I>(names: I) -> Vec<FacetCount>
where
    I: Iterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut facets: Vec<FacetCount> = counts
        .into_iter()
        .map(|(name, count)| FacetCount {
            name: name.to_string(),
            count,
        })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    facets
}

/// Genre feature page for a tag, if one exists
pub fn genre_slug_for_tag(tag: &str) -> Option<&'static str> {
    GENRE_SLUGS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, slug)| *slug)
}

/// Circle name inside a circle feature headline such as `"〇〇の作品を紹介"`
pub fn circle_label_from_headline(headline: &str) -> String {
    HEADLINE_SUFFIXES
        .iter()
        .fold(headline.trim().to_string(), |label, suffix| {
            suffix.replace(&label, "").into_owned()
        })
}

/// Resolve ids to feature works in the given order, skipping unknown ids
pub fn resolve_feature_works(records: &RecordSet, ids: &[u64]) -> Vec<FeatureWork> {
    ids.iter()
        .filter_map(|&id| {
            let work = records.get(id).map(FeatureWork::from);
            if work.is_none() {
                tracing::debug!(id, "Feature references a work missing from the index");
            }
            work
        })
        .collect()
}

/// Works referenced by a [`SaleFeature`], resolved against the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleHighlights {
    pub main: Option<FeatureWork>,
    pub sub: Vec<FeatureWork>,
    pub cheapest: Vec<FeatureWork>,
    pub high_discount: Vec<FeatureWork>,
    pub high_rating: Vec<FeatureWork>,
}

impl SaleHighlights {
    pub fn resolve(feature: &SaleFeature, records: &RecordSet) -> Self {
        let single = |id: Option<u64>| id.and_then(|id| records.get(id)).map(FeatureWork::from);
        let list = |ids: &Option<Vec<u64>>| {
            ids.as_deref()
                .map(|ids| resolve_feature_works(records, ids))
                .unwrap_or_default()
        };

        Self {
            main: single(feature.main_work_id),
            sub: [feature.sub1_work_id, feature.sub2_work_id]
                .into_iter()
                .filter_map(single)
                .collect(),
            cheapest: list(&feature.cheapest_work_ids),
            high_discount: list(&feature.high_discount_work_ids),
            high_rating: list(&feature.high_rating_work_ids),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_none()
            && self.sub.is_empty()
            && self.cheapest.is_empty()
            && self.high_discount.is_empty()
            && self.high_rating.is_empty()
    }
}

/// Circle name shown on a spotlight card; falls back to the stored circle name
pub fn circle_feature_label(feature: &CircleFeature) -> String {
    let label = circle_label_from_headline(&feature.headline);
    if label.is_empty() {
        feature.circle_name.clone()
    } else {
        label
    }
}

/// A circle feature with its works resolved against the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleSpotlight {
    pub slug: String,
    pub label: String,
    pub headline: String,
    pub description: String,
    pub works: Vec<FeatureWork>,
}

impl CircleSpotlight {
    pub fn resolve(feature: &CircleFeature, records: &RecordSet) -> Self {
        Self {
            slug: feature.slug.clone(),
            label: circle_feature_label(feature),
            headline: feature.headline.clone(),
            description: feature.description.clone(),
            works: resolve_feature_works(records, &feature.work_ids()),
        }
    }
}

/// A daily recommendation with its works resolved against the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPicks {
    pub target_date: NaiveDate,
    pub headline: String,
    pub works: Vec<FeatureWork>,
}

impl DailyPicks {
    pub fn resolve(recommendation: &DailyRecommendation, records: &RecordSet) -> Self {
        Self {
            target_date: recommendation.target_date,
            headline: recommendation.headline.clone(),
            works: resolve_feature_works(records, &recommendation.work_ids()),
        }
    }
}
