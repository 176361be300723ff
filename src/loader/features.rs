//! Curated feature documents.
//!
//! Three JSON arrays live next to the catalog data: circle spotlights, daily
//! recommendations and daily sale features. Each is fetched through an
//! [`IndexSource`], malformed elements are dropped, and a document that cannot
//! be fetched or is not an array degrades to an empty list.

use crate::config::{FeaturesConfig, IndexConfig};
use crate::loader::error::LoadError;
use crate::loader::record_set::decode_array;
use crate::loader::source::{create_source, IndexSource};
use crate::models::{CircleFeature, DailyRecommendation, SaleFeature};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

pub const CIRCLE_FEATURES_FILE: &str = "circle_features.json";
pub const DAILY_RECOMMENDATIONS_FILE: &str = "daily_recommendations.json";
pub const SALE_FEATURES_FILE: &str = "sale_features.json";

/// Documents published for a target date
pub trait Dated {
    fn target_date(&self) -> Option<NaiveDate>;
}

impl Dated for DailyRecommendation {
    fn target_date(&self) -> Option<NaiveDate> {
        Some(self.target_date)
    }
}

impl Dated for SaleFeature {
    fn target_date(&self) -> Option<NaiveDate> {
        self.target_date
    }
}

/// Newest item by target date.
///
/// On equal dates the earlier item wins; undated items only win when nothing
/// is dated.
pub fn latest<T: Dated>(items: &[T]) -> Option<&T> {
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(best) if best.target_date() >= item.target_date() => Some(best),
        _ => Some(item),
    })
}

/// One source per feature document
#[derive(Clone)]
pub struct FeatureSources {
    pub circle_features: Arc<dyn IndexSource>,
    pub daily_recommendations: Arc<dyn IndexSource>,
    pub sale_features: Arc<dyn IndexSource>,
}

impl FeatureSources {
    /// Resolve the three document locations under `config.location`
    pub fn from_config(config: &FeaturesConfig) -> Result<Self, LoadError> {
        let source = |file: &str| {
            create_source(&IndexConfig {
                location: document_location(&config.location, file),
                timeout_secs: config.timeout_secs,
            })
        };

        Ok(Self {
            circle_features: source(CIRCLE_FEATURES_FILE)?,
            daily_recommendations: source(DAILY_RECOMMENDATIONS_FILE)?,
            sale_features: source(SALE_FEATURES_FILE)?,
        })
    }
}

fn document_location(base: &str, file: &str) -> String {
    let base = base.trim();
    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{}/{}", base.trim_end_matches('/'), file)
    } else {
        Path::new(base).join(file).to_string_lossy().into_owned()
    }
}

/// Loaded feature documents
#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    circle_features: Vec<CircleFeature>,
    daily_recommendations: Vec<DailyRecommendation>,
    sale_features: Vec<SaleFeature>,
    dropped: usize,
}

impl FeatureCatalog {
    pub fn new(
        circle_features: Vec<CircleFeature>,
        daily_recommendations: Vec<DailyRecommendation>,
        sale_features: Vec<SaleFeature>,
    ) -> Self {
        Self {
            circle_features,
            daily_recommendations,
            sale_features,
            dropped: 0,
        }
    }

    /// Fetch and decode all three documents concurrently; never fails
    pub async fn load(sources: &FeatureSources) -> Self {
        let (circles, daily, sales) = tokio::join!(
            load_document::<CircleFeature>(sources.circle_features.as_ref(), "circle_features"),
            load_document::<DailyRecommendation>(
                sources.daily_recommendations.as_ref(),
                "daily_recommendations"
            ),
            load_document::<SaleFeature>(sources.sale_features.as_ref(), "sale_features"),
        );

        Self {
            circle_features: circles.0,
            daily_recommendations: daily.0,
            sale_features: sales.0,
            dropped: circles.1 + daily.1 + sales.1,
        }
    }

    pub fn circle_features(&self) -> &[CircleFeature] {
        &self.circle_features
    }

    pub fn daily_recommendations(&self) -> &[DailyRecommendation] {
        &self.daily_recommendations
    }

    pub fn sale_features(&self) -> &[SaleFeature] {
        &self.sale_features
    }

    /// Malformed elements skipped across all documents
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Circle spotlight by its (already decoded) slug
    pub fn circle_feature_by_slug(&self, slug: &str) -> Option<&CircleFeature> {
        self.circle_features.iter().find(|f| f.slug == slug)
    }

    pub fn latest_daily_recommendation(&self) -> Option<&DailyRecommendation> {
        latest(&self.daily_recommendations)
    }

    pub fn latest_sale_feature(&self) -> Option<&SaleFeature> {
        latest(&self.sale_features)
    }
}

async fn load_document<T: DeserializeOwned>(
    source: &dyn IndexSource,
    document: &'static str,
) -> (Vec<T>, usize) {
    let decoded = match source.fetch().await {
        Ok(bytes) => decode_array::<T>(&bytes, document),
        Err(e) => Err(e),
    };

    match decoded {
        Ok((items, dropped)) => {
            tracing::info!(
                document,
                items = items.len(),
                dropped,
                source = %source.describe(),
                "Feature document loaded"
            );
            (items, dropped)
        }
        Err(e) => {
            tracing::warn!(
                document,
                source = %source.describe(),
                error = %e,
                "Feature document unavailable, using an empty list"
            );
            (Vec::new(), 0)
        }
    }
}
