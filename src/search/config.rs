//! Search configuration

use crate::search::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Relative weight of each searchable field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FieldWeights {
    #[validate(range(min = 0.0, max = 10.0))]
    pub title: f64,

    #[validate(range(min = 0.0, max = 10.0))]
    pub author: f64,

    #[validate(range(min = 0.0, max = 10.0))]
    pub circle: f64,

    /// Applied to each tag independently
    #[validate(range(min = 0.0, max = 10.0))]
    pub tag: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 1.0,
            author: 0.8,
            circle: 0.5,
            tag: 0.3,
        }
    }
}

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Maximum normalized edit distance (errors / token length) for a field to match
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[validate(nested)]
    #[serde(default)]
    pub weights: FieldWeights,

    /// Maximum search results to return from a single query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Upper bound on how many results a session ever displays
    #[validate(range(min = 1))]
    #[serde(default = "default_max_display_results")]
    pub max_display_results: usize,

    /// Results visible before the first "show more"
    #[validate(range(min = 1))]
    #[serde(default = "default_page_size")]
    pub initial_page_size: usize,

    /// Results added by each "show more"
    #[validate(range(min = 1))]
    #[serde(default = "default_page_size")]
    pub page_step: usize,
}

impl SearchConfig {
    /// Validate ranges, mapping failures into [`SearchError::InvalidConfiguration`]
    pub fn validated(self) -> SearchResult<Self> {
        self.validate()
            .map_err(|e| SearchError::InvalidConfiguration(e.to_string()))?;
        Ok(self)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            weights: FieldWeights::default(),
            max_results: default_max_results(),
            max_display_results: default_max_display_results(),
            initial_page_size: default_page_size(),
            page_step: default_page_size(),
        }
    }
}

fn default_threshold() -> f64 {
    0.4
}

fn default_max_results() -> usize {
    10_000
}

fn default_max_display_results() -> usize {
    300
}

fn default_page_size() -> usize {
    50
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    pub fn weights(mut self, weights: FieldWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    pub fn max_display_results(mut self, max: usize) -> Self {
        self.config.max_display_results = max;
        self
    }

    pub fn initial_page_size(mut self, size: usize) -> Self {
        self.config.initial_page_size = size;
        self
    }

    pub fn page_step(mut self, step: usize) -> Self {
        self.config.page_step = step;
        self
    }

    pub fn build(self) -> SearchResult<SearchConfig> {
        self.config.validated()
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfigBuilder::new().build().unwrap();
        assert_eq!(config.threshold, 0.4);
        assert_eq!(config.weights.title, 1.0);
        assert_eq!(config.weights.tag, 0.3);
        assert_eq!(config.max_display_results, 300);
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let result = SearchConfigBuilder::new().threshold(1.5).build();
        assert!(matches!(result, Err(SearchError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_page_step_is_rejected() {
        assert!(SearchConfigBuilder::new().page_step(0).build().is_err());
    }
}
