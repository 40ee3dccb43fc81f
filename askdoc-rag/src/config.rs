//! Configuration for the retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the retrieval pipeline.
///
/// Chunk sizes are not set directly: they are derived per document from the
/// average sentence length, scaled by `size_multiplier` and `overlap_ratio`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Chunk size as a multiple of the average sentence length.
    pub size_multiplier: f64,
    /// Chunk overlap as a fraction of the average sentence length.
    pub overlap_ratio: f64,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Minimum similarity score for results (results below this are filtered out).
    pub similarity_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { size_multiplier: 1.25, overlap_ratio: 0.2, top_k: 5, similarity_threshold: 0.0 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the chunk size as a multiple of the average sentence length.
    pub fn size_multiplier(mut self, multiplier: f64) -> Self {
        self.config.size_multiplier = multiplier;
        self
    }

    /// Set the chunk overlap as a fraction of the average sentence length.
    pub fn overlap_ratio(mut self, ratio: f64) -> Self {
        self.config.overlap_ratio = ratio;
        self
    }

    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for filtering results.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `size_multiplier` is not a positive finite number
    /// - `overlap_ratio` is negative, not finite, or not below `size_multiplier`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RagConfig> {
        if !self.config.size_multiplier.is_finite() || self.config.size_multiplier <= 0.0 {
            return Err(RagError::ConfigError(format!(
                "size_multiplier ({}) must be a positive finite number",
                self.config.size_multiplier
            )));
        }
        if !self.config.overlap_ratio.is_finite()
            || self.config.overlap_ratio < 0.0
            || self.config.overlap_ratio >= self.config.size_multiplier
        {
            return Err(RagError::ConfigError(format!(
                "overlap_ratio ({}) must be non-negative and less than size_multiplier ({})",
                self.config.overlap_ratio, self.config.size_multiplier
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_ratios() {
        let config = RagConfig::default();

        assert_eq!(config.size_multiplier, 1.25);
        assert_eq!(config.overlap_ratio, 0.2);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.similarity_threshold, 0.0);
    }

    #[test]
    fn builder_produces_configured_values() {
        let config = RagConfig::builder()
            .size_multiplier(2.0)
            .overlap_ratio(0.5)
            .top_k(3)
            .similarity_threshold(0.2)
            .build()
            .unwrap();

        assert_eq!(config.size_multiplier, 2.0);
        assert_eq!(config.overlap_ratio, 0.5);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.similarity_threshold, 0.2);
    }

    #[test]
    fn rejects_zero_top_k() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn rejects_overlap_ratio_reaching_the_multiplier() {
        assert!(RagConfig::builder().overlap_ratio(1.25).build().is_err());
        assert!(RagConfig::builder().size_multiplier(0.5).overlap_ratio(0.5).build().is_err());
    }

    #[test]
    fn rejects_nonpositive_or_non_finite_multiplier() {
        assert!(RagConfig::builder().size_multiplier(0.0).build().is_err());
        assert!(RagConfig::builder().size_multiplier(-1.0).build().is_err());
        assert!(RagConfig::builder().size_multiplier(f64::NAN).build().is_err());
        assert!(RagConfig::builder().size_multiplier(f64::INFINITY).build().is_err());
    }

    #[test]
    fn rejects_negative_or_nan_overlap_ratio() {
        assert!(RagConfig::builder().overlap_ratio(-0.1).build().is_err());
        assert!(RagConfig::builder().overlap_ratio(f64::NAN).build().is_err());
    }
}
