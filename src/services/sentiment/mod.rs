use crate::config::Config;
use crate::error::RecommendResult;
use crate::services::artifacts::ArtifactStore;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Scores a product by the fraction of its reviews the classifier labels
/// positive.
pub struct SentimentScorer {
    store: Arc<ArtifactStore>,
    positive_label: String,
    cache: Option<DashMap<String, f64>>,
}

impl SentimentScorer {
    pub fn new(store: Arc<ArtifactStore>, config: &Config) -> Self {
        Self {
            store,
            positive_label: config.recommendation.positive_label.clone(),
            cache: config.recommendation.cache_sentiment.then(DashMap::new),
        }
    }

    /// Positive fraction in `[0.0, 1.0]`; 0.0 for a product with no reviews.
    ///
    /// Results are memoized when caching is enabled. The artifacts never
    /// change after load, so a cached score equals a recomputed one.
    pub fn score(&self, product: &str) -> RecommendResult<f64> {
        if let Some(cache) = &self.cache {
            if let Some(score) = cache.get(product) {
                return Ok(*score);
            }
        }

        let score = self.score_uncached(product)?;

        if let Some(cache) = &self.cache {
            cache.insert(product.to_string(), score);
        }
        Ok(score)
    }

    pub fn score_uncached(&self, product: &str) -> RecommendResult<f64> {
        let texts: Vec<&str> = self
            .store
            .reviews()
            .reviews_for(product)
            .map(|review| review.text.as_str())
            .collect();

        if texts.is_empty() {
            debug!("No reviews for '{}', sentiment defaults to 0", product);
            return Ok(0.0);
        }

        let features = self.store.vectorizer().transform(&texts)?;
        let labels = self.store.classifier().predict(features.view())?;

        let positive = labels
            .iter()
            .filter(|label| **label == self.positive_label)
            .count();

        Ok(positive as f64 / texts.len() as f64)
    }

    pub fn cached_products(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }
}
