use crate::algorithms::sort_descending_by;
use crate::config::Config;
use crate::error::RecommendResult;
use crate::models::*;
use crate::services::artifacts::ArtifactStore;
use crate::services::candidates::CandidateGenerator;
use crate::services::sentiment::SentimentScorer;
use crate::utils::{round_to, validation::validate_username};
use std::sync::Arc;
use tracing::{error, info};

/// Two-stage ranker: collaborative filtering narrows the field to a fixed
/// number of candidates, then review sentiment alone decides the final order.
pub struct RecommendationService {
    store: Arc<ArtifactStore>,
    candidates: CandidateGenerator,
    sentiment: SentimentScorer,
    config: Arc<Config>,
}

impl RecommendationService {
    pub fn new(store: Arc<ArtifactStore>, config: Arc<Config>) -> Self {
        Self {
            candidates: CandidateGenerator::new(store.clone()),
            sentiment: SentimentScorer::new(store.clone(), &config),
            store,
            config,
        }
    }

    pub fn candidates(&self) -> &CandidateGenerator {
        &self.candidates
    }

    pub fn sentiment(&self) -> &SentimentScorer {
        &self.sentiment
    }

    /// Top `top_n` products for `username`, ordered by sentiment score.
    ///
    /// Only a blank username is reported as an error. Unknown users, users
    /// without predictions and internal failures all produce an empty list.
    pub fn recommend(&self, username: &str, top_n: usize) -> RecommendResult<Vec<RecommendationEntry>> {
        validate_username(username)?;

        match self.rank(username, top_n) {
            Ok(recommendations) => {
                info!(
                    "Generated {} recommendations for {}",
                    recommendations.len(),
                    username
                );
                Ok(recommendations)
            }
            Err(e) => {
                error!("Recommendation generation failed for {}: {:?}", username, e);
                Ok(Vec::new())
            }
        }
    }

    fn rank(&self, username: &str, top_n: usize) -> RecommendResult<Vec<RecommendationEntry>> {
        let candidates = self
            .candidates
            .generate(username, self.config.recommendation.candidate_limit);
        if candidates.is_empty() {
            info!("No candidate products available for user: {}", username);
            return Ok(Vec::new());
        }

        let mut scored = candidates
            .into_iter()
            .map(|candidate| -> RecommendResult<ScoredCandidate> {
                let sentiment = self.sentiment.score(&candidate.product)?;
                Ok(candidate.with_sentiment(sentiment))
            })
            .collect::<RecommendResult<Vec<ScoredCandidate>>>()?;

        sort_descending_by(&mut scored, |candidate| candidate.sentiment_score);
        scored.truncate(top_n);

        Ok(scored
            .iter()
            .filter_map(|candidate| self.product_details(&candidate.product))
            .collect())
    }

    /// Display metadata aggregated over every review of `product`, or `None`
    /// when the product has no reviews.
    ///
    /// Brand comes from the first review row in dataset order.
    pub fn product_details(&self, product: &str) -> Option<RecommendationEntry> {
        let mut reviews = self.store.reviews().reviews_for(product).peekable();
        let brand = reviews.peek()?.brand.clone();

        let positive_label = &self.config.recommendation.positive_label;
        let (total, rating_sum, positive) = reviews.fold((0usize, 0.0f64, 0usize), |acc, review| {
            (
                acc.0 + 1,
                acc.1 + review.rating,
                acc.2 + usize::from(&review.sentiment == positive_label),
            )
        });

        Some(RecommendationEntry {
            product_name: product.to_string(),
            brand: brand.unwrap_or_else(|| self.config.recommendation.brand_placeholder.clone()),
            avg_rating: round_to(rating_sum / total as f64, 2),
            positive_ratio: round_to(positive as f64 / total as f64 * 100.0, 1),
            total_reviews: total,
        })
    }
}
