pub mod matrix;
pub mod reviews;

pub use matrix::PredictionMatrix;
pub use reviews::{Review, ReviewDataset};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product selected by collaborative filtering, with its predicted affinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub product: String,
    pub predicted_score: f64,
}

/// A candidate augmented with the fraction of its reviews classified positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub product: String,
    pub predicted_score: f64,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub product_name: String,
    pub brand: String,
    pub avg_rating: f64,
    pub positive_ratio: f64,
    pub total_reviews: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub username: String,
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub username: String,
    pub recommendations: Vec<RecommendationEntry>,
    pub generated_at: DateTime<Utc>,
}

/// Sizes of the loaded artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub users: usize,
    pub products: usize,
    pub reviewed_products: usize,
    pub reviews: usize,
    pub features: usize,
    pub classes: Vec<String>,
}

impl Candidate {
    pub fn new(product: impl Into<String>, predicted_score: f64) -> Self {
        Self {
            product: product.into(),
            predicted_score,
        }
    }

    pub fn with_sentiment(self, sentiment_score: f64) -> ScoredCandidate {
        ScoredCandidate {
            product: self.product,
            predicted_score: self.predicted_score,
            sentiment_score,
        }
    }
}

impl RecommendationRequest {
    pub fn new(username: impl Into<String>, top_n: usize) -> Self {
        Self {
            username: username.into(),
            top_n,
        }
    }
}

impl RecommendationResponse {
    pub fn new(username: impl Into<String>, recommendations: Vec<RecommendationEntry>) -> Self {
        Self {
            username: username.into(),
            recommendations,
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
