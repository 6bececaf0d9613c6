pub mod classifier;
pub mod retriever;
pub mod tfidf;

pub use classifier::LogisticRegression;
pub use retriever::{sort_descending_by, top_k_stable};
pub use tfidf::TfidfVectorizer;

use crate::error::RecommendResult;
use ndarray::{Array2, ArrayView2};

/// Turns raw review text into a feature matrix, one row per document.
pub trait TextVectorizer: Send + Sync {
    fn transform(&self, documents: &[&str]) -> RecommendResult<Array2<f64>>;
    fn n_features(&self) -> usize;
}

/// Maps each row of a feature matrix to a sentiment label.
pub trait SentimentClassifier: Send + Sync {
    fn predict(&self, features: ArrayView2<'_, f64>) -> RecommendResult<Vec<&str>>;
    fn n_features(&self) -> usize;
    fn classes(&self) -> &[String];
}
