use crate::algorithms::top_k_stable;
use crate::models::Candidate;
use crate::services::artifacts::ArtifactStore;
use std::sync::Arc;
use tracing::warn;

/// Collaborative-filtering stage: picks the products a user is predicted to
/// like most from the item-based prediction matrix.
pub struct CandidateGenerator {
    store: Arc<ArtifactStore>,
}

impl CandidateGenerator {
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` products with a usable prediction for `username`,
    /// best first. Unknown users and users without predictions get nothing.
    pub fn generate(&self, username: &str, limit: usize) -> Vec<Candidate> {
        let predictions = self.store.predictions();

        let Some(row) = predictions.row(username) else {
            warn!("User '{}' not found in prediction matrix", username);
            return Vec::new();
        };

        let candidates = top_k_stable(row, predictions.products(), limit);
        if candidates.is_empty() {
            warn!("No valid predictions available for '{}'", username);
        }
        candidates
    }
}
