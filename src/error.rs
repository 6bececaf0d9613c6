/// Recommendation engine errors
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to load {artifact}: {source}")]
    ArtifactLoad {
        artifact: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Vectorizer error: {0}")]
    Vectorizer(String),

    #[error("Classifier error: {0}")]
    Classifier(String),
}

impl RecommendError {
    /// Client-side errors are reported back to the caller; everything else
    /// is absorbed at the ranker boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecommendError::InvalidInput(_))
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;
