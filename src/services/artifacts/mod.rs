use crate::algorithms::{LogisticRegression, SentimentClassifier, TextVectorizer, TfidfVectorizer};
use crate::config::Config;
use crate::error::{RecommendError, RecommendResult};
use crate::models::{PredictionMatrix, ReviewDataset, StoreSummary};
use anyhow::anyhow;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// The four pretrained artifacts, loaded once and shared read-only by every
/// request for the lifetime of the process.
pub struct ArtifactStore {
    classifier: Arc<dyn SentimentClassifier>,
    vectorizer: Arc<dyn TextVectorizer>,
    predictions: PredictionMatrix,
    reviews: ReviewDataset,
}

impl ArtifactStore {
    /// Loads every artifact concurrently. Any failure aborts startup.
    pub async fn load(config: &Config) -> RecommendResult<Self> {
        let artifacts = &config.artifacts;
        let columns = config.dataset.clone();

        let (classifier, vectorizer, predictions, reviews) = tokio::try_join!(
            load_artifact("classifier", &artifacts.classifier_path, |path| {
                LogisticRegression::load(path)
            }),
            load_artifact("vectorizer", &artifacts.vectorizer_path, |path| {
                TfidfVectorizer::load(path)
            }),
            load_artifact("prediction matrix", &artifacts.prediction_matrix_path, |path| {
                PredictionMatrix::load(path)
            }),
            load_artifact("review dataset", &artifacts.reviews_path, move |path| {
                ReviewDataset::load(path, &columns)
            }),
        )?;

        let store = Self::from_parts(Arc::new(classifier), Arc::new(vectorizer), predictions, reviews)?;
        let summary = store.summary();
        info!(
            "Artifact store ready: {} users, {} products, {} reviews over {} products, {} features",
            summary.users, summary.products, summary.reviews, summary.reviewed_products, summary.features
        );
        Ok(store)
    }

    pub fn from_parts(
        classifier: Arc<dyn SentimentClassifier>,
        vectorizer: Arc<dyn TextVectorizer>,
        predictions: PredictionMatrix,
        reviews: ReviewDataset,
    ) -> RecommendResult<Self> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(RecommendError::ArtifactLoad {
                artifact: "classifier",
                source: anyhow!(
                    "Classifier expects {} features but the vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.n_features()
                ),
            });
        }

        Ok(Self {
            classifier,
            vectorizer,
            predictions,
            reviews,
        })
    }

    pub fn classifier(&self) -> &dyn SentimentClassifier {
        self.classifier.as_ref()
    }

    pub fn vectorizer(&self) -> &dyn TextVectorizer {
        self.vectorizer.as_ref()
    }

    pub fn predictions(&self) -> &PredictionMatrix {
        &self.predictions
    }

    pub fn reviews(&self) -> &ReviewDataset {
        &self.reviews
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            users: self.predictions.n_users(),
            products: self.predictions.n_products(),
            reviewed_products: self.reviews.n_products(),
            reviews: self.reviews.len(),
            features: self.vectorizer.n_features(),
            classes: self.classifier.classes().to_vec(),
        }
    }
}

async fn load_artifact<T, F>(artifact: &'static str, path: &Path, loader: F) -> RecommendResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> anyhow::Result<T> + Send + 'static,
{
    info!("Loading {} from {}", artifact, path.display());
    let start = Instant::now();

    let path = path.to_path_buf();
    let loaded = tokio::task::spawn_blocking(move || loader(&path))
        .await
        .map_err(|e| RecommendError::ArtifactLoad {
            artifact,
            source: anyhow::Error::new(e),
        })?
        .map_err(|source| RecommendError::ArtifactLoad { artifact, source })?;

    info!("Loaded {} in {}ms", artifact, start.elapsed().as_millis());
    Ok(loaded)
}
