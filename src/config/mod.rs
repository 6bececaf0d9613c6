use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub artifacts: ArtifactConfig,
    pub dataset: DatasetColumns,
    pub recommendation: RecommendationConfig,
    pub serving: ServingConfig,
}

/// Locations of the four pretrained artifacts loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub classifier_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub prediction_matrix_path: PathBuf,
    pub reviews_path: PathBuf,
}

/// Column names of the review dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetColumns {
    pub product: String,
    pub brand: String,
    pub rating: String,
    pub sentiment: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub candidate_limit: usize,
    pub top_n: usize,
    pub positive_label: String,
    pub brand_placeholder: String,
    pub cache_sentiment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingConfig {
    pub workers: usize,
    pub max_top_n: usize,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            classifier_path: PathBuf::from("artifacts/sentiment_classifier.json"),
            vectorizer_path: PathBuf::from("artifacts/tfidf_vectorizer.json"),
            prediction_matrix_path: PathBuf::from("artifacts/item_based_predictions.csv"),
            reviews_path: PathBuf::from("artifacts/cleaned_reviews_dataset.csv"),
        }
    }
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            product: "name".to_string(),
            brand: "brand".to_string(),
            rating: "reviews_rating".to_string(),
            sentiment: "user_sentiment".to_string(),
            text: "combined_reviews".to_string(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 20,
            top_n: 5,
            positive_label: "Positive".to_string(),
            brand_placeholder: "N/A".to_string(),
            cache_sentiment: true,
        }
    }
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            max_top_n: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifacts: ArtifactConfig::default(),
            dataset: DatasetColumns::default(),
            recommendation: RecommendationConfig::default(),
            serving: ServingConfig::default(),
        }
    }
}

impl Config {
    /// Layers the file at `path` under `SENTIREC_*` environment overrides,
    /// e.g. `SENTIREC_RECOMMENDATION__TOP_N=10`.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Config::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("SENTIREC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
