pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{RecommendError, RecommendResult};
pub use models::*;

use services::artifacts::ArtifactStore;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ArtifactStore>,
    pub user_directory: Arc<services::directory::UserDirectory>,
    pub recommendation_service: Arc<services::recommendation::RecommendationService>,
    pub serving_service: Arc<services::serving::ServingService>,
}

impl AppState {
    /// Loads all artifacts; returns only once the engine can serve requests.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(ArtifactStore::load(&config).await?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<ArtifactStore>) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let user_directory = Arc::new(services::directory::UserDirectory::new(store.clone()));

        let recommendation_service = Arc::new(
            services::recommendation::RecommendationService::new(store.clone(), config.clone()),
        );

        let serving_service = Arc::new(services::serving::ServingService::new(
            recommendation_service.clone(),
            config.clone(),
        )?);

        Ok(Self {
            config,
            store,
            user_directory,
            recommendation_service,
            serving_service,
        })
    }

    pub fn list_users(&self, filter: Option<&str>) -> Vec<String> {
        self.user_directory.list_users(filter)
    }

    pub fn recommend(&self, username: &str, top_n: usize) -> RecommendResult<Vec<RecommendationEntry>> {
        self.recommendation_service.recommend(username, top_n)
    }
}

pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
