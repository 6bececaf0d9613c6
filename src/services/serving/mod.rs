use crate::config::Config;
use crate::error::RecommendResult;
use crate::models::*;
use crate::services::recommendation::RecommendationService;
use crate::utils::validation::validate_recommendation_request;
use anyhow::Result;
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const NO_RECOMMENDATIONS: &str = "No recommendations available for this user";

/// Request-facing wrapper around the ranker: validates requests, keeps
/// serving counters and fans batches out over a worker pool.
pub struct ServingService {
    recommendation_service: Arc<RecommendationService>,
    config: Arc<Config>,
    serving_stats: DashMap<&'static str, u64>,
    pool: rayon::ThreadPool,
}

impl ServingService {
    pub fn new(recommendation_service: Arc<RecommendationService>, config: Arc<Config>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.serving.workers.max(1))
            .thread_name(|index| format!("sentirec-serve-{}", index))
            .build()?;

        Ok(Self {
            recommendation_service,
            config,
            serving_stats: DashMap::new(),
            pool,
        })
    }

    pub fn serve(&self, request: &RecommendationRequest) -> RecommendResult<RecommendationResponse> {
        self.increment_stat("total_requests");
        let start_time = Instant::now();

        if let Err(e) = validate_recommendation_request(request, self.config.serving.max_top_n) {
            self.increment_stat("invalid_requests");
            warn!("Rejected recommendation request for {:?}: {}", request.username, e);
            return Err(e);
        }

        let recommendations = self
            .recommendation_service
            .recommend(&request.username, request.top_n)?;
        if recommendations.is_empty() {
            self.increment_stat("empty_results");
        }

        let latency = start_time.elapsed().as_millis() as u64;
        self.update_latency_stat(latency);

        info!(
            "Served {} recommendations for user {} in {}ms",
            recommendations.len(),
            request.username,
            latency
        );
        Ok(RecommendationResponse::new(request.username.clone(), recommendations))
    }

    /// Serves every request on the worker pool; results keep input order.
    pub fn serve_batch(&self, requests: &[RecommendationRequest]) -> Vec<RecommendResult<RecommendationResponse>> {
        self.increment_stat("batch_requests");
        let start_time = Instant::now();

        let responses: Vec<_> = self
            .pool
            .install(|| requests.par_iter().map(|request| self.serve(request)).collect());

        info!(
            "Batch served {} requests in {}ms",
            responses.len(),
            start_time.elapsed().as_millis()
        );
        responses
    }

    pub fn stats(&self) -> HashMap<String, u64> {
        let mut stats: HashMap<String, u64> = self
            .serving_stats
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect();

        let served = stats.get("served_requests").copied().unwrap_or(0);
        let total_latency = stats.remove("total_latency_ms").unwrap_or(0);
        if served > 0 {
            stats.insert("avg_latency_ms".to_string(), total_latency / served);
        }
        stats
    }

    fn increment_stat(&self, key: &'static str) {
        *self.serving_stats.entry(key).or_insert(0) += 1;
    }

    fn update_latency_stat(&self, latency_ms: u64) {
        self.increment_stat("served_requests");
        *self.serving_stats.entry("total_latency_ms").or_insert(0) += latency_ms;
        self.serving_stats
            .entry("max_latency_ms")
            .and_modify(|max| *max = (*max).max(latency_ms))
            .or_insert(latency_ms);
    }
}
