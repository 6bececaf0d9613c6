use crate::error::{RecommendError, RecommendResult};
use crate::models::RecommendationRequest;

pub fn validate_username(username: &str) -> RecommendResult<()> {
    if username.trim().is_empty() {
        return Err(RecommendError::InvalidInput(
            "Username parameter is required".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_top_n(top_n: usize, max_top_n: usize) -> RecommendResult<()> {
    if top_n == 0 {
        return Err(RecommendError::InvalidInput(
            "Number of recommendations must be greater than 0".to_string(),
        ));
    }

    if top_n > max_top_n {
        return Err(RecommendError::InvalidInput(format!(
            "Number of recommendations too large (max {})",
            max_top_n
        )));
    }

    Ok(())
}

pub fn validate_recommendation_request(
    request: &RecommendationRequest,
    max_top_n: usize,
) -> RecommendResult<()> {
    validate_username(&request.username)?;
    validate_top_n(request.top_n, max_top_n)
}
