use ndarray::{array, Array2};
use sentirec::algorithms::{LogisticRegression, TfidfVectorizer};
use sentirec::services::artifacts::ArtifactStore;
use sentirec::*;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::path::Path;
use tempfile::TempDir;

const CLASSIFIER: &str = r#"{
    "classes": ["Negative", "Positive"],
    "coef": [[1.5, 1.2, -1.4, -1.1, 0.0]],
    "intercept": [0.05]
}"#;

const VECTORIZER: &str = r#"{
    "vocabulary": {"excellent": 0, "love": 1, "awful": 2, "broke": 3, "product": 4},
    "idf": [1.2, 1.1, 1.3, 1.4, 1.0],
    "norm": "l2"
}"#;

const PREDICTIONS: &str = "\
,P1,P2,P3,P4
alice,0.9,0.8,,
bob,nan,0.4,0.7,2.5
carol,,,,
";

const REVIEWS: &str = "\
name,brand,reviews_rating,user_sentiment,combined_reviews
P1,Acme,5,Positive,Excellent product. Love it
P2,Globex,2,Negative,Awful product
P1,Acme,4,Positive,love the product
P2,Globex,1,Negative,It broke on day one
P3,,3,Positive,excellent
P3,,4,Positive,love it
P3,,5,Negative,awful
";

fn write_artifacts(dir: &Path) -> Config {
    fs::write(dir.join("classifier.json"), CLASSIFIER).unwrap();
    fs::write(dir.join("vectorizer.json"), VECTORIZER).unwrap();
    fs::write(dir.join("predictions.csv"), PREDICTIONS).unwrap();
    fs::write(dir.join("reviews.csv"), REVIEWS).unwrap();

    let mut config = Config::default();
    config.artifacts.classifier_path = dir.join("classifier.json");
    config.artifacts.vectorizer_path = dir.join("vectorizer.json");
    config.artifacts.prediction_matrix_path = dir.join("predictions.csv");
    config.artifacts.reviews_path = dir.join("reviews.csv");
    config.serving.workers = 2;
    config
}

async fn load_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(dir.path());
    let state = AppState::new(config).await.unwrap();
    (dir, state)
}

fn names(entries: &[RecommendationEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.product_name.as_str()).collect()
}

#[tokio::test]
async fn test_end_to_end_sentiment_reranking() {
    let (_dir, state) = load_state().await;

    let entries = state.recommend("alice", 2).unwrap();
    assert_eq!(names(&entries), vec!["P1", "P2"]);

    let sentiment = state.recommendation_service.sentiment();
    assert_eq!(sentiment.score("P1").unwrap(), 1.0);
    assert_eq!(sentiment.score("P2").unwrap(), 0.0);

    let p1 = &entries[0];
    assert_eq!(p1.brand, "Acme");
    assert_eq!(p1.avg_rating, 4.5);
    assert_eq!(p1.positive_ratio, 100.0);
    assert_eq!(p1.total_reviews, 2);
}

#[tokio::test]
async fn test_predicted_score_does_not_decide_final_order() {
    let (_dir, state) = load_state().await;

    // bob's predictions rank P4 > P3 > P2, but P4 has no reviews (0.0),
    // P3 is two-thirds positive and P2 is all negative.
    let candidates = state.recommendation_service.candidates().generate("bob", 20);
    let candidate_names: Vec<&str> = candidates.iter().map(|c| c.product.as_str()).collect();
    assert_eq!(candidate_names, vec!["P4", "P3", "P2"]);

    let entries = state.recommend("bob", 5).unwrap();
    assert_eq!(names(&entries), vec!["P3", "P2"]);

    let p3 = &entries[0];
    assert_eq!(p3.brand, "N/A");
    assert_eq!(p3.avg_rating, 4.0);
    assert_eq!(p3.positive_ratio, 66.7);
    assert_eq!(p3.total_reviews, 3);
}

#[tokio::test]
async fn test_users_without_signal_get_empty_results() {
    let (_dir, state) = load_state().await;

    assert!(state.recommend("mallory", 5).unwrap().is_empty());
    assert!(state.recommend("carol", 5).unwrap().is_empty());
    assert!(matches!(
        state.recommend("  ", 5),
        Err(RecommendError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_output_respects_top_n_and_candidate_set() {
    let (_dir, state) = load_state().await;

    for top_n in 1..=4 {
        let entries = state.recommend("alice", top_n).unwrap();
        assert!(entries.len() <= top_n);
        assert!(entries.iter().all(|e| e.product_name == "P1" || e.product_name == "P2"));
    }
}

#[tokio::test]
async fn test_output_is_non_increasing_in_sentiment() {
    let (_dir, state) = load_state().await;
    let sentiment = state.recommendation_service.sentiment();

    for user in ["alice", "bob"] {
        let entries = state.recommend(user, 5).unwrap();
        let scores: Vec<f64> = entries
            .iter()
            .map(|e| sentiment.score(&e.product_name).unwrap())
            .collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}

#[tokio::test]
async fn test_sentiment_ties_keep_candidate_order() {
    let (_dir, state) = load_state().await;

    // Sentiment order is P3 (2/3), then P4 and P2 tied at 0.0. P4 keeps its
    // earlier candidate slot and is then dropped for having no review rows.
    let entries = state.recommend("bob", 2).unwrap();
    assert_eq!(names(&entries), vec!["P3"]);
}

/// One user over `n_products` products with strictly decreasing predicted
/// scores; only `positive_product` has positive review text.
fn ranked_catalog_state(n_products: usize, positive_product: usize) -> AppState {
    let vocabulary: HashMap<String, usize> =
        [("great".to_string(), 0), ("awful".to_string(), 1)].into_iter().collect();
    let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0, 1.0]).unwrap();
    let classifier = LogisticRegression::new(
        vec!["Negative".into(), "Positive".into()],
        array![[1.0, -1.0]],
        array![0.0],
    )
    .unwrap();

    let products: Vec<String> = (0..n_products).map(|i| format!("P{}", i)).collect();
    let scores = Array2::from_shape_fn((1, n_products), |(_, col)| (n_products - col) as f64);
    let predictions = PredictionMatrix::new(vec!["u".to_string()], products.clone(), scores).unwrap();

    let reviews = products
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let text = if index == positive_product { "great" } else { "awful" };
            Review::new(product.clone(), 3.0, "Positive", text)
        })
        .collect();

    let store = ArtifactStore::from_parts(
        Arc::new(classifier),
        Arc::new(vectorizer),
        predictions,
        ReviewDataset::from_reviews(reviews),
    )
    .unwrap();
    AppState::with_store(Config::default(), Arc::new(store)).unwrap()
}

#[tokio::test]
async fn test_products_outside_candidate_limit_never_recommended() {
    // P20 is the 21st product by predicted score and the only one with
    // positive reviews.
    let state = ranked_catalog_state(22, 20);
    assert_eq!(state.recommendation_service.sentiment().score("P20").unwrap(), 1.0);
    assert_eq!(state.recommendation_service.candidates().generate("u", 20).len(), 20);

    let entries = state.recommend("u", 3).unwrap();
    assert_eq!(names(&entries), vec!["P0", "P1", "P2"]);

    let everything = state.recommend("u", 50).unwrap();
    assert_eq!(everything.len(), 20);
    assert!(everything.iter().all(|e| e.product_name != "P20" && e.product_name != "P21"));
}

#[tokio::test]
async fn test_positive_candidate_inside_limit_moves_to_front() {
    let state = ranked_catalog_state(22, 19);

    let entries = state.recommend("u", 3).unwrap();
    assert_eq!(names(&entries), vec!["P19", "P0", "P1"]);
}

#[tokio::test]
async fn test_recommend_is_idempotent() {
    let (_dir, state) = load_state().await;

    let first = state.recommend("bob", 5).unwrap();
    let second = state.recommend("bob", 5).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_user_directory() {
    let (_dir, state) = load_state().await;

    assert_eq!(state.list_users(None), vec!["alice", "bob", "carol"]);
    assert_eq!(state.list_users(Some("O")), vec!["bob", "carol"]);
    assert!(state.list_users(Some("zed")).is_empty());
}

#[tokio::test]
async fn test_batch_serving_keeps_order() {
    let (_dir, state) = load_state().await;

    let requests = vec![
        RecommendationRequest::new("bob", 1),
        RecommendationRequest::new("mallory", 5),
        RecommendationRequest::new("alice", 5),
    ];
    let responses = state.serving_service.serve_batch(&requests);

    assert_eq!(names(&responses[0].as_ref().unwrap().recommendations), vec!["P3"]);
    assert!(responses[1].as_ref().unwrap().is_empty());
    assert_eq!(names(&responses[2].as_ref().unwrap().recommendations), vec!["P1", "P2"]);
    assert_eq!(state.serving_service.stats()["total_requests"], 3);
}

#[tokio::test]
async fn test_startup_fails_on_bad_artifact() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(dir.path());
    fs::write(dir.path().join("predictions.csv"), ",P1\nalice,not-a-number\n").unwrap();

    assert!(AppState::new(config).await.is_err());
}

#[tokio::test]
async fn test_startup_fails_on_feature_mismatch() {
    let dir = TempDir::new().unwrap();
    let config = write_artifacts(dir.path());
    fs::write(
        dir.path().join("classifier.json"),
        r#"{"classes": ["Negative", "Positive"], "coef": [[1.0, -1.0]], "intercept": [0.0]}"#,
    )
    .unwrap();

    let err = sentirec::services::artifacts::ArtifactStore::load(&config)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RecommendError::ArtifactLoad { artifact: "classifier", .. }));
}
