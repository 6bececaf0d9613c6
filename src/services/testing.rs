//! Small in-memory artifact set shared by the service unit tests.

use crate::algorithms::{LogisticRegression, TfidfVectorizer};
use crate::config::Config;
use crate::models::{PredictionMatrix, Review, ReviewDataset};
use crate::services::artifacts::ArtifactStore;
use ndarray::array;
use std::collections::HashMap;
use std::sync::Arc;

pub fn sample_config() -> Config {
    Config::default()
}

/// Users: alice {P1: 0.8, P2: 0.9}, bob {P4: 0.9, P1: 0.5}, ghost {}.
/// P1 reviews read positive, P2 negative, P4 has none, P5 is rated [3, 4, 5].
pub fn sample_store() -> Arc<ArtifactStore> {
    let vocabulary: HashMap<String, usize> = ["great", "love", "terrible", "broken"]
        .iter()
        .enumerate()
        .map(|(index, term)| (term.to_string(), index))
        .collect();
    let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0; 4]).unwrap();

    let classifier = LogisticRegression::new(
        vec!["Negative".into(), "Positive".into()],
        array![[1.0, 1.0, -1.0, -1.0]],
        array![0.0],
    )
    .unwrap();

    let nan = f64::NAN;
    let predictions = PredictionMatrix::new(
        vec!["alice".into(), "bob".into(), "ghost".into()],
        ["P1", "P2", "P3", "P4", "P5"].iter().map(|p| p.to_string()).collect(),
        array![
            [0.8, 0.9, nan, nan, nan],
            [0.5, nan, nan, 0.9, nan],
            [nan, nan, nan, nan, nan],
        ],
    )
    .unwrap();

    let reviews = ReviewDataset::from_reviews(vec![
        Review::new("P1", 5.0, "Positive", "Great lamp").with_brand("Acme"),
        Review::new("P2", 1.0, "Negative", "terrible, arrived broken"),
        Review::new("P1", 4.0, "Positive", "love the light").with_brand("Other"),
        Review::new("P5", 3.0, "Positive", "great value"),
        Review::new("P5", 4.0, "Positive", "love it"),
        Review::new("P5", 5.0, "Negative", "broken switch"),
        Review::new("P2", 2.0, "Negative", "broken after a week"),
    ]);

    Arc::new(
        ArtifactStore::from_parts(Arc::new(classifier), Arc::new(vectorizer), predictions, reviews).unwrap(),
    )
}
