//! TF-IDF text vectorizer restored from an exported vocabulary and IDF table.
//!
//! Tokenization, n-gram construction, sublinear term frequency and row
//! normalization follow the conventions of the exporting toolkit, so a
//! document vectorized here lands on the same features the sentiment
//! classifier was trained against.

use super::TextVectorizer;
use crate::error::{RecommendError, RecommendResult};
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, ArrayViewMut1};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default)]
    stop_words: Vec<String>,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
    n_features: usize,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
    stop_words: HashSet<String>,
}

impl TfidfVectorizer {
    /// Unigram, lowercased, L2-normalized vectorizer over `vocabulary`.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Result<Self> {
        Self::from_artifact(VectorizerArtifact {
            vocabulary,
            idf,
            lowercase: default_lowercase(),
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            norm: default_norm(),
            stop_words: Vec::new(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Cannot open vectorizer {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Malformed vectorizer {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let artifact: VectorizerArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            bail!("Invalid ngram_range ({}, {})", min_n, max_n);
        }

        let max_index = artifact.vocabulary.values().copied().max();
        let n_features = if artifact.idf.is_empty() {
            max_index.map_or(0, |index| index + 1)
        } else {
            artifact.idf.len()
        };
        if let Some(index) = max_index {
            if index >= n_features {
                bail!("Vocabulary index {} out of range for {} features", index, n_features);
            }
        }

        let token_pattern = Regex::new(&artifact.token_pattern)
            .with_context(|| format!("Invalid token pattern '{}'", artifact.token_pattern))?;

        let idf = (!artifact.idf.is_empty()).then(|| Array1::from_vec(artifact.idf));

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf,
            n_features,
            lowercase: artifact.lowercase,
            token_pattern,
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            stop_words: artifact.stop_words.into_iter().collect(),
        })
    }

    fn tokenize(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        self.token_pattern
            .find_iter(&text)
            .map(|token| token.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    fn count_terms(&self, tokens: &[String], mut row: ArrayViewMut1<'_, f64>) {
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            if n == 1 {
                for token in tokens {
                    if let Some(&index) = self.vocabulary.get(token) {
                        row[index] += 1.0;
                    }
                }
                continue;
            }
            for window in tokens.windows(n) {
                if let Some(&index) = self.vocabulary.get(&window.join(" ")) {
                    row[index] += 1.0;
                }
            }
        }
    }

    fn weight_and_normalize(&self, mut row: ArrayViewMut1<'_, f64>) {
        if self.sublinear_tf {
            row.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { tf });
        }
        if let Some(idf) = &self.idf {
            row *= idf;
        }

        let norm = match self.norm {
            Some(Norm::L2) => row.mapv(|v| v * v).sum().sqrt(),
            Some(Norm::L1) => row.mapv(f64::abs).sum(),
            None => return,
        };
        if norm > 0.0 {
            row /= norm;
        }
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn transform(&self, documents: &[&str]) -> RecommendResult<Array2<f64>> {
        if self.n_features == 0 {
            return Err(RecommendError::Vectorizer("Vocabulary is empty".to_string()));
        }

        let mut features = Array2::zeros((documents.len(), self.n_features));
        for (document, mut row) in documents.iter().zip(features.rows_mut()) {
            let tokens = self.tokenize(document);
            self.count_terms(&tokens, row.view_mut());
            self.weight_and_normalize(row.view_mut());
        }

        Ok(features)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}
