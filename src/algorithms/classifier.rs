use super::SentimentClassifier;
use crate::error::{RecommendError, RecommendResult};
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ClassifierArtifact {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

/// Linear sentiment classifier exported from a trained logistic regression.
///
/// A binary model carries a single weight row: the decision value
/// `x·w + b` selects `classes[1]` when positive and `classes[0]` otherwise.
/// Models with more classes carry one row per class and predict the argmax.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LogisticRegression {
    pub fn new(classes: Vec<String>, coef: Array2<f64>, intercept: Array1<f64>) -> Result<Self> {
        if classes.len() < 2 {
            bail!("Classifier needs at least two classes, got {}", classes.len());
        }

        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if coef.nrows() != expected_rows {
            bail!(
                "Classifier with {} classes needs {} weight rows, got {}",
                classes.len(),
                expected_rows,
                coef.nrows()
            );
        }
        if intercept.len() != coef.nrows() {
            bail!(
                "Intercept length {} does not match {} weight rows",
                intercept.len(),
                coef.nrows()
            );
        }

        Ok(Self {
            classes,
            coef,
            intercept,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Cannot open classifier {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Malformed classifier {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let artifact: ClassifierArtifact = serde_json::from_reader(reader)?;

        let rows = artifact.coef.len();
        let width = artifact.coef.first().map_or(0, Vec::len);
        if artifact.coef.iter().any(|row| row.len() != width) {
            bail!("Classifier weight rows have differing lengths");
        }
        let coef = Array2::from_shape_vec((rows, width), artifact.coef.concat())?;

        Self::new(artifact.classes, coef, Array1::from_vec(artifact.intercept))
    }

    /// Raw decision values, one column per weight row.
    pub fn decision_function(&self, features: ArrayView2<'_, f64>) -> RecommendResult<Array2<f64>> {
        if features.ncols() != self.coef.ncols() {
            return Err(RecommendError::Classifier(format!(
                "Expected {} features, got {}",
                self.coef.ncols(),
                features.ncols()
            )));
        }
        Ok(features.dot(&self.coef.t()) + &self.intercept)
    }
}

impl SentimentClassifier for LogisticRegression {
    fn predict(&self, features: ArrayView2<'_, f64>) -> RecommendResult<Vec<&str>> {
        let decisions = self.decision_function(features)?;

        let labels: Vec<usize> = if self.coef.nrows() == 1 {
            decisions
                .column(0)
                .iter()
                .map(|&d| usize::from(d > 0.0))
                .collect()
        } else {
            decisions
                .axis_iter(Axis(0))
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (class, &d)| {
                            if d > best.1 {
                                (class, d)
                            } else {
                                best
                            }
                        })
                        .0
                })
                .collect()
        };

        Ok(labels
            .into_iter()
            .map(|class| self.classes[class].as_str())
            .collect())
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}
