use crate::config::DatasetColumns;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub product: String,
    pub brand: Option<String>,
    pub rating: f64,
    pub sentiment: String,
    pub text: String,
}

/// Historical reviews, indexed by product name in dataset order.
#[derive(Debug, Clone, Default)]
pub struct ReviewDataset {
    reviews: Vec<Review>,
    by_product: HashMap<String, Vec<usize>>,
}

impl Review {
    pub fn new(
        product: impl Into<String>,
        rating: f64,
        sentiment: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            brand: None,
            rating,
            sentiment: sentiment.into(),
            text: text.into(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

impl ReviewDataset {
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let mut by_product: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, review) in reviews.iter().enumerate() {
            by_product
                .entry(review.product.clone())
                .or_default()
                .push(position);
        }

        Self {
            reviews,
            by_product,
        }
    }

    pub fn load(path: &Path, columns: &DatasetColumns) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Cannot open review dataset {}", path.display()))?;
        Self::from_reader(file, columns)
            .with_context(|| format!("Malformed review dataset {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R, columns: &DatasetColumns) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| anyhow!("Missing column '{}'", name))
        };
        let product_col = position(&columns.product)?;
        let brand_col = position(&columns.brand)?;
        let rating_col = position(&columns.rating)?;
        let sentiment_col = position(&columns.sentiment)?;
        let text_col = position(&columns.text)?;

        let mut reviews = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let field = |col: usize| record.get(col).unwrap_or("");

            let rating_raw = field(rating_col).trim();
            let rating = rating_raw
                .parse::<f64>()
                .map_err(|e| anyhow!("Line {}: invalid rating '{}': {}", line + 2, rating_raw, e))?;
            if !rating.is_finite() {
                bail!("Line {}: rating '{}' is not a finite number", line + 2, rating_raw);
            }

            let brand = field(brand_col).trim();
            reviews.push(Review {
                product: field(product_col).to_string(),
                brand: (!brand.is_empty()).then(|| brand.to_string()),
                rating,
                sentiment: field(sentiment_col).to_string(),
                text: field(text_col).to_string(),
            });
        }

        Ok(Self::from_reviews(reviews))
    }

    /// Every review whose product name equals `product` exactly.
    pub fn reviews_for<'a>(&'a self, product: &str) -> impl Iterator<Item = &'a Review> + 'a {
        self.by_product
            .get(product)
            .map(|rows| rows.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&row| &self.reviews[row])
    }

    pub fn count_for(&self, product: &str) -> usize {
        self.by_product.get(product).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn n_products(&self) -> usize {
        self.by_product.len()
    }
}
