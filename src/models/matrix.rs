use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Cell values treated as "no prediction available".
const MISSING_MARKERS: &[&str] = &["", "nan", "na", "null", "none"];

/// Item-based collaborative filtering predictions: rows are usernames,
/// columns are product names, missing cells are stored as NaN.
#[derive(Debug, Clone)]
pub struct PredictionMatrix {
    users: Vec<String>,
    products: Vec<String>,
    row_index: HashMap<String, usize>,
    scores: Array2<f64>,
}

impl PredictionMatrix {
    pub fn new(users: Vec<String>, products: Vec<String>, scores: Array2<f64>) -> Result<Self> {
        if scores.dim() != (users.len(), products.len()) {
            bail!(
                "Prediction matrix shape {:?} does not match {} users x {} products",
                scores.dim(),
                users.len(),
                products.len()
            );
        }

        let mut row_index = HashMap::with_capacity(users.len());
        for (row, user) in users.iter().enumerate() {
            if row_index.contains_key(user) {
                warn!("Duplicate user '{}' in prediction matrix at row {}, keeping first", user, row);
                continue;
            }
            row_index.insert(user.clone(), row);
        }

        Ok(Self {
            users,
            products,
            row_index,
            scores,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Cannot open prediction matrix {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Malformed prediction matrix {}", path.display()))
    }

    /// Reads the CSV export of the matrix: the header holds an index label
    /// followed by product names, each row a username followed by scores.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            bail!("Prediction matrix header is empty");
        }
        let products: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut users = Vec::new();
        let mut values = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut fields = record.iter();
            let user = fields
                .next()
                .ok_or_else(|| anyhow!("Row {} has no username", line + 2))?;
            users.push(user.to_string());

            for (column, cell) in fields.enumerate() {
                let score = parse_score(cell).with_context(|| {
                    format!("Row {} column '{}'", line + 2, products[column])
                })?;
                values.push(score);
            }
        }

        let scores = Array2::from_shape_vec((users.len(), products.len()), values)?;
        Self::new(users, products, scores)
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    /// The user's scores in column order, or `None` for an unknown user.
    pub fn row(&self, username: &str) -> Option<ArrayView1<'_, f64>> {
        self.row_index
            .get(username)
            .map(|&row| self.scores.row(row))
    }

    pub fn n_users(&self) -> usize {
        self.row_index.len()
    }

    pub fn n_products(&self) -> usize {
        self.products.len()
    }
}

fn parse_score(cell: &str) -> Result<f64> {
    let trimmed = cell.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|e| anyhow!("Invalid score '{}': {}", trimmed, e))
}
