use crate::models::Candidate;
use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Highest `k` scores of a prediction row, skipping missing (NaN) cells.
///
/// Equal scores keep their column order.
pub fn top_k_stable(scores: ArrayView1<'_, f64>, products: &[String], k: usize) -> Vec<Candidate> {
    let mut scored: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(k)
        .map(|(column, score)| Candidate::new(products[column].clone(), score))
        .collect()
}

/// Stable descending sort by `key`, NaN keys last.
pub fn sort_descending_by<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        match (ka.is_nan(), kb.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => kb.partial_cmp(&ka).unwrap_or(Ordering::Equal),
        }
    });
}
