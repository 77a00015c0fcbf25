use rand::Rng;
use rand_distr::StandardNormal;
use std::cmp::Ordering;
use crate::errors::{DecisionError, Result};

/// Higher score first; NaN sorts after every number.
pub fn cmp_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Indices of `scores`, best first. Ties keep input order.
pub fn rank_indices(scores: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..scores.len()).collect();
    idx.sort_by(|&i, &j| cmp_scores(scores[i], scores[j]));
    idx
}

/// Reorder `variants` by `scores`, best first.
pub fn rank<T: Clone>(variants: &[T], scores: &[f64]) -> Result<Vec<T>> {
    if variants.len() != scores.len() {
        return Err(DecisionError::invalid(format!(
            "{} variants but {} scores",
            variants.len(),
            scores.len()
        )));
    }
    Ok(rank_indices(scores).into_iter().map(|i| variants[i].clone()).collect())
}

/// `n` standard-normal samples sorted high to low.
pub fn descending_gaussians<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    let mut out: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
    out.sort_by(|a, b| cmp_scores(*a, *b));
    out
}
