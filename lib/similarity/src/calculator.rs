//! Pairwise similarity between sparse rating vectors
//!
//! Vectors are `item → value` maps when comparing users and `user → value`
//! maps when comparing items. Every function is symmetric in its arguments
//! and returns 0.0 whenever the similarity is undefined (too little overlap,
//! zero variance, zero magnitude, empty union).

use prodrec_core::{RatingVector, SimilarityMetric};

/// Variance at or below this is treated as zero
const VARIANCE_EPSILON: f64 = 1e-12;

/// Calculate similarity between two rating vectors
///
/// # Arguments
/// * `a` - First rating vector
/// * `b` - Second rating vector
/// * `metric` - The similarity metric to use
///
/// # Returns
/// Pearson and cosine in [-1.0, 1.0]; Jaccard in [0.0, 1.0]
pub fn similarity(a: &RatingVector, b: &RatingVector, metric: SimilarityMetric) -> f64 {
    match metric {
        SimilarityMetric::Pearson => pearson(a, b),
        SimilarityMetric::Cosine => cosine(a, b),
        SimilarityMetric::Jaccard => jaccard(a, b),
    }
}

/// Pearson correlation over the co-rated keys
///
/// Fewer than two co-rated keys, or zero variance on either side over
/// that set, yields 0.0.
pub fn pearson(a: &RatingVector, b: &RatingVector) -> f64 {
    let pairs: Vec<(f64, f64)> = co_rated(a, b).collect();
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a <= VARIANCE_EPSILON || var_b <= VARIANCE_EPSILON {
        return 0.0;
    }

    bounded(covariance / (var_a.sqrt() * var_b.sqrt()), -1.0)
}

/// Dot product over the co-rated keys divided by the product of the two
/// full-vector magnitudes
pub fn cosine(a: &RatingVector, b: &RatingVector) -> f64 {
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = co_rated(a, b).map(|(x, y)| x * y).sum();
    bounded(dot / (mag_a * mag_b), -1.0)
}

/// Size of the key intersection over size of the key union
pub fn jaccard(a: &RatingVector, b: &RatingVector) -> f64 {
    let intersection = a.keys().filter(|k| b.contains_key(k)).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        0.0
    } else {
        bounded(intersection as f64 / union as f64, 0.0)
    }
}

/// Value pairs for keys present in both vectors, in ascending key order.
/// Swapping the arguments yields the same keys in the same order.
fn co_rated<'a>(a: &'a RatingVector, b: &'a RatingVector) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter()
        .filter_map(move |(key, x)| b.get(key).map(|y| (*x, *y)))
}

fn magnitude(v: &RatingVector) -> f64 {
    v.values().map(|x| x * x).sum::<f64>().sqrt()
}

/// Clamp into `[lower, 1.0]`, mapping non-finite values to 0.0
#[inline]
fn bounded(value: f64, lower: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lower, 1.0)
    } else {
        0.0
    }
}
