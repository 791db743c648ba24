//! Deterministic ordering shared by every engine.
//!
//! Scores sort descending and ties break by ascending id, so output never
//! depends on container iteration order.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

use crate::Recommendation;

/// Descending by score, then ascending by id
#[inline]
pub fn score_then_id(a_id: u32, a_score: f64, b_id: u32, b_score: f64) -> Ordering {
    OrderedFloat(b_score)
        .cmp(&OrderedFloat(a_score))
        .then(a_id.cmp(&b_id))
}

/// Sort `(id, score)` pairs best-first and keep at most `k`
pub fn top_k(mut scored: Vec<(u32, f64)>, k: usize) -> Vec<(u32, f64)> {
    scored.sort_by(|a, b| score_then_id(a.0, a.1, b.0, b.1));
    scored.truncate(k);
    scored
}

/// Sort recommendations best-first and keep at most `n`
pub fn rank_recommendations(mut recs: Vec<Recommendation>, n: usize) -> Vec<Recommendation> {
    recs.sort_by(|a, b| score_then_id(a.item_id, a.score, b.item_id, b.score));
    recs.truncate(n);
    recs
}

/// Min-max normalize scores to `[0.0, 1.0]`.
///
/// If all scores are equal, they are normalized to `1.0`.
pub fn min_max_normalize(scored: &[(u32, f64)]) -> Vec<(u32, f64)> {
    if scored.is_empty() {
        return Vec::new();
    }

    let s_min = scored.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let s_max = scored.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);

    scored
        .iter()
        .map(|(id, s)| {
            let norm = if (s_max - s_min).abs() < f64::EPSILON {
                1.0
            } else {
                (s - s_min) / (s_max - s_min)
            };
            (*id, norm)
        })
        .collect()
}
