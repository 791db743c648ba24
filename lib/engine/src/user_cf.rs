//! User-based collaborative filtering
//!
//! Neighbors are the users most similar to the target under the requested
//! metric. Each item a neighbor rated and the target did not is scored as
//! the similarity-weighted average of the neighbors' ratings for it.

use ahash::AHashMap;
use prodrec_core::ranking::{rank_recommendations, top_k};
use prodrec_core::{
    Error, ItemId, RatingIndex, RatingVector, Recommendation, Result, SimilarityMetric, Source,
    UserId,
};
use prodrec_similarity::similarity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::recommender::{RecommendRequest, Recommender};

pub const DEFAULT_NEIGHBOR_POOL: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCfConfig {
    /// Number of neighbors consulted per recommendation, independent of `n`
    pub neighbor_pool: usize,
}

impl Default for UserCfConfig {
    fn default() -> Self {
        Self {
            neighbor_pool: DEFAULT_NEIGHBOR_POOL,
        }
    }
}

impl UserCfConfig {
    pub fn validate(&self) -> Result<()> {
        if self.neighbor_pool == 0 {
            return Err(Error::InvalidConfig(
                "user_cf neighbor pool must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct UserBasedCf {
    index: Arc<RatingIndex>,
    config: UserCfConfig,
}

impl UserBasedCf {
    pub fn new(index: Arc<RatingIndex>, neighbor_pool: usize) -> Result<Self> {
        Self::with_config(index, UserCfConfig { neighbor_pool })
    }

    pub fn with_config(index: Arc<RatingIndex>, config: UserCfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { index, config })
    }

    #[inline]
    pub fn neighbor_pool(&self) -> usize {
        self.config.neighbor_pool
    }

    #[inline]
    pub fn index(&self) -> &Arc<RatingIndex> {
        &self.index
    }

    /// Top `k` users by similarity to `target`, best first, ties by
    /// ascending user id. The target itself is never included. Unknown
    /// targets yield an empty list.
    pub fn find_similar_users(
        &self,
        target: UserId,
        k: usize,
        metric: SimilarityMetric,
    ) -> Vec<(UserId, f64)> {
        let Some(target_ratings) = self.index.user_ratings(target) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let scored: Vec<(UserId, f64)> = self
            .index
            .users()
            .filter(|(user_id, _)| *user_id != target)
            .map(|(user_id, ratings)| (user_id, similarity(target_ratings, ratings, metric)))
            .collect();

        top_k(scored, k)
    }

    /// Predict scores for items the target has not rated, best first.
    ///
    /// `predicted = Σ(sim·rating) / Σ|sim|` over neighbors with positive
    /// similarity that rated the item.
    pub fn recommend(&self, target: UserId, n: usize, metric: SimilarityMetric) -> Vec<Recommendation> {
        let Some(target_ratings) = self.index.user_ratings(target) else {
            return Vec::new();
        };
        self.predict(target, target_ratings, &RatingVector::new(), n, metric)
    }

    fn predict(
        &self,
        target: UserId,
        own: &RatingVector,
        extra: &RatingVector,
        n: usize,
        metric: SimilarityMetric,
    ) -> Vec<Recommendation> {
        if n == 0 {
            return Vec::new();
        }

        let neighbors = self.find_similar_users(target, self.config.neighbor_pool, metric);

        let mut accumulators: AHashMap<ItemId, (f64, f64)> = AHashMap::new();
        for (neighbor, sim) in &neighbors {
            if *sim <= 0.0 {
                continue;
            }
            let Some(ratings) = self.index.user_ratings(*neighbor) else {
                continue;
            };
            for (item_id, value) in ratings {
                if own.contains_key(item_id) || extra.contains_key(item_id) {
                    continue;
                }
                let entry = accumulators.entry(*item_id).or_insert((0.0, 0.0));
                entry.0 += sim * value;
                entry.1 += sim.abs();
            }
        }

        tracing::debug!(
            user_id = target,
            metric = %metric,
            neighbors = neighbors.len(),
            candidates = accumulators.len(),
            "user_cf prediction"
        );

        let recs = accumulators
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .map(|(item_id, (num, weight))| Recommendation::new(item_id, num / weight, Source::UserCf))
            .collect();

        rank_recommendations(recs, n)
    }
}

impl Recommender for UserBasedCf {
    fn source(&self) -> Source {
        Source::UserCf
    }

    fn candidates(&self, req: &RecommendRequest<'_>) -> Vec<Recommendation> {
        let Some(own) = self.index.user_ratings(req.user_id) else {
            return Vec::new();
        };
        self.predict(req.user_id, own, req.rated, req.n, req.metric)
    }
}
