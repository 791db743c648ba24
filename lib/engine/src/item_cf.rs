//! Item-based collaborative filtering
//!
//! Items are compared through the users who rated both. A candidate's
//! predicted score is the similarity-weighted average of the target user's
//! own ratings on the items it resembles.

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCfConfig {
    /// Similar items consulted per rated item. `None` consults every item.
    pub neighbor_pool: Option<usize>,
    pub metric: SimilarityMetric,
}

impl Default for ItemCfConfig {
    fn default() -> Self {
        Self {
            neighbor_pool: None,
            metric: SimilarityMetric::Cosine,
        }
    }
}

impl ItemCfConfig {
    pub fn validate(&self) -> Result<()> {
        if self.neighbor_pool == Some(0) {
            return Err(Error::InvalidConfig(
                "item_cf neighbor pool must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct ItemBasedCf {
    index: Arc<RatingIndex>,
    config: ItemCfConfig,
}

impl ItemBasedCf {
    pub fn new(index: Arc<RatingIndex>) -> Self {
        Self {
            index,
            config: ItemCfConfig::default(),
        }
    }

    pub fn with_config(index: Arc<RatingIndex>, config: ItemCfConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { index, config })
    }

    pub fn config(&self) -> &ItemCfConfig {
        &self.config
    }

    /// Top `k` items by similarity to `item_id` over their co-rating users.
    /// The item itself is excluded and unknown items yield an empty list.
    pub fn get_most_similar_items(&self, item_id: ItemId, k: usize) -> Vec<(ItemId, f64)> {
        let Some(raters) = self.index.item_ratings(item_id) else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let scored: Vec<(ItemId, f64)> = self
            .index
            .items()
            .filter(|(other, _)| *other != item_id)
            .map(|(other, other_raters)| (other, similarity(raters, other_raters, self.config.metric)))
            .collect();

        top_k(scored, k)
    }

    /// Predict scores for the items `target` has not rated, best first
    pub fn recommend(&self, target: UserId, n: usize) -> Vec<Recommendation> {
        let Some(own) = self.index.user_ratings(target) else {
            return Vec::new();
        };
        self.predict(target, own, &RatingVector::new(), n)
    }

    fn predict(&self, target: UserId, own: &RatingVector, extra: &RatingVector, n: usize) -> Vec<Recommendation> {
        if n == 0 || own.is_empty() {
            return Vec::new();
        }

        let pool = self.config.neighbor_pool.unwrap_or_else(|| self.index.item_count());

        let mut accumulators: AHashMap<ItemId, (f64, f64)> = AHashMap::new();
        for (rated_item, value) in own {
            for (candidate, sim) in self.get_most_similar_items(*rated_item, pool) {
                if sim <= 0.0 || own.contains_key(&candidate) || extra.contains_key(&candidate) {
                    continue;
                }
                let entry = accumulators.entry(candidate).or_insert((0.0, 0.0));
                entry.0 += sim * value;
                entry.1 += sim.abs();
            }
        }

        tracing::debug!(
            user_id = target,
            metric = %self.config.metric,
            rated = own.len(),
            candidates = accumulators.len(),
            "item_cf prediction"
        );

        let recs = accumulators
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .map(|(item_id, (num, weight))| Recommendation::new(item_id, num / weight, Source::ItemCf))
            .collect();

        rank_recommendations(recs, n)
    }
}

impl Recommender for ItemBasedCf {
    fn source(&self) -> Source {
        Source::ItemCf
    }

    /// Item similarity uses the configured metric; `req.metric` is ignored
    fn candidates(&self, req: &RecommendRequest<'_>) -> Vec<Recommendation> {
        let Some(own) = self.index.user_ratings(req.user_id) else {
            return Vec::new();
        };
        self.predict(req.user_id, own, req.rated, req.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{shop_index, three_users};
    use prodrec_core::Rating;

    #[test]
    fn test_similar_items_example_dataset() {
        let cf = ItemBasedCf::new(three_users());

        // 101 and 102 share raters 1 and 2; 103 shares only rater 2
        let similar = cf.get_most_similar_items(101, 5);
        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].0, 102);
        assert!(similar[0].1 > similar[1].1);
        assert!(similar.iter().all(|(item, _)| *item != 101));
    }

    #[test]
    fn test_similar_items_truncates_to_k() {
        let cf = ItemBasedCf::new(shop_index());
        assert_eq!(cf.get_most_similar_items(101, 3).len(), 3);
        assert!(cf.get_most_similar_items(101, 0).is_empty());
        assert!(cf.get_most_similar_items(999, 3).is_empty());
    }

    #[test]
    fn test_recommend_example_dataset() {
        let cf = ItemBasedCf::new(three_users());
        let recs = cf.recommend(1, 5);

        // 103 is similar to both 101 and 102 through user 2
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item_id, 103);
        assert_eq!(recs[0].source, Source::ItemCf);

        let s1 = cf.get_most_similar_items(103, 5)
            .into_iter()
            .find(|(item, _)| *item == 101)
            .unwrap()
            .1;
        let s2 = cf.get_most_similar_items(103, 5)
            .into_iter()
            .find(|(item, _)| *item == 102)
            .unwrap()
            .1;
        let expected = (s1 * 5.0 + s2 * 3.0) / (s1 + s2);
        assert!((recs[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_user_without_ratings_is_empty() {
        let cf = ItemBasedCf::new(three_users());
        assert!(cf.recommend(42, 5).is_empty());
        assert!(cf.recommend(1, 0).is_empty());
    }

    #[test]
    fn test_never_recommends_rated_items() {
        let index = shop_index();
        let cf = ItemBasedCf::new(index.clone());

        for (user_id, rated) in index.users() {
            let recs = cf.recommend(user_id, 10);
            for rec in &recs {
                assert!(!rated.contains_key(&rec.item_id));
                assert!(rec.score >= 1.0 - 1e-9 && rec.score <= 5.0 + 1e-9);
            }
            for pair in recs.windows(2) {
                assert!(pair[0].score > pair[1].score || (pair[0].score == pair[1].score && pair[0].item_id < pair[1].item_id));
            }
        }
    }

    #[test]
    fn test_neighbor_pool_limits_contributors() {
        // Item 1 resembles 2 strongly and 3 weakly; with a pool of one only
        // item 2 can be reached from item 1
        let index = Arc::new(RatingIndex::from_ratings(
            [
                (1, 1, 5.0),
                (2, 1, 4.0),
                (2, 2, 4.0),
                (3, 1, 3.0),
                (3, 2, 3.0),
                (3, 3, 1.0),
            ]
            .into_iter()
            .map(|(u, i, v)| Rating::new(u, i, v).unwrap()),
        ));

        let unlimited = ItemBasedCf::new(index.clone());
        let items: Vec<ItemId> = unlimited.recommend(1, 5).iter().map(|r| r.item_id).collect();
        assert_eq!(items, vec![2, 3]);

        let limited = ItemBasedCf::with_config(
            index,
            ItemCfConfig {
                neighbor_pool: Some(1),
                metric: SimilarityMetric::Cosine,
            },
        )
        .unwrap();
        let items: Vec<ItemId> = limited.recommend(1, 5).iter().map(|r| r.item_id).collect();
        assert_eq!(items, vec![2]);
    }

    #[test]
    fn test_rejects_zero_neighbor_pool() {
        let err = ItemBasedCf::with_config(
            three_users(),
            ItemCfConfig {
                neighbor_pool: Some(0),
                metric: SimilarityMetric::Jaccard,
            },
        )
        .err()
        .unwrap();
        assert!(err.is_invalid_configuration());
    }

    fn index_of(ratings: &[(u32, u32, f64)]) -> Arc<RatingIndex> {
        Arc::new(RatingIndex::from_ratings(
            ratings.iter().map(|&(u, i, v)| Rating::new(u, i, v).unwrap()),
        ))
    }

    #[test]
    fn test_negatively_correlated_items_are_not_recommended() {
        // Items 1 and 2 are rated in opposite directions by users 1-3
        let index = index_of(&[
            (1, 1, 5.0),
            (1, 2, 1.0),
            (2, 1, 1.0),
            (2, 2, 5.0),
            (3, 1, 3.0),
            (3, 2, 3.0),
            (4, 1, 4.0),
        ]);
        let engine = ItemBasedCf::with_config(
            index,
            ItemCfConfig {
                neighbor_pool: None,
                metric: SimilarityMetric::Pearson,
            },
        )
        .unwrap();

        let similar = engine.get_most_similar_items(1, 5);
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].0, 2);
        assert!(similar[0].1 < 0.0);

        assert!(engine.recommend(4, 5).is_empty());
    }

    #[test]
    fn test_items_without_co_raters_are_omitted() {
        // Item 2 shares no rater with item 1; item 3 shares user 3
        let index = index_of(&[(1, 1, 4.0), (2, 2, 5.0), (3, 1, 5.0), (3, 3, 3.0)]);
        let engine = ItemBasedCf::new(index);

        let similar = engine.get_most_similar_items(1, 5);
        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].0, 3);
        assert!(similar[0].1 > 0.0);
        assert_eq!(similar[1], (2, 0.0));

        let recs = engine.recommend(1, 5);
        let ids: Vec<ItemId> = recs.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![3]);
        assert!((recs[0].score - 4.0).abs() < 1e-12);
    }
}
