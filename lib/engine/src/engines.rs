use prodrec_core::{Catalog, RatingIndex, RatingVector, Recommendation, Result, SimilarityMetric, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::hybrid::{HybridConfig, HybridRecommender};
use crate::item_cf::{ItemBasedCf, ItemCfConfig};
use crate::popularity::PopularityEngine;
use crate::recommender::Strategy;
use crate::user_cf::{UserBasedCf, UserCfConfig};

/// Tuning for every engine, validated together at construction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub user_cf: UserCfConfig,
    pub item_cf: ItemCfConfig,
    pub hybrid: HybridConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.user_cf.validate()?;
        self.item_cf.validate()?;
        self.hybrid.validate()
    }
}

/// The four engines built over one shared index and catalog
pub struct Engines {
    index: Arc<RatingIndex>,
    catalog: Arc<Catalog>,
    pub user_cf: Arc<UserBasedCf>,
    pub item_cf: Arc<ItemBasedCf>,
    pub popularity: Arc<PopularityEngine>,
    pub hybrid: HybridRecommender,
}

impl Engines {
    pub fn build(index: Arc<RatingIndex>, catalog: Arc<Catalog>, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let user_cf = Arc::new(UserBasedCf::with_config(index.clone(), config.user_cf)?);
        let item_cf = Arc::new(ItemBasedCf::with_config(index.clone(), config.item_cf)?);
        let popularity = Arc::new(PopularityEngine::new(index.clone(), catalog.clone()));
        let hybrid = HybridRecommender::with_config(
            user_cf.clone(),
            item_cf.clone(),
            popularity.clone(),
            config.hybrid,
        )?;

        tracing::info!(
            users = index.user_count(),
            items = catalog.len(),
            ratings = index.len(),
            "engines ready"
        );

        Ok(Self {
            index,
            catalog,
            user_cf,
            item_cf,
            popularity,
            hybrid,
        })
    }

    pub fn index(&self) -> &Arc<RatingIndex> {
        &self.index
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Dispatch to one strategy using the user's indexed ratings as the
    /// rated map
    pub fn recommend(
        &self,
        strategy: Strategy,
        user_id: UserId,
        n: usize,
        metric: SimilarityMetric,
    ) -> Vec<Recommendation> {
        let empty = RatingVector::new();
        let rated = self.index.user_ratings(user_id).unwrap_or(&empty);

        match strategy {
            Strategy::UserCf => self.user_cf.recommend(user_id, n, metric),
            Strategy::ItemCf => self.item_cf.recommend(user_id, n),
            Strategy::Popularity => self.popularity.recommend(user_id, rated, n),
            Strategy::Hybrid => self.hybrid.recommend(user_id, rated, n, metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{shop_catalog, shop_index};
    use crate::hybrid::HybridWeights;

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.hybrid.weights = HybridWeights {
            user_cf: -0.5,
            item_cf: 1.0,
            popularity: 1.0,
        };
        let err = Engines::build(shop_index(), shop_catalog(), config).err().unwrap();
        assert!(err.is_invalid_configuration());

        let mut config = EngineConfig::default();
        config.user_cf.neighbor_pool = 0;
        assert!(Engines::build(shop_index(), shop_catalog(), config).is_err());
    }

    #[test]
    fn test_every_strategy_excludes_rated_items() {
        let engines = Engines::build(shop_index(), shop_catalog(), EngineConfig::default()).unwrap();
        let strategies = [Strategy::UserCf, Strategy::ItemCf, Strategy::Popularity, Strategy::Hybrid];

        for (user_id, rated) in engines.index().users() {
            for strategy in strategies {
                for metric in SimilarityMetric::ALL {
                    let recs = engines.recommend(strategy, user_id, 5, metric);
                    assert!(recs.len() <= 5);
                    assert!(recs.iter().all(|r| !rated.contains_key(&r.item_id)));
                    assert!(engines.recommend(strategy, user_id, 0, metric).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_unknown_user() {
        let engines = Engines::build(shop_index(), shop_catalog(), EngineConfig::default()).unwrap();
        assert!(engines.recommend(Strategy::UserCf, 404, 5, SimilarityMetric::Pearson).is_empty());
        assert!(engines.recommend(Strategy::ItemCf, 404, 5, SimilarityMetric::Pearson).is_empty());
        assert_eq!(engines.recommend(Strategy::Popularity, 404, 5, SimilarityMetric::Pearson).len(), 5);
        assert_eq!(engines.recommend(Strategy::Hybrid, 404, 5, SimilarityMetric::Pearson).len(), 5);
    }
}
