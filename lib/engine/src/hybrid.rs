//! Weighted blend of the three base engines
//!
//! Each engine contributes a candidate pool of `pool_factor × n` items. Its
//! scores are min-max normalized within that pool, multiplied by the
//! engine's normalized weight and summed per item; an engine that did not
//! return an item contributes 0 for it. Engines with zero weight are not
//! consulted, so their candidates never enter the blend.

use parking_lot::RwLock;
use prodrec_core::ranking::{min_max_normalize, rank_recommendations};
use prodrec_core::{
    Error, ItemId, RatingVector, Recommendation, Result, ScoreBreakdown, SimilarityMetric, Source,
    UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::item_cf::ItemBasedCf;
use crate::popularity::PopularityEngine;
use crate::recommender::{RecommendRequest, Recommender};
use crate::user_cf::UserBasedCf;

pub const DEFAULT_POOL_FACTOR: usize = 3;

/// Blend weights for user-CF, item-CF and popularity.
///
/// Stored as given; [`normalized`](Self::normalized) rescales them to sum
/// to 1.0 at blend time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub user_cf: f64,
    pub item_cf: f64,
    pub popularity: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            user_cf: 0.50,
            item_cf: 0.35,
            popularity: 0.15,
        }
    }
}

impl HybridWeights {
    pub fn new(user_cf: f64, item_cf: f64, popularity: f64) -> Result<Self> {
        let weights = Self {
            user_cf,
            item_cf,
            popularity,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Every weight finite and non-negative, with a positive sum
    pub fn validate(&self) -> Result<()> {
        for (component, value) in [
            ("user_cf", self.user_cf),
            ("item_cf", self.item_cf),
            ("popularity", self.popularity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::NegativeWeight { component, value });
            }
        }
        if self.sum() <= 0.0 {
            return Err(Error::ZeroTotalWeight);
        }
        Ok(())
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.user_cf + self.item_cf + self.popularity
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.sum();
        if total <= 0.0 {
            return *self;
        }
        Self {
            user_cf: self.user_cf / total,
            item_cf: self.item_cf / total,
            popularity: self.popularity / total,
        }
    }

    /// Weight of one blended engine. The hybrid itself is not a blend input
    /// and weighs 0.0.
    pub fn weight(&self, source: Source) -> f64 {
        match source {
            Source::UserCf => self.user_cf,
            Source::ItemCf => self.item_cf,
            Source::Popularity => self.popularity,
            Source::Hybrid => 0.0,
        }
    }
}

impl std::str::FromStr for HybridWeights {
    type Err = Error;

    /// Parses `"user_cf,item_cf,popularity"`, e.g. `"0.5,0.35,0.15"`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(Error::InvalidConfig(format!(
                "expected three comma-separated weights, got '{}'",
                s
            )));
        }
        let mut values = [0.0f64; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("invalid weight '{}'", part)))?;
        }
        Self::new(values[0], values[1], values[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    pub weights: HybridWeights,
    /// Each engine is asked for `pool_factor × n` candidates
    pub pool_factor: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            weights: HybridWeights::default(),
            pool_factor: DEFAULT_POOL_FACTOR,
        }
    }
}

impl HybridConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if self.pool_factor == 0 {
            return Err(Error::InvalidConfig(
                "hybrid pool factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct HybridRecommender {
    user_cf: Arc<UserBasedCf>,
    item_cf: Arc<ItemBasedCf>,
    popularity: Arc<PopularityEngine>,
    weights: RwLock<HybridWeights>,
    pool_factor: usize,
}

impl HybridRecommender {
    pub fn new(
        user_cf: Arc<UserBasedCf>,
        item_cf: Arc<ItemBasedCf>,
        popularity: Arc<PopularityEngine>,
    ) -> Self {
        Self {
            user_cf,
            item_cf,
            popularity,
            weights: RwLock::new(HybridWeights::default()),
            pool_factor: DEFAULT_POOL_FACTOR,
        }
    }

    pub fn with_config(
        user_cf: Arc<UserBasedCf>,
        item_cf: Arc<ItemBasedCf>,
        popularity: Arc<PopularityEngine>,
        config: HybridConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            user_cf,
            item_cf,
            popularity,
            weights: RwLock::new(config.weights),
            pool_factor: config.pool_factor,
        })
    }

    /// Replace the blend weights. On error the previous weights stay in
    /// effect.
    pub fn set_weights(&self, user_cf: f64, item_cf: f64, popularity: f64) -> Result<()> {
        let weights = HybridWeights::new(user_cf, item_cf, popularity)?;
        *self.weights.write() = weights;
        tracing::info!(user_cf, item_cf, popularity, "hybrid weights updated");
        Ok(())
    }

    /// Weights as last set, before normalization
    pub fn weights(&self) -> HybridWeights {
        *self.weights.read()
    }

    #[inline]
    pub fn pool_size(&self, n: usize) -> usize {
        n.saturating_mul(self.pool_factor)
    }

    /// Blend the three engines for `target`.
    ///
    /// Items in `rated` or in the target's indexed ratings are never
    /// returned. Each result carries its per-engine [`ScoreBreakdown`].
    pub fn recommend(
        &self,
        target: UserId,
        rated: &RatingVector,
        n: usize,
        metric: SimilarityMetric,
    ) -> Vec<Recommendation> {
        if n == 0 {
            return Vec::new();
        }

        let weights = self.weights().normalized();
        let req = RecommendRequest {
            user_id: target,
            rated,
            n: self.pool_size(n),
            metric,
        };

        let engines: [&dyn Recommender; 3] = [
            self.user_cf.as_ref(),
            self.item_cf.as_ref(),
            self.popularity.as_ref(),
        ];

        let mut blended: BTreeMap<ItemId, ScoreBreakdown> = BTreeMap::new();
        for engine in engines {
            let source = engine.source();
            if weights.weight(source) <= 0.0 {
                continue;
            }

            let pool: Vec<(ItemId, f64)> = engine
                .candidates(&req)
                .into_iter()
                .map(|rec| (rec.item_id, rec.score))
                .collect();

            tracing::trace!(user_id = target, source = %source, pool = pool.len(), "hybrid pool");

            for (item_id, score) in min_max_normalize(&pool) {
                let entry = blended.entry(item_id).or_insert_with(|| empty_breakdown(&weights));
                match source {
                    Source::UserCf => entry.user_cf = score,
                    Source::ItemCf => entry.item_cf = score,
                    Source::Popularity => entry.popularity = score,
                    Source::Hybrid => {}
                }
            }
        }

        let own = self.user_cf.index().user_ratings(target);
        let recs: Vec<Recommendation> = blended
            .into_iter()
            .filter(|(item_id, _)| {
                !rated.contains_key(item_id) && !own.is_some_and(|r| r.contains_key(item_id))
            })
            .map(|(item_id, breakdown)| {
                Recommendation::new(item_id, breakdown.total(), Source::Hybrid).with_explain(breakdown)
            })
            .collect();

        tracing::debug!(
            user_id = target,
            metric = %metric,
            candidates = recs.len(),
            "hybrid blend"
        );

        rank_recommendations(recs, n)
    }
}

impl Recommender for HybridRecommender {
    fn source(&self) -> Source {
        Source::Hybrid
    }

    fn candidates(&self, req: &RecommendRequest<'_>) -> Vec<Recommendation> {
        self.recommend(req.user_id, req.rated, req.n, req.metric)
    }
}

fn empty_breakdown(weights: &HybridWeights) -> ScoreBreakdown {
    ScoreBreakdown {
        user_cf: 0.0,
        item_cf: 0.0,
        popularity: 0.0,
        user_cf_weight: weights.user_cf,
        item_cf_weight: weights.item_cf,
        popularity_weight: weights.popularity,
    }
}
