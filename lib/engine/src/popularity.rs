//! Non-personalized ranking by average rating
//!
//! Catalog items are ordered by average rating descending, then rating
//! count descending, then item id ascending. The global order is computed
//! once at construction; requests only filter and truncate it.

use ordered_float::OrderedFloat;
use prodrec_core::{Catalog, ItemId, RatingIndex, RatingVector, Recommendation, Source, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::recommender::{RecommendRequest, Recommender};

/// Aggregate rating figures for one catalog item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPopularity {
    pub item_id: ItemId,
    pub average: f64,
    pub count: usize,
}

impl ItemPopularity {
    fn rank_order(&self, other: &Self) -> Ordering {
        OrderedFloat(other.average)
            .cmp(&OrderedFloat(self.average))
            .then(other.count.cmp(&self.count))
            .then(self.item_id.cmp(&other.item_id))
    }
}

pub struct PopularityEngine {
    index: Arc<RatingIndex>,
    catalog: Arc<Catalog>,
    ranked: Vec<ItemPopularity>,
}

impl PopularityEngine {
    pub fn new(index: Arc<RatingIndex>, catalog: Arc<Catalog>) -> Self {
        let mut ranked: Vec<ItemPopularity> = catalog
            .ids()
            .map(|item_id| popularity_of(&index, item_id))
            .collect();
        ranked.sort_by(|a, b| a.rank_order(b));

        tracing::debug!(items = ranked.len(), "popularity ranking built");

        Self {
            index,
            catalog,
            ranked,
        }
    }

    /// Mean rating of an item, 0.0 when it has no ratings
    pub fn average_rating(&self, item_id: ItemId) -> f64 {
        popularity_of(&self.index, item_id).average
    }

    pub fn rating_count(&self, item_id: ItemId) -> usize {
        self.index.item_ratings(item_id).map_or(0, |r| r.len())
    }

    pub fn popularity(&self, item_id: ItemId) -> ItemPopularity {
        popularity_of(&self.index, item_id)
    }

    /// Every catalog item in global rank order
    pub fn ranked(&self) -> &[ItemPopularity] {
        &self.ranked
    }

    /// Top `n` catalog items the user has not rated. A `user_id` of 0 or an
    /// id unknown to the index ignores `rated` and returns the global order.
    pub fn recommend(&self, user_id: UserId, rated: &RatingVector, n: usize) -> Vec<Recommendation> {
        let personalized = user_id != 0 && self.index.contains_user(user_id);
        self.take(n, |item_id| personalized && rated.contains_key(&item_id))
    }

    /// Same ranking restricted to one category (exact, case-sensitive match)
    pub fn recommend_by_category(
        &self,
        category: &str,
        excluded: &BTreeSet<ItemId>,
        n: usize,
    ) -> Vec<Recommendation> {
        self.take(n, |item_id| {
            excluded.contains(&item_id)
                || self
                    .catalog
                    .get(item_id)
                    .map_or(true, |product| product.category != category)
        })
    }

    fn take(&self, n: usize, skip: impl Fn(ItemId) -> bool) -> Vec<Recommendation> {
        self.ranked
            .iter()
            .filter(|entry| !skip(entry.item_id))
            .take(n)
            .map(|entry| Recommendation::new(entry.item_id, entry.average, Source::Popularity))
            .collect()
    }
}

impl Recommender for PopularityEngine {
    fn source(&self) -> Source {
        Source::Popularity
    }

    fn candidates(&self, req: &RecommendRequest<'_>) -> Vec<Recommendation> {
        let personalized = req.user_id != 0 && self.index.contains_user(req.user_id);
        let own = self.index.user_ratings(req.user_id);
        self.take(req.n, |item_id| {
            personalized
                && (req.rated.contains_key(&item_id)
                    || own.is_some_and(|r| r.contains_key(&item_id)))
        })
    }
}

fn popularity_of(index: &RatingIndex, item_id: ItemId) -> ItemPopularity {
    match index.item_ratings(item_id) {
        Some(raters) if !raters.is_empty() => ItemPopularity {
            item_id,
            average: raters.values().sum::<f64>() / raters.len() as f64,
            count: raters.len(),
        },
        _ => ItemPopularity {
            item_id,
            average: 0.0,
            count: 0,
        },
    }
}
