use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ItemId;

/// The engine that produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    UserCf,
    ItemCf,
    Popularity,
    Hybrid,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::UserCf => "user_cf",
            Source::ItemCf => "item_cf",
            Source::Popularity => "popularity",
            Source::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-engine contribution to a hybrid score.
///
/// Scores are min-max normalized within each engine's candidate pool
/// (0.0 when the engine did not return the item). Weights are the
/// normalized blend weights in effect for the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub user_cf: f64,
    pub item_cf: f64,
    pub popularity: f64,
    pub user_cf_weight: f64,
    pub item_cf_weight: f64,
    pub popularity_weight: f64,
}

impl ScoreBreakdown {
    /// Weighted contribution of one engine
    pub fn contribution(&self, source: Source) -> f64 {
        match source {
            Source::UserCf => self.user_cf * self.user_cf_weight,
            Source::ItemCf => self.item_cf * self.item_cf_weight,
            Source::Popularity => self.popularity * self.popularity_weight,
            Source::Hybrid => self.total(),
        }
    }

    pub fn total(&self) -> f64 {
        self.user_cf * self.user_cf_weight
            + self.item_cf * self.item_cf_weight
            + self.popularity * self.popularity_weight
    }

    /// The engine whose weighted contribution is largest. Ties resolve in
    /// the order user-CF, item-CF, popularity.
    pub fn dominant(&self) -> Source {
        let mut best = Source::UserCf;
        for source in [Source::ItemCf, Source::Popularity] {
            if self.contribution(source) > self.contribution(best) {
                best = source;
            }
        }
        best
    }
}

/// A ranked suggestion: item, predicted score and the engine that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub score: f64,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreBreakdown>,
}

impl Recommendation {
    #[inline]
    #[must_use]
    pub fn new(item_id: ItemId, score: f64, source: Source) -> Self {
        Self {
            item_id,
            score,
            source,
            explain: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_explain(mut self, explain: ScoreBreakdown) -> Self {
        self.explain = Some(explain);
        self
    }
}
