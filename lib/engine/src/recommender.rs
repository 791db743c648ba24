use prodrec_core::{Error, RatingVector, Recommendation, SimilarityMetric, Source, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bundles the inputs of a single recommendation call
#[derive(Debug, Clone, Copy)]
pub struct RecommendRequest<'a> {
    pub user_id: UserId,
    /// Items the caller considers already rated by the user (item → value)
    pub rated: &'a RatingVector,
    /// Maximum results to return
    pub n: usize,
    /// Metric for engines that compare users on demand
    pub metric: SimilarityMetric,
}

/// The single capability every engine shares: produce ranked candidates
/// for a user.
///
/// Implementations return at most `req.n` recommendations, best first,
/// ties broken by ascending item id, never containing an item the user
/// has already rated.
pub trait Recommender: Send + Sync {
    fn source(&self) -> Source;

    fn candidates(&self, req: &RecommendRequest<'_>) -> Vec<Recommendation>;
}

/// Strategy selector for callers that pick an engine by name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    UserCf,
    ItemCf,
    Popularity,
    #[default]
    Hybrid,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::UserCf => "user_cf",
            Strategy::ItemCf => "item_cf",
            Strategy::Popularity => "popularity",
            Strategy::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user_cf" | "user" => Ok(Strategy::UserCf),
            "item_cf" | "item" => Ok(Strategy::ItemCf),
            "popularity" | "popular" => Ok(Strategy::Popularity),
            "hybrid" => Ok(Strategy::Hybrid),
            _ => Err(Error::InvalidConfig(format!(
                "Unknown strategy: '{}'. Use user_cf, item_cf, popularity, or hybrid.",
                s
            ))),
        }
    }
}
