//! # prodrec Engine
//!
//! Four interchangeable recommendation strategies over a shared
//! [`RatingIndex`](prodrec_core::RatingIndex):
//!
//! - [`UserBasedCf`] - neighbors by user similarity, similarity-weighted prediction
//! - [`ItemBasedCf`] - item similarity over co-rating users
//! - [`PopularityEngine`] - average rating, rating count, item id
//! - [`HybridRecommender`] - weighted blend of the three, min-max normalized per engine
//!
//! Every engine returns at most `n` results ordered by score descending
//! then item id ascending, and never an item the user already rated.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use prodrec_core::{Rating, RatingIndex, SimilarityMetric};
//! use prodrec_engine::UserBasedCf;
//!
//! let index = Arc::new(RatingIndex::from_ratings(vec![
//!     Rating::new(1, 101, 5.0).unwrap(),
//!     Rating::new(1, 102, 3.0).unwrap(),
//!     Rating::new(2, 101, 4.0).unwrap(),
//!     Rating::new(2, 102, 2.0).unwrap(),
//!     Rating::new(2, 103, 5.0).unwrap(),
//!     Rating::new(3, 103, 5.0).unwrap(),
//! ]));
//!
//! let cf = UserBasedCf::new(index, 5).unwrap();
//! let recs = cf.recommend(1, 1, SimilarityMetric::Cosine);
//! assert_eq!(recs[0].item_id, 103);
//! ```

pub mod engines;
pub mod hybrid;
pub mod item_cf;
pub mod popularity;
pub mod recommender;
pub mod user_cf;

#[cfg(test)]
mod fixtures;

pub use engines::{EngineConfig, Engines};
pub use hybrid::{HybridConfig, HybridRecommender, HybridWeights, DEFAULT_POOL_FACTOR};
pub use item_cf::{ItemBasedCf, ItemCfConfig};
pub use popularity::{ItemPopularity, PopularityEngine};
pub use recommender::{RecommendRequest, Recommender, Strategy};
pub use user_cf::{UserBasedCf, UserCfConfig, DEFAULT_NEIGHBOR_POOL};
