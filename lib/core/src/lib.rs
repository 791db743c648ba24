//! # prodrec Core
//!
//! Core data model for the prodrec recommendation engine.
//!
//! This crate provides the fundamental data structures shared by every engine:
//!
//! - [`RatingIndex`] - Immutable two-way (user → item, item → user) rating index
//! - [`Catalog`] / [`Product`] - The product catalog
//! - [`Rating`] - A validated (user, item, value) triple
//! - [`Recommendation`] - A ranked suggestion with its source label
//! - [`SimilarityMetric`] - Pearson, cosine or Jaccard selector
//! - [`ranking`] - Deterministic best-first ordering (score desc, id asc)
//!
//! ## Example
//!
//! ```rust
//! use prodrec_core::{Rating, RatingIndex};
//!
//! let index = RatingIndex::from_ratings(vec![
//!     Rating::new(1, 101, 5.0).unwrap(),
//!     Rating::new(1, 102, 3.0).unwrap(),
//!     Rating::new(2, 101, 4.0).unwrap(),
//! ]);
//!
//! assert_eq!(index.user_ratings(1).unwrap().len(), 2);
//! assert_eq!(index.item_ratings(101).unwrap().len(), 2);
//! ```

pub mod error;
pub mod index;
pub mod metric;
pub mod product;
pub mod ranking;
pub mod rating;
pub mod recommendation;
pub mod stats;

pub use error::{Error, Result};
pub use index::{RatingIndex, RatingIndexBuilder, RatingVector};
pub use metric::SimilarityMetric;
pub use product::{Catalog, Product};
pub use rating::{Rating, RATING_MAX, RATING_MIN};
pub use recommendation::{Recommendation, ScoreBreakdown, Source};
pub use stats::DatasetStats;

/// Opaque user key; exists only as a key in [`RatingIndex`]
pub type UserId = u32;
/// Catalog item key
pub type ItemId = u32;
