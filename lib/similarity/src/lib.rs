//! # prodrec Similarity
//!
//! Pairwise similarity between users or items of a [`RatingIndex`](prodrec_core::RatingIndex).
//!
//! ## Metrics
//!
//! - **Pearson**: centered covariance over standard deviations, computed on the
//!   co-rated set; needs at least two co-rated keys and non-zero variance
//! - **Cosine**: co-rated dot product over the product of full-vector magnitudes
//! - **Jaccard**: key-set intersection over union
//!
//! Undefined similarities are 0.0, never NaN or infinite.
//!
//! ## Example
//!
//! ```rust
//! use prodrec_core::{RatingVector, SimilarityMetric};
//! use prodrec_similarity::similarity;
//!
//! let a: RatingVector = [(101, 5.0), (102, 3.0)].into_iter().collect();
//! let b: RatingVector = [(101, 4.0), (102, 2.0), (103, 5.0)].into_iter().collect();
//!
//! let sim = similarity(&a, &b, SimilarityMetric::Cosine);
//! assert!(sim > 0.0 && sim <= 1.0);
//! assert_eq!(sim, similarity(&b, &a, SimilarityMetric::Cosine));
//! ```

pub mod calculator;

pub use calculator::{cosine, jaccard, pearson, similarity};
