//! # prodrec
//!
//! An in-memory product recommendation engine.
//!
//! prodrec loads a ratings table and a product catalog once, then answers
//! recommendation requests with four interchangeable strategies: user-based
//! collaborative filtering, item-based collaborative filtering, popularity
//! ranking and a weighted hybrid of the three.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! prodrec --ratings data/ratings.csv --products data/products.csv --http-port 8080
//! curl 'http://localhost:8080/users/1/recommendations?strategy=hybrid&n=5'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use prodrec::prelude::*;
//!
//! let dataset = Dataset::load("data/ratings.csv", "data/products.csv").unwrap();
//! let engines = Engines::build(dataset.index, dataset.catalog, EngineConfig::default()).unwrap();
//!
//! for rec in engines.recommend(Strategy::Hybrid, 1, 5, SimilarityMetric::Pearson) {
//!     println!("{} {:.3} ({})", rec.item_id, rec.score, rec.source);
//! }
//!
//! engines.hybrid.set_weights(0.6, 0.3, 0.1).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `prodrec-core` - Ratings, catalog, two-way rating index, ranking helpers
//! - `prodrec-similarity` - Pearson, cosine and Jaccard similarity
//! - `prodrec-engine` - User-CF, item-CF, popularity and hybrid engines
//! - `prodrec-storage` - CSV loading with skipped-row reporting
//! - `prodrec-api` - JSON REST API

// Re-export core types
pub use prodrec_core::{
    Catalog, DatasetStats, Error, ItemId, Product, Rating, RatingIndex, RatingVector,
    Recommendation, Result, ScoreBreakdown, SimilarityMetric, Source, UserId,
};

// Re-export engines
pub use prodrec_engine::{
    EngineConfig, Engines, HybridConfig, HybridRecommender, HybridWeights, ItemBasedCf,
    ItemCfConfig, PopularityEngine, RecommendRequest, Recommender, Strategy, UserBasedCf,
    UserCfConfig,
};

// Re-export storage
pub use prodrec_storage::{Dataset, LoadReport};

// Re-export API
pub use prodrec_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, Dataset, EngineConfig, Engines, Error, HybridRecommender, HybridWeights,
        ItemBasedCf, PopularityEngine, Product, Rating, RatingIndex, Recommendation, Recommender,
        Result, SimilarityMetric, Source, Strategy, UserBasedCf,
    };
}

/// Similarity functions over sparse rating vectors
pub mod similarity {
    pub use prodrec_similarity::{cosine, jaccard, pearson, similarity};
}
