use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Pairwise similarity metric selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Pearson correlation over the co-rated set, in [-1, 1]
    #[default]
    Pearson,
    /// Co-rated dot product over full-vector magnitudes, in [-1, 1]
    Cosine,
    /// Key-set intersection over union, in [0, 1]
    Jaccard,
}

impl SimilarityMetric {
    pub const ALL: [SimilarityMetric; 3] = [
        SimilarityMetric::Pearson,
        SimilarityMetric::Cosine,
        SimilarityMetric::Jaccard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMetric::Pearson => "pearson",
            SimilarityMetric::Cosine => "cosine",
            SimilarityMetric::Jaccard => "jaccard",
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(SimilarityMetric::Pearson),
            "cosine" => Ok(SimilarityMetric::Cosine),
            "jaccard" => Ok(SimilarityMetric::Jaccard),
            _ => Err(Error::UnknownMetric(s.to_string())),
        }
    }
}
