use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown similarity metric: '{0}'. Use pearson, cosine, or jaccard.")]
    UnknownMetric(String),

    #[error("Weight for {component} must be a non-negative number, got {value}")]
    NegativeWeight { component: &'static str, value: f64 },

    #[error("Hybrid weights cannot sum to zero")]
    ZeroTotalWeight,

    #[error("Invalid rating {value} for user {user_id}, item {item_id}: expected a value in [{min}, {max}]", min = crate::rating::RATING_MIN, max = crate::rating::RATING_MAX)]
    InvalidRating { user_id: u32, item_id: u32, value: f64 },

    #[error("Invalid product {item_id}: {reason}")]
    InvalidProduct { item_id: u32, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for every variant that rejects caller-supplied configuration
    /// (weights, metric names, engine tuning).
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfig(_)
                | Error::UnknownMetric(_)
                | Error::NegativeWeight { .. }
                | Error::ZeroTotalWeight
        )
    }
}
