use serde::{Deserialize, Serialize};

use crate::{Error, ItemId, Result, UserId};

/// Lowest value on the rating scale (inclusive)
pub const RATING_MIN: f64 = 1.0;
/// Highest value on the rating scale (inclusive)
pub const RATING_MAX: f64 = 5.0;

/// A single (user, item, value) triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: f64,
}

impl Rating {
    /// Create a rating, rejecting values outside the closed scale
    /// `[RATING_MIN, RATING_MAX]` and non-finite values.
    pub fn new(user_id: UserId, item_id: ItemId, value: f64) -> Result<Self> {
        if !is_valid_value(value) {
            return Err(Error::InvalidRating { user_id, item_id, value });
        }
        Ok(Self { user_id, item_id, value })
    }
}

#[inline]
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite() && (RATING_MIN..=RATING_MAX).contains(&value)
}
