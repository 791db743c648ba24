//! Two-way rating index.
//!
//! [`RatingIndex`] holds the same rating set twice: keyed user → (item → value)
//! and item → (user → value). Both views are written together by
//! [`RatingIndexBuilder`] and never change after [`RatingIndexBuilder::build`].
//!
//! At most one rating exists per (user, item) pair. When the same pair is
//! inserted twice the later value overwrites the earlier one.

use std::collections::BTreeMap;

use crate::{ItemId, Rating, UserId};

/// Sparse rating vector: key (item id or user id) → rating value, ascending by key
pub type RatingVector = BTreeMap<u32, f64>;

/// Accumulates ratings into both views of a [`RatingIndex`]
#[derive(Debug, Default)]
pub struct RatingIndexBuilder {
    by_user: BTreeMap<UserId, RatingVector>,
    by_item: BTreeMap<ItemId, RatingVector>,
    overwritten: usize,
}

impl RatingIndexBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rating. Returns the previous value for the same
    /// (user, item) pair, which the new value replaces.
    pub fn insert(&mut self, rating: Rating) -> Option<f64> {
        let previous = self
            .by_user
            .entry(rating.user_id)
            .or_default()
            .insert(rating.item_id, rating.value);
        self.by_item
            .entry(rating.item_id)
            .or_default()
            .insert(rating.user_id, rating.value);
        if previous.is_some() {
            self.overwritten += 1;
        }
        previous
    }

    /// Number of inserts that replaced an existing (user, item) rating
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    pub fn build(self) -> RatingIndex {
        let len = self.by_user.values().map(|v| v.len()).sum();
        RatingIndex {
            by_user: self.by_user,
            by_item: self.by_item,
            len,
        }
    }
}

/// Immutable user/item rating index shared read-only by every engine
#[derive(Debug, Clone, Default)]
pub struct RatingIndex {
    by_user: BTreeMap<UserId, RatingVector>,
    by_item: BTreeMap<ItemId, RatingVector>,
    len: usize,
}

impl RatingIndex {
    /// Build an index from ratings; later duplicates overwrite earlier ones.
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let mut builder = RatingIndexBuilder::new();
        for rating in ratings {
            builder.insert(rating);
        }
        builder.build()
    }

    /// Ratings given by `user_id` (item → value), if the user has any
    #[inline]
    pub fn user_ratings(&self, user_id: UserId) -> Option<&RatingVector> {
        self.by_user.get(&user_id)
    }

    /// Ratings received by `item_id` (user → value), if the item has any
    #[inline]
    pub fn item_ratings(&self, item_id: ItemId) -> Option<&RatingVector> {
        self.by_item.get(&item_id)
    }

    #[inline]
    pub fn rating(&self, user_id: UserId, item_id: ItemId) -> Option<f64> {
        self.by_user.get(&user_id)?.get(&item_id).copied()
    }

    #[inline]
    pub fn has_rated(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.rating(user_id, item_id).is_some()
    }

    #[inline]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.by_user.contains_key(&user_id)
    }

    #[inline]
    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.by_item.contains_key(&item_id)
    }

    /// Users with at least one rating, ascending
    pub fn users(&self) -> impl Iterator<Item = (UserId, &RatingVector)> {
        self.by_user.iter().map(|(id, v)| (*id, v))
    }

    /// Items with at least one rating, ascending
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &RatingVector)> {
        self.by_item.iter().map(|(id, v)| (*id, v))
    }

    /// Every rating, ordered by user then item
    pub fn ratings(&self) -> impl Iterator<Item = Rating> + '_ {
        self.by_user.iter().flat_map(|(user_id, items)| {
            items.iter().map(move |(item_id, value)| Rating {
                user_id: *user_id,
                item_id: *item_id,
                value: *value,
            })
        })
    }

    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// Total number of distinct (user, item) ratings
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
