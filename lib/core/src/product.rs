use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, ItemId, Result};

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: ItemId, name: impl Into<String>, category: impl Into<String>, price: f64) -> Result<Self> {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidProduct {
                item_id: id,
                reason: format!("price must be a non-negative number, got {}", price),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            category: category.into(),
            price,
        })
    }
}

/// The product catalog, keyed by item id.
///
/// Immutable once built; iteration is in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<ItemId, Product>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from products. A later product with an id already
    /// present replaces the earlier one.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self { products }
    }

    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&Product> {
        self.products.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.products.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.products.keys().copied()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.products.values().map(|p| p.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}
