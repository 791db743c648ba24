use serde::Serialize;
use std::collections::BTreeMap;

use crate::{Catalog, RatingIndex};

/// Summary statistics for a loaded dataset. Informational only; no
/// ranking decision reads these.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetStats {
    pub users: usize,
    pub products: usize,
    pub ratings: usize,
    /// ratings / (users × products)
    pub density: f64,
    /// 1 − density
    pub sparsity: f64,
    /// Rating count per whole-star bucket (integer part of the value)
    pub distribution: BTreeMap<u8, usize>,
}

impl DatasetStats {
    pub fn compute(index: &RatingIndex, catalog: &Catalog) -> Self {
        let users = index.user_count();
        let products = catalog.len();
        let ratings = index.len();

        let cells = users * products;
        let density = if cells == 0 {
            0.0
        } else {
            ratings as f64 / cells as f64
        };

        let mut distribution = BTreeMap::new();
        for rating in index.ratings() {
            *distribution.entry(rating.value.trunc() as u8).or_insert(0) += 1;
        }

        Self {
            users,
            products,
            ratings,
            density,
            sparsity: 1.0 - density,
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Product, Rating};

    #[test]
    fn test_stats() {
        let catalog = Catalog::from_products(vec![
            Product::new(101, "A", "Books", 1.0).unwrap(),
            Product::new(102, "B", "Books", 1.0).unwrap(),
        ]);
        let index = RatingIndex::from_ratings(vec![
            Rating::new(1, 101, 5.0).unwrap(),
            Rating::new(1, 102, 4.5).unwrap(),
            Rating::new(2, 101, 4.0).unwrap(),
        ]);

        let stats = DatasetStats::compute(&index, &catalog);

        assert_eq!(stats.users, 2);
        assert_eq!(stats.products, 2);
        assert_eq!(stats.ratings, 3);
        assert!((stats.density - 0.75).abs() < 1e-12);
        assert!((stats.sparsity - 0.25).abs() < 1e-12);
        assert_eq!(stats.distribution.get(&4), Some(&2));
        assert_eq!(stats.distribution.get(&5), Some(&1));
    }

    #[test]
    fn test_empty_stats() {
        let stats = DatasetStats::compute(&RatingIndex::default(), &Catalog::new());
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.sparsity, 1.0);
        assert!(stats.distribution.is_empty());
    }
}
