//! Shared datasets for engine unit tests

use prodrec_core::{Catalog, Product, Rating, RatingIndex};
use std::sync::Arc;

/// Users {1, 2, 3}, items {101, 102, 103}
pub fn three_users() -> Arc<RatingIndex> {
    Arc::new(RatingIndex::from_ratings(
        [
            (1, 101, 5.0),
            (1, 102, 3.0),
            (2, 101, 4.0),
            (2, 102, 2.0),
            (2, 103, 5.0),
            (3, 103, 5.0),
        ]
        .into_iter()
        .map(|(u, i, v)| Rating::new(u, i, v).unwrap()),
    ))
}

pub fn three_users_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_products(vec![
        Product::new(101, "Wireless Headphones", "Electronics", 59.99).unwrap(),
        Product::new(102, "Mystery Novel", "Books", 14.99).unwrap(),
        Product::new(103, "Yoga Mat", "Sports", 29.99).unwrap(),
    ]))
}

pub const SHOP_RATINGS: [(u32, u32, f64); 50] = [
    (1, 101, 5.0), (1, 102, 3.0), (1, 104, 4.0), (1, 107, 2.0), (1, 110, 4.0),
    (2, 101, 4.0), (2, 102, 2.0), (2, 103, 5.0), (2, 104, 5.0), (2, 110, 3.0),
    (3, 103, 5.0), (3, 105, 4.0), (3, 106, 5.0), (3, 108, 3.0), (3, 109, 2.0),
    (4, 101, 5.0), (4, 103, 4.0), (4, 104, 4.0), (4, 108, 2.0), (4, 110, 5.0),
    (5, 105, 5.0), (5, 106, 4.0), (5, 107, 5.0), (5, 108, 4.0), (5, 109, 5.0),
    (6, 102, 1.0), (6, 105, 3.0), (6, 107, 4.0), (6, 108, 5.0), (6, 109, 4.0),
    (7, 101, 3.0), (7, 103, 4.0), (7, 104, 5.0), (7, 106, 3.0), (7, 110, 4.0),
    (8, 101, 5.0), (8, 102, 4.0), (8, 103, 5.0), (8, 105, 2.0), (8, 110, 5.0),
    (9, 104, 3.0), (9, 106, 5.0), (9, 107, 3.0), (9, 108, 4.0), (9, 109, 3.0),
    (10, 101, 2.0), (10, 105, 5.0), (10, 106, 4.0), (10, 107, 5.0), (10, 109, 5.0),
];

/// Ten users, ten products, fifty ratings
pub fn shop_index() -> Arc<RatingIndex> {
    Arc::new(RatingIndex::from_ratings(
        SHOP_RATINGS
            .iter()
            .map(|(u, i, v)| Rating::new(*u, *i, *v).unwrap()),
    ))
}

pub fn shop_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_products(vec![
        Product::new(101, "Wireless Headphones", "Electronics", 59.99).unwrap(),
        Product::new(102, "Smartphone Stand", "Electronics", 19.99).unwrap(),
        Product::new(103, "Bluetooth Speaker", "Electronics", 39.99).unwrap(),
        Product::new(104, "Rust Programming Book", "Books", 44.50).unwrap(),
        Product::new(105, "Mystery Novel", "Books", 14.99).unwrap(),
        Product::new(106, "Science Fiction Anthology", "Books", 22.00).unwrap(),
        Product::new(107, "Yoga Mat", "Sports", 29.99).unwrap(),
        Product::new(108, "Running Shoes", "Sports", 89.99).unwrap(),
        Product::new(109, "Tennis Racket", "Sports", 119.00).unwrap(),
        Product::new(110, "USB-C Charger", "Electronics", 24.99).unwrap(),
    ]))
}
