//! CSV loading for ratings and the product catalog
//!
//! Malformed rows are skipped and counted rather than failing the load.
//! Only I/O failures and missing header columns are errors.

use anyhow::{bail, Context, Result};
use prodrec_core::{Catalog, Product, Rating, RatingIndex, RatingIndexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

const RATING_COLUMNS: [&str; 3] = ["user_id", "product_id", "rating"];
const PRODUCT_COLUMNS: [&str; 4] = ["product_id", "name", "category", "price"];

#[derive(Debug, Deserialize)]
struct RatingRecord {
    user_id: u32,
    product_id: u32,
    rating: f64,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    product_id: u32,
    name: String,
    category: String,
    price: f64,
}

/// Row counts for one loaded source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Rows accepted
    pub loaded: usize,
    /// Rows rejected as malformed or out of range
    pub skipped: usize,
    /// Accepted rows that replaced an earlier row with the same key
    pub overwritten: usize,
}

/// The loaded ratings index and catalog, shared read-only with every engine
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Arc<Catalog>,
    pub index: Arc<RatingIndex>,
    pub ratings_report: LoadReport,
    pub products_report: LoadReport,
}

impl Dataset {
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(ratings_path: P, products_path: Q) -> Result<Self> {
        let ratings_path = ratings_path.as_ref();
        let products_path = products_path.as_ref();

        let ratings = File::open(ratings_path)
            .with_context(|| format!("Failed to open ratings file {}", ratings_path.display()))?;
        let products = File::open(products_path)
            .with_context(|| format!("Failed to open products file {}", products_path.display()))?;

        let dataset = Self::from_readers(ratings, products)?;
        tracing::info!(
            ratings = %ratings_path.display(),
            products = %products_path.display(),
            "dataset loaded from disk"
        );
        Ok(dataset)
    }

    pub fn from_readers<R: Read, S: Read>(ratings: R, products: S) -> Result<Self> {
        let (catalog, products_report) = load_products(products)?;
        let (index, ratings_report) = load_ratings(ratings)?;

        tracing::info!(
            users = index.user_count(),
            items = index.item_count(),
            ratings = ratings_report.loaded,
            products = products_report.loaded,
            "dataset ready"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            ratings_report,
            products_report,
        })
    }
}

/// Read `user_id,product_id,rating` rows into a [`RatingIndex`].
/// A later row for the same (user, product) pair replaces the earlier one.
pub fn load_ratings<R: Read>(reader: R) -> Result<(RatingIndex, LoadReport)> {
    let mut rdr = csv_reader(reader);
    require_columns(&mut rdr, &RATING_COLUMNS, "ratings")?;

    let mut builder = RatingIndexBuilder::new();
    let mut report = LoadReport::default();

    for (row, record) in rdr.deserialize::<RatingRecord>().enumerate() {
        let rating = match record {
            Ok(r) => Rating::new(r.user_id, r.product_id, r.rating).map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };
        match rating {
            Ok(rating) => {
                builder.insert(rating);
                report.loaded += 1;
            }
            Err(e) => {
                tracing::warn!(row = row + 2, error = %e, "skipping rating row");
                report.skipped += 1;
            }
        }
    }
    report.overwritten = builder.overwritten();

    if report.skipped > 0 || report.overwritten > 0 {
        tracing::warn!(
            loaded = report.loaded,
            skipped = report.skipped,
            overwritten = report.overwritten,
            "ratings loaded with rejected or duplicate rows"
        );
    }

    Ok((builder.build(), report))
}

/// Read `product_id,name,category,price` rows into a [`Catalog`].
/// A later row with the same product id replaces the earlier one.
pub fn load_products<R: Read>(reader: R) -> Result<(Catalog, LoadReport)> {
    let mut rdr = csv_reader(reader);
    require_columns(&mut rdr, &PRODUCT_COLUMNS, "products")?;

    let mut products = Vec::new();
    let mut seen = BTreeSet::new();
    let mut report = LoadReport::default();

    for (row, record) in rdr.deserialize::<ProductRecord>().enumerate() {
        let product = match record {
            Ok(r) => Product::new(r.product_id, r.name, r.category, r.price).map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };
        match product {
            Ok(product) => {
                if !seen.insert(product.id) {
                    report.overwritten += 1;
                }
                products.push(product);
                report.loaded += 1;
            }
            Err(e) => {
                tracing::warn!(row = row + 2, error = %e, "skipping product row");
                report.skipped += 1;
            }
        }
    }

    if report.skipped > 0 || report.overwritten > 0 {
        tracing::warn!(
            loaded = report.loaded,
            skipped = report.skipped,
            overwritten = report.overwritten,
            "products loaded with rejected or duplicate rows"
        );
    }

    Ok((Catalog::from_products(products), report))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn require_columns<R: Read>(rdr: &mut csv::Reader<R>, columns: &[&str], source: &str) -> Result<()> {
    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read {} header", source))?;

    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if !missing.is_empty() {
        bail!("{} header is missing column(s): {}", source, missing.join(", "));
    }
    Ok(())
}
