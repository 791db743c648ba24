pub mod loader;

pub use loader::{load_products, load_ratings, Dataset, LoadReport};
