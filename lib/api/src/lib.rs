pub mod rest;

pub use rest::{configure, AppState, RestApi};
