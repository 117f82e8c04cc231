pub mod models;
mod service;

pub use models::GeoCity;
pub use service::{GeoError, GeoService, DEFAULT_SEARCH_LIMIT};
