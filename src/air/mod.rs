pub mod models;
mod service;

pub use models::{AirPollutionData, AirSample, AqiLevel};
pub use service::{AirQualityError, AirQualityService};
