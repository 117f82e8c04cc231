mod daily;
pub mod models;
mod service;

pub use daily::{summarize_daily, DailySummary, FORECAST_DAYS};
pub use models::{ForecastData, ForecastSample};
pub use service::{ForecastError, ForecastService};
