pub mod models;
mod service;

pub use models::{WeatherCondition, WeatherData};
pub use service::{WeatherError, WeatherService};
