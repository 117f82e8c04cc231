use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use super::models::ForecastSample;

/// How many days of the 5-day forecast survive aggregation.
pub const FORECAST_DAYS: usize = 5;

/// One calendar day condensed from its 3-hourly samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Icon of the day's representative sample.
    pub icon: String,
    /// Description of the day's representative sample.
    pub description: String,
    /// Mean humidity in percent, rounded to the nearest integer.
    pub humidity: i64,
    /// Mean wind speed in m/s, rounded to the nearest integer.
    pub wind_speed: i64,
    /// Maximum probability of precipitation, 0.0 to 1.0.
    pub pop: f64,
}

/// Condense chronological 3-hourly samples into at most five daily summaries.
///
/// Samples are partitioned by the UTC calendar date of their timestamp. The
/// partitions keep insertion order, so chronological input yields summaries
/// in ascending date order. Each day's icon and description come from the
/// noon sample when one exists, otherwise from the structural midpoint of
/// that day's samples.
pub fn summarize_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut days: IndexMap<NaiveDate, Vec<&ForecastSample>> = IndexMap::new();

    for sample in samples {
        let Some(date) = DateTime::from_timestamp(sample.dt, 0).map(|t| t.date_naive()) else {
            continue;
        };
        days.entry(date).or_default().push(sample);
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, day)| summarize_day(date, &day))
        .collect()
}

fn summarize_day(date: NaiveDate, day: &[&ForecastSample]) -> DailySummary {
    let temp_min = day.iter().map(|s| s.main.temp).fold(f64::INFINITY, f64::min);
    let temp_max = day
        .iter()
        .map(|s| s.main.temp)
        .fold(f64::NEG_INFINITY, f64::max);

    let representative = day
        .iter()
        .find(|s| s.dt_txt.ends_with("12:00:00"))
        .or_else(|| day.get(day.len() / 2));

    // A sample without conditions degrades to empty fields instead of failing.
    let (icon, description) = representative
        .and_then(|s| s.weather.first())
        .map(|c| (c.icon.clone(), c.description.clone()))
        .unwrap_or_default();

    let count = day.len() as f64;
    let humidity = (day.iter().map(|s| s.main.humidity as f64).sum::<f64>() / count).round() as i64;
    let wind_speed = (day.iter().map(|s| s.wind.speed).sum::<f64>() / count).round() as i64;

    let pop = day.iter().map(|s| s.pop).fold(0.0, f64::max);

    DailySummary {
        date,
        temp_min,
        temp_max,
        icon,
        description,
        humidity,
        wind_speed,
        pop,
    }
}
