//! Forecast windowing
//!
//! Derives the slices of a snapshot the dashboard shows: up to eight hours of
//! a selected day, and the seven-day outlook.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::data::{DailyForecast, HourlyForecast};

/// Maximum number of hourly entries in a window
pub const HOURS_PER_WINDOW: usize = 8;

/// Maximum number of days in the outlook
pub const OUTLOOK_DAYS: usize = 7;

/// Selects up to eight hourly entries for a day.
///
/// When `day` is today's weekday the window covers today's date and starts at
/// the current hour. Any other weekday resolves to the first date in the data
/// falling on it, starting from that date's first entry. The window ends at
/// eight entries, the end of the day or the end of the data, whichever comes
/// first; it is never padded and never spills into the next day.
pub fn window_hours(
    hourly: &[HourlyForecast],
    day: Weekday,
    now: NaiveDateTime,
) -> Vec<HourlyForecast> {
    let is_today = day == now.weekday();

    let target_date = if is_today {
        Some(now.date())
    } else {
        hourly
            .iter()
            .map(|entry| entry.time.date())
            .find(|date| date.weekday() == day)
    };

    let Some(target_date) = target_date else {
        return Vec::new();
    };

    hourly
        .iter()
        .filter(|entry| entry.time.date() == target_date)
        .filter(|entry| !is_today || entry.time.hour() >= now.hour())
        .take(HOURS_PER_WINDOW)
        .cloned()
        .collect()
}

/// One row of the seven-day outlook
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub weather_code: u8,
    pub temperature_max: f64,
    pub temperature_min: f64,
}

impl DaySummary {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Returns the first seven daily entries in data order
pub fn daily_outlook(daily: &[DailyForecast]) -> Vec<DaySummary> {
    daily
        .iter()
        .take(OUTLOOK_DAYS)
        .map(|day| DaySummary {
            date: day.date,
            weather_code: day.weather_code,
            temperature_max: day.temperature_max,
            temperature_min: day.temperature_min,
        })
        .collect()
}

/// Weekdays in selector order, starting from `first`
pub fn week_from(first: Weekday) -> [Weekday; 7] {
    let mut days = [first; 7];
    for i in 1..7 {
        days[i] = days[i - 1].succ();
    }
    days
}
