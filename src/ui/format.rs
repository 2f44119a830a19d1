//! Value formatting and weather icons
//!
//! Pure functions turning snapshot values into the strings the screens show.

use chrono::{NaiveDate, NaiveDateTime, Timelike, Weekday};
use ratatui::style::Color;

use crate::units::Units;

/// Icon bucket for a WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sunny,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Storm,
}

impl WeatherIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "\u{2600}",         // ☀
            WeatherIcon::PartlyCloudy => "\u{26C5}",  // ⛅
            WeatherIcon::Overcast => "\u{2601}",      // ☁
            WeatherIcon::Fog => "\u{1F32B}",          // 🌫
            WeatherIcon::Drizzle => "\u{1F326}",      // 🌦
            WeatherIcon::Rain => "\u{1F327}",         // 🌧
            WeatherIcon::Snow => "\u{2744}",          // ❄
            WeatherIcon::Storm => "\u{26C8}",         // ⛈
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "Sunny",
            WeatherIcon::PartlyCloudy => "Partly cloudy",
            WeatherIcon::Overcast => "Overcast",
            WeatherIcon::Fog => "Fog",
            WeatherIcon::Drizzle => "Drizzle",
            WeatherIcon::Rain => "Rain",
            WeatherIcon::Snow => "Snow",
            WeatherIcon::Storm => "Storm",
        }
    }

    pub fn color(self) -> Color {
        match self {
            WeatherIcon::Sunny => Color::Yellow,
            WeatherIcon::PartlyCloudy => Color::LightYellow,
            WeatherIcon::Overcast | WeatherIcon::Fog => Color::Gray,
            WeatherIcon::Drizzle | WeatherIcon::Rain => Color::Blue,
            WeatherIcon::Snow => Color::White,
            WeatherIcon::Storm => Color::Magenta,
        }
    }
}

/// Maps a WMO weather code to its icon; unknown codes show as sunny
pub fn weather_icon(code: u8) -> WeatherIcon {
    match code {
        0 | 1 => WeatherIcon::Sunny,
        2 => WeatherIcon::PartlyCloudy,
        3 => WeatherIcon::Overcast,
        45 | 48 => WeatherIcon::Fog,
        51 | 53 | 55 | 56 | 57 => WeatherIcon::Drizzle,
        61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => WeatherIcon::Rain,
        71 | 73 | 75 | 77 | 85 | 86 => WeatherIcon::Snow,
        95 | 96 | 99 => WeatherIcon::Storm,
        _ => WeatherIcon::Sunny,
    }
}

/// Rounds to a whole number, never producing "-0"
fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// `21°`
pub fn format_temperature(value: f64, units: &Units) -> String {
    format!("{}{}", whole(value), units.temperature.suffix())
}

/// `14 km/h`
pub fn format_wind(value: f64, units: &Units) -> String {
    format!("{} {}", whole(value), units.wind_speed.suffix())
}

/// `3 mm`
pub fn format_precipitation(value: f64, units: &Units) -> String {
    format!("{} {}", whole(value), units.precipitation.suffix())
}

/// `72%`
pub fn format_humidity(value: u8) -> String {
    format!("{}%", value)
}

/// Formats the hour of a timestamp as `3 PM` / `12 AM`
pub fn format_hour(time: NaiveDateTime) -> String {
    let (is_pm, hour) = time.hour12();
    format!("{} {}", hour, if is_pm { "PM" } else { "AM" })
}

/// `Sunday, October 18, 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `Sun`
pub fn format_weekday(day: Weekday) -> String {
    day.to_string()
}

/// Returns the color for a temperature value in the given units
pub fn temperature_color(value: f64, units: &Units) -> Color {
    let celsius = match units.temperature {
        crate::units::TemperatureUnit::Celsius => value,
        crate::units::TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
    };

    if celsius >= 30.0 {
        Color::Red
    } else if celsius >= 25.0 {
        Color::LightRed
    } else if celsius >= 20.0 {
        Color::Yellow
    } else if celsius >= 15.0 {
        Color::Green
    } else if celsius >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}
