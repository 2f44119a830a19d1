//! Measurement units for forecast requests and display
//!
//! Maps free-text unit labels (menu entries, CLI flags) onto the canonical
//! tokens the Open-Meteo API understands, and provides the suffixes used when
//! rendering values. Unrecognized labels fall back to the metric default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three measurement categories a user can pick units for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Temperature,
    WindSpeed,
    Precipitation,
}

/// Temperature unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Wind speed unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindSpeedUnit {
    #[default]
    #[serde(rename = "km/h")]
    Kmh,
    #[serde(rename = "mph")]
    Mph,
}

/// Precipitation unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Millimeters,
    Inch,
}

impl TemperatureUnit {
    /// Any label mentioning an "f" (Fahrenheit, °F) selects Fahrenheit.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains('f') {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }

    /// Canonical API token
    pub fn token(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Display suffix appended to rounded temperatures
    pub fn suffix(self) -> &'static str {
        "\u{00B0}"
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius (\u{00B0}C)",
            TemperatureUnit::Fahrenheit => "Fahrenheit (\u{00B0}F)",
        }
    }
}

impl WindSpeedUnit {
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("mph") {
            WindSpeedUnit::Mph
        } else {
            WindSpeedUnit::Kmh
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "km/h",
            WindSpeedUnit::Mph => "mph",
        }
    }

    pub fn suffix(self) -> &'static str {
        self.token()
    }

    pub fn label(self) -> &'static str {
        self.token()
    }
}

impl PrecipitationUnit {
    /// "inch", "Inches" and "in" all select inches.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("inch") || label.contains("in") {
            PrecipitationUnit::Inch
        } else {
            PrecipitationUnit::Millimeters
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "millimeters",
            PrecipitationUnit::Inch => "inch",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "mm",
            PrecipitationUnit::Inch => "in",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrecipitationUnit::Millimeters => "Millimeters (mm)",
            PrecipitationUnit::Inch => "Inches (in)",
        }
    }
}

/// Normalizes a unit label for the given category into its canonical API token.
///
/// Never fails: empty or unrecognized labels yield the metric token, and a
/// canonical token is returned unchanged.
pub fn normalize(category: UnitCategory, label: &str) -> &'static str {
    match category {
        UnitCategory::Temperature => TemperatureUnit::from_label(label).token(),
        UnitCategory::WindSpeed => WindSpeedUnit::from_label(label).token(),
        UnitCategory::Precipitation => PrecipitationUnit::from_label(label).token(),
    }
}

/// The unit selection sent with every forecast request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
    pub precipitation: PrecipitationUnit,
}

impl Units {
    /// Returns a copy with one category replaced by the unit a label names.
    pub fn with_label(self, category: UnitCategory, label: &str) -> Self {
        match category {
            UnitCategory::Temperature => Units {
                temperature: TemperatureUnit::from_label(label),
                ..self
            },
            UnitCategory::WindSpeed => Units {
                wind_speed: WindSpeedUnit::from_label(label),
                ..self
            },
            UnitCategory::Precipitation => Units {
                precipitation: PrecipitationUnit::from_label(label),
                ..self
            },
        }
    }

    /// Query-string overrides for the forecast API.
    ///
    /// The API defaults to metric, so only non-metric units are emitted.
    pub fn query_params(&self) -> Vec<(&'static str, &'static str)> {
        let mut params = Vec::new();
        if self.wind_speed == WindSpeedUnit::Mph {
            params.push(("wind_speed_unit", self.wind_speed.token()));
        }
        if self.temperature == TemperatureUnit::Fahrenheit {
            params.push(("temperature_unit", self.temperature.token()));
        }
        if self.precipitation == PrecipitationUnit::Inch {
            params.push(("precipitation_unit", self.precipitation.token()));
        }
        params
    }

    /// The system these units belong to, if every category agrees
    pub fn system(&self) -> Option<UnitSystem> {
        [UnitSystem::Metric, UnitSystem::Imperial]
            .into_iter()
            .find(|system| system.units() == *self)
    }
}

/// Metric or imperial presets for the "switch units" action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn units(self) -> Units {
        match self {
            UnitSystem::Metric => Units::default(),
            UnitSystem::Imperial => Units {
                temperature: TemperatureUnit::Fahrenheit,
                wind_speed: WindSpeedUnit::Mph,
                precipitation: PrecipitationUnit::Inch,
            },
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Label for the menu entry that switches away from this system
    pub fn switch_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "Switch to Imperial",
            UnitSystem::Imperial => "Switch to Metric",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.temperature.token(),
            self.wind_speed.token(),
            self.precipitation.token()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_labels() {
        assert_eq!(TemperatureUnit::from_label("Fahrenheit (°F)"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_label("°F"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_label("Celsius (°C)"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_label("kelvin"), TemperatureUnit::Celsius);
    }

    #[test]
    fn test_wind_speed_labels() {
        assert_eq!(WindSpeedUnit::from_label("MPH"), WindSpeedUnit::Mph);
        assert_eq!(WindSpeedUnit::from_label("km/h"), WindSpeedUnit::Kmh);
        assert_eq!(WindSpeedUnit::from_label("knots"), WindSpeedUnit::Kmh);
    }

    #[test]
    fn test_precipitation_labels() {
        assert_eq!(PrecipitationUnit::from_label("Inches (in)"), PrecipitationUnit::Inch);
        assert_eq!(PrecipitationUnit::from_label("in"), PrecipitationUnit::Inch);
        assert_eq!(PrecipitationUnit::from_label("Millimeters (mm)"), PrecipitationUnit::Millimeters);
    }

    #[test]
    fn test_empty_label_falls_back_to_metric() {
        assert_eq!(normalize(UnitCategory::Temperature, ""), "celsius");
        assert_eq!(normalize(UnitCategory::WindSpeed, ""), "km/h");
        assert_eq!(normalize(UnitCategory::Precipitation, ""), "millimeters");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let categories = [
            UnitCategory::Temperature,
            UnitCategory::WindSpeed,
            UnitCategory::Precipitation,
        ];
        let labels = [
            "Celsius (°C)",
            "Fahrenheit (°F)",
            "km/h",
            "mph",
            "Millimeters (mm)",
            "Inches (in)",
            "",
            "garbage",
        ];

        for category in categories {
            for label in labels {
                let once = normalize(category, label);
                assert_eq!(normalize(category, once), once, "{category:?} / {label}");
            }
        }
    }

    #[test]
    fn test_metric_units_emit_no_query_params() {
        assert!(Units::default().query_params().is_empty());
    }

    #[test]
    fn test_imperial_query_params() {
        let params = UnitSystem::Imperial.units().query_params();
        assert_eq!(
            params,
            vec![
                ("wind_speed_unit", "mph"),
                ("temperature_unit", "fahrenheit"),
                ("precipitation_unit", "inch"),
            ]
        );
    }

    #[test]
    fn test_with_label_changes_only_one_category() {
        let units = Units::default().with_label(UnitCategory::WindSpeed, "mph");
        assert_eq!(units.wind_speed, WindSpeedUnit::Mph);
        assert_eq!(units.temperature, TemperatureUnit::Celsius);
        assert_eq!(units.precipitation, PrecipitationUnit::Millimeters);
        assert_eq!(units.system(), None);
    }

    #[test]
    fn test_system_toggle() {
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
        assert_eq!(UnitSystem::Imperial.units().system(), Some(UnitSystem::Imperial));
        assert_eq!(UnitSystem::Metric.switch_label(), "Switch to Imperial");
    }

    #[test]
    fn test_units_serialize_as_tokens() {
        let json = serde_json::to_string(&UnitSystem::Imperial.units()).unwrap();
        assert!(json.contains("\"fahrenheit\""));
        assert!(json.contains("\"mph\""));
        assert!(json.contains("\"inch\""));

        let metric = serde_json::to_string(&Units::default()).unwrap();
        assert!(metric.contains("\"km/h\""));
    }
}
