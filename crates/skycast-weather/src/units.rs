//! Temperature conversion and display formatting.
//!
//! Values always arrive in Celsius; the unit only changes what is shown.

use crate::types::TemperatureUnit;

/// Shown wherever a value is missing
pub const PLACEHOLDER: &str = "—";

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Format a Celsius reading in the selected unit, e.g. `"21°C"` or `"70°F"`.
///
/// Rounds half away from zero. Missing or NaN values render as [`PLACEHOLDER`].
pub fn format_temperature(value: Option<f64>, unit: TemperatureUnit) -> String {
    let Some(celsius) = value.filter(|v| !v.is_nan()) else {
        return PLACEHOLDER.to_string();
    };

    let shown = match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
    };

    format!("{}{}", round_for_display(shown), unit.symbol())
}

/// Round a measurement and append a suffix (`"%"`, `" km/h"`, ...)
pub fn format_rounded(value: Option<f64>, suffix: &str) -> String {
    match value.filter(|v| !v.is_nan()) {
        Some(v) => format!("{}{}", round_for_display(v), suffix),
        None => PLACEHOLDER.to_string(),
    }
}

fn round_for_display(value: f64) -> f64 {
    let rounded = value.round();
    // -0.0 would print as "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fahrenheit() {
        assert_eq!(to_fahrenheit(0.0), 32.0);
        assert_eq!(to_fahrenheit(100.0), 212.0);
        assert_eq!(to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_freezing_in_fahrenheit() {
        assert_eq!(format_temperature(Some(0.0), TemperatureUnit::Fahrenheit), "32°F");
    }

    #[test]
    fn test_missing_value_is_placeholder() {
        assert_eq!(format_temperature(None, TemperatureUnit::Celsius), "—");
        assert_eq!(format_temperature(Some(f64::NAN), TemperatureUnit::Fahrenheit), "—");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_temperature(Some(21.5), TemperatureUnit::Celsius), "22°C");
        assert_eq!(format_temperature(Some(-2.5), TemperatureUnit::Celsius), "-3°C");
        assert_eq!(format_temperature(Some(21.4), TemperatureUnit::Celsius), "21°C");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_temperature(Some(-0.4), TemperatureUnit::Celsius), "0°C");
    }

    #[test]
    fn test_format_rounded() {
        assert_eq!(format_rounded(Some(54.6), "%"), "55%");
        assert_eq!(format_rounded(Some(12.2), " km/h"), "12 km/h");
        assert_eq!(format_rounded(None, "%"), "—");
    }
}
