//! View models: forecast responses turned into display strings.
//!
//! Builders are pure. They take the clock reading and the unit explicitly
//! so the same response renders the same way every time.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use skycast_weather::condition::{FALLBACK_DESCRIPTION, FALLBACK_GLYPH};
use skycast_weather::{
    describe, format_rounded, format_temperature, future_window, icon_for, AirQualityResponse,
    AqiCategory, ChartLayout, DailyEntry, ForecastResponse, Glyph, GeocodeMatch, TemperatureUnit,
    PLACEHOLDER,
};

const PARTICULATE_SUFFIX: &str = " µg/m³";

/// Current conditions panel
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub place_name: String,
    pub description: &'static str,
    pub glyph: Glyph,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    /// Next hours, possibly empty
    pub preview: Vec<HourlySlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySlot {
    /// Local wall-clock time, `HH:MM`
    pub label: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyCard {
    /// Short weekday name, e.g. `Mon`
    pub weekday: String,
    pub glyph: Glyph,
    pub description: &'static str,
    pub high: String,
    pub low: String,
    pub sunrise: String,
    pub sunset: String,
    pub precipitation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    /// Local hour label under the axis
    pub label: String,
    /// Formatted value drawn next to the point
    pub value: String,
}

/// A laid-out line chart, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub width: f64,
    pub height: f64,
    pub points: Vec<ChartPoint>,
    /// Y positions of the horizontal grid lines
    pub grid_rows: Vec<f64>,
    /// Left and right edge of the grid lines
    pub x_bounds: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityView {
    pub category: AqiCategory,
    /// e.g. `US AQI: 42 (Good)`
    pub summary: String,
    pub pm2_5: String,
    pub pm10: String,
}

/// One autocomplete row
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// `name, admin1`
    pub label: String,
    pub country_code: String,
    /// What to search for when the row is picked
    pub query: String,
}

impl From<&GeocodeMatch> for Suggestion {
    fn from(m: &GeocodeMatch) -> Self {
        Self {
            label: m.suggestion_label(),
            country_code: m.country_code.clone(),
            query: m.name.clone(),
        }
    }
}

fn condition(code: Option<i32>) -> (&'static str, Glyph) {
    match code {
        Some(code) => (describe(code), icon_for(code)),
        None => (FALLBACK_DESCRIPTION, FALLBACK_GLYPH),
    }
}

fn local_label(time: DateTime<Utc>, offset: FixedOffset, pattern: &str) -> String {
    time.with_timezone(&offset).format(pattern).to_string()
}

fn clock_time(local: Option<NaiveDateTime>) -> String {
    local.map_or_else(|| PLACEHOLDER.to_string(), |t| t.format("%H:%M").to_string())
}

pub fn build_current(
    place_name: &str,
    forecast: &ForecastResponse,
    now: DateTime<Utc>,
    unit: TemperatureUnit,
    preview_points: usize,
) -> CurrentView {
    let current = forecast.current.clone().unwrap_or_default();
    let (description, glyph) = condition(current.weather_code);
    let offset = forecast.offset();

    let preview = future_window(&forecast.hourly_temperatures(), now, preview_points)
        .iter()
        .map(|(time, value)| HourlySlot {
            label: local_label(time, offset, "%H:%M"),
            temperature: format_temperature(value, unit),
        })
        .collect();

    CurrentView {
        place_name: place_name.to_string(),
        description,
        glyph,
        temperature: format_temperature(current.temperature_2m, unit),
        feels_like: format_temperature(current.apparent_temperature, unit),
        humidity: format_rounded(current.relative_humidity_2m, "%"),
        wind: format_rounded(current.wind_speed_10m, " km/h"),
        preview,
    }
}

fn daily_card(entry: &DailyEntry, unit: TemperatureUnit) -> DailyCard {
    let (description, glyph) = condition(entry.weather_code);
    DailyCard {
        weekday: entry.date.format("%a").to_string(),
        glyph,
        description,
        high: format_temperature(entry.high, unit),
        low: format_temperature(entry.low, unit),
        sunrise: clock_time(entry.sunrise),
        sunset: clock_time(entry.sunset),
        precipitation: format_rounded(entry.precipitation_chance, "%"),
    }
}

/// Cards for the first `days` days
pub fn build_daily(forecast: &ForecastResponse, unit: TemperatureUnit, days: usize) -> Vec<DailyCard> {
    forecast
        .daily()
        .iter()
        .take(days)
        .map(|entry| daily_card(entry, unit))
        .collect()
}

/// Chart of the next `points` hourly temperatures.
///
/// `None` when no future sample has a value; the chart is hidden then.
/// Scaling uses the raw Celsius values, only the labels follow `unit`.
pub fn build_chart(
    forecast: &ForecastResponse,
    now: DateTime<Utc>,
    unit: TemperatureUnit,
    points: usize,
    width: f64,
    height: f64,
) -> Option<ChartView> {
    let offset = forecast.offset();
    let window: Vec<(DateTime<Utc>, Option<f64>)> =
        future_window(&forecast.hourly_temperatures(), now, points)
            .iter()
            .map(|(time, value)| (time, value.filter(|v| v.is_finite())))
            .collect();

    let values: Vec<Option<f64>> = window.iter().map(|(_, v)| *v).collect();
    let layout = ChartLayout::compute_with_gaps(&values, width, height)?;

    // Missing hours get no point but keep their slot on the x axis
    let points = window
        .iter()
        .enumerate()
        .filter_map(|(idx, (time, value))| {
            let value = (*value)?;
            Some(ChartPoint {
                x: layout.x_for(idx),
                y: layout.y_for(value),
                label: local_label(*time, offset, "%H"),
                value: format_temperature(Some(value), unit),
            })
        })
        .collect();

    Some(ChartView {
        width,
        height,
        points,
        grid_rows: layout.grid_rows(),
        x_bounds: layout.x_bounds(),
    })
}

/// Air-quality panel for the current hour; `None` hides the panel.
pub fn build_air_quality(air: &AirQualityResponse, now: DateTime<Utc>) -> Option<AirQualityView> {
    let sample = air.current_sample(now)?;
    let category = AqiCategory::classify(sample.us_aqi);

    Some(AirQualityView {
        category,
        summary: format!("US AQI: {} ({})", format_rounded(sample.us_aqi, ""), category),
        pm2_5: format!("PM2.5: {}", format_rounded(sample.pm2_5, PARTICULATE_SUFFIX)),
        pm10: format!("PM10: {}", format_rounded(sample.pm10, PARTICULATE_SUFFIX)),
    })
}
