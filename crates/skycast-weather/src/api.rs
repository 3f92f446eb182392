//! Open-Meteo response shapes.
//!
//! Every block and array is optional on the wire. Missing or `null` blocks
//! deserialize to empty defaults so callers see "no data" rather than a
//! parse failure. Times arrive as local wall-clock strings plus a
//! response-level `utc_offset_seconds`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::series::{first_current_index, TimestampedSeries};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn offset_from_seconds(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn parse_local(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn to_utc(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Zip local time strings with values, dropping samples whose time does not parse
fn build_series(times: &[String], values: &[Option<f64>], offset: FixedOffset) -> TimestampedSeries {
    if times.len() != values.len() {
        tracing::warn!(
            "Hourly arrays differ in length ({} times, {} values)",
            times.len(),
            values.len()
        );
    }

    TimestampedSeries::from_pairs(times.iter().zip(values.iter()).filter_map(|(raw, value)| {
        match parse_local(raw).and_then(|local| to_utc(local, offset)) {
            Some(t) => Some((t, *value)),
            None => {
                tracing::warn!("Dropping sample with unparsable time {:?}", raw);
                None
            }
        }
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub current: Option<CurrentBlock>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hourly: HourlyBlock,
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily: DailyBlock,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    #[serde(default)]
    pub weather_code: Option<i32>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sunrise: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sunset: Vec<Option<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// One day of the daily forecast, with missing columns left as `None`
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Local wall-clock time at the forecast location
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub precipitation_chance: Option<f64>,
}

impl ForecastResponse {
    /// Offset of the forecast location from UTC
    pub fn offset(&self) -> FixedOffset {
        offset_from_seconds(self.utc_offset_seconds)
    }

    /// Hourly temperatures, empty when the block is absent
    pub fn hourly_temperatures(&self) -> TimestampedSeries {
        build_series(&self.hourly.time, &self.hourly.temperature_2m, self.offset())
    }

    /// Daily rows, skipping days whose date does not parse
    pub fn daily(&self) -> Vec<DailyEntry> {
        let d = &self.daily;
        d.time
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let date = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(e) => {
                        tracing::warn!("Dropping daily entry with date {:?}: {}", raw, e);
                        return None;
                    }
                };
                Some(DailyEntry {
                    date,
                    weather_code: d.weather_code.get(idx).copied().flatten(),
                    high: d.temperature_2m_max.get(idx).copied().flatten(),
                    low: d.temperature_2m_min.get(idx).copied().flatten(),
                    sunrise: d.sunrise.get(idx).and_then(|s| s.as_deref()).and_then(parse_local),
                    sunset: d.sunset.get(idx).and_then(|s| s.as_deref()).and_then(parse_local),
                    precipitation_chance: d
                        .precipitation_probability_max
                        .get(idx)
                        .copied()
                        .flatten(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub utc_offset_seconds: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hourly: AirQualityHourly,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityHourly {
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pm2_5: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pm10: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub us_aqi: Vec<Option<f64>>,
}

/// Air-quality readings for a single hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualitySample {
    pub time: DateTime<Utc>,
    pub us_aqi: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
}

impl AirQualityResponse {
    /// The current-or-next hourly sample, or the last one when all are stale.
    ///
    /// `None` when the response carries no usable times.
    pub fn current_sample(&self, now: DateTime<Utc>) -> Option<AirQualitySample> {
        let h = &self.hourly;
        let offset = offset_from_seconds(self.utc_offset_seconds);

        let times: Vec<DateTime<Utc>> = h
            .time
            .iter()
            .filter_map(|raw| parse_local(raw).and_then(|local| to_utc(local, offset)))
            .collect();
        if times.len() != h.time.len() {
            tracing::warn!("Air-quality times did not all parse, ignoring response");
            return None;
        }

        let idx = first_current_index(&times, now)?;
        Some(AirQualitySample {
            time: times[idx],
            us_aqi: h.us_aqi.get(idx).copied().flatten(),
            pm2_5: h.pm2_5.get(idx).copied().flatten(),
            pm10: h.pm10.get(idx).copied().flatten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn forecast_json() -> serde_json::Value {
        serde_json::json!({
            "utc_offset_seconds": 7200,
            "current": {
                "temperature_2m": 21.4,
                "relative_humidity_2m": 55,
                "apparent_temperature": 20.9,
                "weather_code": 2,
                "wind_speed_10m": 11.6
            },
            "hourly": {
                "time": ["2024-06-01T10:00", "2024-06-01T11:00", "2024-06-01T12:00"],
                "temperature_2m": [18.0, null, 21.0]
            },
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "weather_code": [2, 61],
                "temperature_2m_max": [24.1, 19.0],
                "temperature_2m_min": [13.2, 12.0],
                "sunrise": ["2024-06-01T04:52", "2024-06-02T04:51"],
                "sunset": ["2024-06-01T21:35", "2024-06-02T21:36"],
                "precipitation_probability_max": [10, null]
            }
        })
    }

    #[test]
    fn test_hourly_times_converted_to_utc() {
        let response: ForecastResponse = serde_json::from_value(forecast_json()).unwrap();
        let series = response.hourly_temperatures();

        assert_eq!(series.len(), 3);
        // 10:00 at UTC+2 is 08:00 UTC
        assert_eq!(series.times()[0].hour(), 8);
        assert_eq!(series.values(), &[Some(18.0), None, Some(21.0)]);
    }

    #[test]
    fn test_daily_entries() {
        let response: ForecastResponse = serde_json::from_value(forecast_json()).unwrap();
        let daily = response.daily();

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].weather_code, Some(2));
        assert_eq!(daily[0].high, Some(24.1));
        assert_eq!(daily[0].sunrise.map(|t| t.hour()), Some(4));
        assert_eq!(daily[1].precipitation_chance, None);
    }

    #[test]
    fn test_missing_blocks_are_empty() {
        let response: ForecastResponse =
            serde_json::from_value(serde_json::json!({ "hourly": null })).unwrap();
        assert!(response.current.is_none());
        assert!(response.hourly_temperatures().is_empty());
        assert!(response.daily().is_empty());
    }

    #[test]
    fn test_short_daily_columns_leave_gaps() {
        let response: ForecastResponse = serde_json::from_value(serde_json::json!({
            "daily": { "time": ["2024-06-01", "2024-06-02"], "temperature_2m_max": [20.0] }
        }))
        .unwrap();
        let daily = response.daily();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].high, None);
        assert_eq!(daily[1].weather_code, None);
    }

    #[test]
    fn test_unparsable_hourly_time_dropped() {
        let response: ForecastResponse = serde_json::from_value(serde_json::json!({
            "hourly": { "time": ["soon", "2024-06-01T11:00"], "temperature_2m": [1.0, 2.0] }
        }))
        .unwrap();
        let series = response.hourly_temperatures();
        assert_eq!(series.values(), &[Some(2.0)]);
    }

    #[test]
    fn test_air_quality_current_sample() {
        let response: AirQualityResponse = serde_json::from_value(serde_json::json!({
            "utc_offset_seconds": 0,
            "hourly": {
                "time": ["2024-06-01T10:00", "2024-06-01T11:00", "2024-06-01T12:00"],
                "pm2_5": [5.0, 6.0, 7.0],
                "pm10": [10.0, 11.0, 12.0],
                "us_aqi": [20, 42, 60]
            }
        }))
        .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        let sample = response.current_sample(now).unwrap();
        assert_eq!(sample.us_aqi, Some(42.0));
        assert_eq!(sample.pm2_5, Some(6.0));

        let later = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let stale = response.current_sample(later).unwrap();
        assert_eq!(stale.us_aqi, Some(60.0));
    }

    #[test]
    fn test_air_quality_without_times() {
        let response: AirQualityResponse =
            serde_json::from_value(serde_json::json!({ "hourly": {} })).unwrap();
        assert!(response.current_sample(Utc::now()).is_none());
    }
}
