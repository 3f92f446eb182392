//! Weather data for SkyCast
//!
//! Open-Meteo geocoding, forecast and air-quality clients, plus the pure
//! transforms that turn their responses into display values: unit
//! conversion, WMO code classification, future windowing, AQI bands and
//! chart scaling.

pub mod api;
pub mod aqi;
pub mod chart;
pub mod client;
pub mod condition;
pub mod error;
pub mod geocode;
pub mod location;
pub mod series;
pub mod types;
pub mod units;

pub use api::{AirQualityResponse, AirQualitySample, DailyEntry, ForecastResponse};
pub use aqi::AqiCategory;
pub use chart::ChartLayout;
pub use client::OpenMeteoClient;
pub use condition::{describe, icon_for, Glyph};
pub use error::WeatherError;
pub use geocode::GeocodeMatch;
pub use location::{locate_with_timeout, FixedLocation, Location, LocationProvider, NoLocation};
pub use series::{first_current_index, future_window, TimestampedSeries};
pub use types::{Place, TemperatureUnit};
pub use units::{format_rounded, format_temperature, to_fahrenheit, PLACEHOLDER};
