//! Open-Meteo HTTP client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use skycast_core::ApiConfig;
use tracing::instrument;

use crate::api::{AirQualityResponse, ForecastResponse};
use crate::error::WeatherError;

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_probability_max";
const AIR_QUALITY_FIELDS: &str = "pm2_5,pm10,us_aqi";

/// Client for the geocoding, forecast and air-quality endpoints.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    pub(crate) client: Client,
    pub(crate) geocoding_url: String,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoClient {
    pub fn new(api: &ApiConfig) -> Result<Self, WeatherError> {
        // No request timeout: only geolocation is time-bounded
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            geocoding_url: api.geocoding_url.clone(),
            forecast_url: api.forecast_url.clone(),
            air_quality_url: api.air_quality_url.clone(),
        })
    }

    /// Current conditions, hourly temperatures and the daily outlook.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(&self.forecast_url, &query).await
    }

    /// Hourly PM2.5, PM10 and US AQI.
    #[instrument(skip(self), level = "info")]
    pub async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityResponse, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", AIR_QUALITY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(&self.air_quality_url, &query).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).query(query).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Open-Meteo returned {}: {}", status, body);
            Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
