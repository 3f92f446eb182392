//! SkyCast settings, stored as TOML under the user config directory.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// One problem found by [`Config::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted TOML key, e.g. `api.forecast_url`
    pub key: String,
    pub problem: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.problem, self.key)
    }
}

/// Errors block start-up, warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn issue(key: &str, problem: impl Into<String>) -> ConfigIssue {
        ConfigIssue {
            key: key.to_string(),
            problem: problem.into(),
        }
    }

    pub fn error(&mut self, key: &str, problem: impl Into<String>) {
        self.errors.push(Self::issue(key, problem));
    }

    pub fn warn(&mut self, key: &str, problem: impl Into<String>) {
        self.warnings.push(Self::issue(key, problem));
    }

    /// All errors on one line
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        parts.join(", ")
    }
}

/// Record an error unless `raw` is an absolute http(s) URL with a host
fn check_endpoint(result: &mut ValidationResult, key: &str, raw: &str) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => return result.error(key, format!("not a URL: {}", e)),
    };

    if !matches!(url.scheme(), "http" | "https") {
        result.error(key, format!("scheme must be http or https, not {}", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        result.error(key, "missing host");
    }
}

/// Temperature unit preference.
///
/// Persisted as `"c"` / `"f"`. Only affects formatting; stored and fetched
/// values are always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "c")]
    Celsius,
    #[serde(rename = "f")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Short code used in persisted preferences
    pub fn code(&self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::Fahrenheit => "f",
        }
    }

    /// Parse a persisted code; anything unrecognised is `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "c" => Some(Self::Celsius),
            "f" => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    /// Display glyph appended to formatted temperatures
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Open-Meteo endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// Weather presentation settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Hourly chart canvas
    #[serde(default)]
    pub chart: ChartConfig,

    /// Local key-value storage
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
        }
    }
}

/// A fixed position reported by the terminal geolocation provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Unit used until the user picks one
    #[serde(default)]
    pub default_unit: TemperatureUnit,

    /// Points in the inline "next hours" preview
    #[serde(default = "default_preview_points")]
    pub preview_points: usize,

    /// Points plotted on the hourly chart
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,

    /// Daily forecast cards
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,

    #[serde(default = "default_geolocation_timeout_secs")]
    pub geolocation_timeout_secs: u64,

    /// Where "use my location" points when no device geolocation exists
    #[serde(default)]
    pub home: Option<HomeLocation>,
}

fn default_preview_points() -> usize {
    6
}

fn default_chart_points() -> usize {
    12
}

fn default_forecast_days() -> usize {
    5
}

fn default_geolocation_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            default_unit: TemperatureUnit::Celsius,
            preview_points: default_preview_points(),
            chart_points: default_chart_points(),
            forecast_days: default_forecast_days(),
            geolocation_timeout_secs: default_geolocation_timeout_secs(),
            home: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 240,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Full path of the key-value database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("skycast.db")
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            api: ApiConfig::default(),
            weather: WeatherConfig::default(),
            chart: ChartConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit file, creating defaults if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self {
                config_dir: config_path
                    .parent()
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
                ..Self::default()
            };
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// [`Config::load`] followed by [`Config::validate`].
    ///
    /// Fails on any validation error; warnings are logged and returned.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let checked = config.validate();

        for issue in &checked.warnings {
            tracing::warn!("config: {}", issue);
        }
        if !checked.is_valid() {
            anyhow::bail!("invalid configuration: {}", checked.summary());
        }

        Ok((config, checked))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let api = &self.api;
        let weather = &self.weather;

        check_endpoint(&mut result, "api.geocoding_url", &api.geocoding_url);
        check_endpoint(&mut result, "api.forecast_url", &api.forecast_url);
        check_endpoint(&mut result, "api.air_quality_url", &api.air_quality_url);

        for (key, size, minimum) in [
            ("chart.width", self.chart.width, 80),
            ("chart.height", self.chart.height, 60),
        ] {
            match size {
                0 => result.error(key, "must be positive"),
                s if s < minimum => result.warn(key, "too small to hold the plot area"),
                _ => {}
            }
        }

        for (key, count) in [
            ("weather.preview_points", weather.preview_points),
            ("weather.chart_points", weather.chart_points),
            ("weather.forecast_days", weather.forecast_days),
        ] {
            if count == 0 {
                result.warn(key, "0 hides this section");
            }
        }
        if weather.forecast_days > 16 {
            result.warn("weather.forecast_days", "Open-Meteo returns at most 16 days");
        }

        if weather.geolocation_timeout_secs == 0 {
            result.error("weather.geolocation_timeout_secs", "must be at least 1 second");
        }

        if let Some(home) = &weather.home {
            if !(-90.0..=90.0).contains(&home.latitude) {
                result.error("weather.home.latitude", "outside -90..=90");
            }
            if !(-180.0..=180.0).contains(&home.longitude) {
                result.error("weather.home.longitude", "outside -180..=180");
            }
        }

        result
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("No user config directory on this platform")?;
        Ok(base.join("skycast").join("config.toml"))
    }
}
