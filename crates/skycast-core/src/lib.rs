pub mod config;
pub mod error;

pub use config::{
    ApiConfig, ChartConfig, Config, ConfigIssue, HomeLocation, StorageConfig, TemperatureUnit,
    ValidationResult, WeatherConfig,
};
pub use error::{
    AppError, DatabaseError, LocationError, NetworkError, ReqwestErrorExt,
    RusqliteErrorExt, WeatherError,
};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Logs go to stderr so they never mix with rendered output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("SkyCast core initialized");
    Ok(())
}
