mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_core::Config;
use skycast_dashboard::{ForecastPresenter, PresenterSettings};
use skycast_storage::SqliteKvStore;
use skycast_weather::location::LocationError;
use skycast_weather::{FixedLocation, Location, LocationProvider, OpenMeteoClient};

use crate::terminal::TerminalSink;

const USAGE: &str = "usage: skycast [--here] [--save] [CITY | ?city=CITY]";

/// Position from the `weather.home` config section, if set
struct ConfiguredLocation(Option<FixedLocation>);

impl LocationProvider for ConfiguredLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        match &self.0 {
            Some(fixed) => fixed.current_location().await,
            None => Err(LocationError::Unavailable),
        }
    }
}

enum Request {
    Lists,
    Here,
    City(String),
    DeepLink(String),
}

fn parse_args(args: &[String]) -> Result<(Request, bool)> {
    let mut save = false;
    let mut here = false;
    let mut words = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--save" => save = true,
            "--here" => here = true,
            "-h" | "--help" => anyhow::bail!(USAGE),
            other if other.starts_with("--") => anyhow::bail!("unknown option {}\n{}", other, USAGE),
            other => words.push(other.to_string()),
        }
    }

    let request = if here {
        Request::Here
    } else if words.is_empty() {
        Request::Lists
    } else if words.len() == 1 && words[0].contains("city=") {
        Request::DeepLink(words.remove(0))
    } else {
        Request::City(words.join(" "))
    };
    Ok((request, save))
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (request, save) = parse_args(&args)?;

    let (config, _) = Config::load_validated()?;
    let kv = SqliteKvStore::open(config.storage.database_path())
        .with_context(|| format!("Failed to open {}", config.storage.database_path().display()))?;
    let client = OpenMeteoClient::new(&config.api).context("Failed to build HTTP client")?;
    let location = ConfiguredLocation(
        config
            .weather
            .home
            .as_ref()
            .map(|home| FixedLocation::new(home.latitude, home.longitude)),
    );

    let presenter = ForecastPresenter::new(
        client,
        Arc::new(kv),
        config.weather.default_unit,
        Arc::new(TerminalSink),
        location,
        PresenterSettings::from_config(&config),
    );

    tracing::info!("SkyCast started");

    match request {
        Request::Lists => presenter.refresh_lists(),
        Request::Here => presenter.use_my_location().await,
        Request::City(city) => presenter.search(&city).await,
        Request::DeepLink(link) => {
            if !presenter.open_deep_link(&link).await {
                presenter.refresh_lists();
            }
        }
    }

    if save && !presenter.save_favorite() {
        eprintln!("Nothing loaded to save");
    }

    Ok(())
}
