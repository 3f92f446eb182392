//! Forecast presenter: resolve a place, fetch, build views, render.
//!
//! Every load takes a fresh generation number. A load whose generation is
//! no longer the latest when its response arrives is dropped without
//! rendering, so the most recently started request always wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use skycast_core::{Config, TemperatureUnit};
use skycast_storage::{
    KeyValueStore, PlaceStore, Preferences, StorageError, Theme, FAVORITES, RECENTS,
};
use skycast_weather::{
    locate_with_timeout, LocationProvider, OpenMeteoClient, Place, WeatherError,
};

use crate::deeplink::city_from_link;
use crate::error_mapping::IntoAppError;
use crate::sink::RenderSink;
use crate::view::{self, Suggestion};

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";
pub const GEOLOCATION_PLACE_NAME: &str = "Your location";

const SUGGESTION_LIMIT: usize = 5;
const SUGGESTION_MIN_CHARS: usize = 2;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// How the place for a load was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    CitySearch,
    SavedLocation,
    Geolocation,
}

impl Flow {
    fn failure_message(self) -> &'static str {
        match self {
            Flow::CitySearch => "Could not load weather. Try another city.",
            Flow::SavedLocation => "Could not load weather for saved location.",
            Flow::Geolocation => "Could not load weather for your location.",
        }
    }

    /// Replaying stored coordinates never touches recents
    fn records_recent(self) -> bool {
        !matches!(self, Flow::SavedLocation)
    }
}

/// Window sizes and canvas dimensions used when building views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterSettings {
    pub preview_points: usize,
    pub chart_points: usize,
    pub forecast_days: usize,
    pub chart_width: f64,
    pub chart_height: f64,
    pub geolocation_timeout: Duration,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        Self {
            preview_points: 6,
            chart_points: 12,
            forecast_days: 5,
            chart_width: 600.0,
            chart_height: 240.0,
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}

impl PresenterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            preview_points: config.weather.preview_points,
            chart_points: config.weather.chart_points,
            forecast_days: config.weather.forecast_days,
            chart_width: f64::from(config.chart.width),
            chart_height: f64::from(config.chart.height),
            geolocation_timeout: Duration::from_secs(config.weather.geolocation_timeout_secs),
        }
    }
}

pub struct ForecastPresenter<L: LocationProvider> {
    client: OpenMeteoClient,
    places: PlaceStore,
    prefs: Preferences,
    sink: Arc<dyn RenderSink>,
    location: L,
    settings: PresenterSettings,
    generation: AtomicU64,
    last_place: Mutex<Option<Place>>,
    clock: Clock,
}

impl<L: LocationProvider> ForecastPresenter<L> {
    pub fn new(
        client: OpenMeteoClient,
        kv: Arc<dyn KeyValueStore>,
        default_unit: TemperatureUnit,
        sink: Arc<dyn RenderSink>,
        location: L,
        settings: PresenterSettings,
    ) -> Self {
        let list_sink = sink.clone();
        let places = PlaceStore::new(kv.clone()).with_listener(move |key, list| {
            if key == FAVORITES.key {
                list_sink.render_favorites(list);
            } else if key == RECENTS.key {
                list_sink.render_recents(list);
            }
        });

        Self {
            client,
            places,
            prefs: Preferences::new(kv, default_unit),
            sink,
            location,
            settings,
            generation: AtomicU64::new(0),
            last_place: Mutex::new(None),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used for windowing
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The most recently loaded place, if any load has succeeded
    pub fn last_place(&self) -> Option<Place> {
        self.last_place.lock().clone()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.prefs.unit()
    }

    /// Apply the stored theme and render favorites and recents.
    ///
    /// Legacy favorites are migrated here on first run.
    pub fn refresh_lists(&self) {
        self.sink.apply_theme(self.prefs.theme());
        self.sink.render_favorites(&self.places.favorites());
        self.sink.render_recents(&self.places.load_list(&RECENTS));
    }

    /// Search form submission
    pub async fn search(&self, input: &str) {
        let city = input.trim();
        if city.is_empty() {
            self.sink.show_field_error(Some(EMPTY_CITY_MESSAGE));
            return;
        }
        self.sink.show_field_error(None);
        self.load_city(city).await;
    }

    /// Autocomplete rows for a partially typed city
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.chars().count() < SUGGESTION_MIN_CHARS {
            self.sink.render_suggestions(&[]);
            return Vec::new();
        }

        let suggestions: Vec<Suggestion> = match self.client.search_places(query, SUGGESTION_LIMIT).await {
            Ok(matches) => matches.iter().take(SUGGESTION_LIMIT).map(Suggestion::from).collect(),
            Err(e) => {
                tracing::debug!("Suggestions for {:?} failed: {}", query, e);
                Vec::new()
            }
        };

        self.sink.render_suggestions(&suggestions);
        suggestions
    }

    /// Load a favorite or recent entry
    pub async fn open_place(&self, place: &Place) {
        self.load_saved(place.clone()).await;
    }

    /// Load weather for the device position
    pub async fn use_my_location(&self) {
        let generation = self.begin();

        let located = locate_with_timeout(&self.location, self.settings.geolocation_timeout).await;
        let location = match located {
            Ok(location) => location,
            Err(e) => {
                if self.is_current(generation) {
                    let err = e.into_app_error();
                    tracing::warn!("Geolocation failed: {}", err);
                    self.sink.show_message(err.user_message());
                }
                return;
            }
        };

        tracing::info!("Got location: {}, {}", location.latitude, location.longitude);
        let place = Place::new(GEOLOCATION_PLACE_NAME, location.latitude, location.longitude);
        let coords = (location.latitude, location.longitude);
        self.load_forecast(generation, place, coords, Flow::Geolocation)
            .await;
    }

    /// Pre-fill and search the `city` of a `?city=` link.
    ///
    /// Returns `false` when the link names no city.
    pub async fn open_deep_link(&self, link: &str) -> bool {
        let Some(city) = city_from_link(link) else {
            return false;
        };
        self.sink.set_search_text(&city);
        self.search(&city).await;
        true
    }

    /// Add the last loaded place to favorites.
    ///
    /// Returns `false` when nothing has been loaded yet.
    pub fn save_favorite(&self) -> bool {
        let Some(place) = self.last_place() else {
            return false;
        };
        if let Err(e) = self.places.add_to(&FAVORITES, &place) {
            self.storage_failed("Saving favorite", e);
        }
        true
    }

    pub fn remove_favorite(&self, name: &str) {
        if let Err(e) = self.places.remove(FAVORITES.key, name) {
            self.storage_failed("Removing favorite", e);
        }
    }

    pub fn clear_favorites(&self) {
        if let Err(e) = self.places.clear(FAVORITES.key) {
            self.storage_failed("Clearing favorites", e);
        }
    }

    pub fn clear_recents(&self) {
        if let Err(e) = self.places.clear(RECENTS.key) {
            self.storage_failed("Clearing recents", e);
        }
    }

    /// Persist the unit and re-render the last place by its coordinates
    pub async fn set_unit(&self, unit: TemperatureUnit) {
        if let Err(e) = self.prefs.set_unit(unit) {
            self.storage_failed("Saving unit preference", e);
        }

        if let Some(place) = self.last_place() {
            self.load_saved(place).await;
        }
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = match self.prefs.toggle_theme() {
            Ok(theme) => theme,
            Err(e) => {
                self.storage_failed("Saving theme", e);
                self.prefs.theme().toggled()
            }
        };
        self.sink.apply_theme(theme);
        theme
    }

    /// Report a failed write from a user action; the session carries on
    fn storage_failed(&self, action: &str, e: StorageError) {
        let err = e.into_app_error();
        tracing::warn!("{} failed: {}", action, err);
        self.sink.show_message(err.user_message());
    }

    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.show_loading();
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn load_city(&self, city: &str) {
        let generation = self.begin();

        let located = self
            .client
            .geocode(city)
            .await
            .and_then(|place| match place.coordinates() {
                Some(coords) => Ok((place, coords)),
                None => Err(WeatherError::NotFound(city.to_string())),
            });

        match located {
            Ok((place, coords)) => {
                self.load_forecast(generation, place, coords, Flow::CitySearch)
                    .await
            }
            Err(e) => self.fail(generation, Flow::CitySearch, e),
        }
    }

    /// Load by stored coordinates, falling back to a name search without them
    async fn load_saved(&self, place: Place) {
        match place.coordinates() {
            Some(coords) => {
                let generation = self.begin();
                self.load_forecast(generation, place, coords, Flow::SavedLocation)
                    .await;
            }
            None => self.load_city(&place.name).await,
        }
    }

    async fn load_forecast(&self, generation: u64, place: Place, (lat, lon): (f64, f64), flow: Flow) {
        if !self.is_current(generation) {
            tracing::debug!("Dropping superseded load of {}", place.name);
            return;
        }

        let forecast = match self.client.forecast(lat, lon).await {
            Ok(forecast) => forecast,
            Err(e) => {
                self.fail(generation, flow, e);
                return;
            }
        };
        if !self.is_current(generation) {
            tracing::debug!("Dropping superseded forecast for {}", place.name);
            return;
        }

        let now = (self.clock)();
        let unit = self.prefs.unit();
        let s = &self.settings;

        self.sink.render_current(&view::build_current(
            &place.name,
            &forecast,
            now,
            unit,
            s.preview_points,
        ));
        self.sink.render_daily(&view::build_daily(&forecast, unit, s.forecast_days));
        self.sink.render_chart(
            view::build_chart(&forecast, now, unit, s.chart_points, s.chart_width, s.chart_height)
                .as_ref(),
        );

        if flow.records_recent() {
            if let Err(e) = self.places.add_to(&RECENTS, &place) {
                tracing::warn!("Recording recent place failed: {}", e.into_app_error());
            }
        }
        *self.last_place.lock() = Some(place.clone());

        let air = match self.client.air_quality(lat, lon).await {
            Ok(air) => view::build_air_quality(&air, (self.clock)()),
            Err(e) => {
                tracing::debug!("Air quality for {} unavailable: {}", place.name, e);
                None
            }
        };
        if self.is_current(generation) {
            self.sink.render_air_quality(air.as_ref());
        }
    }

    fn fail(&self, generation: u64, flow: Flow, e: WeatherError) {
        let err = e.into_app_error();
        if !self.is_current(generation) {
            tracing::debug!("Ignoring failure of superseded request: {}", err);
            return;
        }
        tracing::warn!("Weather load failed: {}", err);
        self.sink.show_message(flow.failure_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkEvent};
    use skycast_core::ApiConfig;
    use skycast_storage::MemoryKvStore;
    use skycast_weather::{FixedLocation, NoLocation};

    fn offline_client() -> OpenMeteoClient {
        // Nothing listens on port 9; requests fail fast
        let api = ApiConfig {
            geocoding_url: "http://127.0.0.1:9/v1/search".into(),
            forecast_url: "http://127.0.0.1:9/v1/forecast".into(),
            air_quality_url: "http://127.0.0.1:9/v1/air-quality".into(),
        };
        OpenMeteoClient::new(&api).unwrap()
    }

    fn create_presenter<L: LocationProvider>(
        location: L,
    ) -> (Arc<RecordingSink>, Arc<MemoryKvStore>, ForecastPresenter<L>) {
        let sink = Arc::new(RecordingSink::new());
        let kv = Arc::new(MemoryKvStore::new());
        let presenter = ForecastPresenter::new(
            offline_client(),
            kv.clone(),
            TemperatureUnit::Celsius,
            sink.clone(),
            location,
            PresenterSettings::default(),
        );
        (sink, kv, presenter)
    }

    #[tokio::test]
    async fn test_empty_search_shows_field_error() {
        let (sink, _, presenter) = create_presenter(NoLocation);

        presenter.search("   ").await;

        assert_eq!(
            sink.events(),
            vec![SinkEvent::FieldError(Some(EMPTY_CITY_MESSAGE.to_string()))]
        );
    }

    #[tokio::test]
    async fn test_short_query_has_no_suggestions() {
        let (sink, _, presenter) = create_presenter(NoLocation);

        assert!(presenter.suggest("P").await.is_empty());
        assert_eq!(sink.events(), vec![SinkEvent::Suggestions(Vec::new())]);
    }

    #[tokio::test]
    async fn test_geolocation_unavailable_message() {
        let (sink, kv, presenter) = create_presenter(NoLocation);

        presenter.use_my_location().await;

        assert_eq!(
            sink.last_message().as_deref(),
            Some("Permission denied or unavailable.")
        );
        assert!(kv.get(RECENTS.key).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geolocation_fetch_failure_message() {
        let (sink, _, presenter) = create_presenter(FixedLocation::new(1.0, 2.0));

        presenter.use_my_location().await;

        assert_eq!(
            sink.last_message().as_deref(),
            Some("Could not load weather for your location.")
        );
        assert!(presenter.last_place().is_none());
    }

    #[tokio::test]
    async fn test_saved_location_failure_message() {
        let (sink, _, presenter) = create_presenter(NoLocation);

        presenter.open_place(&Place::new("Oslo, NO", 59.9, 10.7)).await;

        assert_eq!(
            sink.last_message().as_deref(),
            Some("Could not load weather for saved location.")
        );
    }

    #[test]
    fn test_save_favorite_without_place() {
        let (_, kv, presenter) = create_presenter(NoLocation);
        assert!(!presenter.save_favorite());
        assert!(kv.get(FAVORITES.key).unwrap().is_none());
    }

    #[test]
    fn test_toggle_theme_persists_and_renders() {
        let (sink, kv, presenter) = create_presenter(NoLocation);

        assert_eq!(presenter.toggle_theme(), Theme::Dark);

        assert_eq!(kv.get("themePref").unwrap().as_deref(), Some("dark"));
        assert_eq!(sink.events(), vec![SinkEvent::Theme(Theme::Dark)]);
    }

    #[test]
    fn test_refresh_lists_migrates_legacy_favorites() {
        let (sink, kv, presenter) = create_presenter(NoLocation);
        kv.set("favoriteCitiesV1", r#"["Lisbon"]"#).unwrap();

        presenter.refresh_lists();

        let events = sink.events();
        assert!(events.contains(&SinkEvent::Theme(Theme::Light)));
        assert!(events.contains(&SinkEvent::Favorites(vec![Place::named("Lisbon")])));
        assert!(events.contains(&SinkEvent::Recents(Vec::new())));
    }

    #[test]
    fn test_list_changes_are_rendered() {
        let (sink, kv, presenter) = create_presenter(NoLocation);
        kv.set(
            FAVORITES.key,
            r#"[{"name":"A","lat":1.0,"lon":2.0},{"name":"B","lat":3.0,"lon":4.0}]"#,
        )
        .unwrap();

        presenter.remove_favorite("A");
        presenter.clear_recents();

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Favorites(vec![Place::new("B", 3.0, 4.0)]),
                SinkEvent::Recents(Vec::new()),
            ]
        );
    }

    #[tokio::test]
    async fn test_deep_link_without_city() {
        let (sink, _, presenter) = create_presenter(NoLocation);
        assert!(!presenter.open_deep_link("?unit=f").await);
        assert!(sink.events().is_empty());
    }

    /// Reads succeed with nothing stored, every write fails
    struct ReadOnlyKv;

    impl KeyValueStore for ReadOnlyKv {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    #[test]
    fn test_failed_write_shows_storage_message() {
        let sink = Arc::new(RecordingSink::new());
        let presenter = ForecastPresenter::new(
            offline_client(),
            Arc::new(ReadOnlyKv),
            TemperatureUnit::Celsius,
            sink.clone(),
            NoLocation,
            PresenterSettings::default(),
        );

        presenter.clear_recents();

        assert_eq!(sink.last_message().as_deref(), Some("Could not save your changes."));
    }

    #[test]
    fn test_remove_favorite_keeps_unmigrated_legacy_entries() {
        let (sink, kv, presenter) = create_presenter(NoLocation);
        kv.set("favoriteCitiesV1", r#"["Lisbon","Tokyo"]"#).unwrap();

        presenter.remove_favorite("Lisbon");

        assert_eq!(
            sink.events().last(),
            Some(&SinkEvent::Favorites(vec![Place::named("Tokyo")]))
        );
    }

    #[tokio::test]
    async fn test_set_unit_without_place_only_persists() {
        let (sink, kv, presenter) = create_presenter(NoLocation);

        presenter.set_unit(TemperatureUnit::Fahrenheit).await;

        assert_eq!(kv.get("unit").unwrap().as_deref(), Some("f"));
        assert_eq!(presenter.unit(), TemperatureUnit::Fahrenheit);
        assert!(sink.events().is_empty());
    }
}
