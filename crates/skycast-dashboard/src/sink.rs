//! Rendering surface.
//!
//! The presenter pushes finished view models into a [`RenderSink`]; it never
//! formats output itself. `None` for an optional panel means "hide it".

use parking_lot::Mutex;
use skycast_storage::Theme;
use skycast_weather::Place;

use crate::view::{AirQualityView, ChartView, CurrentView, DailyCard, Suggestion};

pub trait RenderSink: Send + Sync {
    /// A request started; replace the results area with a placeholder
    fn show_loading(&self);

    /// Replace the results area with a single message
    fn show_message(&self, message: &str);

    /// Set or clear (`None`) the search field error
    fn show_field_error(&self, message: Option<&str>);

    /// Fill the search field, e.g. from a deep link
    fn set_search_text(&self, text: &str);

    fn render_current(&self, view: &CurrentView);

    fn render_daily(&self, cards: &[DailyCard]);

    fn render_chart(&self, chart: Option<&ChartView>);

    fn render_air_quality(&self, air: Option<&AirQualityView>);

    fn render_favorites(&self, places: &[Place]);

    fn render_recents(&self, places: &[Place]);

    fn render_suggestions(&self, suggestions: &[Suggestion]);

    fn apply_theme(&self, theme: Theme);
}

/// Everything a [`RecordingSink`] has been asked to draw
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Loading,
    Message(String),
    FieldError(Option<String>),
    SearchText(String),
    Current(CurrentView),
    Daily(Vec<DailyCard>),
    Chart(Option<ChartView>),
    AirQuality(Option<AirQualityView>),
    Favorites(Vec<Place>),
    Recents(Vec<Place>),
    Suggestions(Vec<Suggestion>),
    Theme(Theme),
}

/// Keeps every render call in order, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Most recent current-conditions view
    pub fn last_current(&self) -> Option<CurrentView> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SinkEvent::Current(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Most recent results-area message
    pub fn last_message(&self) -> Option<String> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SinkEvent::Message(msg) => Some(msg.clone()),
            _ => None,
        })
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().push(event);
    }
}

impl RenderSink for RecordingSink {
    fn show_loading(&self) {
        self.push(SinkEvent::Loading);
    }

    fn show_message(&self, message: &str) {
        self.push(SinkEvent::Message(message.to_string()));
    }

    fn show_field_error(&self, message: Option<&str>) {
        self.push(SinkEvent::FieldError(message.map(str::to_string)));
    }

    fn set_search_text(&self, text: &str) {
        self.push(SinkEvent::SearchText(text.to_string()));
    }

    fn render_current(&self, view: &CurrentView) {
        self.push(SinkEvent::Current(view.clone()));
    }

    fn render_daily(&self, cards: &[DailyCard]) {
        self.push(SinkEvent::Daily(cards.to_vec()));
    }

    fn render_chart(&self, chart: Option<&ChartView>) {
        self.push(SinkEvent::Chart(chart.cloned()));
    }

    fn render_air_quality(&self, air: Option<&AirQualityView>) {
        self.push(SinkEvent::AirQuality(air.cloned()));
    }

    fn render_favorites(&self, places: &[Place]) {
        self.push(SinkEvent::Favorites(places.to_vec()));
    }

    fn render_recents(&self, places: &[Place]) {
        self.push(SinkEvent::Recents(places.to_vec()));
    }

    fn render_suggestions(&self, suggestions: &[Suggestion]) {
        self.push(SinkEvent::Suggestions(suggestions.to_vec()));
    }

    fn apply_theme(&self, theme: Theme) {
        self.push(SinkEvent::Theme(theme));
    }
}
