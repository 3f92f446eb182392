//! Plain-text rendering to stdout.

use skycast_dashboard::{AirQualityView, ChartView, CurrentView, DailyCard, RenderSink, Suggestion};
use skycast_storage::Theme;
use skycast_weather::Place;

pub struct TerminalSink;

impl TerminalSink {
    fn print_places(title: &str, places: &[Place]) {
        if places.is_empty() {
            return;
        }
        println!("{}:", title);
        for place in places {
            match place.coordinates() {
                Some((lat, lon)) => println!("  {} ({:.2}, {:.2})", place.name, lat, lon),
                None => println!("  {}", place.name),
            }
        }
    }
}

impl RenderSink for TerminalSink {
    fn show_loading(&self) {
        println!("Loading...");
    }

    fn show_message(&self, message: &str) {
        println!("{}", message);
    }

    fn show_field_error(&self, message: Option<&str>) {
        if let Some(message) = message {
            eprintln!("{}", message);
        }
    }

    fn set_search_text(&self, text: &str) {
        println!("Search: {}", text);
    }

    fn render_current(&self, view: &CurrentView) {
        println!();
        println!("{}", view.place_name);
        println!(
            "{} {}. {} (feels {})",
            view.glyph, view.description, view.temperature, view.feels_like
        );
        println!("Humidity {} • Wind {}", view.humidity, view.wind);

        if !view.preview.is_empty() {
            let slots: Vec<String> = view
                .preview
                .iter()
                .map(|slot| format!("{}: {}", slot.label, slot.temperature))
                .collect();
            println!("Next hours: {}", slots.join(" • "));
        }
    }

    fn render_daily(&self, cards: &[DailyCard]) {
        if cards.is_empty() {
            return;
        }
        println!();
        for card in cards {
            println!(
                "{:<4}{} {:>5} / {:<5} sunrise {} sunset {}  precip {}",
                card.weekday,
                card.glyph,
                card.high,
                card.low,
                card.sunrise,
                card.sunset,
                card.precipitation
            );
        }
    }

    fn render_chart(&self, chart: Option<&ChartView>) {
        let Some(chart) = chart else {
            return;
        };
        println!();
        let points: Vec<String> = chart
            .points
            .iter()
            .map(|p| format!("{}h {}", p.label, p.value))
            .collect();
        println!("Hourly: {}", points.join("  "));
    }

    fn render_air_quality(&self, air: Option<&AirQualityView>) {
        let Some(air) = air else {
            return;
        };
        println!();
        println!("{}", air.summary);
        println!("{}  {}", air.pm2_5, air.pm10);
    }

    fn render_favorites(&self, places: &[Place]) {
        Self::print_places("Favorites", places);
    }

    fn render_recents(&self, places: &[Place]) {
        Self::print_places("Recent", places);
    }

    fn render_suggestions(&self, suggestions: &[Suggestion]) {
        for s in suggestions {
            println!("  {} ({})", s.label, s.country_code);
        }
    }

    fn apply_theme(&self, theme: Theme) {
        tracing::debug!("Theme: {}", theme);
    }
}
