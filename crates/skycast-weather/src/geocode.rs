//! Forward geocoding: city name to coordinates.

use serde::Deserialize;
use tracing::instrument;

use crate::client::OpenMeteoClient;
use crate::error::WeatherError;
use crate::types::Place;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeMatch>>,
}

/// One geocoding candidate
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeMatch {
    pub name: String,
    #[serde(default)]
    pub country_code: String,
    /// First-level administrative area (state, province, ...)
    #[serde(default)]
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeMatch {
    /// Name shown for a loaded place, e.g. "Paris, FR"
    pub fn display_name(&self) -> String {
        if self.country_code.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country_code)
        }
    }

    /// Label for an autocomplete row, e.g. "Paris, Île-de-France"
    pub fn suggestion_label(&self) -> String {
        match self.admin1.as_deref().filter(|a| !a.is_empty()) {
            Some(admin1) => format!("{}, {}", self.name, admin1),
            None => self.name.clone(),
        }
    }

    pub fn to_place(&self) -> Place {
        Place::new(self.display_name(), self.latitude, self.longitude)
    }
}

impl OpenMeteoClient {
    /// Up to `limit` candidates for `name`; an empty list when nothing matches.
    #[instrument(skip(self), level = "info")]
    pub async fn search_places(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeMatch>, WeatherError> {
        let query = [
            ("name", name.to_string()),
            ("count", limit.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];
        let response: GeocodingResponse = self.get_json(&self.geocoding_url, &query).await?;
        Ok(response.results.unwrap_or_default())
    }

    /// Resolve a city to its best match.
    ///
    /// Returns `WeatherError::NotFound` when the search has no results.
    pub async fn geocode(&self, city: &str) -> Result<Place, WeatherError> {
        let first = self
            .search_places(city, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

        let place = first.to_place();
        tracing::info!("Geocoded {:?} to {}", city, place.name);
        Ok(place)
    }
}
