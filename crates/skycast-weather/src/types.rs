use serde::{Deserialize, Serialize};

pub use skycast_core::TemperatureUnit;

/// A named location, the unit of favorites/recents storage.
///
/// Identity is the exact `name`, never the coordinates. Coordinates are
/// absent only for places imported from the legacy name-only favorites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl Place {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// A place known only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lat: None,
            lon: None,
        }
    }

    /// Both coordinates, when present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_coordinates() {
        assert_eq!(Place::new("Oslo, NO", 59.91, 10.75).coordinates(), Some((59.91, 10.75)));
        assert_eq!(Place::named("Oslo").coordinates(), None);
    }

    #[test]
    fn test_named_place_serializes_without_coordinates() {
        let json = serde_json::to_string(&Place::named("Oslo")).unwrap();
        assert_eq!(json, r#"{"name":"Oslo"}"#);

        let back: Place = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Place::named("Oslo"));
    }
}
