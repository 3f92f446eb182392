//! Unit and theme preferences.

use std::fmt;
use std::sync::Arc;

use skycast_core::TemperatureUnit;

use crate::error::StorageError;
use crate::kv::KeyValueStore;

pub const UNIT_KEY: &str = "unit";
pub const THEME_KEY: &str = "themePref";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted display preferences.
///
/// Unknown or unreadable stored values fall back to the defaults.
pub struct Preferences {
    kv: Arc<dyn KeyValueStore>,
    default_unit: TemperatureUnit,
}

impl Preferences {
    pub fn new(kv: Arc<dyn KeyValueStore>, default_unit: TemperatureUnit) -> Self {
        Self { kv, default_unit }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.read(UNIT_KEY)
            .and_then(|code| TemperatureUnit::from_code(&code))
            .unwrap_or(self.default_unit)
    }

    pub fn set_unit(&self, unit: TemperatureUnit) -> Result<(), StorageError> {
        self.kv.set(UNIT_KEY, unit.code())
    }

    pub fn theme(&self) -> Theme {
        self.read(THEME_KEY)
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.kv.set(THEME_KEY, theme.as_str())
    }

    /// Flip and persist the theme, returning the new one
    pub fn toggle_theme(&self) -> Result<Theme, StorageError> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.kv.get(key).unwrap_or_else(|e| {
            tracing::warn!("Failed to read {}: {}", key, e);
            None
        })
    }
}
