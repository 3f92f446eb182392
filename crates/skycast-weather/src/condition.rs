//! WMO weather code classification.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

/// Icon shown next to a weather description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Sun,
    SunBehindCloud,
    Cloud,
    Fog,
    Rain,
    Snow,
    Thunderstorm,
    Thermometer,
}

impl Glyph {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "☀️",
            Self::SunBehindCloud => "🌤️",
            Self::Cloud => "☁️",
            Self::Fog => "🌫️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Thermometer => "🌡️",
        }
    }
}

impl std::fmt::Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description used for codes missing from [`WMO_CODES`]
pub const FALLBACK_DESCRIPTION: &str = "Weather";

/// Glyph used for codes missing from [`WMO_CODES`]
pub const FALLBACK_GLYPH: Glyph = Glyph::Thermometer;

#[derive(Debug)]
struct WmoCode {
    code: i32,
    description: &'static str,
    glyph: Glyph,
}

// Sorted by code for binary search.
const WMO_CODES: &[WmoCode] = &[
    WmoCode { code: 0, description: "Clear sky", glyph: Glyph::Sun },
    WmoCode { code: 1, description: "Mainly clear", glyph: Glyph::SunBehindCloud },
    WmoCode { code: 2, description: "Partly cloudy", glyph: Glyph::SunBehindCloud },
    WmoCode { code: 3, description: "Overcast", glyph: Glyph::Cloud },
    WmoCode { code: 45, description: "Fog", glyph: Glyph::Fog },
    WmoCode { code: 48, description: "Depositing rime fog", glyph: Glyph::Fog },
    WmoCode { code: 51, description: "Light drizzle", glyph: Glyph::Rain },
    WmoCode { code: 53, description: "Drizzle", glyph: Glyph::Rain },
    WmoCode { code: 55, description: "Dense drizzle", glyph: Glyph::Rain },
    WmoCode { code: 61, description: "Slight rain", glyph: Glyph::Rain },
    WmoCode { code: 63, description: "Rain", glyph: Glyph::Rain },
    WmoCode { code: 65, description: "Heavy rain", glyph: Glyph::Rain },
    WmoCode { code: 71, description: "Slight snow", glyph: Glyph::Snow },
    WmoCode { code: 73, description: "Snow", glyph: Glyph::Snow },
    WmoCode { code: 75, description: "Heavy snow", glyph: Glyph::Snow },
    WmoCode { code: 80, description: "Rain showers", glyph: Glyph::Rain },
    WmoCode { code: 81, description: "Heavy showers", glyph: Glyph::Rain },
    WmoCode { code: 82, description: "Violent showers", glyph: Glyph::Rain },
    WmoCode { code: 95, description: "Thunderstorm", glyph: Glyph::Thunderstorm },
];

fn lookup(code: i32) -> Option<&'static WmoCode> {
    WMO_CODES
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|idx| &WMO_CODES[idx])
}

/// Human-readable description of a WMO code, `"Weather"` when unknown
pub fn describe(code: i32) -> &'static str {
    lookup(code).map_or(FALLBACK_DESCRIPTION, |entry| entry.description)
}

/// Icon for a WMO code, a thermometer when unknown
pub fn icon_for(code: i32) -> Glyph {
    lookup(code).map_or(FALLBACK_GLYPH, |entry| entry.glyph)
}

/// Whether the code has its own table entry
pub fn is_known(code: i32) -> bool {
    lookup(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(WMO_CODES.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(describe(0), "Clear sky");
        assert_eq!(icon_for(0), Glyph::Sun);
    }

    #[test]
    fn test_wmo_code_partly_cloudy() {
        assert_eq!(describe(1), "Mainly clear");
        assert_eq!(describe(2), "Partly cloudy");
        assert_eq!(icon_for(1), Glyph::SunBehindCloud);
        assert_eq!(icon_for(2), Glyph::SunBehindCloud);
    }

    #[test]
    fn test_wmo_code_fog() {
        assert_eq!(describe(45), "Fog");
        assert_eq!(describe(48), "Depositing rime fog");
        assert_eq!(icon_for(48), Glyph::Fog);
    }

    #[test]
    fn test_wmo_code_precipitation_tiers() {
        assert_eq!(describe(55), "Dense drizzle");
        assert_eq!(describe(65), "Heavy rain");
        assert_eq!(describe(82), "Violent showers");
        for code in [51, 53, 55, 61, 63, 65, 80, 81, 82] {
            assert_eq!(icon_for(code), Glyph::Rain, "code {}", code);
        }
    }

    #[test]
    fn test_wmo_code_snow() {
        assert_eq!(describe(71), "Slight snow");
        assert_eq!(describe(75), "Heavy snow");
        for code in [71, 73, 75] {
            assert_eq!(icon_for(code), Glyph::Snow);
        }
    }

    #[test]
    fn test_wmo_code_thunderstorm() {
        assert_eq!(describe(95), "Thunderstorm");
        assert_eq!(icon_for(95), Glyph::Thunderstorm);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in -10..=200 {
            if is_known(code) {
                continue;
            }
            assert_eq!(describe(code), FALLBACK_DESCRIPTION, "code {}", code);
            assert_eq!(icon_for(code), FALLBACK_GLYPH, "code {}", code);
        }
        // Codes Open-Meteo can send but the table does not cover
        assert_eq!(describe(96), "Weather");
        assert_eq!(icon_for(77), Glyph::Thermometer);
    }

    #[test]
    fn test_glyph_display() {
        assert_eq!(Glyph::Sun.to_string(), "☀️");
        assert_eq!(FALLBACK_GLYPH.as_str(), "🌡️");
    }
}
