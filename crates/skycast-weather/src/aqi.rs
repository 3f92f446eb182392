//! US AQI severity bands.

/// EPA category for a US AQI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Unknown,
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

// Inclusive upper bounds, ascending. Anything above the last bound is hazardous.
const BREAKPOINTS: &[(f64, AqiCategory)] = &[
    (50.0, AqiCategory::Good),
    (100.0, AqiCategory::Moderate),
    (150.0, AqiCategory::UnhealthyForSensitiveGroups),
    (200.0, AqiCategory::Unhealthy),
    (300.0, AqiCategory::VeryUnhealthy),
];

impl AqiCategory {
    /// Classify a reading; `None` and NaN are `Unknown`
    pub fn classify(aqi: Option<f64>) -> Self {
        let Some(value) = aqi.filter(|v| !v.is_nan()) else {
            return Self::Unknown;
        };

        BREAKPOINTS
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map_or(Self::Hazardous, |(_, category)| *category)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(aqi: Option<f64>) -> &'static str {
        AqiCategory::classify(aqi).label()
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(label(Some(50.0)), "Good");
        assert_eq!(label(Some(51.0)), "Moderate");
        assert_eq!(label(Some(100.0)), "Moderate");
        assert_eq!(label(Some(150.0)), "Unhealthy for Sensitive Groups");
        assert_eq!(label(Some(200.0)), "Unhealthy");
        assert_eq!(label(Some(300.0)), "Very Unhealthy");
        assert_eq!(label(Some(301.0)), "Hazardous");
    }

    #[test]
    fn test_missing_is_unknown() {
        assert_eq!(label(None), "Unknown");
        assert_eq!(label(Some(f64::NAN)), "Unknown");
    }

    #[test]
    fn test_fractional_between_bands() {
        assert_eq!(label(Some(50.5)), "Moderate");
        assert_eq!(label(Some(0.0)), "Good");
        assert_eq!(label(Some(999.0)), "Hazardous");
    }
}
