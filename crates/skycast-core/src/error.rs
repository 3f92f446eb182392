//! Application error hierarchy.
//!
//! Crate-level errors (HTTP, SQLite, geolocation) are folded into
//! [`AppError`] where the dashboard reports them. `Display` output is for
//! logs; `user_message()` is what a person sees.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("network: {0}")]
    Network(#[from] NetworkError),

    #[error("local storage: {0}")]
    Database(#[from] DatabaseError),

    #[error("weather lookup: {0}")]
    Weather(#[from] WeatherError),

    #[error("geolocation: {0}")]
    Location(#[from] LocationError),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            // An unknown city reads the same as any failed city search
            Self::Network(_) | Self::Weather(_) => "Could not load weather. Try another city.",
            Self::Database(DatabaseError::Open(_)) => "Local storage is not accessible right now.",
            Self::Database(DatabaseError::Query(_)) | Self::Io(_) => "Could not save your changes.",
            Self::Database(DatabaseError::Corrupt(_)) => {
                "Local storage looks damaged. Clearing favorites may help."
            }
            Self::Location(e) => e.user_message(),
        }
    }
}

/// Transport-level failures talking to an HTTP API
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("timed out")]
    TimedOut,

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("unreadable payload: {0}")]
    BadPayload(String),
}

/// Failures of the local key-value database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("cannot open: {0}")]
    Open(String),

    #[error("query: {0}")]
    Query(String),

    #[error("corrupt: {0}")]
    Corrupt(String),
}

/// Domain-level weather lookup failures
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no city matches {0:?}")]
    CityNotFound(String),
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("timed out")]
    Timeout,

    #[error("no location source")]
    Unavailable,
}

impl LocationError {
    /// Every geolocation failure shows the same message
    pub fn user_message(&self) -> &'static str {
        "Permission denied or unavailable."
    }
}

/// Classify a `reqwest` failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        match (self.is_timeout(), self.is_decode(), self.status()) {
            (true, _, _) => NetworkError::TimedOut,
            (_, true, _) => NetworkError::BadPayload(self.to_string()),
            (_, _, Some(status)) => NetworkError::Status {
                code: status.as_u16(),
                body: self.to_string(),
            },
            _ => NetworkError::Unreachable(self.to_string()),
        }
    }
}

/// Classify a `rusqlite` failure.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        use rusqlite::ErrorCode;

        let code = self.sqlite_error_code();
        let detail = self.to_string();
        match code {
            Some(ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase) => {
                DatabaseError::Corrupt(detail)
            }
            Some(ErrorCode::CannotOpen | ErrorCode::PermissionDenied | ErrorCode::ReadOnly) => {
                DatabaseError::Open(detail)
            }
            _ => DatabaseError::Query(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_converts() {
        let err: AppError = LocationError::Timeout.into();
        assert!(matches!(err, AppError::Location(LocationError::Timeout)));
        assert_eq!(err.user_message(), "Permission denied or unavailable.");
    }

    #[test]
    fn test_unknown_city_uses_search_message() {
        let unknown = AppError::Weather(WeatherError::CityNotFound("Atlantis".into()));
        let upstream = AppError::Network(NetworkError::Status {
            code: 503,
            body: "down".into(),
        });
        assert_eq!(unknown.user_message(), "Could not load weather. Try another city.");
        assert_eq!(unknown.user_message(), upstream.user_message());
    }

    #[test]
    fn test_location_errors_share_message() {
        assert_eq!(
            LocationError::PermissionDenied.user_message(),
            LocationError::Unavailable.user_message()
        );
    }

    #[test]
    fn test_storage_messages() {
        let corrupt = AppError::Database(DatabaseError::Corrupt("bad json".into()));
        let io = AppError::Io(std::io::Error::other("disk full"));
        assert!(corrupt.user_message().contains("Clearing favorites"));
        assert_eq!(io.user_message(), "Could not save your changes.");
    }

    #[test]
    fn test_rusqlite_classification() {
        let err = rusqlite::Error::QueryReturnedNoRows.into_database_error();
        assert!(matches!(err, DatabaseError::Query(_)));

        let corrupt = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CORRUPT),
            None,
        );
        assert!(matches!(corrupt.into_database_error(), DatabaseError::Corrupt(_)));
    }

    #[test]
    fn test_display_is_for_logs() {
        let err = AppError::Network(NetworkError::TimedOut);
        assert_eq!(err.to_string(), "network: timed out");
    }
}
