//! Maps crate errors to `skycast_core::AppError` for consistent logging and
//! user-facing messages.

use skycast_core::{
    AppError, DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt,
    WeatherError as AppWeatherError,
};
use skycast_storage::StorageError;
use skycast_weather::location::LocationError;
use skycast_weather::WeatherError;

/// Conversion into the application error hierarchy.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { status, body } => {
                AppError::Network(NetworkError::Status { code: status, body })
            }
            WeatherError::NotFound(city) => {
                AppError::Weather(AppWeatherError::CityNotFound(city))
            }
            WeatherError::Parse(msg) => AppError::Network(NetworkError::BadPayload(msg)),
        }
    }
}

impl IntoAppError for StorageError {
    fn into_app_error(self) -> AppError {
        match self {
            StorageError::Database(e) => AppError::Database(e.into_database_error()),
            StorageError::Serialize(e) => AppError::Database(DatabaseError::Corrupt(e.to_string())),
            StorageError::Io(e) => AppError::Io(e),
        }
    }
}

impl IntoAppError for LocationError {
    fn into_app_error(self) -> AppError {
        AppError::Location(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_city_not_found() {
        let err = WeatherError::NotFound("Atlantis".into()).into_app_error();
        assert!(matches!(
            err,
            AppError::Weather(AppWeatherError::CityNotFound(ref c)) if c == "Atlantis"
        ));
        assert_eq!(err.user_message(), "Could not load weather. Try another city.");
    }

    #[test]
    fn test_status_maps_to_server_error() {
        let err = WeatherError::Status {
            status: 503,
            body: "maintenance".into(),
        }
        .into_app_error();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::Status { code: 503, .. })
        ));
    }

    #[test]
    fn test_parse_maps_to_invalid_response() {
        let err = WeatherError::Parse("eof".into()).into_app_error();
        assert!(matches!(err, AppError::Network(NetworkError::BadPayload(_))));
    }

    #[test]
    fn test_storage_errors() {
        let err = StorageError::Database(rusqlite::Error::QueryReturnedNoRows).into_app_error();
        assert!(matches!(err, AppError::Database(DatabaseError::Query(_))));

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StorageError::Serialize(json).into_app_error();
        assert!(matches!(err, AppError::Database(DatabaseError::Corrupt(_))));
    }

    #[test]
    fn test_location_error() {
        let err = LocationError::Timeout.into_app_error();
        assert_eq!(err.user_message(), "Permission denied or unavailable.");
    }
}
