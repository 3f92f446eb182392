//! SkyCast dashboard: the presenter that drives a search from input to
//! rendered view models, plus the sink it renders into.

pub mod deeplink;
pub mod error_mapping;
pub mod presenter;
pub mod sink;
pub mod view;

pub use deeplink::city_from_link;
pub use error_mapping::IntoAppError;
pub use presenter::{ForecastPresenter, PresenterSettings, EMPTY_CITY_MESSAGE, GEOLOCATION_PLACE_NAME};
pub use sink::{RecordingSink, RenderSink, SinkEvent};
pub use view::{
    AirQualityView, ChartPoint, ChartView, CurrentView, DailyCard, HourlySlot, Suggestion,
};
