//! `?city=Name` deep links.

use url::{form_urlencoded, Url};

const CITY_PARAM: &str = "city";

/// The trimmed `city` parameter of a query string or full URL.
///
/// Accepts `?city=Paris`, `city=Paris` and `https://host/page?city=Paris`.
/// Returns `None` when the parameter is missing or blank.
pub fn city_from_link(link: &str) -> Option<String> {
    let link = link.trim();

    let city = if link.contains("://") {
        let url = Url::parse(link).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == CITY_PARAM)
            .map(|(_, value)| value.into_owned())
    } else {
        form_urlencoded::parse(link.trim_start_matches('?').as_bytes())
            .find(|(key, _)| key == CITY_PARAM)
            .map(|(_, value)| value.into_owned())
    }?;

    let city = city.trim();
    (!city.is_empty()).then(|| city.to_string())
}
