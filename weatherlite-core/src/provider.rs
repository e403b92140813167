//! Clients for the OpenWeather current-weather and air-pollution endpoints.
//!
//! The two clients are independent: each owns its endpoint and can fail on its
//! own. They share the request/status/decode mechanics in [`get_json`].

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{config::ApiKey, error::FetchError, model::Coordinate};

pub mod pollution;
pub mod weather;

pub use pollution::PollutionClient;
pub use weather::WeatherClient;

/// `{endpoint}?lat={lat}&lon={lon}&appid={key}`
pub(crate) fn coordinate_url(endpoint: &Url, coordinate: Coordinate, api_key: &ApiKey) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("lat", &coordinate.latitude().to_string())
        .append_pair("lon", &coordinate.longitude().to_string())
        .append_pair("appid", api_key.expose());
    url
}

/// Narrow a JSON number to an integer type.
///
/// The provider may write whole numbers as `3` or `3.0`; both are accepted.
/// Fractional, non-finite or out-of-range values are decode failures.
pub(crate) fn whole_number<T: TryFrom<i64>>(
    endpoint: &'static str,
    field: &str,
    value: f64,
) -> Result<T, FetchError> {
    let invalid = || FetchError::Decode {
        endpoint,
        reason: format!("`{field}` value {value} is not a whole number in range"),
    };

    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    if !value.is_finite()
        || value.fract() != 0.0
        || value < i64::MIN as f64
        || value >= i64::MAX as f64
    {
        return Err(invalid());
    }

    T::try_from(value as i64).map_err(|_| invalid())
}

/// GET `url` and decode a 200 response as `T`.
///
/// Any other status is a transport failure and the body is left unread.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    endpoint: &'static str,
    url: Url,
) -> Result<T, FetchError> {
    let res = http
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Network { endpoint, source })?;

    let status = res.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status { endpoint, status });
    }

    let body = res
        .bytes()
        .await
        .map_err(|source| FetchError::Network { endpoint, source })?;

    serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
        endpoint,
        reason: e.to_string(),
    })
}
