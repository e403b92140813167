use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::{ApiKey, ProviderSettings},
    error::FetchError,
    model::{Condition, Coordinate, WeatherReadings, WeatherSnapshot},
};

use super::{coordinate_url, get_json, whole_number};

const ENDPOINT: &str = "weather";

/// Fetches current conditions from the OpenWeather `weather` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: ApiKey,
    endpoint: Url,
    http: Client,
}

impl WeatherClient {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self::with_http(settings, Client::new())
    }

    pub fn with_http(settings: &ProviderSettings, http: Client) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            endpoint: settings.weather_endpoint.clone(),
            http,
        }
    }

    pub fn request_url(&self, coordinate: Coordinate) -> Url {
        coordinate_url(&self.endpoint, coordinate, &self.api_key)
    }

    #[instrument(skip_all, fields(%coordinate), level = "info")]
    pub async fn fetch_current_weather(
        &self,
        coordinate: Coordinate,
    ) -> Result<WeatherSnapshot, FetchError> {
        let result =
            get_json::<OwCurrentResponse>(&self.http, ENDPOINT, self.request_url(coordinate))
                .await
                .and_then(WeatherSnapshot::try_from);

        match &result {
            Ok(snapshot) => debug!(location = %snapshot.location_name, "weather fetched"),
            Err(err) => warn!(%err, "weather fetch failed"),
        }

        result
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: f64,
    sunset: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let conditions = parsed
            .weather
            .into_iter()
            .map(|w| Condition {
                main: w.main,
                icon: w.icon,
            })
            .collect();

        let readings = WeatherReadings {
            temp_k: parsed.main.temp,
            feels_like_k: parsed.main.feels_like,
            temp_min_k: parsed.main.temp_min,
            temp_max_k: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            sunrise: whole_number(ENDPOINT, "sys.sunrise", parsed.sys.sunrise)?,
            sunset: whole_number(ENDPOINT, "sys.sunset", parsed.sys.sunset)?,
        };

        WeatherSnapshot::new(parsed.name, conditions, readings).map_err(|e| FetchError::Decode {
            endpoint: ENDPOINT,
            reason: e.to_string(),
        })
    }
}
