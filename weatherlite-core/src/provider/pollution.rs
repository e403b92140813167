use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::{ApiKey, ProviderSettings},
    error::FetchError,
    model::{ComponentConcentrations, Coordinate, PollutionSample, PollutionSnapshot},
};

use super::{coordinate_url, get_json, whole_number};

const ENDPOINT: &str = "pollution";

/// Fetches component concentrations from the OpenWeather `air_pollution` endpoint.
#[derive(Debug, Clone)]
pub struct PollutionClient {
    api_key: ApiKey,
    endpoint: Url,
    http: Client,
}

impl PollutionClient {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self::with_http(settings, Client::new())
    }

    pub fn with_http(settings: &ProviderSettings, http: Client) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            endpoint: settings.pollution_endpoint.clone(),
            http,
        }
    }

    pub fn request_url(&self, coordinate: Coordinate) -> Url {
        coordinate_url(&self.endpoint, coordinate, &self.api_key)
    }

    #[instrument(skip_all, fields(%coordinate), level = "info")]
    pub async fn fetch_current_pollution(
        &self,
        coordinate: Coordinate,
    ) -> Result<PollutionSnapshot, FetchError> {
        let result =
            get_json::<OwPollutionResponse>(&self.http, ENDPOINT, self.request_url(coordinate))
                .await
                .and_then(PollutionSnapshot::try_from);

        match &result {
            Ok(snapshot) => debug!(samples = snapshot.samples.len(), "pollution fetched"),
            Err(err) => warn!(%err, "pollution fetch failed"),
        }

        result
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwIndex {
    aqi: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    main: OwIndex,
    components: ComponentConcentrations,
    dt: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    coord: OwCoord,
    list: Vec<OwPollutionEntry>,
}

impl TryFrom<OwPollutionResponse> for PollutionSnapshot {
    type Error = FetchError;

    fn try_from(parsed: OwPollutionResponse) -> Result<Self, Self::Error> {
        let coordinate =
            Coordinate::new(parsed.coord.lat, parsed.coord.lon).map_err(|e| FetchError::Decode {
                endpoint: ENDPOINT,
                reason: e.to_string(),
            })?;

        let samples = parsed
            .list
            .into_iter()
            .map(|entry| -> Result<PollutionSample, FetchError> {
                Ok(PollutionSample {
                    dt: whole_number(ENDPOINT, "dt", entry.dt)?,
                    provider_index: whole_number(ENDPOINT, "main.aqi", entry.main.aqi)?,
                    components: entry.components,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PollutionSnapshot {
            coordinate,
            samples,
        })
    }
}
