//! Current weather and air quality for the caller's position.

use serde::Serialize;
use tracing::instrument;

use crate::{
    error::FetchError,
    location::{CoordinateSource, LocationError},
    model::{AirQualityResult, Coordinate, PollutionSnapshot, WeatherSnapshot},
    provider::{PollutionClient, WeatherClient},
};

/// Both fetches for one coordinate. Each side succeeds or fails on its own.
#[derive(Debug)]
pub struct CurrentConditions {
    pub coordinate: Coordinate,
    pub weather: Result<WeatherSnapshot, FetchError>,
    pub pollution: Result<PollutionSnapshot, FetchError>,
}

impl CurrentConditions {
    /// AQI of the latest pollution sample, when there is one.
    pub fn air_quality(&self) -> Option<AirQualityResult> {
        self.pollution
            .as_ref()
            .ok()
            .and_then(PollutionSnapshot::air_quality)
    }

    /// Serializable view; failures are rendered as their messages.
    pub fn summary(&self) -> ConditionsSummary<'_> {
        ConditionsSummary {
            coordinate: self.coordinate,
            weather: self.weather.as_ref().map_err(ToString::to_string),
            pollution: self.pollution.as_ref().map_err(ToString::to_string),
            air_quality: self.air_quality(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConditionsSummary<'a> {
    pub coordinate: Coordinate,
    pub weather: Result<&'a WeatherSnapshot, String>,
    pub pollution: Result<&'a PollutionSnapshot, String>,
    pub air_quality: Option<AirQualityResult>,
}

/// Resolve the position, then fetch weather and pollution concurrently.
#[instrument(skip_all)]
pub async fn current_conditions(
    source: &dyn CoordinateSource,
    weather: &WeatherClient,
    pollution: &PollutionClient,
) -> Result<CurrentConditions, LocationError> {
    let coordinate = source.current_coordinate().await?;

    let (weather, pollution) = tokio::join!(
        weather.fetch_current_weather(coordinate),
        pollution.fetch_current_pollution(coordinate),
    );

    Ok(CurrentConditions {
        coordinate,
        weather,
        pollution,
    })
}
