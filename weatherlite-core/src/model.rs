use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const KELVIN_OFFSET: f64 = 273.15;

/// Convert an absolute temperature reported by the provider to Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is not a finite value in [-180, 180]")]
    Longitude(f64),
}

/// A geographic position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// One weather condition entry, e.g. `Rain` with icon `10d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub icon: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

/// Current weather at a location. Temperatures are in Kelvin.
///
/// Only produced by decoding a provider response, which guarantees at least
/// one condition entry, humidity within 0-100 and a non-negative wind speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    conditions: Vec<Condition>,
    pub temp_k: f64,
    pub feels_like_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    /// Unix seconds, UTC.
    pub sunrise: i64,
    /// Unix seconds, UTC.
    pub sunset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub(crate) enum InvalidWeather {
    #[error("weather response contained no condition entries")]
    EmptyConditions,
    #[error("humidity {0} is outside 0-100")]
    Humidity(f64),
    #[error("wind speed {0} is negative")]
    WindSpeed(f64),
}

/// Raw numeric fields of a weather snapshot, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeatherReadings {
    pub temp_k: f64,
    pub feels_like_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub sunrise: i64,
    pub sunset: i64,
}

impl WeatherSnapshot {
    pub(crate) fn new(
        location_name: String,
        conditions: Vec<Condition>,
        readings: WeatherReadings,
    ) -> Result<Self, InvalidWeather> {
        if conditions.is_empty() {
            return Err(InvalidWeather::EmptyConditions);
        }
        if !(0.0..=100.0).contains(&readings.humidity_pct) {
            return Err(InvalidWeather::Humidity(readings.humidity_pct));
        }
        if !(0.0..).contains(&readings.wind_speed_mps) {
            return Err(InvalidWeather::WindSpeed(readings.wind_speed_mps));
        }

        Ok(Self {
            location_name,
            conditions,
            temp_k: readings.temp_k,
            feels_like_k: readings.feels_like_k,
            temp_min_k: readings.temp_min_k,
            temp_max_k: readings.temp_max_k,
            humidity_pct: readings.humidity_pct,
            wind_speed_mps: readings.wind_speed_mps,
            sunrise: readings.sunrise,
            sunset: readings.sunset,
        })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn primary_condition(&self) -> &Condition {
        // Non-empty by construction.
        &self.conditions[0]
    }

    pub fn temp_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temp_k)
    }

    pub fn feels_like_celsius(&self) -> f64 {
        kelvin_to_celsius(self.feels_like_k)
    }

    pub fn temp_min_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temp_min_k)
    }

    pub fn temp_max_celsius(&self) -> f64 {
        kelvin_to_celsius(self.temp_max_k)
    }

    pub fn sunrise_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunrise, 0)
    }

    pub fn sunset_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sunset, 0)
    }
}

/// Pollutant concentrations in μg/m³, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentConcentrations {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PollutionSample {
    /// Unix seconds, UTC.
    pub dt: i64,
    /// The provider's own 1-5 index. Informational only.
    pub provider_index: u8,
    pub components: ComponentConcentrations,
}

impl PollutionSample {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

/// Air pollution at a location. May legitimately contain no samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutionSnapshot {
    pub coordinate: Coordinate,
    pub samples: Vec<PollutionSample>,
}

impl PollutionSnapshot {
    pub fn latest(&self) -> Option<&PollutionSample> {
        self.samples.first()
    }

    pub fn air_quality(&self) -> Option<AirQualityResult> {
        self.latest().map(|sample| crate::aqi::evaluate_aqi(&sample.components))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Unknown,
}

impl AqiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AirQualityResult {
    pub score: i64,
    pub category: AqiCategory,
}
