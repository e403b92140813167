//! Core library for WeatherLite.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the current-weather and air-pollution endpoints
//! - The simplified air quality index
//! - Shared domain models (coordinates, snapshots)
//!
//! It is used by `weatherlite-cli`, but can also be reused by other front-ends.

pub mod aqi;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod report;

pub use aqi::evaluate_aqi;
pub use config::{ApiKey, Config, ConfigError, ProviderSettings};
pub use error::{ErrorKind, FetchError};
pub use location::{CoordinateSource, FixedLocation, LocationError, Unavailable};
pub use model::{
    AirQualityResult, AqiCategory, ComponentConcentrations, Condition, Coordinate,
    PollutionSample, PollutionSnapshot, WeatherSnapshot,
};
pub use provider::{PollutionClient, WeatherClient};
pub use report::{CurrentConditions, current_conditions};
