use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use url::Url;

use crate::model::{Coordinate, CoordinateError};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHERLITE_API_KEY";

pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_POLLUTION_ENDPOINT: &str =
    "https://api.openweathermap.org/data/2.5/air_pollution";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "No API key configured.\n\
         Hint: run `weatherlite configure` or set {API_KEY_ENV}."
    )]
    MissingApiKey,

    #[error("API key must be non-empty and contain no whitespace")]
    InvalidApiKey,

    #[error("Invalid {name} endpoint '{url}': {reason}")]
    InvalidEndpoint {
        name: &'static str,
        url: String,
        reason: String,
    },
}

/// Optional overrides for the provider endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollution: Option<String>,
}

/// Default location used when the caller has no position of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [endpoints]
/// weather = "https://api.openweathermap.org/data/2.5/weather"
///
/// [home]
/// lat = 12.97
/// lon = 77.59
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<HomeLocation>,
}

/// Credential shared by all outbound requests. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidApiKey);
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Validated settings injected into the provider clients.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: ApiKey,
    pub weather_endpoint: Url,
    pub pollution_endpoint: Url,
}

impl ProviderSettings {
    /// Settings against the default OpenWeather endpoints.
    pub fn new(api_key: ApiKey) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key,
            weather_endpoint: parse_endpoint("weather", DEFAULT_WEATHER_ENDPOINT)?,
            pollution_endpoint: parse_endpoint("pollution", DEFAULT_POLLUTION_ENDPOINT)?,
        })
    }
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        name,
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

impl Config {
    /// Resolve and validate everything the clients need before any request is made.
    pub fn settings(&self) -> Result<ProviderSettings, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
            .and_then(ApiKey::new)?;

        let weather_endpoint = parse_endpoint(
            "weather",
            self.endpoints.weather.as_deref().unwrap_or(DEFAULT_WEATHER_ENDPOINT),
        )?;
        let pollution_endpoint = parse_endpoint(
            "pollution",
            self.endpoints.pollution.as_deref().unwrap_or(DEFAULT_POLLUTION_ENDPOINT),
        )?;

        Ok(ProviderSettings {
            api_key,
            weather_endpoint,
            pollution_endpoint,
        })
    }

    /// The configured home location, if any.
    pub fn home_coordinate(&self) -> Option<Result<Coordinate, CoordinateError>> {
        self.home.map(|home| Coordinate::new(home.lat, home.lon))
    }

    /// Apply `WEATHERLITE_API_KEY` on top of the stored key.
    pub fn apply_env(&mut self) {
        self.override_api_key(std::env::var(API_KEY_ENV).ok());
    }

    /// Replace the stored key with `value` unless it is absent or blank.
    pub fn override_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherlite", "weatherlite")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_when_api_key_missing() {
        let cfg = Config::default();
        let err = cfg.settings().unwrap_err();

        assert_eq!(err, ConfigError::MissingApiKey);
        assert!(err.to_string().contains("Hint: run `weatherlite configure`"));
    }

    #[test]
    fn settings_reject_blank_or_spaced_key() {
        for key in ["", "  ", "abc def"] {
            let cfg = Config {
                api_key: Some(key.into()),
                ..Default::default()
            };
            assert_eq!(cfg.settings().unwrap_err(), ConfigError::InvalidApiKey);
        }
    }

    #[test]
    fn settings_use_default_endpoints() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Default::default()
        };

        let settings = cfg.settings().expect("valid settings");
        assert_eq!(settings.api_key.expose(), "KEY");
        assert_eq!(settings.weather_endpoint.as_str(), DEFAULT_WEATHER_ENDPOINT);
        assert_eq!(settings.pollution_endpoint.as_str(), DEFAULT_POLLUTION_ENDPOINT);
    }

    #[test]
    fn provider_settings_new_uses_default_endpoints() {
        let settings = ProviderSettings::new(ApiKey::new("KEY").unwrap()).unwrap();

        assert_eq!(settings.weather_endpoint.as_str(), DEFAULT_WEATHER_ENDPOINT);
        assert_eq!(settings.pollution_endpoint.as_str(), DEFAULT_POLLUTION_ENDPOINT);
    }

    #[test]
    fn settings_reject_malformed_endpoint() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            endpoints: Endpoints {
                weather: Some("not a url".into()),
                pollution: None,
            },
            ..Default::default()
        };

        let err = cfg.settings().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { name: "weather", .. }));
    }

    #[test]
    fn settings_reject_non_http_endpoint() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            endpoints: Endpoints {
                weather: None,
                pollution: Some("ftp://example.com/air".into()),
            },
            ..Default::default()
        };

        let err = cfg.settings().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { name: "pollution", .. }));
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn override_api_key_ignores_blank_values() {
        let mut cfg = Config {
            api_key: Some("FILE_KEY".into()),
            ..Default::default()
        };

        cfg.override_api_key(None);
        cfg.override_api_key(Some("   ".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("FILE_KEY"));

        cfg.override_api_key(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn home_coordinate_is_validated() {
        let mut cfg = Config::default();
        assert!(cfg.home_coordinate().is_none());

        cfg.home = Some(HomeLocation {
            lat: 12.97,
            lon: 77.59,
        });
        assert!(matches!(cfg.home_coordinate(), Some(Ok(_))));

        cfg.home = Some(HomeLocation {
            lat: 120.0,
            lon: 0.0,
        });
        assert!(matches!(cfg.home_coordinate(), Some(Err(_))));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            endpoints: Endpoints {
                weather: Some("http://localhost:8080/weather".into()),
                pollution: None,
            },
            home: Some(HomeLocation {
                lat: 12.97,
                lon: 77.59,
            }),
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
