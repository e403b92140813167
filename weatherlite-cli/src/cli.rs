use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use weatherlite_core::{
    ComponentConcentrations, Config, Coordinate, CoordinateSource, FixedLocation,
    PollutionClient, ProviderSettings, Unavailable, WeatherClient, config::HomeLocation,
    current_conditions, evaluate_aqi,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherlite", version, about = "Current weather and air quality")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and an optional home location.
    Configure,

    /// Show weather and air quality.
    Now(FetchArgs),

    /// Show current weather only.
    Weather(FetchArgs),

    /// Show air pollution and AQI only.
    Air(FetchArgs),

    /// Evaluate the AQI for given concentrations (μg/m³) without any request.
    Aqi {
        #[arg(long, default_value_t = 0.0)]
        co: f64,
        #[arg(long, default_value_t = 0.0)]
        no2: f64,
        #[arg(long, default_value_t = 0.0)]
        so2: f64,
        #[arg(long, default_value_t = 0.0)]
        pm25: f64,
    },
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Latitude in decimal degrees; defaults to the configured home.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees; defaults to the configured home.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl FetchArgs {
    fn location(&self, config: &Config) -> Result<Box<dyn CoordinateSource>> {
        let coordinate = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
            _ => config
                .home_coordinate()
                .transpose()
                .context("Configured home location is invalid")?,
        };

        Ok(match coordinate {
            Some(c) => Box::new(FixedLocation(c)),
            None => Box::new(Unavailable),
        })
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Now(args) => {
                let (config, settings) = load_settings()?;
                let source = args.location(&config)?;
                let weather = WeatherClient::new(&settings);
                let pollution = PollutionClient::new(&settings);

                let report = current_conditions(source.as_ref(), &weather, &pollution).await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report.summary())?);
                } else {
                    output::print_conditions(&report);
                }
                Ok(())
            }
            Command::Weather(args) => {
                let (config, settings) = load_settings()?;
                let coordinate = args.location(&config)?.current_coordinate().await?;
                let snapshot = WeatherClient::new(&settings)
                    .fetch_current_weather(coordinate)
                    .await?;

                if args.json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    output::print_weather(&snapshot);
                }
                Ok(())
            }
            Command::Air(args) => {
                let (config, settings) = load_settings()?;
                let coordinate = args.location(&config)?.current_coordinate().await?;
                let snapshot = PollutionClient::new(&settings)
                    .fetch_current_pollution(coordinate)
                    .await?;

                if args.json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    output::print_pollution(&snapshot);
                }
                Ok(())
            }
            Command::Aqi { co, no2, so2, pm25 } => {
                let components = ComponentConcentrations {
                    co,
                    no2,
                    so2,
                    pm2_5: pm25,
                    ..Default::default()
                };
                output::print_air_quality(&evaluate_aqi(&components));
                Ok(())
            }
        }
    }
}

fn load_settings() -> Result<(Config, ProviderSettings)> {
    let mut config = Config::load()?;
    config.apply_env();
    let settings = config.settings()?;
    Ok((config, settings))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    config.api_key = Some(api_key.trim().to_string());

    let lat = CustomType::<f64>::new("Home latitude (Esc to skip):").prompt_skippable()?;
    if let Some(lat) = lat {
        let lon = CustomType::<f64>::new("Home longitude:")
            .prompt_skippable()?
            .ok_or_else(|| anyhow!("A home location needs both latitude and longitude"))?;
        Coordinate::new(lat, lon)?;
        config.home = Some(HomeLocation { lat, lon });
    }

    config.settings()?;
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "weatherlite",
            "weather",
            "--lat",
            "-33.87",
            "--lon",
            "151.21",
        ])
        .unwrap();
        match cli.command {
            Command::Weather(args) => {
                assert_eq!(args.lat, Some(-33.87));
                assert_eq!(args.lon, Some(151.21));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["weatherlite", "air", "--lat", "1.0"]).is_err());
    }

    #[tokio::test]
    async fn flags_take_precedence_over_home() {
        let config = Config {
            home: Some(HomeLocation { lat: 1.0, lon: 2.0 }),
            ..Default::default()
        };
        let args = FetchArgs {
            lat: Some(12.97),
            lon: Some(77.59),
            json: false,
        };

        let source = args.location(&config).unwrap();
        let coordinate = source.current_coordinate().await.unwrap();
        assert_eq!(coordinate.latitude(), 12.97);
    }

    #[tokio::test]
    async fn falls_back_to_home_then_unavailable() {
        let args = FetchArgs {
            lat: None,
            lon: None,
            json: false,
        };

        let config = Config {
            home: Some(HomeLocation { lat: 1.0, lon: 2.0 }),
            ..Default::default()
        };
        let source = args.location(&config).unwrap();
        let coordinate = source.current_coordinate().await.unwrap();
        assert_eq!(coordinate.longitude(), 2.0);

        let source = args.location(&Config::default()).unwrap();
        assert!(source.current_coordinate().await.is_err());
    }
}
