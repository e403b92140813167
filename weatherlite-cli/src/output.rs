//! Text rendering for the terminal.

use chrono::{DateTime, Local, Utc};
use weatherlite_core::{AirQualityResult, CurrentConditions, PollutionSnapshot, WeatherSnapshot};

pub fn print_conditions(report: &CurrentConditions) {
    println!("Location: {}", report.coordinate);
    println!();

    match &report.weather {
        Ok(snapshot) => print_weather(snapshot),
        Err(err) => println!("Weather unavailable: {err}"),
    }
    println!();

    match &report.pollution {
        Ok(snapshot) => print_pollution(snapshot),
        Err(err) => println!("Air quality unavailable: {err}"),
    }
}

pub fn print_weather(snapshot: &WeatherSnapshot) {
    let condition = snapshot.primary_condition();

    println!("{}", snapshot.location_name);
    println!("  {} ({})", condition.main, condition.icon_url());
    println!("  Feels like  {:.0}°C", snapshot.feels_like_celsius());
    println!("  Now         {:.0}°C", snapshot.temp_celsius());
    println!(
        "  Min / Max   {:.0}°C / {:.0}°C",
        snapshot.temp_min_celsius(),
        snapshot.temp_max_celsius()
    );
    println!("  Wind        {:.0} m/s", snapshot.wind_speed_mps);
    println!("  Humidity    {:.0}%", snapshot.humidity_pct);
    println!("  Sunrise     {}", local_time(snapshot.sunrise_utc()));
    println!("  Sunset      {}", local_time(snapshot.sunset_utc()));
}

pub fn print_pollution(snapshot: &PollutionSnapshot) {
    println!("Air Quality Report");

    let Some(sample) = snapshot.latest() else {
        println!("  AQI N/A (no samples)");
        return;
    };

    match snapshot.air_quality() {
        Some(aq) => print_air_quality(&aq),
        None => println!("  AQI N/A"),
    }

    let c = &sample.components;
    println!("  CO     {:.1}", c.co);
    println!("  NO     {:.1}", c.no);
    println!("  NO₂    {:.1}", c.no2);
    println!("  O₃     {:.1}", c.o3);
    println!("  SO₂    {:.1}", c.so2);
    println!("  PM2.5  {:.1}", c.pm2_5);
    println!("  PM10   {:.1}", c.pm10);
    println!("  NH₃    {:.2}", c.nh3);
    println!("  Observed {}", local_time(sample.observed_at()));
}

pub fn print_air_quality(aq: &AirQualityResult) {
    println!("  AQI {} ({})", aq.score, aq.category);
}

fn local_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
