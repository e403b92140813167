//! Simplified air quality index.
//!
//! Each of CO, NO2, SO2 and PM2.5 is scaled by a fixed divisor and the worst
//! sub-index wins. This is not a standards-compliant AQI (no breakpoint
//! interpolation) and callers rely on the exact numbers it produces.
//! NO, O3, PM10 and NH3 are display-only and never affect the score.

use crate::model::{AirQualityResult, AqiCategory, ComponentConcentrations};

const CO_DIVISOR: f64 = 10.0;
const NO2_DIVISOR: f64 = 20.0;
const SO2_DIVISOR: f64 = 30.0;
const PM2_5_DIVISOR: f64 = 15.0;

/// Compute the AQI score and category for a set of concentrations.
pub fn evaluate_aqi(components: &ComponentConcentrations) -> AirQualityResult {
    let score = aqi_score(components);
    AirQualityResult {
        score,
        category: AqiCategory::from_score(score),
    }
}

fn aqi_score(components: &ComponentConcentrations) -> i64 {
    let worst = [
        components.co / CO_DIVISOR,
        components.no2 / NO2_DIVISOR,
        components.so2 / SO2_DIVISOR,
        components.pm2_5 / PM2_5_DIVISOR,
    ]
    .into_iter()
    .fold(f64::NEG_INFINITY, f64::max);

    // Truncates toward zero.
    worst as i64
}

impl AqiCategory {
    pub fn from_score(score: i64) -> Self {
        match score {
            0..=49 => AqiCategory::Good,
            50..=99 => AqiCategory::Moderate,
            100..=149 => AqiCategory::UnhealthyForSensitiveGroups,
            150..=199 => AqiCategory::Unhealthy,
            200.. => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Unknown,
        }
    }
}
