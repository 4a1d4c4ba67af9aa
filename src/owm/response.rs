//! Serde models mirroring the OpenWeatherMap current-weather JSON payload.
//!
//! Only the fields the pipeline normalizes are modeled; unknown fields are
//! ignored. See <https://openweathermap.org/current> for the full format.

use serde::Deserialize;

/// Top-level payload of the `/data/2.5/weather` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    /// City name as resolved by the provider.
    pub name: String,
    pub coord: Coord,
    /// Condition summaries; the first entry is the primary condition.
    pub weather: Vec<ConditionSummary>,
    pub main: MainMeasurements,
    #[serde(default)]
    pub wind: Wind,
    /// Visibility in metres, capped at 10 km by the provider.
    pub visibility: Option<f64>,
    #[serde(default)]
    pub sys: Sys,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionSummary {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MainMeasurements {
    /// Current temperature, in the requested unit system.
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Pressure in hPa.
    pub pressure: f64,
}

/// Wind block. Absent entirely in some responses, hence the `Default`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Wind {
    /// Wind speed in m/s for metric requests.
    #[serde(default)]
    pub speed: f64,
    /// Direction in meteorological degrees, when reported.
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sys {
    pub country: Option<String>,
}
