//! The normalized per-city observation produced by a successful fetch.

use crate::catalog::CityQuery;
use crate::owm::error::FetchError;
use crate::owm::response::CurrentWeatherResponse;
use log::warn;

/// Lower bound of a physically plausible surface temperature, in °C.
pub const MIN_PLAUSIBLE_TEMP_C: f64 = -90.0;
/// Upper bound of a physically plausible surface temperature, in °C.
pub const MAX_PLAUSIBLE_TEMP_C: f64 = 60.0;

/// One normalized weather observation.
///
/// Created once per successfully fetched city and never mutated afterwards.
/// Units are normalized at construction: temperatures in °C, wind speed in
/// km/h (the API reports m/s for metric requests), visibility in km.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    /// City name as resolved by the provider.
    pub city: String,
    /// ISO country code; falls back to the query's code when the provider
    /// omits the `sys` block.
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Localized textual description, e.g. "broken clouds".
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: Option<f64>,
    pub visibility_km: Option<f64>,
    /// Provider icon code, e.g. "04d".
    pub icon: String,
}

impl WeatherRecord {
    /// Normalizes a raw API payload into a record.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MalformedPayload`] when the payload carries no
    /// weather condition entry.
    pub fn from_response(
        query: &CityQuery,
        response: CurrentWeatherResponse,
    ) -> Result<Self, FetchError> {
        let condition =
            response
                .weather
                .first()
                .ok_or_else(|| FetchError::MalformedPayload {
                    city: query.to_string(),
                    message: "empty weather condition list".to_string(),
                })?;

        let record = Self {
            city: response.name,
            country_code: response
                .sys
                .country
                .unwrap_or_else(|| query.country_code.clone()),
            latitude: response.coord.lat,
            longitude: response.coord.lon,
            description: condition.description.clone(),
            temperature_c: response.main.temp,
            feels_like_c: response.main.feels_like.unwrap_or(response.main.temp),
            temp_min_c: response.main.temp_min,
            temp_max_c: response.main.temp_max,
            humidity_pct: response.main.humidity,
            pressure_hpa: response.main.pressure,
            wind_speed_kmh: response.wind.speed * 3.6,
            wind_direction_deg: response.wind.deg,
            visibility_km: response.visibility.map(|metres| metres / 1000.0),
            icon: condition.icon.clone(),
        };

        if !record.temperature_plausible() {
            warn!(
                "implausible temperature {:.1}°C reported for {}",
                record.temperature_c, record.city
            );
        }

        Ok(record)
    }

    /// Whether the current temperature lies within the plausible surface
    /// range of [`MIN_PLAUSIBLE_TEMP_C`] to [`MAX_PLAUSIBLE_TEMP_C`].
    pub fn temperature_plausible(&self) -> bool {
        (MIN_PLAUSIBLE_TEMP_C..=MAX_PLAUSIBLE_TEMP_C).contains(&self.temperature_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owm::response::{Coord, ConditionSummary, MainMeasurements, Sys, Wind};

    fn sample_response() -> CurrentWeatherResponse {
        CurrentWeatherResponse {
            name: "Rosario".to_string(),
            coord: Coord {
                lat: -32.9468,
                lon: -60.6393,
            },
            weather: vec![ConditionSummary {
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            main: MainMeasurements {
                temp: 21.5,
                feels_like: Some(20.9),
                temp_min: 19.0,
                temp_max: 23.0,
                humidity: 55.0,
                pressure: 1016.0,
            },
            wind: Wind {
                speed: 5.0,
                deg: Some(90.0),
            },
            visibility: Some(8000.0),
            sys: Sys {
                country: Some("AR".to_string()),
            },
        }
    }

    #[test]
    fn normalizes_units() {
        let query = CityQuery::new("Rosario", "AR");
        let record = WeatherRecord::from_response(&query, sample_response()).unwrap();

        assert_eq!(record.city, "Rosario");
        assert_eq!(record.country_code, "AR");
        assert!((record.wind_speed_kmh - 18.0).abs() < 1e-9); // 5 m/s
        assert_eq!(record.visibility_km, Some(8.0));
        assert_eq!(record.wind_direction_deg, Some(90.0));
        assert!(record.temperature_plausible());
    }

    #[test]
    fn country_code_falls_back_to_query() {
        let query = CityQuery::new("Rosario", "AR");
        let mut response = sample_response();
        response.sys = Sys { country: None };
        let record = WeatherRecord::from_response(&query, response).unwrap();
        assert_eq!(record.country_code, "AR");
    }

    #[test]
    fn feels_like_falls_back_to_temperature() {
        let query = CityQuery::new("Rosario", "AR");
        let mut response = sample_response();
        response.main.feels_like = None;
        let record = WeatherRecord::from_response(&query, response).unwrap();
        assert_eq!(record.feels_like_c, record.temperature_c);
    }

    #[test]
    fn empty_condition_list_is_malformed() {
        let query = CityQuery::new("Rosario", "AR");
        let mut response = sample_response();
        response.weather.clear();
        let error = WeatherRecord::from_response(&query, response).unwrap_err();
        assert!(matches!(error, FetchError::MalformedPayload { .. }));
    }

    #[test]
    fn plausibility_bounds() {
        let query = CityQuery::new("Rosario", "AR");
        let mut response = sample_response();
        response.main.temp = -120.0;
        let record = WeatherRecord::from_response(&query, response).unwrap();
        assert!(!record.temperature_plausible());
    }
}
