//! Configuration for the OpenWeatherMap client: the API key plus the request
//! knobs (endpoint, units, language, timeout, retry budget).

use crate::error::WeatherAtlasError;
use bon::bon;
use std::time::Duration;

/// Environment variable the API key is read from.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Default current-weather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const DEFAULT_UNITS: &str = "metric";
const DEFAULT_LANG: &str = "en";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Settings for the OpenWeatherMap current-weather endpoint.
///
/// Only the API key is required; everything else has sensible defaults.
/// Build one explicitly with the builder, or from the environment with
/// [`OwmConfig::from_env`].
///
/// # Examples
///
/// ```
/// use weather_atlas::OwmConfig;
/// use std::time::Duration;
///
/// let config = OwmConfig::builder()
///     .api_key("my-key")
///     .timeout(Duration::from_secs(5))
///     .max_attempts(2)
///     .build();
/// assert_eq!(config.units, "metric");
/// ```
#[derive(Debug, Clone)]
pub struct OwmConfig {
    /// The OpenWeatherMap API key, sent as the `appid` query parameter.
    pub api_key: String,
    /// Endpoint URL. Overridable so tests can point at a local server.
    pub base_url: String,
    /// Unit system for the `units` query parameter (`metric` by default).
    pub units: String,
    /// Language code for localized weather descriptions.
    pub lang: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempt budget per city, including the first request.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled after each further attempt.
    pub retry_delay: Duration,
}

#[bon]
impl OwmConfig {
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        base_url: Option<String>,
        units: Option<String>,
        lang: Option<String>,
        timeout: Option<Duration>,
        max_attempts: Option<u32>,
        retry_delay: Option<Duration>,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            units: units.unwrap_or_else(|| DEFAULT_UNITS.to_string()),
            lang: lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_attempts: max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
            retry_delay: retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
        }
    }

    /// Reads the API key from [`API_KEY_ENV`] and returns a default
    /// configuration around it.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherAtlasError::MissingApiKey`] when the variable is
    /// unset or blank. This is checked before any network call is issued.
    pub fn from_env() -> Result<Self, WeatherAtlasError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(WeatherAtlasError::MissingApiKey)?;
        Ok(Self::builder().api_key(api_key).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = OwmConfig::builder().api_key("k").build();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.units, "metric");
        assert_eq!(config.lang, "en");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn attempt_budget_is_at_least_one() {
        let config = OwmConfig::builder().api_key("k").max_attempts(0).build();
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn from_env_requires_a_non_blank_key() {
        // The only test that touches the process environment; keeping every
        // env state in one test avoids races between parallel tests.
        std::env::remove_var(API_KEY_ENV);
        assert!(matches!(
            OwmConfig::from_env(),
            Err(WeatherAtlasError::MissingApiKey)
        ));
        // The client constructor propagates the same failure before any
        // network client is built.
        assert!(matches!(
            crate::weather_atlas::WeatherAtlas::from_env(),
            Err(WeatherAtlasError::MissingApiKey)
        ));

        std::env::set_var(API_KEY_ENV, "   ");
        assert!(matches!(
            OwmConfig::from_env(),
            Err(WeatherAtlasError::MissingApiKey)
        ));

        std::env::set_var(API_KEY_ENV, "abc123");
        let config = OwmConfig::from_env().expect("key set");
        assert_eq!(config.api_key, "abc123");
        std::env::remove_var(API_KEY_ENV);
    }
}
