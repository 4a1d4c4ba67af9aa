//! The OpenWeatherMap current-weather client: one bounded-timeout GET per
//! city, with exponential backoff for rate limiting and transient failures.

use crate::catalog::CityQuery;
use crate::config::OwmConfig;
use crate::error::WeatherAtlasError;
use crate::owm::error::FetchError;
use crate::owm::response::CurrentWeatherResponse;
use crate::report::FetchWeather;
use crate::types::weather_record::WeatherRecord;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Why a failed attempt is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryReason {
    RateLimited,
    Timeout,
    ServerError(u16),
}

/// Classification of a single request attempt's failure.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// Not worth retrying; reported to the caller as-is.
    Fatal(FetchError),
    /// Worth another attempt within the budget.
    Transient(RetryReason),
}

/// Attempt budget and backoff schedule shared by all requests of one client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Backoff before the next attempt after `failed_attempts` failures:
    /// the base delay doubled for every failure beyond the first.
    pub(crate) fn delay_after(&self, failed_attempts: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(failed_attempts.saturating_sub(1))
    }

    /// Runs `op` until it succeeds, fails fatally, or the attempt budget is
    /// spent. Transient failures sleep the backoff delay between attempts.
    pub(crate) async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let mut last_reason = None;
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.delay_after(attempt - 1);
                info!(
                    "Retrying '{}' in {:?} (attempt {}/{})",
                    label, delay, attempt, self.max_attempts
                );
                tokio::time::sleep(delay).await;
            }
            match op().await {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::Transient(reason)) => {
                    warn!(
                        "Transient failure for '{}' on attempt {}/{}: {:?}",
                        label, attempt, self.max_attempts, reason
                    );
                    last_reason = Some(reason);
                }
            }
        }

        // The budget is clamped to >= 1, so the loop always records a reason
        // before falling through.
        let reason = last_reason.unwrap_or(RetryReason::Timeout);
        Err(budget_exhausted(label, self.max_attempts, reason))
    }
}

fn budget_exhausted(city: &str, attempts: u32, reason: RetryReason) -> FetchError {
    match reason {
        RetryReason::RateLimited => FetchError::RateLimited {
            city: city.to_string(),
            attempts,
        },
        RetryReason::Timeout => FetchError::Timeout {
            city: city.to_string(),
            attempts,
        },
        RetryReason::ServerError(code) => FetchError::ServerError {
            city: city.to_string(),
            status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            attempts,
        },
    }
}

/// HTTP client for the current-weather endpoint.
///
/// # Examples
///
/// ```no_run
/// use weather_atlas::{CityQuery, OwmClient, OwmConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OwmClient::new(OwmConfig::from_env()?)?;
/// let record = client.fetch_current(&CityQuery::new("Lima", "PE")).await?;
/// println!("{}: {:.1}°C", record.city, record.temperature_c);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OwmClient {
    http: Client,
    config: OwmConfig,
}

impl OwmClient {
    /// Builds the client with the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherAtlasError::HttpClient`] when the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: OwmConfig) -> Result<Self, WeatherAtlasError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(WeatherAtlasError::HttpClient)?;
        Ok(Self { http, config })
    }

    /// Fetches and normalizes the current weather for one city.
    ///
    /// Rate-limited (HTTP 429), timed-out and 5xx responses are retried with
    /// exponential backoff up to the configured attempt budget; all other
    /// failures are returned on the first attempt. Expected failure classes
    /// never panic, so callers can keep iterating a batch.
    pub async fn fetch_current(&self, query: &CityQuery) -> Result<WeatherRecord, FetchError> {
        let policy = RetryPolicy {
            max_attempts: self.config.max_attempts,
            base_delay: self.config.retry_delay,
        };
        let label = query.to_string();
        policy.run(&label, || self.request_once(query)).await
    }

    async fn request_once(&self, query: &CityQuery) -> Result<WeatherRecord, AttemptError> {
        let params = [
            ("q", query.as_query()),
            ("appid", self.config.api_key.clone()),
            ("units", self.config.units.clone()),
            ("lang", self.config.lang.clone()),
        ];

        let response = match self
            .http
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) if error.is_timeout() => {
                return Err(AttemptError::Transient(RetryReason::Timeout));
            }
            Err(error) => {
                return Err(AttemptError::Fatal(FetchError::Network(
                    query.to_string(),
                    error,
                )));
            }
        };

        match response.status() {
            StatusCode::OK => {
                let payload: CurrentWeatherResponse = response
                    .json()
                    .await
                    .map_err(|e| AttemptError::Fatal(FetchError::Decode(query.to_string(), e)))?;
                let record = WeatherRecord::from_response(query, payload)
                    .map_err(AttemptError::Fatal)?;
                debug!(
                    "Fetched current weather for {} ({:.1}°C)",
                    record.city, record.temperature_c
                );
                Ok(record)
            }
            StatusCode::UNAUTHORIZED => Err(AttemptError::Fatal(FetchError::Unauthorized)),
            StatusCode::NOT_FOUND => Err(AttemptError::Fatal(FetchError::CityNotFound(
                query.to_string(),
            ))),
            StatusCode::TOO_MANY_REQUESTS => {
                Err(AttemptError::Transient(RetryReason::RateLimited))
            }
            status if status.is_server_error() => Err(AttemptError::Transient(
                RetryReason::ServerError(status.as_u16()),
            )),
            status => Err(AttemptError::Fatal(FetchError::UnexpectedStatus {
                city: query.to_string(),
                status,
            })),
        }
    }
}

impl FetchWeather for OwmClient {
    fn fetch(
        &self,
        query: &CityQuery,
    ) -> impl Future<Output = Result<WeatherRecord, FetchError>> + Send {
        self.fetch_current(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(500),
        }
    }

    #[test]
    fn backoff_doubles_per_failure() {
        let policy = policy(5);
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_retries_then_succeeds() {
        let calls = Cell::new(0u32);
        let result = policy(3)
            .run("Lima, PE", || {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n < 3 {
                        Err(AttemptError::Transient(RetryReason::RateLimited))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3, "two retries before the success");
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_exhausts_budget() {
        let calls = Cell::new(0u32);
        let result: Result<(), FetchError> = policy(3)
            .run("Lima, PE", || {
                calls.set(calls.get() + 1);
                async { Err(AttemptError::Transient(RetryReason::RateLimited)) }
            })
            .await;

        assert_eq!(calls.get(), 3);
        match result.unwrap_err() {
            FetchError::RateLimited { city, attempts } => {
                assert_eq!(city, "Lima, PE");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_short_circuits() {
        let calls = Cell::new(0u32);
        let result: Result<(), FetchError> = policy(3)
            .run("Lima, PE", || {
                calls.set(calls.get() + 1);
                async { Err(AttemptError::Fatal(FetchError::Unauthorized)) }
            })
            .await;

        assert_eq!(calls.get(), 1, "fatal failures are never retried");
        assert!(matches!(result.unwrap_err(), FetchError::Unauthorized));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_budget_maps_to_timeout_error() {
        let result: Result<(), FetchError> = policy(2)
            .run("Cusco, PE", || async {
                Err(AttemptError::Transient(RetryReason::Timeout))
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            FetchError::Timeout { attempts: 2, .. }
        ));
    }
}
