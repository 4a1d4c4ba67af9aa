use reqwest::StatusCode;
use thiserror::Error;

/// Per-city failure classes of the current-weather fetch.
///
/// Every expected failure mode is reported as a value so the caller can keep
/// iterating the batch. Only rate limiting, timeouts and server errors are
/// retried; the remaining variants fail the city on the first attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("city '{0}' not found")]
    CityNotFound(String),

    #[error("API key rejected (HTTP 401)")]
    Unauthorized,

    #[error("rate limited fetching '{city}', gave up after {attempts} attempts")]
    RateLimited { city: String, attempts: u32 },

    #[error("request for '{city}' timed out after {attempts} attempts")]
    Timeout { city: String, attempts: u32 },

    #[error("network request failed for '{0}'")]
    Network(String, #[source] reqwest::Error),

    #[error("server error (HTTP {status}) for '{city}' after {attempts} attempts")]
    ServerError {
        city: String,
        status: StatusCode,
        attempts: u32,
    },

    #[error("unexpected HTTP status {status} for '{city}'")]
    UnexpectedStatus { city: String, status: StatusCode },

    #[error("failed to decode weather payload for '{0}'")]
    Decode(String, #[source] reqwest::Error),

    #[error("malformed weather payload for '{city}': {message}")]
    MalformedPayload { city: String, message: String },
}
