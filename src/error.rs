use crate::owm::error::FetchError;
use crate::render::error::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherAtlasError {
    #[error("environment variable OPENWEATHER_API_KEY is not set")]
    MissingApiKey,

    #[error("country '{0}' is not in the catalog")]
    UnknownCountry(String),

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to assemble DataFrame")]
    DataFrame(#[from] polars::error::PolarsError),
}
