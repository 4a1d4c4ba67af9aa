mod catalog;
mod config;
mod error;
mod owm;
mod render;
mod report;
mod types;
mod weather_atlas;

pub use error::WeatherAtlasError;
pub use weather_atlas::*;

pub use catalog::{CityQuery, CountryCatalog};
pub use config::{OwmConfig, API_KEY_ENV, DEFAULT_BASE_URL};

pub use owm::client::OwmClient;
pub use owm::error::FetchError;
pub use owm::response::CurrentWeatherResponse;

pub use report::{aggregate, BatchReport, BatchSummary, CityFailure, FetchWeather};

pub use types::weather_record::{
    WeatherRecord, MAX_PLAUSIBLE_TEMP_C, MIN_PLAUSIBLE_TEMP_C,
};

pub use render::error::RenderError;
pub use render::isotherm::{interpolate, write_isotherms, TemperatureField, MIN_ISOTHERM_POINTS};
pub use render::map::{render_map, write_map};
