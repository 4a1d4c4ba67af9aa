//! Batch aggregation: fetch every catalog entry sequentially, keep going past
//! individual failures, and collect the outcome into a tabular report.

use crate::catalog::CityQuery;
use crate::error::WeatherAtlasError;
use crate::owm::error::FetchError;
use crate::types::weather_record::WeatherRecord;
use log::{info, warn};
use polars::prelude::*;
use std::future::Future;

/// Anything that resolves a [`CityQuery`] into a [`WeatherRecord`].
///
/// [`crate::OwmClient`] is the production implementation; tests aggregate
/// over stub providers to exercise partial-failure behavior offline.
pub trait FetchWeather {
    fn fetch(
        &self,
        query: &CityQuery,
    ) -> impl Future<Output = Result<WeatherRecord, FetchError>> + Send;
}

/// One city of a batch that could not be fetched, with the reason.
#[derive(Debug)]
pub struct CityFailure {
    pub query: CityQuery,
    pub error: FetchError,
}

/// Fetches every query in order, one at a time, continuing past failures.
///
/// The batch sizes this crate targets (≤10 cities per country) make
/// sequential awaits adequate; there is deliberately no fan-out.
/// Every query lands in exactly one of the two result lists, so
/// `records.len() + failures.len() == queries.len()` always holds.
pub async fn aggregate<P: FetchWeather>(provider: &P, queries: &[CityQuery]) -> BatchReport {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for query in queries {
        info!("Fetching current weather for {}", query);
        match provider.fetch(query).await {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!("Skipping {}: {}", query, error);
                failures.push(CityFailure {
                    query: query.clone(),
                    error,
                });
            }
        }
    }

    if !failures.is_empty() {
        warn!(
            "{} of {} cities could not be fetched",
            failures.len(),
            queries.len()
        );
    }

    BatchReport { records, failures }
}

/// Aggregate statistics over the successful records of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub mean_temperature_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub mean_humidity_pct: f64,
    pub mean_wind_speed_kmh: f64,
}

/// The outcome of one batch: successful records in catalog order, plus the
/// failures that were skipped. Discarded at the end of the process; there is
/// no persistence layer.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<WeatherRecord>,
    pub failures: Vec<CityFailure>,
}

impl BatchReport {
    /// True when not a single city was fetched successfully.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the tabular dataset: one row per successful record, one column
    /// per [`WeatherRecord`] field, rows in fetch order.
    pub fn to_dataframe(&self) -> Result<DataFrame, WeatherAtlasError> {
        let r = &self.records;
        let frame = df!(
            "city" => r.iter().map(|x| x.city.as_str()).collect::<Vec<_>>(),
            "country" => r.iter().map(|x| x.country_code.as_str()).collect::<Vec<_>>(),
            "latitude" => r.iter().map(|x| x.latitude).collect::<Vec<_>>(),
            "longitude" => r.iter().map(|x| x.longitude).collect::<Vec<_>>(),
            "description" => r.iter().map(|x| x.description.as_str()).collect::<Vec<_>>(),
            "temperature_c" => r.iter().map(|x| x.temperature_c).collect::<Vec<_>>(),
            "feels_like_c" => r.iter().map(|x| x.feels_like_c).collect::<Vec<_>>(),
            "temp_min_c" => r.iter().map(|x| x.temp_min_c).collect::<Vec<_>>(),
            "temp_max_c" => r.iter().map(|x| x.temp_max_c).collect::<Vec<_>>(),
            "humidity_pct" => r.iter().map(|x| x.humidity_pct).collect::<Vec<_>>(),
            "pressure_hpa" => r.iter().map(|x| x.pressure_hpa).collect::<Vec<_>>(),
            "wind_speed_kmh" => r.iter().map(|x| x.wind_speed_kmh).collect::<Vec<_>>(),
            "wind_direction_deg" => r.iter().map(|x| x.wind_direction_deg).collect::<Vec<_>>(),
            "visibility_km" => r.iter().map(|x| x.visibility_km).collect::<Vec<_>>(),
            "icon" => r.iter().map(|x| x.icon.as_str()).collect::<Vec<_>>(),
        )?;
        Ok(frame)
    }

    /// Summary statistics over the successful records; `None` when the batch
    /// produced no records at all.
    pub fn summary(&self) -> Option<BatchSummary> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        let temps = self.records.iter().map(|r| r.temperature_c);
        Some(BatchSummary {
            mean_temperature_c: temps.clone().sum::<f64>() / n,
            min_temperature_c: temps.clone().fold(f64::INFINITY, f64::min),
            max_temperature_c: temps.fold(f64::NEG_INFINITY, f64::max),
            mean_humidity_pct: self.records.iter().map(|r| r.humidity_pct).sum::<f64>() / n,
            mean_wind_speed_kmh: self
                .records
                .iter()
                .map(|r| r.wind_speed_kmh)
                .sum::<f64>()
                / n,
        })
    }
}
