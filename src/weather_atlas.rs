//! The main entry point: a client tying together the city catalog, the
//! OpenWeatherMap fetcher and the batch aggregation.

use crate::catalog::{CityQuery, CountryCatalog};
use crate::config::OwmConfig;
use crate::error::WeatherAtlasError;
use crate::owm::client::OwmClient;
use crate::report::{aggregate, BatchReport};
use crate::types::weather_record::WeatherRecord;
use bon::bon;

/// Client for fetching and aggregating current weather over city batches.
///
/// Holds the HTTP client and a [`CountryCatalog`]; the default catalog is
/// the built-in South American city set.
///
/// # Examples
///
/// ```no_run
/// use weather_atlas::WeatherAtlas;
///
/// # async fn run() -> Result<(), weather_atlas::WeatherAtlasError> {
/// let atlas = WeatherAtlas::from_env()?;
/// let report = atlas.fetch_country().country("Argentina").call().await?;
/// println!(
///     "{} cities fetched, {} failed",
///     report.records.len(),
///     report.failures.len()
/// );
/// let frame = report.to_dataframe()?;
/// println!("{frame}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WeatherAtlas {
    client: OwmClient,
    catalog: CountryCatalog,
}

#[bon]
impl WeatherAtlas {
    /// Creates a client configured from the environment (see
    /// [`OwmConfig::from_env`]) with the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherAtlasError::MissingApiKey`] when the key variable is
    /// unset; no network call is made in that case.
    pub fn from_env() -> Result<Self, WeatherAtlasError> {
        Self::with_config(OwmConfig::from_env()?)
    }

    /// Creates a client with an explicit configuration and the built-in
    /// catalog.
    pub fn with_config(config: OwmConfig) -> Result<Self, WeatherAtlasError> {
        Self::with_catalog(config, CountryCatalog::south_america())
    }

    /// Creates a client with an explicit configuration and catalog.
    pub fn with_catalog(
        config: OwmConfig,
        catalog: CountryCatalog,
    ) -> Result<Self, WeatherAtlasError> {
        Ok(Self {
            client: OwmClient::new(config)?,
            catalog,
        })
    }

    pub fn catalog(&self) -> &CountryCatalog {
        &self.catalog
    }

    /// Fetches the current weather for a single city.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.city(&str)`: **Required.** The city name.
    /// * `.country_code(&str)`: **Required.** The ISO country code.
    #[builder]
    pub async fn fetch_city(
        &self,
        city: &str,
        country_code: &str,
    ) -> Result<WeatherRecord, WeatherAtlasError> {
        let query = CityQuery::new(city, country_code);
        self.client
            .fetch_current(&query)
            .await
            .map_err(WeatherAtlasError::from)
    }

    /// Fetches an explicit list of queries sequentially, in the given order,
    /// continuing past per-city failures.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.queries(&[CityQuery])`: **Required.** The cities to fetch.
    #[builder]
    pub async fn fetch_cities(&self, queries: &[CityQuery]) -> BatchReport {
        aggregate(&self.client, queries).await
    }

    /// Fetches every city of a cataloged country, in catalog order.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.country(&str)`: **Required.** A country name present in the
    ///   catalog.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherAtlasError::UnknownCountry`] for a country the
    /// catalog does not list. Per-city fetch failures do not error; they are
    /// reported in the returned [`BatchReport`].
    #[builder]
    pub async fn fetch_country(&self, country: &str) -> Result<BatchReport, WeatherAtlasError> {
        let queries = self
            .catalog
            .cities(country)
            .ok_or_else(|| WeatherAtlasError::UnknownCountry(country.to_string()))?;
        Ok(aggregate(&self.client, queries).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OwmConfig {
        OwmConfig::builder().api_key("test-key").build()
    }

    #[test]
    fn default_catalog_is_south_america() {
        let atlas = WeatherAtlas::with_config(config()).unwrap();
        assert_eq!(atlas.catalog().len(), 5);
        assert!(atlas.catalog().cities("Argentina").is_some());
    }

    #[tokio::test]
    async fn unknown_country_is_a_typed_error() {
        let atlas = WeatherAtlas::with_config(config()).unwrap();
        let error = atlas
            .fetch_country()
            .country("Atlantis")
            .call()
            .await
            .unwrap_err();
        assert!(matches!(error, WeatherAtlasError::UnknownCountry(name) if name == "Atlantis"));
    }
}
