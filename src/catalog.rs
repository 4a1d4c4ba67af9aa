//! The static city catalog: an ordered mapping from country name to the list
//! of city queries fetched for that country. This is configuration data, not
//! runtime state; the built-in catalog mirrors the South American city set
//! the crate ships with by default.

use std::fmt;

/// A city lookup key for the current-weather endpoint.
///
/// Combines a city name with an ISO 3166 country code, the two components
/// OpenWeatherMap accepts in its `q=City,CC` query parameter.
///
/// # Examples
///
/// ```
/// use weather_atlas::CityQuery;
///
/// let rosario = CityQuery::new("Rosario", "AR");
/// assert_eq!(rosario.as_query(), "Rosario,AR");
/// assert_eq!(rosario.to_string(), "Rosario, AR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityQuery {
    /// The city name as the provider expects it (ASCII, no accents).
    pub city: String,
    /// The ISO 3166 alpha-2 country code (e.g. "AR", "CL").
    pub country_code: String,
}

impl CityQuery {
    pub fn new(city: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country_code: country_code.into(),
        }
    }

    /// The value passed as the `q` query parameter.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.city, self.country_code)
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country_code)
    }
}

/// An ordered mapping from country name to its list of [`CityQuery`] entries.
///
/// Iteration preserves insertion order for both countries and cities, so a
/// batch fetched from the catalog always runs in catalog order.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    entries: Vec<(String, Vec<CityQuery>)>,
}

impl CountryCatalog {
    /// Creates an empty catalog. Use [`CountryCatalog::with_country`] to
    /// populate it, or [`CountryCatalog::south_america`] for the built-in set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a country and its cities, returning the catalog for chaining.
    ///
    /// Adding a country that already exists replaces its city list in place,
    /// keeping the original position.
    pub fn with_country(
        mut self,
        country: impl Into<String>,
        cities: Vec<CityQuery>,
    ) -> Self {
        let country = country.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == country) {
            entry.1 = cities;
        } else {
            self.entries.push((country, cities));
        }
        self
    }

    /// The cities registered for `country`, in catalog order.
    pub fn cities(&self, country: &str) -> Option<&[CityQuery]> {
        self.entries
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, cities)| cities.as_slice())
    }

    /// Country names in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The built-in catalog: major cities of five South American countries.
    pub fn south_america() -> Self {
        fn cities(country_code: &str, names: &[&str]) -> Vec<CityQuery> {
            names
                .iter()
                .map(|name| CityQuery::new(*name, country_code))
                .collect()
        }

        Self::new()
            .with_country(
                "Argentina",
                cities(
                    "AR",
                    &[
                        "Buenos Aires",
                        "Cordoba",
                        "Rosario",
                        "Mendoza",
                        "San Miguel de Tucuman",
                        "La Plata",
                        "Mar del Plata",
                        "Salta",
                        "Santa Fe",
                        "San Luis",
                    ],
                ),
            )
            .with_country(
                "Venezuela",
                cities("VE", &["Caracas", "Maracaibo", "Valencia", "Barquisimeto"]),
            )
            .with_country(
                "Colombia",
                cities("CO", &["Bogota", "Medellin", "Cali", "Barranquilla"]),
            )
            .with_country(
                "Chile",
                cities("CL", &["Santiago", "Valparaiso", "Concepcion", "La Serena"]),
            )
            .with_country(
                "Peru",
                cities("PE", &["Lima", "Arequipa", "Trujillo", "Cusco"]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_has_no_space() {
        let query = CityQuery::new("Mar del Plata", "AR");
        assert_eq!(query.as_query(), "Mar del Plata,AR");
    }

    #[test]
    fn builtin_catalog_preserves_order() {
        let catalog = CountryCatalog::south_america();
        let countries: Vec<&str> = catalog.countries().collect();
        assert_eq!(
            countries,
            ["Argentina", "Venezuela", "Colombia", "Chile", "Peru"]
        );

        let argentina = catalog.cities("Argentina").unwrap();
        assert_eq!(argentina.len(), 10);
        assert_eq!(argentina[0], CityQuery::new("Buenos Aires", "AR"));
        assert_eq!(argentina[9], CityQuery::new("San Luis", "AR"));

        assert_eq!(catalog.cities("Chile").unwrap().len(), 4);
        assert!(catalog.cities("France").is_none());
    }

    #[test]
    fn with_country_replaces_in_place() {
        let catalog = CountryCatalog::new()
            .with_country("Chile", vec![CityQuery::new("Santiago", "CL")])
            .with_country("Peru", vec![CityQuery::new("Lima", "PE")])
            .with_country("Chile", vec![CityQuery::new("Valparaiso", "CL")]);

        let countries: Vec<&str> = catalog.countries().collect();
        assert_eq!(countries, ["Chile", "Peru"]);
        assert_eq!(
            catalog.cities("Chile").unwrap(),
            [CityQuery::new("Valparaiso", "CL")]
        );
    }
}
