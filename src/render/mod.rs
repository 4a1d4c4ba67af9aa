mod color;
pub mod error;
pub mod isotherm;
pub mod map;

use chrono::Local;

/// File name for an output artifact: `{prefix}_{country}_{YYYY-MM-DD}.{ext}`,
/// with the country lowercased and whitespace replaced by underscores.
pub(crate) fn artifact_name(prefix: &str, country: &str, extension: &str) -> String {
    let country: String = country
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!(
        "{}_{}_{}.{}",
        prefix,
        country,
        Local::now().format("%Y-%m-%d"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_sanitizes_country() {
        let name = artifact_name("weather_map", "  Buenos  Aires ", "html");
        assert!(name.starts_with("weather_map_buenos_aires_"));
        assert!(name.ends_with(".html"));
    }
}
