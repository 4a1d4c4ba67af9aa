//! demos/country_report.rs
//!
//! Fetches the current weather for every cataloged Argentine city, prints
//! the aggregated table, and writes both the interactive map and the
//! isotherm plot into the current directory.
//!
//! Requires the `OPENWEATHER_API_KEY` environment variable:
//! OPENWEATHER_API_KEY=... cargo run --example country_report

use std::error::Error;
use std::path::Path;
use weather_atlas::{write_isotherms, write_map, RenderError, WeatherAtlas};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let country = "Argentina";
    let atlas = WeatherAtlas::from_env()?;
    let report = atlas.fetch_country().country(country).call().await?;

    for failure in &report.failures {
        eprintln!("skipped {}: {}", failure.query, failure.error);
    }
    if report.is_empty() {
        return Err("no city could be fetched".into());
    }

    println!("{}", report.to_dataframe()?);
    if let Some(summary) = report.summary() {
        println!(
            "mean {:.1}°C (min {:.1}, max {:.1}), humidity {:.0}%, wind {:.1} km/h",
            summary.mean_temperature_c,
            summary.min_temperature_c,
            summary.max_temperature_c,
            summary.mean_humidity_pct,
            summary.mean_wind_speed_kmh
        );
    }

    let out_dir = Path::new(".");
    let map_path = write_map(&report.records, out_dir, country)?;
    println!("map: {}", map_path.display());

    match write_isotherms(&report.records, out_dir, country) {
        Ok(plot_path) => println!("isotherms: {}", plot_path.display()),
        Err(RenderError::InsufficientData(n)) => {
            eprintln!("skipping isotherm plot: only {n} cities fetched");
        }
        Err(error) => return Err(error.into()),
    }

    Ok(())
}
