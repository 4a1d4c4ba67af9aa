//! The isotherm artifact: inverse-distance interpolation of the temperature
//! field over the cities' coordinates, rendered as a filled contour PNG.

use crate::render::artifact_name;
use crate::render::color::diverging_rgb;
use crate::render::error::RenderError;
use crate::types::weather_record::WeatherRecord;
use chrono::Local;
use log::info;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Minimum number of cities required for a meaningful interpolation.
pub const MIN_ISOTHERM_POINTS: usize = 3;

/// Grid resolution along each axis.
const GRID_SIZE: usize = 100;
/// Bounding box padding per side, as a fraction of the coordinate range.
const PADDING_FRACTION: f64 = 0.1;
/// Number of discrete temperature levels in the filled plot.
const LEVELS: usize = 20;
/// Inverse-distance weighting exponent.
const IDW_POWER: f64 = 2.0;
/// Fallback half-extent in degrees when all cities share a coordinate.
const DEGENERATE_HALF_EXTENT: f64 = 0.5;

const PLOT_WIDTH: u32 = 1200;
const PLOT_HEIGHT: u32 = 800;

/// A regular lon/lat grid of interpolated temperatures.
///
/// Values are stored row-major, rows running south to north. Because the
/// field is an inverse-distance weighted mean, every value is bounded by the
/// minimum and maximum input temperature; the interpolation never
/// extrapolates beyond the observed range.
#[derive(Debug, Clone)]
pub struct TemperatureField {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub width: usize,
    pub height: usize,
    values: Vec<f64>,
}

impl TemperatureField {
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.width + col]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Longitude of the grid column centre.
    pub fn lon_at(&self, col: usize) -> f64 {
        let step = (self.lon_max - self.lon_min) / self.width as f64;
        self.lon_min + (col as f64 + 0.5) * step
    }

    /// Latitude of the grid row centre.
    pub fn lat_at(&self, row: usize) -> f64 {
        let step = (self.lat_max - self.lat_min) / self.height as f64;
        self.lat_min + (row as f64 + 0.5) * step
    }
}

/// Interpolates the temperature field over the records' bounding box,
/// padded by 10% per side, on a 100x100 grid.
///
/// # Errors
///
/// Returns [`RenderError::InsufficientData`] for fewer than
/// [`MIN_ISOTHERM_POINTS`] records; callers are expected to degrade
/// gracefully and skip the plot.
pub fn interpolate(records: &[WeatherRecord]) -> Result<TemperatureField, RenderError> {
    if records.len() < MIN_ISOTHERM_POINTS {
        return Err(RenderError::InsufficientData(records.len()));
    }

    let (lon_min, lon_max) = padded_range(records.iter().map(|r| r.longitude));
    let (lat_min, lat_max) = padded_range(records.iter().map(|r| r.latitude));

    let mut values = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let lon_step = (lon_max - lon_min) / GRID_SIZE as f64;
    let lat_step = (lat_max - lat_min) / GRID_SIZE as f64;

    for row in 0..GRID_SIZE {
        let lat = lat_min + (row as f64 + 0.5) * lat_step;
        for col in 0..GRID_SIZE {
            let lon = lon_min + (col as f64 + 0.5) * lon_step;
            values.push(idw(records, lat, lon));
        }
    }

    Ok(TemperatureField {
        lon_min,
        lon_max,
        lat_min,
        lat_max,
        width: GRID_SIZE,
        height: GRID_SIZE,
        values,
    })
}

/// Inverse-distance weighted temperature at one grid node. A node that
/// coincides with a city takes that city's temperature exactly.
fn idw(records: &[WeatherRecord], lat: f64, lon: f64) -> f64 {
    let mut weight_sum = 0.0;
    let mut value_sum = 0.0;

    for record in records {
        let d2 = (record.latitude - lat).powi(2) + (record.longitude - lon).powi(2);
        if d2 < 1e-12 {
            return record.temperature_c;
        }
        let weight = d2.powf(-IDW_POWER / 2.0);
        weight_sum += weight;
        value_sum += weight * record.temperature_c;
    }

    value_sum / weight_sum
}

fn padded_range(coords: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for c in coords {
        min = min.min(c);
        max = max.max(c);
    }
    let range = max - min;
    if range <= f64::EPSILON {
        return (min - DEGENERATE_HALF_EXTENT, max + DEGENERATE_HALF_EXTENT);
    }
    (min - range * PADDING_FRACTION, max + range * PADDING_FRACTION)
}

/// Interpolates the field and writes the plot as
/// `isotherms_{country}_{date}.png` under `dir`, returning the full path.
pub fn write_isotherms(
    records: &[WeatherRecord],
    dir: &Path,
    country: &str,
) -> Result<PathBuf, RenderError> {
    let field = interpolate(records)?;
    let path = dir.join(artifact_name("isotherms", country, "png"));
    draw(&field, records, country, &path)?;
    info!("Wrote isotherm plot to {:?}", path);
    Ok(path)
}

fn draw(
    field: &TemperatureField,
    records: &[WeatherRecord],
    country: &str,
    path: &Path,
) -> Result<(), RenderError> {
    let temp_min = records
        .iter()
        .map(|r| r.temperature_c)
        .fold(f64::INFINITY, f64::min);
    let temp_max = records
        .iter()
        .map(|r| r.temperature_c)
        .fold(f64::NEG_INFINITY, f64::max);

    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(to_drawing_error)?;

    let caption = format!(
        "Isotherms - {} ({})",
        country,
        Local::now().format("%Y-%m-%d %H:%M")
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(field.lon_min..field.lon_max, field.lat_min..field.lat_max)
        .map_err(to_drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()
        .map_err(to_drawing_error)?;

    // Filled temperature field, one rectangle per grid cell, quantized to
    // LEVELS discrete bands.
    let lon_step = (field.lon_max - field.lon_min) / field.width as f64;
    let lat_step = (field.lat_max - field.lat_min) / field.height as f64;
    chart
        .draw_series((0..field.height).flat_map(|row| {
            (0..field.width).map(move |col| (row, col))
        }).map(|(row, col)| {
            let value = field.value_at(row, col);
            let (r, g, b) = diverging_rgb(level_fraction(value, temp_min, temp_max));
            let lon0 = field.lon_min + col as f64 * lon_step;
            let lat0 = field.lat_min + row as f64 * lat_step;
            Rectangle::new(
                [(lon0, lat0), (lon0 + lon_step, lat0 + lat_step)],
                RGBColor(r, g, b).filled(),
            )
        }))
        .map_err(to_drawing_error)?;

    // City observations on top of the field.
    chart
        .draw_series(records.iter().map(|record| {
            Circle::new(
                (record.longitude, record.latitude),
                5,
                BLACK.filled(),
            )
        }))
        .map_err(to_drawing_error)?;

    chart
        .draw_series(records.iter().map(|record| {
            Text::new(
                record.city.clone(),
                (record.longitude, record.latitude),
                ("sans-serif", 14).into_font().color(&BLACK),
            )
        }))
        .map_err(to_drawing_error)?;

    root.present().map_err(to_drawing_error)?;
    Ok(())
}

/// Quantizes a temperature into one of the LEVELS bands and returns the
/// band's position in `[0, 1]` for the colormap.
fn level_fraction(value: f64, temp_min: f64, temp_max: f64) -> f64 {
    let range = temp_max - temp_min;
    if range <= f64::EPSILON {
        return 0.5;
    }
    let normalized = ((value - temp_min) / range).clamp(0.0, 1.0);
    let level = ((normalized * LEVELS as f64).floor() as usize).min(LEVELS - 1);
    level as f64 / (LEVELS - 1) as f64
}

fn to_drawing_error(error: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(error.to_string())
}
