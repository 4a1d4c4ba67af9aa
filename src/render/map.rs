//! The interactive map artifact: a self-contained Leaflet HTML document with
//! a temperature heat layer and clustered, color-banded city markers.

use crate::render::color::marker_color;
use crate::render::error::RenderError;
use crate::render::artifact_name;
use crate::types::weather_record::WeatherRecord;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

const HEAT_RADIUS: u32 = 25;
const HEAT_BLUR: u32 = 15;
const INITIAL_ZOOM: u32 = 6;

/// Per-city data embedded into the document as JSON.
#[derive(Debug, Serialize)]
struct Marker<'a> {
    city: &'a str,
    lat: f64,
    lon: f64,
    temp: f64,
    description: &'a str,
    humidity: f64,
    wind_kmh: f64,
    pressure: f64,
    visibility_km: Option<f64>,
    color: &'static str,
}

/// Renders the interactive map for the given records.
///
/// The document pulls Leaflet, the heat plugin and the marker-cluster plugin
/// from their CDN and needs no other assets. The map is centred on the mean
/// city coordinate; the heat layer is weighted by current temperature and
/// each marker carries a popup with the record's key fields.
///
/// # Errors
///
/// Returns [`RenderError::NoData`] for an empty record slice.
pub fn render_map(records: &[WeatherRecord]) -> Result<String, RenderError> {
    if records.is_empty() {
        return Err(RenderError::NoData);
    }

    let n = records.len() as f64;
    let center_lat = records.iter().map(|r| r.latitude).sum::<f64>() / n;
    let center_lon = records.iter().map(|r| r.longitude).sum::<f64>() / n;

    let heat: Vec<[f64; 3]> = records
        .iter()
        .map(|r| [r.latitude, r.longitude, r.temperature_c])
        .collect();

    let markers: Vec<Marker<'_>> = records
        .iter()
        .map(|r| Marker {
            city: &r.city,
            lat: r.latitude,
            lon: r.longitude,
            temp: r.temperature_c,
            description: &r.description,
            humidity: r.humidity_pct,
            wind_kmh: r.wind_speed_kmh,
            pressure: r.pressure_hpa,
            visibility_km: r.visibility_km,
            color: marker_color(r.temperature_c),
        })
        .collect();

    let html = TEMPLATE
        .replace("__CENTER_LAT__", &format!("{center_lat:.5}"))
        .replace("__CENTER_LON__", &format!("{center_lon:.5}"))
        .replace("__ZOOM__", &INITIAL_ZOOM.to_string())
        .replace("__HEAT_RADIUS__", &HEAT_RADIUS.to_string())
        .replace("__HEAT_BLUR__", &HEAT_BLUR.to_string())
        .replace("__HEAT_DATA__", &serde_json::to_string(&heat)?)
        .replace("__MARKER_DATA__", &serde_json::to_string(&markers)?);

    Ok(html)
}

/// Renders the map and writes it as `weather_map_{country}_{date}.html`
/// under `dir`, returning the full path.
pub fn write_map(
    records: &[WeatherRecord],
    dir: &Path,
    country: &str,
) -> Result<PathBuf, RenderError> {
    let html = render_map(records)?;
    let path = dir.join(artifact_name("weather_map", country, "html"));
    std::fs::write(&path, html).map_err(|e| RenderError::ArtifactWrite(path.clone(), e))?;
    info!("Wrote interactive map to {:?}", path);
    Ok(path)
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Weather Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .popup-title { margin: 5px 0; color: #2c3e50; }
</style>
</head>
<body>
<div id="map"></div>
<script>
  var map = L.map('map').setView([__CENTER_LAT__, __CENTER_LON__], __ZOOM__);
  L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);

  var heatData = __HEAT_DATA__;
  L.heatLayer(heatData, { radius: __HEAT_RADIUS__, blur: __HEAT_BLUR__, maxZoom: 1 }).addTo(map);

  var markers = __MARKER_DATA__;
  var cluster = L.markerClusterGroup();
  markers.forEach(function (m) {
    var visibility = m.visibility_km === null ? 'N/A' : m.visibility_km.toFixed(1) + ' km';
    var popup = '<div style="font-family: Arial; width: 250px;">' +
      '<h3 class="popup-title">' + m.city + '</h3><hr>' +
      '<p><b>Temperature:</b> ' + m.temp.toFixed(1) + '&deg;C</p>' +
      '<p><b>Conditions:</b> ' + m.description + '</p>' +
      '<p><b>Humidity:</b> ' + m.humidity + '%</p>' +
      '<p><b>Wind:</b> ' + m.wind_kmh.toFixed(1) + ' km/h</p>' +
      '<p><b>Pressure:</b> ' + m.pressure + ' hPa</p>' +
      '<p><b>Visibility:</b> ' + visibility + '</p>' +
      '</div>';
    var marker = L.circleMarker([m.lat, m.lon], {
      radius: 9,
      color: '#333',
      weight: 1,
      fillColor: m.color,
      fillOpacity: 0.9
    });
    marker.bindPopup(popup, { maxWidth: 300 });
    marker.bindTooltip(m.city + ': ' + m.temp.toFixed(1) + '°C');
    cluster.addLayer(marker);
  });
  map.addLayer(cluster);
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, lat: f64, lon: f64, temp: f64) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            country_code: "AR".to_string(),
            latitude: lat,
            longitude: lon,
            description: "clear sky".to_string(),
            temperature_c: temp,
            feels_like_c: temp,
            temp_min_c: temp - 2.0,
            temp_max_c: temp + 2.0,
            humidity_pct: 50.0,
            pressure_hpa: 1013.0,
            wind_speed_kmh: 10.0,
            wind_direction_deg: Some(180.0),
            visibility_km: Some(10.0),
            icon: "01d".to_string(),
        }
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(matches!(render_map(&[]), Err(RenderError::NoData)));
    }

    #[test]
    fn embeds_every_city() {
        let records = vec![
            record("Buenos Aires", -34.6, -58.4, 18.0),
            record("Cordoba", -31.4, -64.2, 25.0),
        ];
        let html = render_map(&records).unwrap();

        assert!(html.contains("Buenos Aires"));
        assert!(html.contains("Cordoba"));
        assert!(html.contains("L.heatLayer"));
        assert!(html.contains("markerClusterGroup"));
        // All template tokens replaced.
        assert!(!html.contains("__"));
        // Centre is the mean coordinate.
        assert!(html.contains("setView([-33.00000, -61.30000], 6)"));
    }

    #[test]
    fn marker_colors_follow_temperature_bands() {
        let records = vec![
            record("Ushuaia", -54.8, -68.3, 4.0),
            record("Salta", -24.8, -65.4, 32.0),
        ];
        let html = render_map(&records).unwrap();
        assert!(html.contains(r#""color":"blue""#));
        assert!(html.contains(r#""color":"red""#));
    }

    #[test]
    fn writes_named_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record("Lima", -12.0, -77.0, 20.0)];
        let path = write_map(&records, dir.path(), "Peru").unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("weather_map_peru_"));
        assert!(name.ends_with(".html"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Lima"));
    }
}
