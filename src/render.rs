use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::common::write_atomically;
use crate::constants::{
    LEAFLET_CSS_URL, LEAFLET_JS_URL, MAP_ZOOM_START, MARKER_FILL_OPACITY, MARKER_RADIUS,
    MARKER_STROKE_COLOR, MID_DISTANCE_KM, NEAR_DISTANCE_KM, OSM_ATTRIBUTION, OSM_TILE_URL,
};
use crate::distance::RankedRow;
use crate::geocode::Coordinates;

#[derive(Debug, Serialize)]
struct FilmMarker {
    lat: f64,
    lon: f64,
    popup: String,
    fill_color: &'static str,
}

#[derive(Debug, Serialize)]
struct MapData<'a> {
    center: [f64; 2],
    zoom: u8,
    radius: u8,
    stroke_color: &'a str,
    fill_opacity: f64,
    tile_url: &'a str,
    attribution: &'a str,
    films: Vec<FilmMarker>,
    user_popup: String,
}

pub fn marker_fill_color(dist_km: f64) -> &'static str {
    if dist_km < NEAR_DISTANCE_KM {
        "green"
    } else if dist_km < MID_DISTANCE_KM {
        "yellow"
    } else {
        "red"
    }
}

pub fn popup_text(row: &RankedRow) -> String {
    format!(
        "{} was filmed here in {}.\nDistance = {} km",
        row.name,
        row.year,
        row.dist.round() as i64
    )
}

pub fn render_map_html(rows: &[RankedRow], user: Coordinates, user_description: &str) -> Result<String> {
    let data = MapData {
        center: [user.lat, user.lon],
        zoom: MAP_ZOOM_START,
        radius: MARKER_RADIUS,
        stroke_color: MARKER_STROKE_COLOR,
        fill_opacity: MARKER_FILL_OPACITY,
        tile_url: OSM_TILE_URL,
        attribution: OSM_ATTRIBUTION,
        films: rows
            .iter()
            .map(|row| FilmMarker {
                lat: row.lat,
                lon: row.lon,
                popup: popup_text(row),
                fill_color: marker_fill_color(row.dist),
            })
            .collect(),
        user_popup: format!("Your location is {user_description}"),
    };
    let json = serde_json::to_string(&data).context("Failed serializing map data")?;
    // Keep "</script>" inside string values from closing the script element.
    let json = json.replace("</", "<\\/");

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Film map</title>\n");
    html.push_str(&format!("<link rel=\"stylesheet\" href=\"{LEAFLET_CSS_URL}\">\n"));
    html.push_str(&format!("<script src=\"{LEAFLET_JS_URL}\"></script>\n"));
    html.push_str("<style>html, body, #map { height: 100%; margin: 0; } .popup { white-space: pre-line; }</style>\n");
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");
    html.push_str(&format!("const data = {json};\n"));
    html.push_str(MAP_SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    Ok(html)
}

const MAP_SCRIPT: &str = r#"function textPopup(text) {
  const el = document.createElement("div");
  el.className = "popup";
  el.textContent = text;
  return el;
}
const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer(data.tile_url, { attribution: data.attribution }).addTo(map);
const films = L.featureGroup();
for (const f of data.films) {
  L.circleMarker([f.lat, f.lon], {
    radius: data.radius,
    color: data.stroke_color,
    fillColor: f.fill_color,
    fillOpacity: data.fill_opacity,
  }).bindPopup(textPopup(f.popup)).addTo(films);
}
films.addTo(map);
const user = L.featureGroup();
L.marker(data.center).bindPopup(textPopup(data.user_popup)).addTo(user);
user.addTo(map);
L.control.layers(null, { "Films nearby": films, "User location": user }).addTo(map);
"#;

pub fn write_map(path: &Path, html: &str) -> Result<()> {
    write_atomically(path, html.as_bytes())
}
