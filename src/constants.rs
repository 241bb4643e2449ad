pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "film-map/0.1";
pub const NOMINATIM_USAGE_POLICY_URL: &str = "https://operations.osmfoundation.org/policies/nominatim/";

pub const DATASET_FILE_NAME: &str = "locations.list";
pub const DEFAULT_CSV_PATH: &str = "locations.csv";
pub const DEFAULT_MAP_PATH: &str = "film_map.html";

pub const DATASET_HEADER_LINES: usize = 14;

/// Locations containing any of these are dropped ("Federal", "Highway" minus the first letter).
pub const REJECTED_LOCATION_FRAGMENTS: [&str; 2] = ["ederal", "ighway"];
pub const MAX_LOCATION_SEGMENTS: usize = 3;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_NEAREST: usize = 10;

pub const MAP_ZOOM_START: u8 = 10;
pub const MARKER_RADIUS: u8 = 10;
pub const MARKER_STROKE_COLOR: &str = "red";
pub const MARKER_FILL_OPACITY: f64 = 0.5;
pub const NEAR_DISTANCE_KM: f64 = 1000.0;
pub const MID_DISTANCE_KM: f64 = 5000.0;

pub const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub const USER_LOCATION_UNAVAILABLE: &str = "Information about your location is unavailable";
