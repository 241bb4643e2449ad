use clap::Parser;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CSV_PATH, DEFAULT_GEOCODER_URL, DEFAULT_MAP_PATH, DEFAULT_NEAREST, DEFAULT_USER_AGENT,
};
use crate::geocode::Coordinates;
use crate::prompt::parse_user_location;

#[derive(Debug, Parser)]
#[command(name = "film_map")]
#[command(about = "Map the filming locations nearest to you for films released in a given year")]
pub struct Args {
    /// Release year to map. Prompted for when omitted.
    #[arg(long)]
    pub year: Option<i32>,

    /// Your location as "lat,lon" in decimal degrees. Prompted for when omitted.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_user_location)]
    pub location: Option<Coordinates>,

    /// Directory containing locations.list. Prompted for when omitted.
    #[arg(long)]
    pub dataset_dir: Option<PathBuf>,

    /// Intermediate locations table.
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub csv_path: PathBuf,

    /// Generated HTML map.
    #[arg(long, default_value = DEFAULT_MAP_PATH)]
    pub map_path: PathBuf,

    /// Number of nearest locations to place on the map.
    #[arg(long, default_value_t = DEFAULT_NEAREST)]
    pub nearest: usize,

    /// Geocoder search endpoint (Nominatim-compatible).
    #[arg(long, default_value = DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// User agent sent to the geocoder.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Geocoder request start rate. Nominatim allows at most one per second.
    #[arg(long, default_value_t = 1)]
    pub requests_per_second: u32,

    /// Attempts per geocoder query on transient failures.
    #[arg(long, default_value_t = 1)]
    pub max_retries: u32,

    /// Per-request geocoder timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub request_timeout_secs: u64,
}
