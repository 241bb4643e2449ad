use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::time::Duration;

use film_map::args::Args;
use film_map::constants::{DATASET_FILE_NAME, NOMINATIM_USAGE_POLICY_URL};
use film_map::distance::{nearest, rank_by_distance};
use film_map::export::{read_locations_csv, write_locations_csv};
use film_map::geocode::{NominatimGeocoder, describe_user_location};
use film_map::prompt::resolve_inputs;
use film_map::reader::read_dataset;
use film_map::render::{render_map_html, write_map};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let inputs = resolve_inputs(&args)?;

    tracing::info!("Geocoder: {} (usage policy: {})", args.geocoder_url, NOMINATIM_USAGE_POLICY_URL);
    let client = Client::builder()
        .user_agent(args.user_agent.as_str())
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()
        .context("Failed creating HTTP client")?;
    let geocoder = NominatimGeocoder::new(
        client,
        args.geocoder_url.clone(),
        args.requests_per_second,
        args.max_retries,
    );

    let dataset_path = inputs.dataset_dir.join(DATASET_FILE_NAME);
    tracing::info!(year = inputs.year, "Reading {}", dataset_path.display());
    let table = read_dataset(&dataset_path, inputs.year, &geocoder).await?;

    write_locations_csv(&table, &args.csv_path)?;
    tracing::info!("Wrote {} locations to {}", table.len(), args.csv_path.display());

    let rows = read_locations_csv(&args.csv_path)?;
    let ranked = rank_by_distance(rows, inputs.user_location);
    let shown = nearest(&ranked, args.nearest);

    let user_description = describe_user_location(&geocoder, inputs.user_location).await;
    let html = render_map_html(shown, inputs.user_location, &user_description)?;
    write_map(&args.map_path, &html)?;

    tracing::info!(
        markers = shown.len(),
        "Finished. Please, have a look at {}",
        args.map_path.display()
    );
    Ok(())
}
