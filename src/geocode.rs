use anyhow::{Context, Result, anyhow};
use reqwest::{Client, header::RETRY_AFTER};
use serde::{Deserialize, Serialize};
use std::{future::Future, time::Duration};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::common::{
    is_retryable_status, min_interval_for_rate, parse_retry_after, truncate_for_log,
    wait_for_rate_slot,
};
use crate::constants::USER_LOCATION_UNAVAILABLE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinates: Coordinates,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Place),
    NotFound,
    Unavailable,
}

pub trait Geocoder {
    fn geocode(&self, query: &str) -> impl Future<Output = GeocodeOutcome>;
}

/// The raw location first, then each suffix that drops the leftmost comma segment.
pub fn narrowing_queries(location: &str) -> Vec<String> {
    let segments: Vec<&str> = location
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return Vec::new();
    }
    let mut queries = vec![location.to_string()];
    queries.extend((1..segments.len()).map(|start| segments[start..].join(", ")));
    queries
}

pub async fn resolve_location<G: Geocoder>(geocoder: &G, location: &str) -> GeocodeOutcome {
    for query in narrowing_queries(location) {
        match geocoder.geocode(&query).await {
            GeocodeOutcome::Found(place) => {
                debug!(location, query = %query, "geocoded");
                return GeocodeOutcome::Found(place);
            }
            GeocodeOutcome::NotFound => {
                debug!(location, query = %query, "not found, broadening");
            }
            GeocodeOutcome::Unavailable => return GeocodeOutcome::Unavailable,
        }
    }
    GeocodeOutcome::NotFound
}

pub async fn describe_user_location<G: Geocoder>(geocoder: &G, user: Coordinates) -> String {
    let query = format!("{}, {}", user.lat, user.lon);
    match geocoder.geocode(&query).await {
        GeocodeOutcome::Found(place) => place.display_name,
        GeocodeOutcome::NotFound | GeocodeOutcome::Unavailable => {
            USER_LOCATION_UNAVAILABLE.to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    max_retries: u32,
    min_interval: Duration,
    next_slot: Mutex<Instant>,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: String, requests_per_second: u32, max_retries: u32) -> Self {
        Self {
            client,
            base_url,
            max_retries: max_retries.max(1),
            min_interval: min_interval_for_rate(requests_per_second),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    async fn search(&self, query: &str) -> Result<Option<Place>> {
        let attempts = self.max_retries;
        let mut backoff = Duration::from_secs(1);

        for attempt in 1..=attempts {
            wait_for_rate_slot(&self.next_slot, self.min_interval).await;
            let response = self
                .client
                .get(&self.base_url)
                .query(&[("q", query), ("format", "json"), ("limit", "1")])
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let body: Vec<NominatimResult> = resp
                            .json()
                            .await
                            .with_context(|| format!("Invalid geocoder JSON for {query:?}"))?;
                        return body.into_iter().next().map(into_place).transpose();
                    }

                    let retry_after = parse_retry_after(resp.headers().get(RETRY_AFTER));
                    let body = resp.text().await.unwrap_or_default();
                    if is_retryable_status(status) && attempt < attempts {
                        tokio::time::sleep(retry_after.unwrap_or(backoff)).await;
                        backoff = (backoff + backoff).min(Duration::from_secs(60));
                        continue;
                    }

                    return Err(anyhow!(
                        "Geocoder status {} for {:?} after {} attempt(s). Body: {}",
                        status,
                        query,
                        attempt,
                        truncate_for_log(&body)
                    ));
                }
                Err(err) => {
                    if attempt == attempts {
                        return Err(anyhow!("Geocoder request failed for {query:?}: {err}"));
                    }
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff + backoff).min(Duration::from_secs(60));
                }
            }
        }

        Err(anyhow!("Unexpected geocoder flow for {query:?}"))
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        match self.search(query).await {
            Ok(Some(place)) => GeocodeOutcome::Found(place),
            Ok(None) => GeocodeOutcome::NotFound,
            Err(err) => {
                warn!("geocoder unavailable: {err:#}");
                GeocodeOutcome::Unavailable
            }
        }
    }
}

fn into_place(result: NominatimResult) -> Result<Place> {
    let lat: f64 = result.lat.trim().parse().context("parse lat")?;
    let lon: f64 = result.lon.trim().parse().context("parse lon")?;
    Ok(Place {
        coordinates: Coordinates::new(lat, lon),
        display_name: result.display_name,
    })
}
