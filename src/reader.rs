use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

use crate::aggregate::{FoldOutcome, LocationTable};
use crate::constants::DATASET_HEADER_LINES;
use crate::geocode::Geocoder;
use crate::parser::parse_line;

const MILESTONES: [(usize, &str); 3] = [
    (50, "Please, wait for us to process the data."),
    (500, "Please, wait some more."),
    (1000, "Wow, that's a lot of data!"),
];

#[derive(Debug, Default)]
pub struct ProgressMilestones {
    next: usize,
}

impl ProgressMilestones {
    pub fn observe(&mut self, location_count: usize) -> Option<&'static str> {
        let (threshold, message) = *MILESTONES.get(self.next)?;
        if location_count >= threshold {
            self.next += 1;
            Some(message)
        } else {
            None
        }
    }
}

pub async fn read_dataset<G: Geocoder>(path: &Path, year: i32, geocoder: &G) -> Result<LocationTable> {
    let file = File::open(path).with_context(|| format!("Failed opening dataset {}", path.display()))?;
    let total_bytes = file
        .metadata()
        .with_context(|| format!("Failed reading metadata for {}", path.display()))?
        .len();

    let progress = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [scan {elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
    ) {
        progress.set_style(style.progress_chars("=> "));
    }

    let table = scan_dataset(BufReader::new(file), year, geocoder, &progress)
        .await
        .with_context(|| format!("Failed reading dataset {}", path.display()))?;
    progress.finish_with_message(format!("{} locations", table.len()));
    Ok(table)
}

// Year match is substring containment on the year text; first occurrence of a film name wins.
pub async fn scan_dataset<R: BufRead, G: Geocoder>(
    mut reader: R,
    year: i32,
    geocoder: &G,
    progress: &ProgressBar,
) -> Result<LocationTable> {
    let year_text = year.to_string();
    let mut table = LocationTable::new();
    let mut used_films: HashSet<String> = HashSet::new();
    let mut milestones = ProgressMilestones::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).context("Failed reading line")?;
        if read == 0 {
            break;
        }
        line_no += 1;
        progress.inc(read as u64);

        if line_no <= DATASET_HEADER_LINES {
            continue;
        }
        let line = String::from_utf8_lossy(&buf);
        match line.chars().next() {
            Some(c) if c.is_alphabetic() || c == '"' => {}
            _ => continue,
        }

        let Some(record) = parse_line(&line) else {
            continue;
        };
        if !record.year_text.contains(&year_text) {
            continue;
        }
        if !used_films.insert(record.name.clone()) {
            continue;
        }

        if table.fold(record, geocoder).await == FoldOutcome::Inserted {
            progress.set_message(format!("{} locations", table.len()));
            if let Some(message) = milestones.observe(table.len()) {
                progress.suspend(|| info!(locations = table.len(), "{message}"));
            }
        }
    }

    progress.suspend(|| {
        info!(
            lines = line_no,
            films = used_films.len(),
            locations = table.len(),
            "We're done processing the data. Map is generating now."
        )
    });
    Ok(table)
}
