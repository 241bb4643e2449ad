use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::aggregate::LocationTable;
use crate::common::{commit_tmp_path, prepare_tmp_path};

const CSV_HEADER: &str = "name,year,lat,lon\n";

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: String,
    year: Cow<'a, str>,
    lat: f64,
    lon: f64,
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quoted_if_needed(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(quoted(field))
    } else {
        Cow::Borrowed(field)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableRow {
    pub name: String,
    pub year: String,
    pub lat: f64,
    pub lon: f64,
}

pub fn write_locations_csv(table: &LocationTable, output_path: &Path) -> Result<()> {
    let tmp_path = prepare_tmp_path(output_path)?;
    let mut file = File::create(&tmp_path)
        .with_context(|| format!("Failed creating temp locations CSV {}", tmp_path.display()))?;
    file.write_all(CSV_HEADER.as_bytes())
        .context("Failed writing locations CSV header")?;

    // Fields arrive pre-quoted; names are always wrapped in double quotes.
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file);
    for (_, entry) in table.iter() {
        writer
            .serialize(ExportRow {
                name: quoted(&entry.representative.name),
                year: quoted_if_needed(&entry.representative.year_text),
                lat: entry.coordinates.lat,
                lon: entry.coordinates.lon,
            })
            .context("Failed writing locations CSV row")?;
    }
    writer.flush().context("Failed flushing locations CSV writer")?;
    drop(writer);

    commit_tmp_path(&tmp_path, output_path)
}

pub fn read_locations_csv(path: &Path) -> Result<Vec<TableRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed opening locations CSV {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize::<TableRow>().enumerate() {
        rows.push(row.with_context(|| format!("Failed parsing locations CSV row {}", idx + 1))?);
    }
    Ok(rows)
}
