//! Bar loading from CSV or JSON files.
//!
//! CSV needs `open,high,low,close` columns; an optional `time` column (also
//! accepted as `timestamp` or `date`) may hold unix seconds, RFC 3339, or
//! `YYYY-MM-DD[ HH:MM:SS]`. JSON is an array of `{open, high, low, close, time?}`
//! with `time` in unix seconds.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use zonelab_core::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "timestamp", alias = "date")]
    time: Option<String>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

pub fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let bars = match ext.as_deref() {
        Some("csv") => read_csv(file),
        Some("json") => read_json(file),
        _ => bail!(
            "unsupported bar file '{}': expected .csv or .json",
            path.display()
        ),
    }
    .with_context(|| format!("read bars from {}", path.display()))?;

    if bars.is_empty() {
        bail!("{} contains no bars", path.display());
    }
    Ok(bars)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut bars = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", i + 1))?;
        let mut bar = Bar::new(row.open, row.high, row.low, row.close);
        if let Some(raw) = row.time.as_deref().filter(|s| !s.is_empty()) {
            let time = parse_time(raw).with_context(|| format!("row {}", i + 1))?;
            bar = bar.with_time(time);
        }
        bars.push(bar);
    }
    Ok(bars)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<Bar>> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

/// Unix seconds from an integer, RFC 3339, or a naive UTC date/time.
pub fn parse_time(raw: &str) -> Result<i64> {
    if let Ok(secs) = raw.parse::<i64>() {
        return Ok(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .context("midnight out of range")?;
        return Ok(midnight.and_utc().timestamp());
    }
    bail!("unrecognised timestamp '{raw}'")
}
