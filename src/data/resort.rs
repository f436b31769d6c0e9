//! Resort records and the daily CSV feed.

use crate::error::LoadError;
use geo_types::Coord;
use serde::Deserialize;

/// One row of the daily ski conditions feed.
///
/// Display fields are kept as the feed's text (`3"`, `45"`, `12`); only the
/// coordinates are parsed. A blank or malformed coordinate is `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResortRecord {
    #[serde(rename = "Resort Name")]
    pub name: String,
    pub state: String,
    #[serde(rename = "72 Hour Snowfall", default)]
    pub snowfall_72h: String,
    #[serde(rename = "Base Depth", default)]
    pub base_depth: String,
    #[serde(rename = "Trails open", default)]
    pub trails_open: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub lat: Option<f64>,
}

impl ResortRecord {
    /// Geographic position as (lon, lat), if both coordinates are present.
    pub fn coord(&self) -> Option<Coord<f64>> {
        match (self.lon, self.lat) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => None,
        }
    }
}

/// Parses the feed text into resort records.
///
/// An empty feed (no bytes, whitespace, or a header row only) yields an empty
/// list rather than an error. Unknown columns are ignored.
pub fn parse_feed(text: &str) -> Result<Vec<ResortRecord>, LoadError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| LoadError::Parse(format!("row {}: {}", idx + 1, e)))
        })
        .collect()
}
