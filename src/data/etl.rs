//! Daily feed preparation.
//!
//! The upstream ski report is scraped as a flat list of text cells, five per
//! resort. This module reshapes those cells into report rows, cleans the
//! values, joins them against the static resort location table, and writes
//! the CSV that the map consumes.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};

/// Cells per resort in the scraped report.
const CELLS_PER_RESORT: usize = 5;

/// Maximum number of resorts published in one feed.
pub const MAX_FEED_ROWS: usize = 20;

/// Words removed from scraped resort names so they match the location table.
const NAME_NOISE: &[&str] = &["Ski Area", "Resort", "Mountain"];

/// One resort's line of the daily report, after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub snowfall_72h: String,
    pub base_depth: String,
    pub trails_open: String,
    pub open_lifts: String,
}

/// Static location data for a resort.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResortLocation {
    #[serde(rename = "Resort Name")]
    pub name: String,
    pub state: String,
    pub lon: String,
    pub lat: String,
}

/// A joined row, serialized in the feed's column layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedRow {
    #[serde(rename = "Resort Name")]
    pub name: String,
    #[serde(rename = "72 Hour Snowfall")]
    pub snowfall_72h: String,
    #[serde(rename = "Base Depth")]
    pub base_depth: String,
    #[serde(rename = "Trails open")]
    pub trails_open: String,
    #[serde(rename = "Open lifts")]
    pub open_lifts: String,
    pub state: String,
    pub lon: String,
    pub lat: String,
}

/// Groups scraped cells into report rows, cleaning each value.
///
/// A trailing partial group is padded with empty cells.
pub fn reshape_report(cells: &[String]) -> Vec<ReportRow> {
    cells
        .chunks(CELLS_PER_RESORT)
        .map(|group| {
            let cell = |i: usize| group.get(i).map(String::as_str).unwrap_or("");
            ReportRow {
                name: clean_name(cell(0)),
                snowfall_72h: cell(1).replace('-', ""),
                base_depth: cell(2).to_string(),
                trails_open: strip_trail_total(cell(3)),
                open_lifts: cell(4).replace('-', ""),
            }
        })
        .collect()
}

/// Removes filler words from a resort name and trims it.
fn clean_name(name: &str) -> String {
    NAME_NOISE
        .iter()
        .fold(name.to_string(), |acc, noise| acc.replace(noise, ""))
        .trim()
        .to_string()
}

/// Cuts a trails value at the first `/<digits>`, e.g. `"12/100 open"` -> `"12"`.
fn strip_trail_total(value: &str) -> String {
    for (idx, _) in value.match_indices('/') {
        let rest = &value[idx + 1..];
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return value[..idx].to_string();
        }
    }
    value.to_string()
}

/// Parses the resort location table (CSV with `Resort Name,state,lon,lat`).
pub fn parse_locations(text: &str) -> Result<Vec<ResortLocation>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .map(|row| row.map_err(|e| LoadError::Parse(e.to_string())))
        .collect()
}

/// Inner-joins report rows with locations on the trimmed resort name.
///
/// Output follows report order and is capped at [`MAX_FEED_ROWS`].
pub fn match_locations(report: &[ReportRow], locations: &[ResortLocation]) -> Vec<FeedRow> {
    report
        .iter()
        .flat_map(|row| {
            let name = row.name.trim();
            locations
                .iter()
                .filter(move |loc| loc.name.trim() == name)
                .map(move |loc| FeedRow {
                    name: name.to_string(),
                    snowfall_72h: row.snowfall_72h.clone(),
                    base_depth: row.base_depth.clone(),
                    trails_open: row.trails_open.clone(),
                    open_lifts: row.open_lifts.clone(),
                    state: loc.state.clone(),
                    lon: loc.lon.clone(),
                    lat: loc.lat.clone(),
                })
        })
        .take(MAX_FEED_ROWS)
        .collect()
}

/// Writes feed rows as CSV text with a header row.
pub fn write_feed(rows: &[FeedRow]) -> Result<String, LoadError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer
            .write_record([
                "Resort Name",
                "72 Hour Snowfall",
                "Base Depth",
                "Trails open",
                "Open lifts",
                "state",
                "lon",
                "lat",
            ])
            .map_err(|e| LoadError::Parse(e.to_string()))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| LoadError::Parse(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| LoadError::Parse(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LoadError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_feed;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reshape_cleans_values() {
        let rows = reshape_report(&cells(&[
            "Alta Ski Area",
            "12\"",
            "80\"",
            "110/116 open",
            "6/6",
            "Big Sky Resort",
            "-",
            "45\"",
            "200/300",
            "-",
        ]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Alta");
        assert_eq!(rows[0].trails_open, "110");
        assert_eq!(rows[1].name, "Big Sky");
        assert_eq!(rows[1].snowfall_72h, "");
        assert_eq!(rows[1].open_lifts, "");
    }

    #[test]
    fn test_reshape_pads_partial_group() {
        let rows = reshape_report(&cells(&["Loveland Ski Area", "3\""]));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Loveland");
        assert_eq!(rows[0].base_depth, "");
        assert_eq!(rows[0].trails_open, "");
    }

    #[test]
    fn test_trails_without_total_are_kept() {
        assert_eq!(strip_trail_total("n/a"), "n/a");
        assert_eq!(strip_trail_total("35"), "35");
    }

    #[test]
    fn test_match_locations_inner_join_and_cap() {
        let locations = parse_locations(
            "Resort Name,state,lon,lat\nAlta,UT,-111.8,40.6\nStowe,VT,-72.78,44.53\n",
        )
        .unwrap();

        let report = reshape_report(&cells(&[
            "Stowe Mountain Resort",
            "4\"",
            "30\"",
            "95/116",
            "9",
            "Unknown Hill",
            "1\"",
            "10\"",
            "3/4",
            "1",
            "Alta Ski Area",
            "12\"",
            "80\"",
            "110/116",
            "6",
        ]));

        let joined = match_locations(&report, &locations);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].name, "Stowe");
        assert_eq!(joined[0].state, "VT");
        assert_eq!(joined[1].name, "Alta");
        assert_eq!(joined[1].lat, "40.6");

        let many: Vec<ReportRow> = (0..30).map(|_| report[2].clone()).collect();
        assert_eq!(match_locations(&many, &locations).len(), MAX_FEED_ROWS);
    }

    #[test]
    fn test_written_feed_is_readable_by_map() {
        let locations = parse_locations("Resort Name,state,lon,lat\nAlta,UT,-111.8,40.6\n").unwrap();
        let report = reshape_report(&cells(&["Alta Ski Area", "12\"", "80\"", "110/116", "6"]));
        let csv_text = write_feed(&match_locations(&report, &locations)).unwrap();

        let records = parse_feed(&csv_text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Alta");
        assert_eq!(records[0].snowfall_72h, "12\"");
        assert_eq!(records[0].lon, Some(-111.8));
    }

    #[test]
    fn test_empty_feed_still_has_header() {
        let csv_text = write_feed(&[]).unwrap();
        assert!(csv_text.starts_with("Resort Name,"));
        assert!(parse_feed(&csv_text).unwrap().is_empty());
    }
}
