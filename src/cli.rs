//! Command-line interface for the native build.

use crate::data::etl;
use crate::state::url_state::{DEFAULT_FEED, DEFAULT_GEOGRAPHY};
use crate::state::SourceConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Daily ski conditions on a map of the United States
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Resort feed CSV location
    #[arg(long, env = "SCHNAR_FEED", default_value = DEFAULT_FEED)]
    pub feed: String,

    /// State boundary file location (GeoJSON or .shp)
    #[arg(long, env = "SCHNAR_GEOGRAPHY", default_value = DEFAULT_GEOGRAPHY)]
    pub geography: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the daily feed from scraped report cells and the location table
    PrepareFeed {
        /// Text file with one scraped report cell per line
        #[arg(value_hint = clap::ValueHint::FilePath)]
        cells: PathBuf,

        /// CSV with `Resort Name,state,lon,lat`
        #[arg(value_hint = clap::ValueHint::FilePath)]
        locations: PathBuf,

        /// Where to write the feed CSV
        #[arg(value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
    },
}

impl Cli {
    pub fn sources(&self) -> SourceConfig {
        SourceConfig {
            feed: self.feed.clone(),
            geography: self.geography.clone(),
        }
    }
}

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::PrepareFeed {
            cells,
            locations,
            output,
        } => prepare_feed(&cells, &locations, &output),
    }
}

fn prepare_feed(cells: &Path, locations: &Path, output: &Path) -> Result<()> {
    let cells_text = std::fs::read_to_string(cells)
        .with_context(|| format!("failed to read {}", cells.display()))?;
    let locations_text = std::fs::read_to_string(locations)
        .with_context(|| format!("failed to read {}", locations.display()))?;

    let feed = build_feed(&cells_text, &locations_text)?;

    std::fs::write(output, feed)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("Wrote feed to {}", output.display());
    Ok(())
}

/// Runs the report cells through reshaping, cleaning and the location join.
fn build_feed(cells_text: &str, locations_text: &str) -> Result<String> {
    let cells: Vec<String> = cells_text.lines().map(str::to_string).collect();
    let report = etl::reshape_report(&cells);
    let locations = etl::parse_locations(locations_text)?;

    let rows = etl::match_locations(&report, &locations);
    log::info!(
        "Matched {} of {} reported resorts to locations",
        rows.len(),
        report.len()
    );
    Ok(etl::write_feed(&rows)?)
}
