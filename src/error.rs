//! Errors raised while loading the resort feed and boundary data.

use thiserror::Error;

/// Failure while fetching or decoding one of the app's external inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The location could not be read (missing file, network error, non-2xx status).
    #[error("failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    /// The resort feed was readable but is not valid CSV for the expected columns.
    #[error("failed to parse resort feed: {0}")]
    Parse(String),

    /// The boundary file was readable but could not be decoded.
    #[error("failed to read state boundaries: {0}")]
    Geography(String),
}

impl LoadError {
    pub fn fetch(location: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}
