//! Application state management.
//!
//! This module contains all state structures used throughout the application.
//! State is organized into logical groupings that correspond to different
//! areas of functionality.

pub mod notifications;
mod settings;
pub mod url_state;

pub use notifications::{Notifications, Toast};
pub use settings::ThemeSettings;
pub use url_state::SourceConfig;

use crate::data::ResortRecord;

/// Progress of the one-shot feed load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeedState {
    #[default]
    Loading,
    Ready(Vec<ResortRecord>),
    Failed(String),
}

impl FeedState {
    /// Records to display. Empty while loading or after a failure.
    pub fn records(&self) -> &[ResortRecord] {
        match self {
            FeedState::Ready(records) => records,
            FeedState::Loading | FeedState::Failed(_) => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// Where the feed and boundaries are loaded from
    pub sources: SourceConfig,

    /// Resort feed load state and records
    pub feed: FeedState,

    /// Application status message displayed in top bar
    pub status_message: String,

    /// Transient notifications
    pub notifications: Notifications,

    /// Theme preference
    pub theme: ThemeSettings,
}

impl AppState {
    pub fn new(sources: SourceConfig) -> Self {
        Self {
            sources,
            status_message: "Loading today's conditions...".to_string(),
            theme: ThemeSettings::load(),
            ..Default::default()
        }
    }
}
