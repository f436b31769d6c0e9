//! Data source locations.
//!
//! On the web the feed and boundary locations can be overridden with URL
//! query parameters (`?feed=...&geo=...`); native builds take them from the
//! command line or environment.

/// Default location of the daily resort feed.
pub const DEFAULT_FEED: &str = "./data/daily_ski.csv";
/// Default location of the state boundary file.
pub const DEFAULT_GEOGRAPHY: &str = "./data/states.json";

/// Where the app loads its two inputs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub feed: String,
    pub geography: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED.to_string(),
            geography: DEFAULT_GEOGRAPHY.to_string(),
        }
    }
}

impl SourceConfig {
    /// Applies `feed` and `geo` parameters from a query string over the defaults.
    ///
    /// Empty values and unknown keys are ignored.
    #[cfg_attr(not(any(target_arch = "wasm32", test)), allow(dead_code))]
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();

        let query = query.trim_start_matches('?');
        for pair in query.split('&') {
            let mut kv = pair.splitn(2, '=');
            let key = kv.next().unwrap_or("");
            let value = kv.next().unwrap_or("");
            if value.is_empty() {
                continue;
            }
            match key {
                "feed" => config.feed = value.to_string(),
                "geo" => config.geography = value.to_string(),
                _ => {}
            }
        }

        config
    }

    /// Reads source overrides from the current browser URL.
    #[cfg(target_arch = "wasm32")]
    pub fn from_url() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        Self::from_query(&search)
    }
}
