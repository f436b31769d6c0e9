//! Theme preference.
//!
//! The preference is persisted to localStorage so it survives page reloads.
//! Native builds keep it in memory only.

use serde::{Deserialize, Serialize};

/// Light/dark theme selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub dark_mode: bool,
}

impl ThemeSettings {
    /// localStorage key for persisting settings.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "schnar_theme";

    /// Parses stored settings, falling back to defaults on bad input.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse theme settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn toggle(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return Self::default();
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded theme settings from localStorage");
                Self::from_json(&json)
            }
            _ => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };

        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save theme settings to localStorage");
                }
            }
            Err(e) => log::warn!("Failed to serialize theme settings: {}", e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        assert!(ThemeSettings::from_json(r#"{"dark_mode":true}"#).dark_mode);
        assert!(!ThemeSettings::from_json("garbage").dark_mode);
    }

    #[test]
    fn test_toggle() {
        let mut settings = ThemeSettings::default();
        settings.toggle();
        assert!(settings.dark_mode);
        settings.toggle();
        assert!(!settings.dark_mode);
    }
}
