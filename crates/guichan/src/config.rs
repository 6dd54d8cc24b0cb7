//! GUI configuration.
//!
//! ```
//! use guichan::GuiConfig;
//!
//! let config = GuiConfig::from_toml_str("double_click_threshold_ms = 400").unwrap();
//! assert_eq!(config.double_click_threshold_ms, 400);
//! assert!(config.tabbing_enabled);
//! ```

use std::path::Path;

use guichan_core::{GuiError, Result};
use serde::{Deserialize, Serialize};

/// Default time window for counting consecutive presses as one click
/// sequence.
pub const DEFAULT_DOUBLE_CLICK_THRESHOLD_MS: u64 = 250;

/// Settings for a `Gui`. Missing TOML keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Presses of the same button closer together than this increment the
    /// click count.
    pub double_click_threshold_ms: u64,
    /// Whether an unconsumed Tab press moves focus.
    pub tabbing_enabled: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            double_click_threshold_ms: DEFAULT_DOUBLE_CLICK_THRESHOLD_MS,
            tabbing_enabled: true,
        }
    }
}

impl GuiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_double_click_threshold_ms(mut self, threshold: u64) -> Self {
        self.double_click_threshold_ms = threshold;
        self
    }

    pub fn with_tabbing_enabled(mut self, enabled: bool) -> Self {
        self.tabbing_enabled = enabled;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GuiError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GuiError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| GuiError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuiConfig::default();
        assert_eq!(config.double_click_threshold_ms, 250);
        assert!(config.tabbing_enabled);
        assert_eq!(GuiConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GuiConfig::new()
            .with_double_click_threshold_ms(500)
            .with_tabbing_enabled(false);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("tabbing_enabled = false"));
        assert_eq!(GuiConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            GuiConfig::from_toml_str("tabbing_enabled = \"maybe\""),
            Err(GuiError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GuiConfig::load("/nonexistent/guichan.toml"),
            Err(GuiError::Config(_))
        ));
    }
}
