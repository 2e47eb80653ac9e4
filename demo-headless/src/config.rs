//! Optional TOML configuration for `carbon-report`
//!
//! ```toml
//! locale = "id"          # number formatting: id | en
//! decimals = 2           # display precision
//! catalog = "species.toml"
//! export_dir = "exports"
//! ```
//!
//! Command-line flags take precedence over every value here.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use carbon_stock_core::report::DISPLAY_DECIMALS;

/// Report settings loaded from a config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Locale tag for number formatting (`id`, `en`, ...)
    pub locale: String,
    /// Decimal places for on-screen figures
    pub decimals: usize,
    /// Species catalog TOML replacing the built-in list
    pub catalog: Option<PathBuf>,
    /// Directory for CSV exports
    pub export_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: "id".to_string(),
            decimals: DISPLAY_DECIMALS,
            catalog: None,
            export_dir: None,
        }
    }
}

impl ReportConfig {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ReportConfig = toml::from_str(r#"locale = "en""#).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.decimals, DISPLAY_DECIMALS);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<ReportConfig>("colour = \"green\"").is_err());
    }
}
