//! View configuration.
//!
//! Presentation preferences shared by the models: which unit system amounts
//! are shown in, how many decimals, whether table row headers show each
//! row's share of the total, and how dates are printed. Stored as TOML.
//!
//! ```
//! use brewview::config::ViewConfig;
//! use brewview::units::UnitSystem;
//!
//! let config = ViewConfig::from_toml_str(r#"
//! unit_system = "imperial"
//! precision = 1
//! "#)?;
//!
//! assert_eq!(config.unit_system, UnitSystem::Imperial);
//! assert!(!config.display_percentages);
//! # Ok::<(), brewview::Error>(())
//! ```

use std::path::Path;

use brewview_core::logging::targets;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::{DisplayFormatter, UnitSystem};

/// Largest accepted `precision`.
pub const MAX_PRECISION: usize = 6;

/// Presentation preferences.
///
/// Omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Unit system for amounts and temperatures.
    pub unit_system: UnitSystem,
    /// Decimals printed for amounts.
    pub precision: usize,
    /// Whether table row headers show each row's share of the aggregate.
    pub display_percentages: bool,
    /// `chrono` format string for dates.
    pub date_format: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Si,
            precision: 3,
            display_percentages: false,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl ViewConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ViewConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded view config");
        Ok(config)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|e| Error::io(path, e))
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::invalid_value(
                "precision",
                format!("must be at most {MAX_PRECISION}, got {}", self.precision),
            ));
        }
        if self.date_format.is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(Error::invalid_value(
                "date_format",
                format!("'{}' is not a valid date format", self.date_format),
            ));
        }
        Ok(())
    }

    /// The formatter these preferences describe.
    pub fn formatter(&self) -> DisplayFormatter {
        DisplayFormatter::new(self.unit_system, self.precision)
    }
}
