//! Layout configuration for usage screens and error messages.
//!
//! Every field has a default, so a YAML file only needs the values it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! line_width: 100
//! tab_size: 8
//! column_spacing: 2
//! description_indent: 5
//! long_description_width: 90
//! message_width: 94
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Widths used when rendering usage, help and error output.
///
/// All widths are in code points. Terminal tab stops are unknown, so
/// `tab_size` is an estimate of how wide the leading `\t` renders.
///
/// # Examples
///
/// ```
/// use flagkit_flags::UsageConfig;
///
/// let config: UsageConfig = serde_yaml::from_str("line_width: 100").unwrap();
/// assert_eq!(config.line_width, 100);
/// assert_eq!(config.tab_size, 4);
/// assert_eq!(config.content_width(), 92);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Total width of a usage line.
    pub line_width: usize,
    /// Assumed rendered width of a leading tab.
    pub tab_size: usize,
    /// Spaces between the flag column and descriptions.
    pub column_spacing: usize,
    /// Spaces before wrapped descriptions of long flags, after the tab.
    pub description_indent: usize,
    /// Wrap width for descriptions printed below their flag.
    pub long_description_width: usize,
    /// Wrap width for tab-indented error and usage-failure messages.
    pub message_width: usize,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            line_width: 80,
            tab_size: 4,
            column_spacing: 4,
            description_indent: 5,
            long_description_width: 70,
            message_width: 74,
        }
    }
}

impl UsageConfig {
    /// Width left for flag labels plus descriptions on one usage line.
    pub fn content_width(&self) -> usize {
        self.line_width
            .saturating_sub(self.tab_size)
            .saturating_sub(self.column_spacing)
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or [`YamlError`](ConfigError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or [`YamlError`](ConfigError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
