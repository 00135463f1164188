//! Parse settings stored as YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! raw: false
//! quiet: true
//! format: table
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ParseOptions;
use crate::error::Result;
use crate::output::OutputFormat;

/// Persistent defaults for a parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Skip normalization and keep every field as text.
    pub raw: bool,
    /// Suppress the platform compatibility warning.
    pub quiet: bool,
    /// Output format used by the command-line driver.
    pub format: OutputFormat,
}

impl ParseConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIo`](crate::NetstatError::ConfigIo) if the file cannot
    /// be read, or [`Yaml`](crate::NetstatError::Yaml) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIo`](crate::NetstatError::ConfigIo) if the file cannot
    /// be written, or [`Yaml`](crate::NetstatError::Yaml) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Parse options carried by this configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// # let config: netstat_schema_parser::ParseConfig = serde_yaml::from_str("raw: true").unwrap();
    /// let options = config.options();
    /// assert!(options.raw);
    /// assert!(!options.quiet);
    /// ```
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            raw: self.raw,
            quiet: self.quiet,
        }
    }
}
