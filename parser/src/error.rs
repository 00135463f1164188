//! Error types for the fallible edges of the parser crate.
//!
//! Parsing itself never fails; these cover configuration files and output
//! encoding.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetstatError {
    /// A config file could not be opened or created.
    #[error("config file not accessible: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Records could not be rendered as JSON.
    #[error("cannot render records as JSON: {0}")]
    Render(#[from] serde_json::Error),

    /// A config file is not valid YAML, or records could not be rendered as YAML.
    #[error("YAML config or output invalid: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`NetstatError`].
pub type Result<T> = std::result::Result<T, NetstatError>;
