//! Error types for system model operations.

use std::path::PathBuf;

/// Errors that can occur while loading or validating a system description.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a system description.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System description file not found.
    #[error("system description not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A parameter value could not be interpreted as its declared datatype.
    #[error("invalid value '{value}' for {datatype} parameter")]
    InvalidValue {
        /// Declared datatype name.
        datatype: &'static str,
        /// The offending text.
        value: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
