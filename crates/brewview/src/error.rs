//! Error types for configuration loading and value parsing.
//!
//! Model operations never fail with an error; they return sentinels and
//! report through [`Diagnostics`](brewview_core::Diagnostics). Only the
//! ambient operations that touch the outside world return [`Result`].

use std::path::PathBuf;

/// Result type alias for brewview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the models.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration text is not valid TOML or does not match the schema.
    #[error("Config parse error: {message}")]
    Parse { message: String },

    /// File I/O error.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field holds a value outside its accepted range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::parse(err.message())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::parse(err.to_string())
    }
}
