//! Error types for definition and document loading
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error types for loading operations
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Content in a format this loader cannot read
    #[error("Unsupported format for '{path}': {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Building or running the validator failed
    #[error(transparent)]
    Core(#[from] xssd_core::Error),
}

impl From<std::io::Error> for LoaderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::from("<unknown>"),
            source: error,
        }
    }
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: &Path, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.to_path_buf(),
            source: error,
        }
    }

    /// Create a YAML parsing error with path context
    pub fn yaml_parse_error(path: &Path, error: serde_yaml::Error) -> Self {
        Self::YamlParseError {
            path: path.to_path_buf(),
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: &Path, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path: path.to_path_buf(),
            source: error,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: &Path, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::IoError { path, .. }
            | Self::YamlParseError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::UnsupportedFormat { path, .. } => Some(path),
            Self::Core(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let path = PathBuf::from("test.yaml");

        let io_err = LoaderError::io_error(
            &path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
        );
        assert!(matches!(io_err, LoaderError::IoError { .. }));
        assert_eq!(io_err.path(), Some(path.as_path()));

        let parse_err = LoaderError::yaml_parse_error(
            &path,
            serde_yaml::from_str::<serde_yaml::Value>("{").unwrap_err(),
        );
        assert!(parse_err.to_string().starts_with("Failed to parse YAML file 'test.yaml'"));
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err = LoaderError::from(xssd_core::Error::NoData);
        assert_eq!(err.to_string(), xssd_core::Error::NoData.to_string());
        assert!(err.path().is_none());
    }
}
