//! Core error types for pedigree processing
//!
//! This module defines the error types raised while loading, configuring
//! and constructing a pedigree engine. Rendering itself never fails: every
//! anomaly past construction degrades the drawing instead.

use thiserror::Error;

/// Core error types for pedigree processing
#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("Drawing surface unavailable: an engine cannot be built without a surface")]
    SurfaceUnavailable,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Dataset error: {message}")]
    DatasetError { message: String },

    #[error("Export format not supported by this surface: {format}")]
    ExportUnsupported { format: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl PedigreeError {
    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new dataset error
    pub fn dataset_error(message: impl Into<String>) -> Self {
        Self::DatasetError {
            message: message.into(),
        }
    }

    /// Create a new unsupported-export error
    pub fn export_unsupported(format: impl std::fmt::Display) -> Self {
        Self::ExportUnsupported {
            format: format.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_unavailable() {
        let error_msg = PedigreeError::SurfaceUnavailable.to_string();
        assert!(error_msg.contains("surface unavailable"));
    }

    #[test]
    fn test_config_error() {
        let error = PedigreeError::config_error("missing default_affected");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Configuration error"));
        assert!(error_msg.contains("missing default_affected"));
    }

    #[test]
    fn test_dataset_error() {
        let error = PedigreeError::dataset_error("duplicate id 'A'");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Dataset error"));
        assert!(error_msg.contains("duplicate id 'A'"));
    }

    #[test]
    fn test_export_unsupported() {
        let error = PedigreeError::export_unsupported("png");
        assert!(error.to_string().contains("png"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: PedigreeError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: PedigreeError = json_err.into();
        assert!(error.to_string().starts_with("JSON error"));
    }
}
