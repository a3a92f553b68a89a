//! Error types for signaltrail.
//!
//! This module defines all error types used throughout the signaltrail crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for signaltrail operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Route log read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Network Errors ===
    /// Wi-Fi signal query or geolocation call failed.
    #[error("network error: {0}")]
    Network(String),

    /// The geolocation service answered but could not resolve a location.
    #[error("geolocation failed: {message}")]
    GeolocationFailed {
        /// Reason reported by the service.
        message: String,
    },

    /// An operation timed out.
    #[error("operation timed out: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
    },

    // === Schema Errors ===
    /// The route log header is missing a required column.
    #[error("route log schema error: {message}")]
    Schema {
        /// Description of the missing or malformed column.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Platform Errors ===
    /// No Wi-Fi signal source is available on this platform.
    #[error("no signal source available: {0}")]
    SignalSourceUnavailable(String),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for signaltrail operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                operation: "geolocation request".to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl Error {
    /// Create a new network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new schema error.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a geolocation failure carrying the service's message.
    #[must_use]
    pub fn geolocation_failed(message: impl Into<String>) -> Self {
        Self::GeolocationFailed {
            message: message.into(),
        }
    }

    /// Check if this error is a schema problem (missing required columns).
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this error came from the network side (signal or geolocation).
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::GeolocationFailed { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::network("dns failure");
        assert_eq!(err.to_string(), "network error: dns failure");

        let err = Error::schema("missing longitude column");
        assert_eq!(
            err.to_string(),
            "route log schema error: missing longitude column"
        );
    }

    #[test]
    fn test_error_is_schema_error() {
        assert!(Error::schema("test").is_schema_error());
        assert!(!Error::network("test").is_schema_error());
    }

    #[test]
    fn test_error_is_network_error() {
        assert!(Error::network("test").is_network_error());
        assert!(Error::geolocation_failed("quota").is_network_error());
        assert!(Error::Timeout {
            operation: "geolocation request".to_string()
        }
        .is_network_error());
        assert!(!Error::schema("test").is_network_error());
    }

    #[test]
    fn test_geolocation_failed_display() {
        let err = Error::geolocation_failed("private range");
        let msg = err.to_string();
        assert!(msg.contains("geolocation failed"));
        assert!(msg.contains("private range"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = Error::Timeout {
            operation: "geolocation request".to_string(),
        };
        assert!(err.to_string().contains("geolocation request"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "invalid interval".to_string(),
        };
        assert!(err.to_string().contains("invalid interval"));
    }

    #[test]
    fn test_signal_source_unavailable_display() {
        let err = Error::SignalSourceUnavailable("unsupported platform".to_string());
        assert!(err.to_string().contains("unsupported platform"));
    }
}
