//! Unified error types for switch-ip-check
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error talking to the Mist API
    #[error("Mist API unavailable: {0}")]
    Api(#[from] ApiError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reading the baseline or writing the export
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from Mist API calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// Token rejected by the API (401/403)
    #[error("Authentication failed for '{0}'. Check the API token and organization ID.")]
    Unauthorized(String),

    /// Non-success HTTP status
    #[error("HTTP {status} from '{endpoint}'")]
    Http { status: u16, endpoint: String },

    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON
    #[error("Unexpected response from '{endpoint}': {message}")]
    Parse { endpoint: String, message: String },

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Empty or unusable switch identifier
    #[error("Invalid switch identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Not an IPv4 address (optionally with prefix length)
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    /// Not a dotted netmask or prefix length
    #[error("Invalid netmask: '{0}'")]
    InvalidNetmask(String),

    /// VLAN outside 1-4094 or not a number
    #[error("Invalid VLAN: '{0}' (must be 1-4094)")]
    InvalidVlan(String),
}

/// Errors from the CSV baseline and the CSV export
#[derive(Error, Debug)]
pub enum InputError {
    /// Baseline CSV does not exist
    #[error("CSV file not found: {0}")]
    NotFound(String),

    /// Baseline CSV exists but cannot be opened
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Row missing a required field or carrying an unparseable value
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// CSV reader/writer failure
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for InputError {
    fn from(err: csv::Error) -> Self {
        InputError::Csv(err.to_string())
    }
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InvalidVlan("5000".to_string());
        assert_eq!(err.to_string(), "Invalid VLAN: '5000' (must be 1-4094)");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Http {
            status: 500,
            endpoint: "/api/v1/orgs/x/sites".to_string(),
        };
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.to_string().contains("/api/v1/orgs/x/sites"));
    }

    #[test]
    fn test_malformed_row_display() {
        let err = InputError::MalformedRow {
            line: 4,
            reason: "missing 'ip'".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed row at line 4: missing 'ip'");
    }

    #[test]
    fn test_error_conversion() {
        let api_err = ApiError::Unauthorized("/api/v1/self".to_string());
        let app_err: AppError = api_err.into();
        assert!(matches!(app_err, AppError::Api(ApiError::Unauthorized(_))));
        assert!(app_err.to_string().starts_with("Mist API unavailable"));
    }
}
