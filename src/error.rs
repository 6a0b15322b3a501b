//! Custom error types for Mabourse
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Mabourse operations
#[derive(Error, Debug)]
pub enum BalanceError {
    /// A caller-supplied value is outside its accepted domain
    /// (month mode, month number, financial start day, date, amount)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required transaction or adjustment field is missing
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Password verification failed or no password is configured
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl BalanceError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for periods
    pub fn period_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Period",
            identifier: identifier.into(),
        }
    }

    /// Create a schema error for a missing field
    pub fn missing_field(source: &str, field: &str, row: usize) -> Self {
        Self::Schema(format!(
            "{} row {} is missing required field '{}'",
            source, row, field
        ))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

impl From<std::io::Error> for BalanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BalanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BalanceError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Mabourse operations
pub type BalanceResult<T> = Result<T, BalanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BalanceError::InvalidArgument("month 13".into());
        assert_eq!(err.to_string(), "Invalid argument: month 13");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_not_found_error() {
        let err = BalanceError::account_not_found("checking");
        assert_eq!(err.to_string(), "Account not found: checking");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_field_error() {
        let err = BalanceError::missing_field("Transaction", "Amount", 3);
        assert_eq!(
            err.to_string(),
            "Schema error: Transaction row 3 is missing required field 'Amount'"
        );
        assert!(err.is_schema());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BalanceError = io_err.into();
        assert!(matches!(err, BalanceError::Io(_)));
    }
}
