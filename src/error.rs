//! Consistency checker error types

use serde::Serialize;
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column '{column}' must be {expected}")]
    ColumnKind { column: String, expected: &'static str },

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Column '{0}' has no values")]
    EmptyColumn(String),

    #[error("Invalid date '{value}' in column '{column}'")]
    InvalidDate { column: String, value: String },

    #[error("Malformed number: {0}")]
    MalformedNumber(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Dataset faults that make the whole verification call fail.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CheckError::MissingColumn(_)
                | CheckError::ColumnKind { .. }
                | CheckError::ColumnLength { .. }
                | CheckError::EmptyDataset
                | CheckError::EmptyColumn(_)
                | CheckError::InvalidDate { .. }
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            CheckError::MissingColumn(_) => "MISSING_COLUMN",
            CheckError::ColumnKind { .. } => "COLUMN_KIND",
            CheckError::ColumnLength { .. } => "COLUMN_LENGTH",
            CheckError::EmptyDataset => "EMPTY_DATASET",
            CheckError::EmptyColumn(_) => "EMPTY_COLUMN",
            CheckError::InvalidDate { .. } => "INVALID_DATE",
            CheckError::MalformedNumber(_) => "MALFORMED_NUMBER",
            CheckError::Arithmetic(_) => "ARITHMETIC_ERROR",
            CheckError::InvalidClaim(_) => "INVALID_CLAIM",
            CheckError::InvalidReport(_) => "INVALID_REPORT",
            CheckError::Config(_) => "CONFIG_ERROR",
            CheckError::Serialization(_) => "SERIALIZATION_ERROR",
            CheckError::Io(_) => "IO_ERROR",
        }
    }
}

/// Serializable error response for the calling application
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&CheckError> for ErrorResponse {
    fn from(err: &CheckError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CheckError> for ErrorResponse {
    fn from(err: CheckError) -> Self {
        ErrorResponse::from(&err)
    }
}

impl serde::Serialize for CheckError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
