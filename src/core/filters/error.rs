//! Error types for the filter engine.
//!
//! Configuration errors (duplicate URL keys, kind/default mismatches) are
//! programmer errors and fail fast at store construction. Persistence errors
//! are runtime conditions the engine logs and degrades on; they never reach
//! the page as a user-visible failure.

use thiserror::Error;

/// Unified error type for filter store construction and adapters.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Two field definitions in one store share a URL key.
    #[error("Duplicate URL key: {0}")]
    DuplicateUrlKey(String),

    /// Two field definitions in one store share a field name.
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    /// A field's declared kind does not match its default value's shape,
    /// or a caller assigned a value of the wrong kind.
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Accessor named a field the store does not declare.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Device-local cache unavailable or rejected the operation.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error from the file-backed cache.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Create a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create an unknown-field error for the given field name.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Create a type-mismatch error for the given field.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
