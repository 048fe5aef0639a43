// models/src/errors.rs

use std::io;

pub use thiserror::Error;

use serde_json::Error as SerdeJsonError;

/// A field-level validation error. Carries the offending field name so the
/// caller can see exactly which constraint was violated.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required string field was empty.
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
    /// A numeric field fell outside its allowed range.
    #[error("field '{field}' is out of range: expected {constraint}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
    },
    /// A categorical field held a value outside its allowed set.
    #[error("field '{field}' has invalid value '{value}', select from {allowed}")]
    InvalidCategory {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

/// The operation-level error taxonomy for the patient registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("patient with id '{0}' was not found")]
    NotFound(String),
    #[error("patient with id '{0}' already exists")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// Document (de)serialization failures are storage failures from the caller's
// point of view.
impl From<SerdeJsonError> for RegistryError {
    fn from(err: SerdeJsonError) -> Self {
        RegistryError::Storage(format!("JSON processing error: {}", err))
    }
}

/// A type alias for a `Result` that returns a `RegistryError` on failure.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
