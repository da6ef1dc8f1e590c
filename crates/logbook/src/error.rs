//! Error types for service operations.

use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors surfaced to the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A field failed validation before reaching storage.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The storage layer failed or rejected the operation.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    /// True for a duplicate-email rejection, so registration screens can
    /// show the specific message instead of a generic save failure.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(
            self,
            ServiceError::Database(DatabaseError::AlreadyExists { .. })
        )
    }
}
