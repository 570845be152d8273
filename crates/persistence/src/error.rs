//! Persistence error types.

use thiserror::Error;

/// Errors returned by todo repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    #[error("Todo not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl From<validator::ValidationError> for StoreError {
    fn from(err: validator::ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| err.code.to_string());
        StoreError::Validation(message)
    }
}
