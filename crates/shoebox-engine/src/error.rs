//! # Engine Errors
//!
//! One error type for every engine operation.
//!
//! ```text
//! EngineError
//! ├── Domain(CoreError)    rule violated, nothing written
//! └── Storage(DbError)     SQLite failed; the transaction was rolled back
//! ```

use shoebox_core::{CoreError, ValidationError};
use shoebox_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Domain(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Storage(DbError::from(err))
    }
}

impl EngineError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::Domain(CoreError::not_found(entity, id))
    }

    /// The domain error, if this is one.
    pub fn as_domain(&self) -> Option<&CoreError> {
        match self {
            EngineError::Domain(err) => Some(err),
            EngineError::Storage(_) => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
