use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("{entity} already exists")]
    Duplicate { entity: &'static str },

    /// Cached failure of the one-shot connection attempt.
    #[error("{0}")]
    Init(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// MongoDB duplicate-key error code.
pub(crate) const DUPLICATE_KEY: i32 = 11000;

/// Map a driver error, turning duplicate-key violations into
/// [`DbError::Duplicate`].
pub(crate) fn map_write_error(err: mongodb::error::Error, entity: &'static str) -> DbError {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            DbError::Duplicate { entity }
        }
        _ => DbError::Mongo(err),
    }
}
