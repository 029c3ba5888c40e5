// Storage error type
//
// DuplicateEmail is its own variant because the registration flow must be
// able to tell a unique-constraint violation apart from any other database
// failure: the former is a client error with no side effects, the latter
// triggers the rollback path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Unique email constraint violated (accounts or profile tables)
    #[error("email already in use")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Map an sqlx error, folding Postgres unique violations (23505) into
    /// DuplicateEmail so callers never have to inspect driver codes.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return StorageError::DuplicateEmail;
            }
        }
        StorageError::Database(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
