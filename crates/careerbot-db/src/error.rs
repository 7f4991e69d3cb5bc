use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The handle is not connected. Carries the reason shown to clients.
    #[error("{0}")]
    Unavailable(String),

    #[error("user already exists with this email")]
    DuplicateEmail,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
