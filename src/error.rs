// src/error.rs
use thiserror::Error;

/// Failures a user can cause against the directory. The messages are shown
/// to the end user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("This email is already registered")]
    DuplicateEmail,
    #[error("Incorrect email or password")]
    InvalidCredentials,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String), // from serde_json
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Directory(#[from] DirectoryError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
    #[error("{0}")]
    Validation(String),
    #[error("You need to log in first")]
    NotLoggedIn,
    #[error("CLI error: {0}")]
    Cli(String),
}

// Result type aliases for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type DirectoryResult<T> = Result<T, DirectoryError>;
