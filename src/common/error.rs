use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Email or phone already registered")]
    DuplicateUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Import failed: {message}")]
    ImportFailed { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
