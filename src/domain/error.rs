use thiserror::Error;

use crate::domain::models::image::ImageRejection;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The batch itself is unusable (empty or oversized); nothing was processed
    #[error("{0}")]
    BatchShape(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    InvalidImage(#[from] ImageRejection),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown code: {0}")]
    UnknownCode(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("Conflict")]
    Conflict,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
