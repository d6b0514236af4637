//! # DomainError
//!
//! Centralized error handling for the posting service.
//! Business-rule conflicts are ordinary variants here; the boundary layer
//! maps each one to a status code.

use thiserror::Error;

/// The primary error type for all service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input (e.g., empty post text, short password)
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller may not perform this operation (e.g., deleting someone else's post)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (e.g., Post, User)
    #[error("{0} not found")]
    NotFound(String),

    /// Registration with an email already on file
    #[error("User already exists")]
    AccountExists,

    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Post has not yet been liked")]
    NotLiked,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Infrastructure failure. The message is for logs only.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn post_not_found() -> Self {
        Self::NotFound("Post".to_string())
    }

    /// HTTP-style status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::AccountExists
            | Self::AlreadyLiked
            | Self::NotLiked
            | Self::InvalidCredentials => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }
}

/// A specialized Result type for service logic.
pub type Result<T> = std::result::Result<T, DomainError>;
