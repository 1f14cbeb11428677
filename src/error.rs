//! Error types for PetSpace.

use thiserror::Error;

/// Common error type for PetSpace.
///
/// The chat core itself never fails; these errors come from the
/// surrounding configuration, logging and room directory layers.
#[derive(Error, Debug)]
pub enum PetspaceError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),
}

/// Result type alias for PetSpace operations.
pub type Result<T> = std::result::Result<T, PetspaceError>;
