//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::api::ApiError;
pub use crate::config::ConfigError;
pub use crate::screen::{FormError, ScreenError};

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Service-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Rejected screen actions
    #[error("Screen error: {0}")]
    Screen(#[from] ScreenError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<FormError> for AppError {
    fn from(error: FormError) -> Self {
        AppError::Screen(error.into())
    }
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
