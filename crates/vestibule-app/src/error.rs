//! Application-level error type.
//!
//! [`AppError`] unifies all internal errors for the application layer.

use crate::config::ConfigError;
use thiserror::Error;
use vestibule_runtime::{BootstrapError, PersistError};
use vestibule_types::ErrorCode;

/// Unified application error.
///
/// Collects all internal errors into a single type for host-UI
/// handling.
///
/// # Example
///
/// ```
/// use vestibule_app::AppError;
/// use vestibule_runtime::PersistError;
///
/// // Internal errors convert automatically
/// let app_err: AppError = PersistError::Busy.into();
/// eprintln!("Error: {app_err}");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration resolution failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A role write failed.
    #[error("role persistence error: {0}")]
    Persist(#[from] PersistError),

    /// A bootstrap attempt failed.
    #[error("bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.code(),
            Self::Persist(e) => e.code(),
            Self::Bootstrap(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(e) => e.is_recoverable(),
            Self::Persist(e) => e.is_recoverable(),
            Self::Bootstrap(e) => e.is_recoverable(),
        }
    }
}
