//! Unified error interface for Vestibule.
//!
//! This module provides the [`ErrorCode`] trait for standardized
//! error handling across all Vestibule crates.
//!
//! # Design
//!
//! All Vestibule error types should implement [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: for programmatic error handling
//! - **Recoverability info**: for retry banners and user feedback
//!
//! # Example
//!
//! ```
//! use vestibule_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum RoleWriteError {
//!     Busy,
//!     ProviderDown,
//! }
//!
//! impl ErrorCode for RoleWriteError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Busy => "STORE_SET_ROLE_BUSY",
//!             Self::ProviderDown => "STORE_PROVIDER_DOWN",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy | Self::ProviderDown)
//!     }
//! }
//!
//! let err = RoleWriteError::Busy;
//! assert_eq!(err.code(), "STORE_SET_ROLE_BUSY");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface for Vestibule errors.
///
/// # Code Format
///
/// Error codes should be:
///
/// - **UPPER_SNAKE_CASE**: e.g., `"AUTH_PROVIDER_TIMEOUT"`
/// - **Namespace-prefixed**: e.g., `"STORE_"`, `"BOOTSTRAP_"`, `"APP_"`
/// - **Stable**: codes should not change once defined (API contract)
///
/// # Recoverability
///
/// An error is recoverable if retrying may succeed or the user can take
/// corrective action — a provider timeout, a duplicate in-flight write.
/// Non-recoverable errors (invalid input, discarded results) will not
/// improve on retry.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// - `true`: retry may succeed, or the user can fix it
    /// - `false`: retry will not help
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows Vestibule conventions.
///
/// # Checks
///
/// 1. Code is non-empty
/// 2. Code is UPPER_SNAKE_CASE
/// 3. Code starts with the expected prefix
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for
/// use in tests.
///
/// # Example
///
/// ```
/// use vestibule_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Timeout;
///
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "AUTH_PROVIDER_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "AUTH_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
        "error code must be UPPER_SNAKE_CASE, got: {code}"
    );
    assert!(
        code.starts_with(expected_prefix),
        "error code {code} must start with prefix {expected_prefix}"
    );
}
