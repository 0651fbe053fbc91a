//! Runtime error types.

use thiserror::Error;
use vestibule_auth::ProviderError;
use vestibule_types::{ErrorCode, Role};

/// Errors from [`SessionStore::set_role`](crate::store::SessionStore::set_role).
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Busy` | `STORE_SET_ROLE_BUSY` | Yes (wait for the pending write) |
/// | `NotSignedIn` | `STORE_NOT_SIGNED_IN` | No |
/// | `InvalidRole` | `STORE_INVALID_ROLE` | No |
/// | `Provider` | delegated | delegated |
/// | `Discarded` | `STORE_SET_ROLE_DISCARDED` | No |
///
/// `Busy` is surfaced to the user as "already processing" and logged at
/// debug only — a double-click, not a fault. `Discarded` means the
/// store was cleared while the write was in flight; the result was
/// dropped on purpose and retrying against a signed-out store will not
/// help.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistError {
    /// Another role write is already in flight.
    #[error("a role write is already in progress")]
    Busy,

    /// No authenticated user to write a role for.
    #[error("cannot persist a role without a signed-in session")]
    NotSignedIn,

    /// The role is not an assignable value.
    #[error("role '{0}' is not assignable")]
    InvalidRole(Role),

    /// The identity provider rejected or failed the write.
    #[error("provider rejected role write: {0}")]
    Provider(#[from] ProviderError),

    /// The store was cleared while the write was in flight; the result
    /// was discarded.
    #[error("session was cleared while the role write was in flight")]
    Discarded,
}

impl ErrorCode for PersistError {
    fn code(&self) -> &'static str {
        match self {
            Self::Busy => "STORE_SET_ROLE_BUSY",
            Self::NotSignedIn => "STORE_NOT_SIGNED_IN",
            Self::InvalidRole(_) => "STORE_INVALID_ROLE",
            Self::Provider(e) => e.code(),
            Self::Discarded => "STORE_SET_ROLE_DISCARDED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Busy => true,
            Self::NotSignedIn | Self::InvalidRole(_) | Self::Discarded => false,
            Self::Provider(e) => e.is_recoverable(),
        }
    }
}

/// A failed bootstrap attempt.
///
/// Always recoverable: the bootstrap loop retries with backoff until
/// the provider answers. The app surfaces this as a persistent,
/// non-blocking banner — never a hard failure.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The provider could not be reached or answered with an error.
    #[error("bootstrap attempt {attempt} failed: {source}")]
    Provider {
        /// Which consecutive attempt this was (1-based).
        attempt: u32,
        /// The underlying provider failure.
        #[source]
        source: ProviderError,
    },
}

impl BootstrapError {
    /// Creates a provider-failure bootstrap error.
    #[must_use]
    pub fn provider(attempt: u32, source: ProviderError) -> Self {
        Self::Provider { attempt, source }
    }
}

impl ErrorCode for BootstrapError {
    fn code(&self) -> &'static str {
        match self {
            Self::Provider { .. } => "BOOTSTRAP_PROVIDER",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}
