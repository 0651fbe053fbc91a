//! Identity provider boundary.
//!
//! The [`IdentityProvider`] trait is the narrow interface to the hosted
//! identity service. Vestibule treats the provider as opaque: it can
//! report the current session and persist a metadata patch, and its
//! failures are network-style errors. Everything else — classification,
//! gating, repair — happens on this side of the boundary.

use crate::Claims;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use vestibule_types::{ErrorCode, Role, UserId};

/// A session as reported by the identity provider.
///
/// This is the raw material the store turns into a
/// [`Session`](crate::Session): identity plus unresolved claims. Role
/// resolution happens in [`resolve_role`](crate::resolve_role), not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSession {
    /// Stable user identity.
    pub user_id: UserId,

    /// Display name for UI chrome.
    pub display_name: String,

    /// Raw metadata claims.
    pub claims: Claims,

    /// When the provider will expire this session, if it told us.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ProviderSession {
    /// Creates a provider session with the given identity and claims.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>, claims: Claims) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            claims,
            expires_at: None,
        }
    }

    /// Sets the provider-reported expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// A metadata patch persisting a role claim.
///
/// The only write Vestibule performs against the provider. Serializes
/// to the shape the provider stores:
/// `{ "public_metadata": { "user_type": "recruiter" } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataPatch {
    /// The role to persist.
    pub user_type: Role,
}

impl MetadataPatch {
    /// Creates a patch assigning the given role.
    #[must_use]
    pub fn role(user_type: Role) -> Self {
        Self { user_type }
    }

    /// Renders the patch as the provider's metadata JSON shape.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "public_metadata": { "user_type": self.user_type.as_str() }
        })
    }
}

/// Errors reported by the identity provider boundary.
///
/// All variants are network-style: the provider is a remote service and
/// fails like one.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Timeout` | `AUTH_PROVIDER_TIMEOUT` | Yes |
/// | `Http { 5xx }` | `AUTH_PROVIDER_HTTP` | Yes |
/// | `Http { 4xx }` | `AUTH_PROVIDER_HTTP` | No |
/// | `Malformed` | `AUTH_PROVIDER_MALFORMED` | No |
/// | `Unreachable` | `AUTH_PROVIDER_UNREACHABLE` | Yes |
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider did not answer in time.
    #[error("identity provider timed out")]
    Timeout,

    /// The provider answered with an error status.
    #[error("identity provider returned status {status}")]
    Http {
        /// HTTP-equivalent status code.
        status: u16,
    },

    /// The provider's payload could not be interpreted.
    #[error("malformed provider payload: {0}")]
    Malformed(String),

    /// The provider could not be reached at all.
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

impl ErrorCode for ProviderError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "AUTH_PROVIDER_TIMEOUT",
            Self::Http { .. } => "AUTH_PROVIDER_HTTP",
            Self::Malformed(_) => "AUTH_PROVIDER_MALFORMED",
            Self::Unreachable(_) => "AUTH_PROVIDER_UNREACHABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout | Self::Unreachable(_) => true,
            // Server-side failures may clear; client errors will not.
            Self::Http { status } => *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

/// The identity provider boundary.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks.
///
/// # Design Principles
///
/// - **Narrow**: one read (`fetch_session`) and one write
///   (`update_metadata`); nothing else crosses the boundary
/// - **Opaque failures**: all errors are [`ProviderError`]; the caller
///   decides between retry, banner, and user-visible message
/// - **No cancellation**: callers discard results rather than cancel
///   in-flight calls (the store's clear-epoch enforces this)
///
/// # Example
///
/// ```no_run
/// use vestibule_auth::{IdentityProvider, MetadataPatch, ProviderError};
/// use vestibule_types::Role;
///
/// async fn assign(provider: &impl IdentityProvider) -> Result<(), ProviderError> {
///     provider.update_metadata(MetadataPatch::role(Role::Recruiter)).await?;
///     Ok(())
/// }
/// ```
pub trait IdentityProvider: Send + Sync {
    /// Fetches the current session.
    ///
    /// `Ok(None)` means the provider resolved and no one is signed in —
    /// a successful bootstrap outcome, distinct from any error.
    fn fetch_session(
        &self,
    ) -> impl Future<Output = Result<Option<ProviderSession>, ProviderError>> + Send;

    /// Persists a metadata patch for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on any failure; the patch either fully
    /// applied or did not apply at all.
    fn update_metadata(
        &self,
        patch: MetadataPatch,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestibule_types::assert_error_code;

    #[test]
    fn error_codes_follow_convention() {
        assert_error_code(&ProviderError::Timeout, "AUTH_PROVIDER_");
        assert_error_code(&ProviderError::Http { status: 503 }, "AUTH_PROVIDER_");
        assert_error_code(&ProviderError::Malformed("bad json".into()), "AUTH_PROVIDER_");
        assert_error_code(&ProviderError::Unreachable("dns".into()), "AUTH_PROVIDER_");
    }

    #[test]
    fn recoverability_split_on_status() {
        assert!(ProviderError::Http { status: 500 }.is_recoverable());
        assert!(ProviderError::Http { status: 503 }.is_recoverable());
        assert!(!ProviderError::Http { status: 403 }.is_recoverable());
        assert!(!ProviderError::Http { status: 422 }.is_recoverable());
    }

    #[test]
    fn patch_renders_provider_shape() {
        let value = MetadataPatch::role(Role::Candidate).to_value();
        assert_eq!(value["public_metadata"]["user_type"], "candidate");
    }
}
