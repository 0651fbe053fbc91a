//! Session value type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vestibule_types::{Role, UserId};

/// The current authentication state of the client.
///
/// A `Session` is an immutable value describing who is signed in and
/// what role they carry:
///
/// - **Whether**: signed in or signed out
/// - **Who**: the [`UserId`] and display name
/// - **What**: the resolved [`Role`]
///
/// # Invariant
///
/// `!signed_in ⇒ role == Unknown ∧ user_id == None`
///
/// The constructors are the only way to build a session, so the
/// invariant holds by construction: [`Session::signed_out`] produces an
/// unclassified, anonymous session, and [`Session::signed_in`] requires
/// an identity.
///
/// # Immutability
///
/// Sessions are immutable. [`with_role`](Self::with_role) returns a new
/// session rather than mutating, so a snapshot handed to a guard
/// evaluation can never change underneath it.
///
/// # Why No Default?
///
/// **DO NOT implement `Default` for Session.**
///
/// "Signed out" and "not yet known" are different states that the
/// router treats differently (redirect vs. defer). A default would
/// silently pick one. Always construct explicitly.
///
/// # Example
///
/// ```
/// use vestibule_auth::Session;
/// use vestibule_types::{Role, UserId};
///
/// let anon = Session::signed_out();
/// assert!(!anon.is_signed_in());
/// assert_eq!(anon.role(), Role::Unknown);
///
/// let user = Session::signed_in(UserId::new(), "Dana Reyes", Role::Recruiter);
/// assert!(user.is_signed_in());
/// assert_eq!(user.role(), Role::Recruiter);
///
/// // Original session is unchanged by with_role
/// let reclassified = user.with_role(Role::Candidate);
/// assert_eq!(user.role(), Role::Recruiter);
/// assert_eq!(reclassified.role(), Role::Candidate);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Whether an authenticated user is present.
    signed_in: bool,
    /// Identity of the signed-in user, if any.
    user_id: Option<UserId>,
    /// Human-readable name for display chrome.
    display_name: String,
    /// Resolved functional role.
    role: Role,
    /// Provider-reported session expiry, if any.
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates the signed-out session.
    ///
    /// Signed-out sessions are anonymous and unclassified.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            user_id: None,
            display_name: String::new(),
            role: Role::Unknown,
            expires_at: None,
        }
    }

    /// Creates a signed-in session.
    ///
    /// `role` may be [`Role::Unknown`] — a fresh account with no role
    /// claim is signed in but unclassified, and the router repairs that
    /// through the role selection flow.
    #[must_use]
    pub fn signed_in(user_id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            signed_in: true,
            user_id: Some(user_id),
            display_name: display_name.into(),
            role,
            expires_at: None,
        }
    }

    /// Returns a copy of this session with a provider-reported expiry.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns a copy of this session with the role replaced.
    ///
    /// Has no effect on signed-out sessions: anonymity implies
    /// unclassified, and that invariant wins over the caller's role.
    #[must_use]
    pub fn with_role(&self, role: Role) -> Self {
        if !self.signed_in {
            return self.clone();
        }
        Self {
            role,
            ..self.clone()
        }
    }

    /// Returns `true` if an authenticated user is present.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Returns the signed-in user's id, or `None` when signed out.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the display name (empty when signed out).
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the resolved role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the provider-reported expiry, if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signed_in {
            match self.user_id {
                Some(id) => write!(f, "{id}@{}", self.role),
                None => write!(f, "user:?@{}", self.role),
            }
        } else {
            f.write_str("signed-out")
        }
    }
}
