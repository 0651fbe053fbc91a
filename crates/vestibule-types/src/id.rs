//! Identifier types for Vestibule.
//!
//! Identifiers are UUID-based so they are safe to serialize, log, and
//! compare across process boundaries.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Vestibule namespace UUID for deterministic UUID v5 generation.
///
/// Used to derive stable [`UserId`]s from the opaque subject strings
/// the identity provider reports.
const VESTIBULE_NAMESPACE: Uuid = uuid!("6f9c2b1e-8a47-4c3d-9e15-03b7d42a9c66");

/// Identifier for an authenticated user.
///
/// # UUID Strategy
///
/// - [`UserId::from_subject`]: UUID v5, deterministic from the
///   provider's subject string. The same provider account always maps
///   to the same id, across processes and sessions.
/// - [`UserId::new`]: UUID v4, random. Used in tests and for
///   synthesized identities.
///
/// # Example
///
/// ```
/// use vestibule_types::UserId;
///
/// let a = UserId::from_subject("user_2NK9a81");
/// let b = UserId::from_subject("user_2NK9a81");
/// assert_eq!(a, b);          // Same subject, same id
///
/// let c = UserId::new();
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Creates a new [`UserId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a deterministic [`UserId`] from a provider subject string.
    ///
    /// The UUID is derived from the Vestibule namespace UUID and the
    /// subject via UUID v5 (SHA-1), so the mapping is stable without any
    /// coordination with the provider.
    ///
    /// # Example
    ///
    /// ```
    /// use vestibule_types::UserId;
    ///
    /// let id1 = UserId::from_subject("user_2NK9a81");
    /// let id2 = UserId::from_subject("user_2NK9a81");
    /// assert_eq!(id1.uuid(), id2.uuid());
    /// ```
    #[must_use]
    pub fn from_subject(subject: &str) -> Self {
        Self(Uuid::new_v5(&VESTIBULE_NAMESPACE, subject.as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}
