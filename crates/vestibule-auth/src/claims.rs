//! Raw provider claims.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The metadata object key under which user-editable claims live.
pub const PUBLIC_METADATA_KEY: &str = "public_metadata";

/// The claim field carrying the functional role.
pub const USER_TYPE_CLAIM: &str = "user_type";

/// Raw claims payload from the identity provider.
///
/// The provider returns user metadata as loosely structured JSON; this
/// wrapper keeps it opaque and pushes all interpretation into
/// [`resolve_role`](crate::resolve_role), which is total over any
/// payload shape.
///
/// # Example
///
/// ```
/// use vestibule_auth::{resolve_role, Claims};
/// use vestibule_types::Role;
///
/// let claims = Claims::with_user_type("recruiter");
/// assert_eq!(resolve_role(&claims), Role::Recruiter);
///
/// // Arbitrary payloads are fine — resolution degrades, never fails
/// let claims = Claims::new(serde_json::json!({"plan": "trial"}));
/// assert_eq!(resolve_role(&claims), Role::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims(Value);

impl Claims {
    /// Wraps a raw JSON payload.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Creates an empty claims payload (no metadata at all).
    #[must_use]
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    /// Creates a payload carrying the given `user_type` claim value.
    ///
    /// Mirrors the shape the provider stores:
    /// `{ "public_metadata": { "user_type": <value> } }`.
    #[must_use]
    pub fn with_user_type(value: impl Into<String>) -> Self {
        Self(json!({
            "public_metadata": { "user_type": value.into() }
        }))
    }

    /// Returns the raw `user_type` claim value, if present.
    ///
    /// `None` covers both a missing claim and a claim of the wrong
    /// shape; the caller cannot tell the difference and should not need
    /// to.
    #[must_use]
    pub fn user_type(&self) -> Option<&str> {
        self.0
            .get(PUBLIC_METADATA_KEY)?
            .get(USER_TYPE_CLAIM)?
            .as_str()
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for Claims {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_reads_nested_claim() {
        let claims = Claims::with_user_type("candidate");
        assert_eq!(claims.user_type(), Some("candidate"));
    }

    #[test]
    fn missing_metadata_yields_none() {
        assert_eq!(Claims::empty().user_type(), None);
        assert_eq!(Claims::new(json!({})).user_type(), None);
        assert_eq!(Claims::new(json!({"public_metadata": {}})).user_type(), None);
    }

    #[test]
    fn non_string_claim_yields_none() {
        let claims = Claims::new(json!({"public_metadata": {"user_type": 7}}));
        assert_eq!(claims.user_type(), None);

        let claims = Claims::new(json!({"public_metadata": {"user_type": null}}));
        assert_eq!(claims.user_type(), None);
    }

    #[test]
    fn serde_round_trip() {
        let claims = Claims::with_user_type("recruiter");
        let text = serde_json::to_string(&claims).expect("serialize claims");
        let back: Claims = serde_json::from_str(&text).expect("deserialize claims");
        assert_eq!(claims, back);
    }
}
