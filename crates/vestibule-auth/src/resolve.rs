//! Role resolution from raw claims.
//!
//! [`resolve_role`] is the single place where provider metadata is
//! interpreted. It is a total function: any payload — missing metadata,
//! a malformed claim, a value written by some other tool — resolves to
//! [`Role::Unknown`], and the router repairs that state by asking the
//! user. Classification failure degrades, it never propagates.

use crate::Claims;
use vestibule_types::Role;

/// Derives the functional role from raw provider claims.
///
/// Reads the namespaced `public_metadata.user_type` field. Returns
/// [`Role::Unknown`] when the claim is absent, not a string, or not one
/// of the two exact claim values. Never panics, never errors.
///
/// # Example
///
/// ```
/// use vestibule_auth::{resolve_role, Claims};
/// use vestibule_types::Role;
///
/// assert_eq!(resolve_role(&Claims::with_user_type("recruiter")), Role::Recruiter);
/// assert_eq!(resolve_role(&Claims::with_user_type("intern")), Role::Unknown);
/// assert_eq!(resolve_role(&Claims::empty()), Role::Unknown);
/// ```
#[must_use]
pub fn resolve_role(claims: &Claims) -> Role {
    match claims.user_type() {
        Some(raw) => {
            let role = Role::from_claim_str(raw);
            if !role.is_assigned() {
                tracing::warn!(claim = raw, "unrecognized user_type claim, treating as unclassified");
            }
            role
        }
        None => {
            tracing::debug!("no user_type claim present, treating as unclassified");
            Role::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_both_roles() {
        assert_eq!(resolve_role(&Claims::with_user_type("recruiter")), Role::Recruiter);
        assert_eq!(resolve_role(&Claims::with_user_type("candidate")), Role::Candidate);
    }

    #[test]
    fn absent_claim_is_unknown() {
        assert_eq!(resolve_role(&Claims::empty()), Role::Unknown);
        assert_eq!(resolve_role(&Claims::new(json!({}))), Role::Unknown);
    }

    #[test]
    fn malformed_claim_is_unknown() {
        let claims = Claims::new(json!({"public_metadata": {"user_type": ["recruiter"]}}));
        assert_eq!(resolve_role(&claims), Role::Unknown);

        let claims = Claims::new(json!({"public_metadata": {"user_type": 42}}));
        assert_eq!(resolve_role(&claims), Role::Unknown);
    }

    #[test]
    fn foreign_value_is_unknown() {
        assert_eq!(resolve_role(&Claims::with_user_type("admin")), Role::Unknown);
        assert_eq!(resolve_role(&Claims::with_user_type("Recruiter")), Role::Unknown);
    }

    #[test]
    fn unknown_is_a_state_not_an_error() {
        // The whole point: no Result, no panic, just Unknown.
        let role = resolve_role(&Claims::new(json!("garbage")));
        assert!(!role.is_assigned());
    }
}
