//! Role (functional user category) types.
//!
//! A [`Role`] is the functional category gating access to route
//! subtrees: recruiters build templates and review candidates,
//! candidates take interviews.
//!
//! # Design Rationale
//!
//! The platform's identity provider stores the role as a free-form
//! metadata string. Modeling it as a closed enum with an explicit
//! [`Unknown`](Role::Unknown) variant forces every call site to handle
//! the unclassified case: a freshly registered user has no role claim
//! yet, and that is a valid state the router must repair, not an error
//! it may crash on.

use serde::{Deserialize, Serialize};

/// The functional category of an authenticated user.
///
/// # Variants
///
/// | Variant | Description | Home area |
/// |---------|-------------|-----------|
/// | `Recruiter` | Builds templates, schedules and reviews candidates | `/recruiter` |
/// | `Candidate` | Takes interviews, views results | `/candidate` |
/// | `Unknown` | Authenticated but not yet classified | `/select-role` |
///
/// # Why an Explicit `Unknown`?
///
/// `Unknown` represents "authenticated but unclassified". It is a
/// first-class state — the guard redirects it to the role selection
/// flow — and never a fallback that silently grants candidate access.
///
/// # Example
///
/// ```
/// use vestibule_types::Role;
///
/// let role = Role::from_claim_str("recruiter");
/// assert_eq!(role, Role::Recruiter);
/// assert!(role.is_assigned());
///
/// // Missing or foreign claim values degrade to Unknown
/// assert_eq!(Role::from_claim_str("superuser"), Role::Unknown);
/// assert!(!Role::Unknown.is_assigned());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Recruiter: creates interview templates, schedules candidates,
    /// reviews scored responses.
    Recruiter,

    /// Candidate: takes interviews and views their results.
    Candidate,

    /// Authenticated but not yet classified.
    ///
    /// The default state for a fresh account. Navigation under this
    /// role is redirected to the role selection flow.
    #[default]
    Unknown,
}

impl Role {
    /// Returns `true` if this role is assigned (not [`Unknown`](Role::Unknown)).
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the claim string for this role.
    ///
    /// This is the exact value stored in the provider's public metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recruiter => "recruiter",
            Self::Candidate => "candidate",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a raw claim string into a role.
    ///
    /// Total: anything other than the two exact claim values maps to
    /// [`Unknown`](Role::Unknown). Matching is exact — no trimming, no
    /// case folding — because the provider stores the value verbatim
    /// and any deviation means the claim was written by something else.
    #[must_use]
    pub fn from_claim_str(value: &str) -> Self {
        match value {
            "recruiter" => Self::Recruiter,
            "candidate" => Self::Candidate,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
