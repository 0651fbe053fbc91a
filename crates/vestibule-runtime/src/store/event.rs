//! Store change notifications and bootstrap phase.

use vestibule_types::Role;

/// The resolution state of the session bootstrap.
///
/// The identity provider is queried asynchronously at startup; until it
/// answers, the client does not know whether anyone is signed in. The
/// guard defers every navigation decision while the phase is
/// unresolved.
///
/// # States
///
/// | Phase | Meaning | Guard behavior |
/// |-------|---------|----------------|
/// | `Pending` | First fetch not yet answered | Defer |
/// | `Ready` | Provider answered (signed in or out) | Decide |
/// | `Failed` | Last fetch failed; retry scheduled | Defer + banner |
///
/// `Failed` is not terminal: the bootstrap loop keeps retrying with
/// backoff, and the phase flips to `Ready` on the first success. The
/// app never hard-fails on an unreachable provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    /// The provider has not answered yet.
    Pending,

    /// The provider answered; session state is authoritative.
    Ready,

    /// The last fetch failed; a retry is scheduled.
    Failed {
        /// Number of consecutive failed attempts so far.
        attempts: u32,
    },
}

impl BootstrapPhase {
    /// Returns `true` once the provider has answered.
    ///
    /// `Failed` is unresolved: the session state is still unknown, only
    /// the reason differs.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns `true` if the last bootstrap attempt failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A change notification from the [`SessionStore`](super::SessionStore).
///
/// Broadcast synchronously after the internal state mutation. Multiple
/// listeners are allowed; no ordering guarantee between listeners.
///
/// # Kinds
///
/// | Kind | Emitted when |
/// |------|--------------|
/// | `BootstrapResolved` | The provider answered for the first time |
/// | `BootstrapFailed` | A bootstrap attempt failed (retry pending) |
/// | `SignedIn` | A provider session was applied |
/// | `RoleChanged` | A role write persisted and was applied |
/// | `Cleared` | Sign-out or provider-reported expiry |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The provider answered for the first time; session state is now
    /// authoritative (possibly signed out).
    BootstrapResolved,

    /// A bootstrap attempt failed; the retry loop is still running.
    ///
    /// UI surfaces this as a persistent, non-blocking banner.
    BootstrapFailed {
        /// Consecutive failed attempts so far.
        attempts: u32,
    },

    /// A signed-in provider session was applied to the store.
    SignedIn,

    /// A role write persisted and the session was reclassified.
    RoleChanged {
        /// The newly assigned role.
        role: Role,
    },

    /// The session was reset to signed-out.
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_is_resolved() {
        assert!(!BootstrapPhase::Pending.is_resolved());
        assert!(!BootstrapPhase::Failed { attempts: 3 }.is_resolved());
        assert!(BootstrapPhase::Ready.is_resolved());
    }

    #[test]
    fn failed_predicate() {
        assert!(BootstrapPhase::Failed { attempts: 1 }.is_failed());
        assert!(!BootstrapPhase::Pending.is_failed());
        assert!(!BootstrapPhase::Ready.is_failed());
    }

    #[test]
    fn events_compare_by_payload() {
        assert_eq!(
            SessionEvent::RoleChanged { role: Role::Recruiter },
            SessionEvent::RoleChanged { role: Role::Recruiter }
        );
        assert_ne!(
            SessionEvent::RoleChanged { role: Role::Recruiter },
            SessionEvent::RoleChanged { role: Role::Candidate }
        );
    }
}
