//! Testing doubles for the identity provider boundary.
//!
//! Provides [`StaticProvider`] — a deterministic, in-memory
//! [`IdentityProvider`] for testing the store, bootstrap loop, and
//! router without a network.
//!
//! # Features
//!
//! - Scripted failures (fail the first N fetches/updates, then succeed)
//! - Optional artificial latency for overlap/single-flight tests
//! - Call counting and recorded role writes for assertions
//! - Successful updates are reflected in subsequent fetches
//!
//! # Example
//!
//! ```
//! use vestibule_auth::testing::StaticProvider;
//! use vestibule_auth::{IdentityProvider, MetadataPatch};
//! use vestibule_types::Role;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let provider = StaticProvider::signed_in(Role::Unknown);
//!
//! provider
//!     .update_metadata(MetadataPatch::role(Role::Recruiter))
//!     .await
//!     .expect("scripted provider should accept the write");
//!
//! assert_eq!(provider.update_call_count(), 1);
//! assert_eq!(provider.recorded_roles(), vec![Role::Recruiter]);
//! # });
//! ```

use crate::{Claims, IdentityProvider, MetadataPatch, ProviderError, ProviderSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;
use vestibule_types::{Role, UserId};

/// Subject string used for the default test identity.
const TEST_SUBJECT: &str = "user_vestibule_test";

/// Deterministic in-memory identity provider.
///
/// All interior mutability is behind std locks and atomics; locks are
/// never held across an await point, so the futures stay `Send`.
#[derive(Debug, Default)]
pub struct StaticProvider {
    /// The session `fetch_session` reports (None = signed out).
    session: RwLock<Option<ProviderSession>>,
    /// Number of fetches to fail before succeeding.
    fail_fetches: AtomicUsize,
    /// Number of updates to fail before succeeding.
    fail_updates: AtomicUsize,
    /// Artificial latency applied to every call.
    latency: Option<Duration>,
    /// Total `fetch_session` calls observed.
    fetch_calls: AtomicUsize,
    /// Total `update_metadata` calls observed.
    update_calls: AtomicUsize,
    /// Roles written by successful updates, in order.
    recorded: Mutex<Vec<Role>>,
}

impl StaticProvider {
    /// Creates a provider that reports no signed-in user.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates a provider reporting a signed-in test user with the
    /// given role claim.
    ///
    /// [`Role::Unknown`] produces a session with no `user_type` claim —
    /// the state a freshly registered account is in.
    #[must_use]
    pub fn signed_in(role: Role) -> Self {
        let claims = if role.is_assigned() {
            Claims::with_user_type(role.as_str())
        } else {
            Claims::empty()
        };
        let session =
            ProviderSession::new(UserId::from_subject(TEST_SUBJECT), "Dana Reyes", claims);
        Self {
            session: RwLock::new(Some(session)),
            ..Self::default()
        }
    }

    /// Replaces the reported session wholesale.
    #[must_use]
    pub fn with_session(self, session: ProviderSession) -> Self {
        if let Ok(mut slot) = self.session.write() {
            *slot = Some(session);
        }
        self
    }

    /// Fails the first `n` fetches with [`ProviderError::Unreachable`].
    #[must_use]
    pub fn fail_first_fetches(self, n: usize) -> Self {
        self.fail_fetches.store(n, Ordering::SeqCst);
        self
    }

    /// Fails the first `n` updates with a 500-class [`ProviderError::Http`].
    #[must_use]
    pub fn fail_first_updates(self, n: usize) -> Self {
        self.fail_updates.store(n, Ordering::SeqCst);
        self
    }

    /// Applies an artificial latency to every call.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the number of `fetch_session` calls observed.
    #[must_use]
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of `update_metadata` calls observed.
    #[must_use]
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Returns the roles written by successful updates, in order.
    #[must_use]
    pub fn recorded_roles(&self) -> Vec<Role> {
        self.recorded.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Consumes one scripted failure from `counter` if any remain.
    fn take_scripted_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn apply_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl IdentityProvider for StaticProvider {
    async fn fetch_session(&self) -> Result<Option<ProviderSession>, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_latency().await;

        if Self::take_scripted_failure(&self.fail_fetches) {
            return Err(ProviderError::Unreachable("scripted failure".into()));
        }

        match self.session.read() {
            Ok(slot) => Ok(slot.clone()),
            Err(_) => Err(ProviderError::Malformed("test provider poisoned".into())),
        }
    }

    async fn update_metadata(&self, patch: MetadataPatch) -> Result<(), ProviderError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_latency().await;

        if Self::take_scripted_failure(&self.fail_updates) {
            return Err(ProviderError::Http { status: 500 });
        }

        if let Ok(mut slot) = self.session.write() {
            if let Some(session) = slot.as_mut() {
                session.claims = Claims::with_user_type(patch.user_type.as_str());
            }
        }
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(patch.user_type);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve_role;

    #[tokio::test]
    async fn signed_out_reports_none() {
        let provider = StaticProvider::signed_out();
        let session = provider
            .fetch_session()
            .await
            .expect("fetch should succeed");
        assert!(session.is_none());
        assert_eq!(provider.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn signed_in_unknown_has_no_claim() {
        let provider = StaticProvider::signed_in(Role::Unknown);
        let session = provider
            .fetch_session()
            .await
            .expect("fetch should succeed")
            .expect("session should be present");
        assert_eq!(resolve_role(&session.claims), Role::Unknown);
    }

    #[tokio::test]
    async fn scripted_fetch_failures_then_success() {
        let provider = StaticProvider::signed_in(Role::Candidate).fail_first_fetches(2);

        assert!(provider.fetch_session().await.is_err());
        assert!(provider.fetch_session().await.is_err());
        assert!(provider.fetch_session().await.is_ok());
        assert_eq!(provider.fetch_call_count(), 3);
    }

    #[tokio::test]
    async fn update_is_reflected_in_next_fetch() {
        let provider = StaticProvider::signed_in(Role::Unknown);

        provider
            .update_metadata(MetadataPatch::role(Role::Candidate))
            .await
            .expect("update should succeed");

        let session = provider
            .fetch_session()
            .await
            .expect("fetch should succeed")
            .expect("session should be present");
        assert_eq!(resolve_role(&session.claims), Role::Candidate);
        assert_eq!(provider.recorded_roles(), vec![Role::Candidate]);
    }

    #[tokio::test]
    async fn failed_update_records_nothing() {
        let provider = StaticProvider::signed_in(Role::Unknown).fail_first_updates(1);

        let err = provider
            .update_metadata(MetadataPatch::role(Role::Recruiter))
            .await
            .expect_err("first update should fail");
        assert_eq!(err, ProviderError::Http { status: 500 });
        assert!(provider.recorded_roles().is_empty());
        assert_eq!(provider.update_call_count(), 1);
    }
}
