//! Session store - the single source of truth for auth state.
//!
//! [`SessionStore`] owns the current [`Session`] and the
//! [`BootstrapPhase`], and is the only place either is mutated. It is
//! explicitly constructed and passed by `Arc` — single instance per
//! process by convention, not by hidden global.
//!
//! # Write Paths
//!
//! | Caller | Method | Effect |
//! |--------|--------|--------|
//! | Bootstrap loop | [`apply_provider_session`](SessionStore::apply_provider_session) | Resolves bootstrap, installs session |
//! | Bootstrap loop | [`mark_bootstrap_failed`](SessionStore::mark_bootstrap_failed) | Raises the retry banner |
//! | Role selection | [`set_role`](SessionStore::set_role) | Persists + applies a role claim |
//! | Sign-out / expiry | [`clear`](SessionStore::clear) | Resets to signed-out |
//!
//! # Single-Flight `set_role`
//!
//! At most one role write may be in flight. A second call while one is
//! pending is rejected with [`PersistError::Busy`] — never queued,
//! never raced. If the store is cleared while a write is in flight, the
//! write's result is discarded ([`PersistError::Discarded`]): the
//! network call is not cancelled, but a stale session is never
//! resurrected.
//!
//! # Notification
//!
//! Listeners subscribe through a broadcast channel and are notified
//! synchronously after each internal mutation. There is no ordering
//! guarantee between listeners.

mod event;

pub use event::{BootstrapPhase, SessionEvent};

use crate::error::PersistError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use vestibule_auth::{resolve_role, IdentityProvider, MetadataPatch, ProviderSession, Session};
use vestibule_types::Role;

/// Broadcast capacity for session events.
///
/// Session transitions are rare (bootstrap, sign-in, role change,
/// sign-out); a lagging receiver at this capacity is a stuck consumer,
/// not a burst.
const EVENT_CAPACITY: usize = 64;

/// Internal mutable state, guarded by one lock.
#[derive(Debug, Clone)]
struct StoreState {
    bootstrap: BootstrapPhase,
    session: Session,
}

/// Resets the in-flight flag when a `set_role` call leaves scope.
struct InflightGuard<'a>(&'a AtomicBool);

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Single source of truth for authentication state.
///
/// # Thread Safety
///
/// All reads and mutations are synchronous under one `RwLock`; locks
/// are never held across an await point. The store is `Send + Sync`
/// and shared by `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vestibule_auth::testing::StaticProvider;
/// use vestibule_runtime::store::{BootstrapPhase, SessionStore};
///
/// let provider = Arc::new(StaticProvider::signed_out());
/// let store = SessionStore::new(provider);
///
/// // Before bootstrap resolves, session state is unknown
/// assert_eq!(store.bootstrap_phase(), BootstrapPhase::Pending);
/// assert!(!store.current().is_signed_in());
/// ```
pub struct SessionStore<P> {
    provider: Arc<P>,
    state: RwLock<StoreState>,
    events: broadcast::Sender<SessionEvent>,
    set_role_inflight: AtomicBool,
    /// Bumped on every transition to signed-out. An in-flight
    /// `set_role` compares epochs before applying its result.
    clear_epoch: AtomicU64,
}

impl<P: IdentityProvider> std::fmt::Debug for SessionStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.current())
            .field("bootstrap", &self.bootstrap_phase())
            .finish_non_exhaustive()
    }
}

impl<P: IdentityProvider> SessionStore<P> {
    /// Creates a store in the `Pending` bootstrap phase with a
    /// signed-out session.
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider,
            state: RwLock::new(StoreState {
                bootstrap: BootstrapPhase::Pending,
                session: Session::signed_out(),
            }),
            events,
            set_role_inflight: AtomicBool::new(false),
            clear_epoch: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current session. Never blocks on I/O.
    #[must_use]
    pub fn current(&self) -> Session {
        match self.state.read() {
            Ok(state) => state.session.clone(),
            Err(e) => {
                tracing::error!("session store lock poisoned on read: {e}");
                Session::signed_out()
            }
        }
    }

    /// Returns the current bootstrap phase.
    #[must_use]
    pub fn bootstrap_phase(&self) -> BootstrapPhase {
        match self.state.read() {
            Ok(state) => state.bootstrap,
            Err(e) => {
                tracing::error!("session store lock poisoned on read: {e}");
                BootstrapPhase::Pending
            }
        }
    }

    /// Registers a listener for state transitions.
    ///
    /// Each receiver sees every event sent after subscription. Dropping
    /// the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Applies a provider-reported session, resolving bootstrap.
    ///
    /// `None` means the provider answered and nobody is signed in. A
    /// transition from signed-in to signed-out (provider-reported
    /// expiry) behaves as a [`clear`](Self::clear): the epoch is bumped
    /// so any in-flight role write is discarded.
    pub fn apply_provider_session(&self, provider_session: Option<ProviderSession>) {
        let (first_resolve, was_signed_in, now_signed_in) = {
            let mut state = match self.state.write() {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!("session store lock poisoned on apply: {e}");
                    return;
                }
            };
            let first_resolve = !state.bootstrap.is_resolved();
            let was_signed_in = state.session.is_signed_in();
            state.bootstrap = BootstrapPhase::Ready;

            let now_signed_in = match provider_session {
                Some(ps) => {
                    let role = resolve_role(&ps.claims);
                    let mut session = Session::signed_in(ps.user_id, ps.display_name, role);
                    if let Some(expires_at) = ps.expires_at {
                        session = session.with_expiry(expires_at);
                    }
                    tracing::info!(session = %session, "provider session applied");
                    state.session = session;
                    true
                }
                None => {
                    state.session = Session::signed_out();
                    false
                }
            };

            if was_signed_in && !now_signed_in {
                // Expiry while a role write is pending must not
                // resurrect the old session.
                self.clear_epoch.fetch_add(1, Ordering::SeqCst);
            }

            (first_resolve, was_signed_in, now_signed_in)
        };

        if first_resolve {
            self.notify(SessionEvent::BootstrapResolved);
        }
        if now_signed_in {
            self.notify(SessionEvent::SignedIn);
        } else if was_signed_in {
            self.notify(SessionEvent::Cleared);
        }
    }

    /// Records a failed bootstrap attempt.
    ///
    /// No-op once bootstrap has resolved: a late failure from a stale
    /// attempt must not regress a `Ready` store.
    pub fn mark_bootstrap_failed(&self, attempts: u32) {
        {
            let mut state = match self.state.write() {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!("session store lock poisoned on bootstrap failure: {e}");
                    return;
                }
            };
            if state.bootstrap.is_resolved() {
                return;
            }
            state.bootstrap = BootstrapPhase::Failed { attempts };
        }
        tracing::warn!(attempts, "bootstrap attempt failed, retry pending");
        self.notify(SessionEvent::BootstrapFailed { attempts });
    }

    /// Persists a role claim and reclassifies the session.
    ///
    /// Single-flight: at most one call may be in flight; concurrent
    /// callers observe [`PersistError::Busy`]. On provider failure the
    /// session is left unchanged and the error is returned — never a
    /// silent partial update. If the store was cleared while the write
    /// was in flight, the result is discarded.
    ///
    /// # Errors
    ///
    /// - [`PersistError::InvalidRole`] — `role` is not assignable
    /// - [`PersistError::NotSignedIn`] — no authenticated user
    /// - [`PersistError::Busy`] — another write is in flight
    /// - [`PersistError::Provider`] — the provider rejected the write
    /// - [`PersistError::Discarded`] — cleared while in flight
    pub async fn set_role(&self, role: Role) -> Result<(), PersistError> {
        if !role.is_assigned() {
            return Err(PersistError::InvalidRole(role));
        }
        if !self.current().is_signed_in() {
            return Err(PersistError::NotSignedIn);
        }

        if self
            .set_role_inflight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(%role, "role write already in flight");
            return Err(PersistError::Busy);
        }
        let _inflight = InflightGuard(&self.set_role_inflight);
        let epoch = self.clear_epoch.load(Ordering::SeqCst);

        self.provider
            .update_metadata(MetadataPatch::role(role))
            .await
            .map_err(|e| {
                tracing::warn!(%role, error = %e, "role write rejected by provider");
                PersistError::Provider(e)
            })?;

        {
            let mut state = match self.state.write() {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!("session store lock poisoned on role apply: {e}");
                    return Err(PersistError::Discarded);
                }
            };
            // clear() bumps the epoch under this same lock, so the
            // check and the apply are atomic with respect to sign-out.
            if self.clear_epoch.load(Ordering::SeqCst) != epoch {
                tracing::warn!(%role, "store cleared while role write in flight, discarding");
                return Err(PersistError::Discarded);
            }
            state.session = state.session.with_role(role);
        }

        tracing::info!(%role, "role persisted and applied");
        self.notify(SessionEvent::RoleChanged { role });
        Ok(())
    }

    /// Resets to the signed-out state and notifies listeners.
    ///
    /// Bootstrap stays resolved: "signed out" is an answered state, not
    /// an unknown one.
    pub fn clear(&self) {
        {
            let mut state = match self.state.write() {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!("session store lock poisoned on clear: {e}");
                    return;
                }
            };
            state.session = Session::signed_out();
            state.bootstrap = BootstrapPhase::Ready;
            self.clear_epoch.fetch_add(1, Ordering::SeqCst);
        }
        tracing::info!("session cleared");
        self.notify(SessionEvent::Cleared);
    }

    /// Returns the identity provider this store persists through.
    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    fn notify(&self, event: SessionEvent) {
        // send() only fails when no receiver exists, which is fine —
        // the store does not require listeners.
        let receivers = self.events.send(event.clone()).unwrap_or(0);
        tracing::debug!(?event, receivers, "session event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vestibule_auth::testing::StaticProvider;
    use vestibule_auth::ProviderError;

    fn store_with(provider: StaticProvider) -> SessionStore<StaticProvider> {
        SessionStore::new(Arc::new(provider))
    }

    #[test]
    fn starts_pending_and_signed_out() {
        let store = store_with(StaticProvider::signed_out());
        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Pending);
        assert!(!store.current().is_signed_in());
    }

    #[test]
    fn apply_resolves_bootstrap_and_signs_in() {
        let store = store_with(StaticProvider::signed_out());
        let mut rx = store.subscribe();

        let ps = vestibule_auth::ProviderSession::new(
            vestibule_types::UserId::new(),
            "Dana Reyes",
            vestibule_auth::Claims::with_user_type("recruiter"),
        );
        store.apply_provider_session(Some(ps));

        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Ready);
        let session = store.current();
        assert!(session.is_signed_in());
        assert_eq!(session.role(), Role::Recruiter);

        assert_eq!(rx.try_recv(), Ok(SessionEvent::BootstrapResolved));
        assert_eq!(rx.try_recv(), Ok(SessionEvent::SignedIn));
    }

    #[test]
    fn apply_none_resolves_to_signed_out() {
        let store = store_with(StaticProvider::signed_out());
        let mut rx = store.subscribe();

        store.apply_provider_session(None);

        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Ready);
        assert!(!store.current().is_signed_in());
        assert_eq!(rx.try_recv(), Ok(SessionEvent::BootstrapResolved));
        // No SignedIn, no Cleared: nothing was signed in before.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn bootstrap_failure_raises_banner_until_resolved() {
        let store = store_with(StaticProvider::signed_out());
        let mut rx = store.subscribe();

        store.mark_bootstrap_failed(1);
        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Failed { attempts: 1 });
        assert_eq!(rx.try_recv(), Ok(SessionEvent::BootstrapFailed { attempts: 1 }));

        store.apply_provider_session(None);
        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Ready);

        // A stale failure after resolution must not regress the phase.
        store.mark_bootstrap_failed(2);
        assert_eq!(store.bootstrap_phase(), BootstrapPhase::Ready);
    }

    #[tokio::test]
    async fn set_role_persists_and_notifies() {
        let provider = StaticProvider::signed_in(Role::Unknown);
        let store = store_with(provider);
        store.apply_provider_session(
            store
                .provider()
                .fetch_session()
                .await
                .expect("test provider fetch"),
        );
        let mut rx = store.subscribe();

        store
            .set_role(Role::Candidate)
            .await
            .expect("role write should succeed");

        assert_eq!(store.current().role(), Role::Candidate);
        assert_eq!(
            rx.try_recv(),
            Ok(SessionEvent::RoleChanged { role: Role::Candidate })
        );
        assert_eq!(store.provider().update_call_count(), 1);
    }

    #[tokio::test]
    async fn set_role_rejects_unknown() {
        let store = store_with(StaticProvider::signed_in(Role::Unknown));
        let err = store
            .set_role(Role::Unknown)
            .await
            .expect_err("unknown role must be rejected");
        assert!(matches!(err, PersistError::InvalidRole(Role::Unknown)));
    }

    #[tokio::test]
    async fn set_role_requires_signed_in() {
        let store = store_with(StaticProvider::signed_out());
        store.apply_provider_session(None);

        let err = store
            .set_role(Role::Recruiter)
            .await
            .expect_err("signed-out store must reject role writes");
        assert!(matches!(err, PersistError::NotSignedIn));
        assert_eq!(store.provider().update_call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_leaves_state_unchanged() {
        let provider = StaticProvider::signed_in(Role::Unknown).fail_first_updates(1);
        let store = store_with(provider);
        store.apply_provider_session(
            store
                .provider()
                .fetch_session()
                .await
                .expect("test provider fetch"),
        );

        let err = store
            .set_role(Role::Recruiter)
            .await
            .expect_err("scripted failure");
        assert!(matches!(
            err,
            PersistError::Provider(ProviderError::Http { status: 500 })
        ));
        assert_eq!(store.current().role(), Role::Unknown);

        // The flight guard released: a retry goes through.
        store
            .set_role(Role::Recruiter)
            .await
            .expect("retry should succeed");
        assert_eq!(store.current().role(), Role::Recruiter);
    }

    #[tokio::test]
    async fn concurrent_set_role_is_single_flight() {
        let provider =
            StaticProvider::signed_in(Role::Unknown).with_latency(Duration::from_millis(50));
        let store = Arc::new(store_with(provider));
        store.apply_provider_session(
            store
                .provider()
                .fetch_session()
                .await
                .expect("test provider fetch"),
        );

        let (first, second) = tokio::join!(
            store.set_role(Role::Recruiter),
            async {
                // Let the first call win the flight slot.
                tokio::time::sleep(Duration::from_millis(10)).await;
                store.set_role(Role::Candidate).await
            }
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(PersistError::Busy)));
        // Exactly one network write reached the provider.
        assert_eq!(store.provider().update_call_count(), 1);
        assert_eq!(store.current().role(), Role::Recruiter);
    }

    #[tokio::test]
    async fn clear_during_flight_discards_result() {
        let provider =
            StaticProvider::signed_in(Role::Unknown).with_latency(Duration::from_millis(50));
        let store = Arc::new(store_with(provider));
        store.apply_provider_session(
            store
                .provider()
                .fetch_session()
                .await
                .expect("test provider fetch"),
        );

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.set_role(Role::Recruiter).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.clear();

        let result = writer.await.expect("writer task should not panic");
        assert!(matches!(result, Err(PersistError::Discarded)));

        // The network write happened; the session was not resurrected.
        assert_eq!(store.provider().update_call_count(), 1);
        assert!(!store.current().is_signed_in());
        assert_eq!(store.current().role(), Role::Unknown);
    }

    #[test]
    fn expiry_bumps_epoch_and_emits_cleared() {
        let store = store_with(StaticProvider::signed_out());
        let ps = vestibule_auth::ProviderSession::new(
            vestibule_types::UserId::new(),
            "Dana",
            vestibule_auth::Claims::with_user_type("candidate"),
        );
        store.apply_provider_session(Some(ps));
        let mut rx = store.subscribe();

        // Provider reports the session expired.
        store.apply_provider_session(None);

        assert!(!store.current().is_signed_in());
        assert_eq!(rx.try_recv(), Ok(SessionEvent::Cleared));
    }
}
