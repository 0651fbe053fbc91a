//! Session bootstrap - resolving the provider session at startup.
//!
//! The identity provider is queried asynchronously when the client
//! starts. Until it answers, every navigation decision defers. The
//! [`Bootstrapper`] runs that query in a spawned task and retries with
//! capped exponential backoff until it succeeds — an unreachable
//! provider produces a persistent banner, never a hard failure.
//!
//! # Lifecycle
//!
//! ```text
//! spawn ──► fetch ──success──► apply to store ──► task exits
//!             │
//!           failure
//!             │
//!             ▼
//!     mark_bootstrap_failed ──► sleep(backoff) ──► fetch ...
//!             ▲                                      │
//!             └──────────────────────────────────────┘
//!
//! shutdown() interrupts the loop at the next await point.
//! ```

use crate::error::BootstrapError;
use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use vestibule_auth::IdentityProvider;

/// Capped exponential backoff schedule.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vestibule_runtime::bootstrap::BackoffPolicy;
///
/// let policy = BackoffPolicy::new(Duration::from_millis(500), Duration::from_secs(30), 2);
/// assert_eq!(policy.delay_for(0), Duration::from_millis(500));
/// assert_eq!(policy.delay_for(1), Duration::from_secs(1));
/// assert_eq!(policy.delay_for(10), Duration::from_secs(30)); // capped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial: Duration,
    max: Duration,
    multiplier: u32,
}

impl BackoffPolicy {
    /// Creates a policy.
    ///
    /// A `multiplier` of 0 is treated as 1 (constant delay).
    #[must_use]
    pub fn new(initial: Duration, max: Duration, multiplier: u32) -> Self {
        Self {
            initial,
            max: max.max(initial),
            multiplier: multiplier.max(1),
        }
    }

    /// Returns the delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial
            .checked_mul(factor)
            .map_or(self.max, |d| d.min(self.max))
    }
}

impl Default for BackoffPolicy {
    /// 500ms initial delay, doubling, capped at 30s.
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(30), 2)
    }
}

/// Handle to a spawned bootstrap task.
///
/// Dropping the handle does not stop the task; call
/// [`shutdown`](Self::shutdown) to interrupt it.
#[derive(Debug)]
pub struct BootstrapHandle {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl BootstrapHandle {
    /// Signals the bootstrap loop to stop at its next await point.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Signals shutdown and waits for the task to exit.
    pub async fn shutdown_and_wait(self) {
        self.shutdown();
        if let Err(e) = self.join.await {
            tracing::error!("bootstrap task panicked: {e}");
        }
    }

    /// Returns `true` once the task has exited (success or shutdown).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Runs the startup session fetch against the store's provider.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vestibule_auth::testing::StaticProvider;
/// use vestibule_runtime::bootstrap::{BackoffPolicy, Bootstrapper};
/// use vestibule_runtime::store::SessionStore;
/// use vestibule_types::Role;
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let store = Arc::new(SessionStore::new(Arc::new(
///     StaticProvider::signed_in(Role::Candidate),
/// )));
///
/// Bootstrapper::new(Arc::clone(&store))
///     .run_once()
///     .await
///     .expect("provider is reachable");
///
/// assert!(store.bootstrap_phase().is_resolved());
/// assert_eq!(store.current().role(), Role::Candidate);
/// # });
/// ```
pub struct Bootstrapper<P> {
    store: Arc<SessionStore<P>>,
    backoff: BackoffPolicy,
}

impl<P: IdentityProvider + 'static> Bootstrapper<P> {
    /// Creates a bootstrapper with the default backoff policy.
    #[must_use]
    pub fn new(store: Arc<SessionStore<P>>) -> Self {
        Self {
            store,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Overrides the backoff policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Performs a single fetch-and-apply round.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] if the provider call failed; the
    /// store is marked failed but otherwise untouched.
    pub async fn run_once(&self) -> Result<(), BootstrapError> {
        self.attempt(1).await
    }

    async fn attempt(&self, attempt: u32) -> Result<(), BootstrapError> {
        match self.store.provider().fetch_session().await {
            Ok(provider_session) => {
                tracing::debug!(
                    signed_in = provider_session.is_some(),
                    "bootstrap fetch resolved"
                );
                self.store.apply_provider_session(provider_session);
                Ok(())
            }
            Err(source) => {
                self.store.mark_bootstrap_failed(attempt);
                Err(BootstrapError::provider(attempt, source))
            }
        }
    }

    /// Spawns the retry loop on the current tokio runtime.
    ///
    /// The loop runs until the fetch succeeds or
    /// [`BootstrapHandle::shutdown`] is called. Failures are logged and
    /// surfaced through the store's `BootstrapFailed` events; the loop
    /// itself never gives up.
    #[must_use]
    pub fn spawn(self) -> BootstrapHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut attempt: u32 = 0;
            loop {
                if *shutdown_rx.borrow() {
                    tracing::debug!("bootstrap loop shut down before resolution");
                    return;
                }

                attempt += 1;
                match self.attempt(attempt).await {
                    Ok(()) => {
                        tracing::info!(attempt, "bootstrap resolved");
                        return;
                    }
                    Err(e) => {
                        let delay = self.backoff.delay_for(attempt - 1);
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "bootstrap attempt failed, backing off"
                        );
                        tokio::select! {
                            () = tokio::time::sleep(delay) => {}
                            _ = shutdown_rx.changed() => {
                                tracing::debug!("bootstrap loop shut down during backoff");
                                return;
                            }
                        }
                    }
                }
            }
        });

        BootstrapHandle { shutdown_tx, join }
    }
}
