//! Role selection - the one-screen repair flow for unclassified sessions.
//!
//! A signed-in session without a role claim is redirected here. The
//! flow validates the chosen role, persists it through the store's
//! single-flight write, and on success hands back the role's home route
//! for the controller to navigate to.
//!
//! # Retry Semantics
//!
//! Persistence failures are retryable and **user-initiated only** — the
//! underlying cause is typically a provider-side validation rule, not a
//! transient fault, so the flow never retries automatically. The last
//! failure is kept for the retry banner. A `Busy` rejection is not a
//! fault at all (the first write is still in flight) and is not
//! recorded.

use super::route::{RoutePath, RouteTable};
use crate::error::PersistError;
use crate::store::SessionStore;
use std::sync::Arc;
use vestibule_auth::IdentityProvider;
use vestibule_types::Role;

/// Interactive repair flow for `Unknown` role state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vestibule_auth::testing::StaticProvider;
/// use vestibule_auth::IdentityProvider;
/// use vestibule_runtime::router::{RoleSelection, RoutePath, RouteTable};
/// use vestibule_runtime::store::SessionStore;
/// use vestibule_types::Role;
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let provider = Arc::new(StaticProvider::signed_in(Role::Unknown));
/// let store = Arc::new(SessionStore::new(Arc::clone(&provider)));
/// store.apply_provider_session(provider.fetch_session().await.unwrap());
///
/// let mut flow = RoleSelection::new(Arc::clone(&store), RouteTable::interview_platform());
/// let home = flow.submit(Role::Recruiter).await.unwrap();
/// assert_eq!(home, RoutePath::new("/recruiter/dashboard"));
/// # });
/// ```
pub struct RoleSelection<P> {
    store: Arc<SessionStore<P>>,
    table: RouteTable,
    last_error: Option<PersistError>,
}

impl<P: IdentityProvider> RoleSelection<P> {
    /// Creates the flow over the given store and route table.
    #[must_use]
    pub fn new(store: Arc<SessionStore<P>>, table: RouteTable) -> Self {
        Self {
            store,
            table,
            last_error: None,
        }
    }

    /// Submits the user's chosen role.
    ///
    /// Validates the role, persists it via the store, and returns the
    /// role's home route for re-navigation on success.
    ///
    /// # Errors
    ///
    /// - [`PersistError::InvalidRole`] — the role is not assignable
    /// - [`PersistError::Busy`] — a previous submission is still in
    ///   flight ("already processing", not recorded as a failure)
    /// - any other [`PersistError`] — recorded in
    ///   [`last_error`](Self::last_error) for the retry banner
    pub async fn submit(&mut self, role: Role) -> Result<RoutePath, PersistError> {
        if !role.is_assigned() {
            let err = PersistError::InvalidRole(role);
            self.last_error = Some(err.clone());
            return Err(err);
        }

        match self.store.set_role(role).await {
            Ok(()) => {
                self.last_error = None;
                let home = self
                    .table
                    .home_for(role)
                    .unwrap_or_else(|| RoutePath::new("/"));
                tracing::info!(%role, home = %home, "role selected");
                Ok(home)
            }
            Err(PersistError::Busy) => {
                tracing::debug!(%role, "role submission already processing");
                Err(PersistError::Busy)
            }
            Err(err) => {
                tracing::warn!(%role, error = %err, "role submission failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Returns the last recorded failure, for the retry banner.
    #[must_use]
    pub fn last_error(&self) -> Option<&PersistError> {
        self.last_error.as_ref()
    }

    /// Clears the recorded failure (user dismissed the banner).
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
