//! Navigation controller - route table ownership and side effects.
//!
//! The [`NavigationController`] intercepts navigation, applies guard
//! decisions, and performs the side-effecting transitions the pure
//! guard cannot: committing renders, replacing history, signing out.
//!
//! # State Machine
//!
//! ```text
//!                  ┌───────────────┐
//!                  │ Bootstrapping │
//!                  └───────┬───────┘
//!          provider resolves│
//!         ┌────────────────┼─────────────────────┐
//!         ▼                ▼                      ▼
//!  ┌───────────┐  ┌─────────────────────┐  ┌────────────────┐
//!  │ SignedOut │  │ SignedInUnknownRole │  │ SignedInRouted │
//!  └─────┬─────┘  └──────────┬──────────┘  └───────┬────────┘
//!        │                   │ role selection      │
//!        │                   └────────────────────►│
//!        │◄───────────────── sign_out() ───────────┘
//! ```
//!
//! No terminal state: the router lives as long as the client process.
//!
//! # History Semantics
//!
//! A path blocked by the guard never enters history — the redirect
//! target is committed in its place, so the back button cannot
//! resurrect a blocked page.

use super::guard::{decide, Decision, GuardPaths, NavigationIntent};
use super::route::{RoutePath, RouteTable, ViewRef};
use crate::store::SessionStore;
use std::sync::Arc;
use vestibule_auth::IdentityProvider;

/// Bound on alias/guard redirect chains.
///
/// The longest legitimate chain in the platform table is three hops
/// (`/` → `/dashboard` → `/select-role`); anything deeper than this
/// bound is a mis-built table.
const MAX_REDIRECTS: usize = 8;

/// Derived machine state of the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// Session bootstrap has not resolved; all navigation defers.
    Bootstrapping,

    /// Provider answered: nobody is signed in.
    SignedOut,

    /// Signed in, role unclassified; only the repair flow renders.
    SignedInUnknownRole,

    /// Signed in with an assigned role.
    SignedInRouted,
}

/// The committed result of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The target was allowed and its view is mounted.
    Rendered {
        /// The committed path.
        path: RoutePath,
        /// The mounted view.
        view: ViewRef,
    },

    /// The target was blocked; the redirect target is mounted in its
    /// place (history replaced, not appended).
    Redirected {
        /// The originally requested path (not in history).
        from: RoutePath,
        /// The committed path.
        to: RoutePath,
        /// The mounted view.
        view: ViewRef,
    },

    /// Bootstrap is unresolved; a neutral loading state is shown and
    /// the target is re-evaluated when the store notifies.
    Deferred {
        /// The requested path, kept pending.
        path: RoutePath,
    },
}

impl NavOutcome {
    /// Returns the mounted view, if navigation committed.
    #[must_use]
    pub fn view(&self) -> Option<ViewRef> {
        match self {
            Self::Rendered { view, .. } | Self::Redirected { view, .. } => Some(*view),
            Self::Deferred { .. } => None,
        }
    }

    /// Returns the committed path, if navigation committed.
    #[must_use]
    pub fn path(&self) -> Option<&RoutePath> {
        match self {
            Self::Rendered { path, .. } => Some(path),
            Self::Redirected { to, .. } => Some(to),
            Self::Deferred { .. } => None,
        }
    }
}

/// Owns the route table; intercepts navigation; applies guard
/// decisions.
///
/// The store is injected by `Arc` — the controller holds a reference to
/// the process-wide instance, never a global.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vestibule_auth::testing::StaticProvider;
/// use vestibule_runtime::router::{NavOutcome, NavigationController, RouteTable};
/// use vestibule_runtime::store::SessionStore;
///
/// let store = Arc::new(SessionStore::new(Arc::new(StaticProvider::signed_out())));
/// let mut controller =
///     NavigationController::new(Arc::clone(&store), RouteTable::interview_platform());
///
/// // Nothing resolves before bootstrap.
/// let outcome = controller.handle_navigate("/recruiter/dashboard");
/// assert!(matches!(outcome, NavOutcome::Deferred { .. }));
/// ```
pub struct NavigationController<P> {
    store: Arc<SessionStore<P>>,
    table: RouteTable,
    paths: GuardPaths,
    history: Vec<RoutePath>,
    current_view: Option<ViewRef>,
    /// Target of a deferred navigation, re-evaluated on store events.
    pending: Option<RoutePath>,
}

impl<P: IdentityProvider> NavigationController<P> {
    /// Creates a controller with the default guard paths.
    #[must_use]
    pub fn new(store: Arc<SessionStore<P>>, table: RouteTable) -> Self {
        Self {
            store,
            table,
            paths: GuardPaths::default(),
            history: Vec::new(),
            current_view: None,
            pending: None,
        }
    }

    /// Overrides the guard redirect paths.
    #[must_use]
    pub fn with_paths(mut self, paths: GuardPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Evaluates the guard for `path` and commits the outcome.
    ///
    /// - `Allow` commits the render and appends to history
    /// - `RedirectTo` re-evaluates against the redirect target; the
    ///   blocked path never enters history
    /// - `Defer` shows the loading state, leaves history untouched, and
    ///   keeps the target pending for [`revalidate`](Self::revalidate)
    pub fn handle_navigate(&mut self, path: impl Into<RoutePath>) -> NavOutcome {
        let from = path.into();
        let mut target = from.clone();
        let mut hops = 0usize;

        loop {
            let intent = NavigationIntent {
                target: target.clone(),
                session: self.store.current(),
                bootstrap: self.store.bootstrap_phase(),
            };
            match decide(&intent, &self.table, &self.paths) {
                Decision::Defer => {
                    self.current_view = None;
                    self.pending = Some(target.clone());
                    return NavOutcome::Deferred { path: target };
                }
                Decision::Allow(view) => {
                    self.pending = None;
                    self.commit(target.clone(), view);
                    return if hops == 0 {
                        NavOutcome::Rendered { path: target, view }
                    } else {
                        NavOutcome::Redirected {
                            from,
                            to: target,
                            view,
                        }
                    };
                }
                Decision::RedirectTo(to) => {
                    hops += 1;
                    if hops > MAX_REDIRECTS {
                        tracing::error!(
                            from = %from,
                            at = %target,
                            "redirect chain exceeded bound, rendering not-found"
                        );
                        self.pending = None;
                        let view = self.table.not_found();
                        self.commit(target.clone(), view);
                        return NavOutcome::Redirected {
                            from,
                            to: target,
                            view,
                        };
                    }
                    target = to;
                }
            }
        }
    }

    /// Re-runs the guard for the pending or current location.
    ///
    /// Called on every session event; returns `None` when there is
    /// nothing to re-evaluate (no navigation has happened yet).
    pub fn revalidate(&mut self) -> Option<NavOutcome> {
        let target = self
            .pending
            .clone()
            .or_else(|| self.history.last().cloned())?;
        Some(self.handle_navigate(target))
    }

    /// Clears the session, then redirects to sign-in.
    ///
    /// Ordering is clear-before-redirect: the protected view is
    /// unmounted in the same synchronous call that clears the store, so
    /// no stale protected content can render in between.
    pub fn sign_out(&mut self) -> NavOutcome {
        self.store.clear();
        self.current_view = None;
        tracing::info!("signed out, navigating to sign-in");
        let sign_in = self.paths.sign_in.clone();
        self.handle_navigate(sign_in)
    }

    /// Returns the derived machine state.
    #[must_use]
    pub fn state(&self) -> RouterState {
        if !self.store.bootstrap_phase().is_resolved() {
            return RouterState::Bootstrapping;
        }
        let session = self.store.current();
        if !session.is_signed_in() {
            RouterState::SignedOut
        } else if !session.role().is_assigned() {
            RouterState::SignedInUnknownRole
        } else {
            RouterState::SignedInRouted
        }
    }

    /// Returns the currently mounted view, if any.
    #[must_use]
    pub fn current_view(&self) -> Option<ViewRef> {
        self.current_view
    }

    /// Returns the current committed path, if any.
    #[must_use]
    pub fn current_path(&self) -> Option<&RoutePath> {
        self.history.last()
    }

    /// Returns the committed history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoutePath] {
        &self.history
    }

    /// Returns the route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    fn commit(&mut self, path: RoutePath, view: ViewRef) {
        self.current_view = Some(view);
        // Re-navigating to the current location must not grow history.
        if self.history.last() != Some(&path) {
            self.history.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::route::views;
    use vestibule_auth::testing::StaticProvider;
    use vestibule_auth::{Claims, ProviderSession};
    use vestibule_types::{Role, UserId};

    fn controller_for(
        provider: StaticProvider,
    ) -> (
        Arc<SessionStore<StaticProvider>>,
        NavigationController<StaticProvider>,
    ) {
        let store = Arc::new(SessionStore::new(Arc::new(provider)));
        let controller =
            NavigationController::new(Arc::clone(&store), RouteTable::interview_platform());
        (store, controller)
    }

    fn resolve_signed_in(store: &SessionStore<StaticProvider>, role: Role) {
        let claims = if role.is_assigned() {
            Claims::with_user_type(role.as_str())
        } else {
            Claims::empty()
        };
        store.apply_provider_session(Some(ProviderSession::new(
            UserId::new(),
            "Dana Reyes",
            claims,
        )));
    }

    #[test]
    fn defers_until_bootstrap_then_revalidates() {
        let (store, mut controller) = controller_for(StaticProvider::signed_out());

        let outcome = controller.handle_navigate("/candidate/dashboard");
        assert!(matches!(outcome, NavOutcome::Deferred { .. }));
        assert_eq!(controller.state(), RouterState::Bootstrapping);
        assert!(controller.current_view().is_none());
        assert!(controller.history().is_empty());

        resolve_signed_in(&store, Role::Candidate);

        let outcome = controller.revalidate().expect("pending navigation");
        assert_eq!(
            outcome,
            NavOutcome::Rendered {
                path: RoutePath::new("/candidate/dashboard"),
                view: views::CANDIDATE_DASHBOARD,
            }
        );
        assert_eq!(controller.state(), RouterState::SignedInRouted);
    }

    #[test]
    fn signed_out_navigation_commits_sign_in_only() {
        let (store, mut controller) = controller_for(StaticProvider::signed_out());
        store.apply_provider_session(None);

        let outcome = controller.handle_navigate("/recruiter/dashboard");
        assert_eq!(
            outcome,
            NavOutcome::Redirected {
                from: RoutePath::new("/recruiter/dashboard"),
                to: RoutePath::new("/sign-in"),
                view: views::SIGN_IN,
            }
        );

        // The blocked page never entered history.
        assert_eq!(controller.history(), &[RoutePath::new("/sign-in")]);
        assert_eq!(controller.state(), RouterState::SignedOut);
    }

    #[test]
    fn root_alias_chains_to_role_selection_for_unclassified() {
        let (store, mut controller) = controller_for(StaticProvider::signed_in(Role::Unknown));
        resolve_signed_in(&store, Role::Unknown);

        // "/" → "/dashboard" → "/select-role"
        let outcome = controller.handle_navigate("/");
        assert_eq!(
            outcome,
            NavOutcome::Redirected {
                from: RoutePath::new("/"),
                to: RoutePath::new("/select-role"),
                view: views::ROLE_SELECTION,
            }
        );
        assert_eq!(controller.state(), RouterState::SignedInUnknownRole);
    }

    #[test]
    fn navigation_is_idempotent_under_unchanged_state() {
        let (store, mut controller) = controller_for(StaticProvider::signed_in(Role::Recruiter));
        resolve_signed_in(&store, Role::Recruiter);

        let first = controller.handle_navigate("/recruiter/templates");
        let second = controller.handle_navigate("/recruiter/templates");
        assert_eq!(first, second);
        assert_eq!(controller.history(), &[RoutePath::new("/recruiter/templates")]);
    }

    #[test]
    fn mismatched_role_is_redirected_to_selection() {
        let (store, mut controller) = controller_for(StaticProvider::signed_in(Role::Candidate));
        resolve_signed_in(&store, Role::Candidate);

        let outcome = controller.handle_navigate("/recruiter/dashboard");
        assert_eq!(
            outcome,
            NavOutcome::Redirected {
                from: RoutePath::new("/recruiter/dashboard"),
                to: RoutePath::new("/select-role"),
                view: views::ROLE_SELECTION,
            }
        );
    }

    #[test]
    fn sign_out_clears_before_redirecting() {
        let (store, mut controller) = controller_for(StaticProvider::signed_in(Role::Candidate));
        resolve_signed_in(&store, Role::Candidate);
        controller.handle_navigate("/candidate/dashboard");
        assert_eq!(controller.current_view(), Some(views::CANDIDATE_DASHBOARD));

        let outcome = controller.sign_out();

        // Cleared, then redirected; the sign-in view is mounted and no
        // protected view survived.
        assert!(!store.current().is_signed_in());
        assert_eq!(
            outcome,
            NavOutcome::Rendered {
                path: RoutePath::new("/sign-in"),
                view: views::SIGN_IN,
            }
        );
        assert_eq!(controller.current_view(), Some(views::SIGN_IN));
        assert_eq!(controller.current_path(), Some(&RoutePath::new("/sign-in")));
        assert_eq!(controller.state(), RouterState::SignedOut);
    }

    #[test]
    fn revalidate_without_navigation_is_none() {
        let (_store, mut controller) = controller_for(StaticProvider::signed_out());
        assert!(controller.revalidate().is_none());
    }

    #[test]
    fn revalidate_reacts_to_role_change() {
        let (store, mut controller) = controller_for(StaticProvider::signed_in(Role::Unknown));
        resolve_signed_in(&store, Role::Unknown);

        let outcome = controller.handle_navigate("/recruiter/dashboard");
        assert_eq!(outcome.view(), Some(views::ROLE_SELECTION));

        // The repair flow assigned a role; the store now reflects it.
        resolve_signed_in(&store, Role::Recruiter);

        let outcome = controller
            .handle_navigate("/recruiter/dashboard");
        assert_eq!(outcome.view(), Some(views::RECRUITER_DASHBOARD));
        assert_eq!(controller.state(), RouterState::SignedInRouted);
    }
}
