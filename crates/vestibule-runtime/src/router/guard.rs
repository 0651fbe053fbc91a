//! Route guard - the pure navigation decision.
//!
//! [`decide`] maps one navigation attempt to exactly one [`Decision`].
//! It is total (no error state: malformed session data degrades to a
//! redirect), pure (no side effects), and idempotent (re-running it
//! against unchanged state yields the same decision).
//!
//! # Decision Rules
//!
//! Evaluated in order, first match wins:
//!
//! 1. Bootstrap unresolved → `Defer`
//! 2. Signed out → `RedirectTo(sign_in)`, except within the sign-in
//!    subtree itself
//! 3. Route demands a role and the session's role is `Unknown` →
//!    `RedirectTo(select_role)`
//! 4. Route demands a role and the session's role differs →
//!    `RedirectTo(select_role)` — mismatched roles are never allowed
//!    through
//! 5. Route is an alias → `RedirectTo(alias target)`
//! 6. Otherwise → `Allow`
//!
//! Unknown paths resolve to the table's not-found view for signed-in
//! users; signed-out users are redirected before lookup.

use super::route::{RouteAction, RoutePath, RouteTable, ViewRef};
use crate::store::BootstrapPhase;
use vestibule_auth::Session;

/// The outcome of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Commit the navigation and mount the view.
    Allow(ViewRef),

    /// Replace the navigation with another path.
    RedirectTo(RoutePath),

    /// Render a neutral loading state and re-evaluate once the
    /// session bootstrap resolves.
    Defer,
}

/// The well-known redirect targets the guard needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Where signed-out navigation is sent.
    pub sign_in: RoutePath,
    /// Where unclassified or mismatched navigation is sent.
    pub select_role: RoutePath,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            sign_in: RoutePath::new("/sign-in"),
            select_role: RoutePath::new("/select-role"),
        }
    }
}

/// One navigation attempt: a target plus a snapshot of session state.
///
/// Ephemeral — built per evaluation, never stored. The session snapshot
/// cannot change under the guard, which is what makes the decision
/// run-to-completion.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationIntent {
    /// Where the user is trying to go.
    pub target: RoutePath,
    /// The session at the moment of navigation.
    pub session: Session,
    /// The bootstrap phase at the moment of navigation.
    pub bootstrap: BootstrapPhase,
}

/// Decides the outcome of one navigation attempt.
///
/// See the module docs for the rule order. Total over every input —
/// there is no panic path and no error variant.
#[must_use]
pub fn decide(intent: &NavigationIntent, table: &RouteTable, paths: &GuardPaths) -> Decision {
    // Rule 1: no decision is final until the provider has answered.
    if !intent.bootstrap.is_resolved() {
        tracing::debug!(target = %intent.target, "bootstrap unresolved, deferring");
        return Decision::Defer;
    }

    // Rule 2: signed-out navigation goes to sign-in, which is the one
    // subtree reachable without a session.
    if !intent.session.is_signed_in() {
        if intent.target.is_within(&paths.sign_in) {
            let view = table
                .lookup(&intent.target)
                .and_then(|spec| match spec.action() {
                    RouteAction::Render(view) => Some(view),
                    RouteAction::Redirect(_) => None,
                })
                .unwrap_or_else(|| table.not_found());
            return Decision::Allow(view);
        }
        tracing::debug!(target = %intent.target, "signed out, redirecting to sign-in");
        return Decision::RedirectTo(paths.sign_in.clone());
    }

    let Some(spec) = table.lookup(&intent.target) else {
        tracing::debug!(target = %intent.target, "no route entry, rendering not-found");
        return Decision::Allow(table.not_found());
    };

    // Rules 3 and 4: role gating.
    if let Some(required) = spec.required_role() {
        let role = intent.session.role();
        if !role.is_assigned() {
            tracing::debug!(
                target = %intent.target,
                "session unclassified, redirecting to role selection"
            );
            return Decision::RedirectTo(paths.select_role.clone());
        }
        if role != required {
            tracing::warn!(
                target = %intent.target,
                role = %role,
                required = %required,
                "role mismatch, redirecting to role selection"
            );
            return Decision::RedirectTo(paths.select_role.clone());
        }
    }

    // Rule 5: table aliases (index routes, legacy paths).
    match spec.action() {
        RouteAction::Redirect(to) => {
            tracing::debug!(target = %intent.target, to, "route alias");
            Decision::RedirectTo(RoutePath::new(to))
        }
        RouteAction::Render(view) => {
            tracing::debug!(target = %intent.target, view = %view, "navigation allowed");
            Decision::Allow(view)
        }
    }
}
