//! Integration tests for the session-routing core.
//!
//! Exercises the complete flow: bootstrap → store → guard → controller,
//! with the role selection flow repairing unclassified sessions.

use std::sync::Arc;
use std::time::Duration;
use vestibule_auth::testing::StaticProvider;
use vestibule_runtime::router::views;
use vestibule_runtime::{
    BackoffPolicy, Bootstrapper, NavOutcome, NavigationController, PersistError, Role,
    RoleSelection, RoutePath, RouteTable, RouterState, SessionEvent, SessionStore,
};

struct Harness {
    provider: Arc<StaticProvider>,
    store: Arc<SessionStore<StaticProvider>>,
    controller: NavigationController<StaticProvider>,
}

impl Harness {
    fn new(provider: StaticProvider) -> Self {
        let provider = Arc::new(provider);
        let store = Arc::new(SessionStore::new(Arc::clone(&provider)));
        let controller =
            NavigationController::new(Arc::clone(&store), RouteTable::interview_platform());
        Self {
            provider,
            store,
            controller,
        }
    }

    async fn bootstrapped(provider: StaticProvider) -> Self {
        let harness = Self::new(provider);
        Bootstrapper::new(Arc::clone(&harness.store))
            .run_once()
            .await
            .expect("test provider should be reachable");
        harness
    }
}

/// Every route defers until the provider answers, then resolves.
#[tokio::test]
async fn bootstrap_gates_all_navigation() {
    let mut harness = Harness::new(StaticProvider::signed_in(Role::Recruiter));

    let outcome = harness.controller.handle_navigate("/recruiter/dashboard");
    assert!(matches!(outcome, NavOutcome::Deferred { .. }));
    assert_eq!(harness.controller.state(), RouterState::Bootstrapping);

    Bootstrapper::new(Arc::clone(&harness.store))
        .run_once()
        .await
        .expect("reachable provider");

    let outcome = harness
        .controller
        .revalidate()
        .expect("deferred navigation is pending");
    assert_eq!(outcome.view(), Some(views::RECRUITER_DASHBOARD));
    assert_eq!(harness.controller.state(), RouterState::SignedInRouted);
}

/// Signed-out sessions are redirected from every route except the
/// sign-in subtree.
#[tokio::test]
async fn signed_out_redirects_to_sign_in() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_out()).await;

    for target in [
        "/dashboard",
        "/select-role",
        "/recruiter/dashboard",
        "/candidate/dashboard",
        "/interview/42",
        "/totally/unknown",
    ] {
        let outcome = harness.controller.handle_navigate(target);
        assert_eq!(
            outcome.path(),
            Some(&RoutePath::new("/sign-in")),
            "target {target}"
        );
        assert_eq!(outcome.view(), Some(views::SIGN_IN), "target {target}");
    }

    let outcome = harness.controller.handle_navigate("/sign-in");
    assert_eq!(
        outcome,
        NavOutcome::Rendered {
            path: RoutePath::new("/sign-in"),
            view: views::SIGN_IN,
        }
    );
}

/// An unclassified session navigating to a gated route lands on the
/// role selection flow.
#[tokio::test]
async fn unknown_role_is_sent_to_selection() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_in(Role::Unknown)).await;

    let outcome = harness.controller.handle_navigate("/recruiter/dashboard");
    assert_eq!(
        outcome,
        NavOutcome::Redirected {
            from: RoutePath::new("/recruiter/dashboard"),
            to: RoutePath::new("/select-role"),
            view: views::ROLE_SELECTION,
        }
    );
    assert_eq!(harness.controller.state(), RouterState::SignedInUnknownRole);
}

/// A candidate navigating into the recruiter area is never allowed
/// through — always redirected to role selection.
#[tokio::test]
async fn mismatched_role_is_never_allowed() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_in(Role::Candidate)).await;

    let outcome = harness.controller.handle_navigate("/recruiter/dashboard");
    assert_eq!(outcome.path(), Some(&RoutePath::new("/select-role")));

    // And the blocked page never entered history.
    assert!(!harness
        .controller
        .history()
        .contains(&RoutePath::new("/recruiter/dashboard")));
}

/// `handle_navigate` is idempotent while session state is unchanged.
#[tokio::test]
async fn navigation_is_idempotent() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_in(Role::Candidate)).await;

    let first = harness.controller.handle_navigate("/candidate/dashboard");
    let second = harness.controller.handle_navigate("/candidate/dashboard");
    assert_eq!(first, second);
}

/// Round trip: submitting a role makes the previously blocked route
/// pass the guard once the store notifies.
#[tokio::test]
async fn role_submission_unblocks_home_route() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_in(Role::Unknown)).await;
    let mut events = harness.store.subscribe();

    let outcome = harness.controller.handle_navigate("/recruiter/dashboard");
    assert_eq!(outcome.view(), Some(views::ROLE_SELECTION));

    let mut flow = RoleSelection::new(
        Arc::clone(&harness.store),
        RouteTable::interview_platform(),
    );
    let home = flow
        .submit(Role::Recruiter)
        .await
        .expect("submission should succeed");
    assert_eq!(home, RoutePath::new("/recruiter/dashboard"));

    // The store notified before submit returned.
    assert_eq!(
        events.try_recv(),
        Ok(SessionEvent::RoleChanged {
            role: Role::Recruiter
        })
    );

    let outcome = harness.controller.handle_navigate(home);
    assert_eq!(
        outcome,
        NavOutcome::Rendered {
            path: RoutePath::new("/recruiter/dashboard"),
            view: views::RECRUITER_DASHBOARD,
        }
    );
    assert_eq!(harness.controller.state(), RouterState::SignedInRouted);
}

/// Two concurrent role writes: exactly one reaches the provider, the
/// other observes `Busy`.
#[tokio::test]
async fn concurrent_role_writes_are_single_flight() {
    let harness = Harness::bootstrapped(
        StaticProvider::signed_in(Role::Unknown).with_latency(Duration::from_millis(50)),
    )
    .await;
    let store = &harness.store;

    let (first, second) = tokio::join!(store.set_role(Role::Recruiter), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.set_role(Role::Candidate).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(PersistError::Busy)));
    assert_eq!(harness.provider.update_call_count(), 1);
    assert_eq!(harness.provider.recorded_roles(), vec![Role::Recruiter]);
}

/// Signing out during a pending role write discards the write's result
/// instead of resurrecting the cleared session.
#[tokio::test]
async fn sign_out_discards_inflight_role_write() {
    let mut harness = Harness::bootstrapped(
        StaticProvider::signed_in(Role::Unknown).with_latency(Duration::from_millis(50)),
    )
    .await;
    harness.controller.handle_navigate("/select-role");

    let writer = {
        let store = Arc::clone(&harness.store);
        tokio::spawn(async move { store.set_role(Role::Candidate).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    let outcome = harness.controller.sign_out();
    assert_eq!(outcome.view(), Some(views::SIGN_IN));

    let result = writer.await.expect("writer task should not panic");
    assert!(matches!(result, Err(PersistError::Discarded)));

    // The network call completed, but the session stayed signed out.
    assert_eq!(harness.provider.update_call_count(), 1);
    assert!(!harness.store.current().is_signed_in());
    assert_eq!(harness.controller.state(), RouterState::SignedOut);
}

/// Sign-out clears first, then navigates: the protected view is gone
/// the moment the call returns, with no intermediate protected render.
#[tokio::test]
async fn sign_out_orders_clear_before_redirect() {
    let mut harness = Harness::bootstrapped(StaticProvider::signed_in(Role::Candidate)).await;

    harness.controller.handle_navigate("/candidate/dashboard");
    assert_eq!(
        harness.controller.current_view(),
        Some(views::CANDIDATE_DASHBOARD)
    );

    let outcome = harness.controller.sign_out();

    assert!(!harness.store.current().is_signed_in());
    assert_eq!(
        outcome,
        NavOutcome::Rendered {
            path: RoutePath::new("/sign-in"),
            view: views::SIGN_IN,
        }
    );
    assert_eq!(harness.controller.current_view(), Some(views::SIGN_IN));

    // Re-evaluating the old location cannot bring the view back.
    let outcome = harness.controller.handle_navigate("/candidate/dashboard");
    assert_eq!(outcome.view(), Some(views::SIGN_IN));
}

/// An unreachable provider produces banner events and retries until it
/// recovers — the app never hard-fails.
#[tokio::test]
async fn bootstrap_retries_until_provider_recovers() {
    let provider = Arc::new(
        StaticProvider::signed_in(Role::Candidate).fail_first_fetches(3),
    );
    let store = Arc::new(SessionStore::new(Arc::clone(&provider)));
    let mut events = store.subscribe();

    let handle = Bootstrapper::new(Arc::clone(&store))
        .with_backoff(BackoffPolicy::new(
            Duration::from_millis(1),
            Duration::from_millis(4),
            2,
        ))
        .spawn();

    let timeout = Duration::from_secs(2);
    for attempts in 1..=3 {
        assert_eq!(
            tokio::time::timeout(timeout, events.recv())
                .await
                .expect("banner event"),
            Ok(SessionEvent::BootstrapFailed { attempts })
        );
    }
    assert_eq!(
        tokio::time::timeout(timeout, events.recv())
            .await
            .expect("resolution event"),
        Ok(SessionEvent::BootstrapResolved)
    );

    handle.shutdown_and_wait().await;
    assert!(store.bootstrap_phase().is_resolved());
    assert_eq!(store.current().role(), Role::Candidate);
    assert_eq!(provider.fetch_call_count(), 4);
}
