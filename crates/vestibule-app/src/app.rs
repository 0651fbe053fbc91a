//! Application wiring.

use crate::config::{ConfigLoader, ConfigResolver, VestibuleConfig};
use crate::AppError;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use vestibule_auth::IdentityProvider;
use vestibule_runtime::{
    BootstrapHandle, Bootstrapper, GuardPaths, NavOutcome, NavigationController, RoleSelection,
    RoutePath, RouteTable, RouterState, SessionEvent, SessionStore,
};
use vestibule_types::Role;

/// The assembled application.
///
/// Owns the session store, the spawned bootstrap loop, the navigation
/// controller, and the role selection flow, and pumps store events into
/// navigation revalidation.
///
/// Built via [`App::builder`].
pub struct App<P: IdentityProvider + 'static> {
    config: VestibuleConfig,
    store: Arc<SessionStore<P>>,
    controller: NavigationController<P>,
    selection: RoleSelection<P>,
    bootstrap: BootstrapHandle,
    events: broadcast::Receiver<SessionEvent>,
}

impl<P: IdentityProvider + 'static> App<P> {
    /// Starts building an app over the given provider.
    #[must_use]
    pub fn builder(provider: Arc<P>) -> AppBuilder<P> {
        AppBuilder::new(provider)
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &VestibuleConfig {
        &self.config
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore<P>> {
        &self.store
    }

    /// Returns the navigation controller.
    #[must_use]
    pub fn controller(&self) -> &NavigationController<P> {
        &self.controller
    }

    /// Returns the navigation controller mutably.
    pub fn controller_mut(&mut self) -> &mut NavigationController<P> {
        &mut self.controller
    }

    /// Returns the role selection flow.
    #[must_use]
    pub fn selection(&self) -> &RoleSelection<P> {
        &self.selection
    }

    /// Returns the derived router state.
    #[must_use]
    pub fn state(&self) -> RouterState {
        self.controller.state()
    }

    /// Submits a role choice and re-navigates to its home route.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persist`] when the write is rejected; the
    /// selection flow keeps the failure for its retry banner.
    pub async fn submit_role(&mut self, role: Role) -> Result<NavOutcome, AppError> {
        let home = self.selection.submit(role).await?;
        Ok(self.controller.handle_navigate(home))
    }

    /// Clears the session and navigates to sign-in.
    ///
    /// Clear-before-redirect: no protected view survives this call.
    pub fn sign_out(&mut self) -> NavOutcome {
        self.controller.sign_out()
    }

    /// Waits for the next session event and revalidates navigation.
    ///
    /// Returns `None` when the event channel closes or when no
    /// navigation has happened yet (nothing to revalidate). Lagged
    /// receivers are logged and resume with the next event.
    pub async fn next_outcome(&mut self) -> Option<NavOutcome> {
        loop {
            match self.events.recv().await {
                Ok(event) => {
                    tracing::debug!(?event, "session event, revalidating");
                    return self.controller.revalidate();
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "session event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Pumps session events into navigation until `shutdown` fires.
    pub async fn run_until_shutdown(&mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("shutdown requested, stopping event pump");
                    return;
                }
                outcome = self.next_outcome() => {
                    if let Some(outcome) = outcome {
                        tracing::debug!(?outcome, "navigation revalidated");
                    }
                }
            }
        }
    }

    /// Stops the bootstrap loop and tears the app down.
    pub async fn shutdown(self) {
        self.bootstrap.shutdown_and_wait().await;
        tracing::info!("app shut down");
    }
}

/// Builder for [`App`].
///
/// Accepts a [`ConfigResolver`] that encapsulates config resolution
/// (file layering, env vars); the builder itself only handles wiring.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vestibule_app::{App, StaticResolver, VestibuleConfig};
/// use vestibule_auth::testing::StaticProvider;
///
/// # async fn build() -> Result<(), vestibule_app::AppError> {
/// let app = App::builder(Arc::new(StaticProvider::signed_out()))
///     .with_resolver(StaticResolver::new(VestibuleConfig::default()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AppBuilder<P> {
    provider: Arc<P>,
    resolver: Box<dyn ConfigResolver>,
    table: Option<RouteTable>,
}

impl<P: IdentityProvider + 'static> AppBuilder<P> {
    /// Creates a builder with the default file/env config loader.
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            resolver: Box::new(ConfigLoader::new()),
            table: None,
        }
    }

    /// Replaces the config resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ConfigResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replaces the route table (defaults to the platform table).
    #[must_use]
    pub fn with_route_table(mut self, table: RouteTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Builds the application and spawns the bootstrap loop.
    ///
    /// Must be called within a tokio runtime: the bootstrap loop is
    /// spawned immediately so the store starts resolving right away.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if configuration resolution fails.
    pub fn build(self) -> Result<App<P>, AppError> {
        let config = self.resolver.resolve()?;

        let store = Arc::new(SessionStore::new(self.provider));
        // Subscribe before spawning bootstrap so no event is missed.
        let events = store.subscribe();

        let bootstrap = Bootstrapper::new(Arc::clone(&store))
            .with_backoff(config.bootstrap.backoff_policy())
            .spawn();
        tracing::info!("bootstrap loop spawned");

        let table = self.table.unwrap_or_else(RouteTable::interview_platform);
        let paths = GuardPaths {
            sign_in: RoutePath::new(&config.paths.sign_in),
            select_role: RoutePath::new(&config.paths.select_role),
        };
        let controller =
            NavigationController::new(Arc::clone(&store), table.clone()).with_paths(paths);
        let selection = RoleSelection::new(Arc::clone(&store), table);
        tracing::info!(
            sign_in = %config.paths.sign_in,
            select_role = %config.paths.select_role,
            debug = config.debug,
            "app wired"
        );

        Ok(App {
            config,
            store,
            controller,
            selection,
            bootstrap,
            events,
        })
    }
}
