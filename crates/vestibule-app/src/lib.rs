//! Vestibule application layer.
//!
//! Wires the runtime pieces into one [`App`]: resolves configuration,
//! constructs the session store, spawns the bootstrap loop, and pumps
//! session events into navigation revalidation.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vestibule_app::{App, StaticResolver, VestibuleConfig};
//! use vestibule_auth::testing::StaticProvider;
//! use vestibule_types::Role;
//!
//! # async fn run() -> Result<(), vestibule_app::AppError> {
//! let provider = Arc::new(StaticProvider::signed_in(Role::Recruiter));
//!
//! let mut app = App::builder(provider)
//!     .with_resolver(StaticResolver::new(VestibuleConfig::default()))
//!     .build()?;
//!
//! // Navigation defers until the spawned bootstrap resolves, then the
//! // event pump revalidates automatically.
//! let outcome = app.controller_mut().handle_navigate("/recruiter/dashboard");
//! app.next_outcome().await;
//! # Ok(())
//! # }
//! ```

mod app;
mod config;
mod error;

pub use app::{App, AppBuilder};
pub use config::{
    default_config_dir, default_config_path, BootstrapConfig, ConfigError, ConfigLoader,
    ConfigResolver, PathsConfig, ProviderConfig, StaticResolver, UiConfig, VestibuleConfig,
};
pub use error::AppError;

/// Initializes tracing for the process.
///
/// Respects `RUST_LOG`; defaults to `info` for Vestibule crates. Safe
/// to call more than once — later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vestibule=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
