//! Vestibule runtime - the stateful session and routing core.
//!
//! This crate owns every piece of mutable state in Vestibule and the
//! decision logic that runs over it. The layers below
//! (`vestibule-types`, `vestibule-auth`) are pure values and trait
//! definitions; the layer above (`vestibule-app`) only wires this crate
//! together.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  store/     : SessionStore, SessionEvent, BootstrapPhase    │
//! │  bootstrap/ : Bootstrapper, BackoffPolicy, BootstrapHandle  │
//! │  router/    : RouteTable, Guard, Controller, RoleSelection  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Data Flow
//!
//! ```text
//! ┌──────────────┐ fetch/retry ┌──────────────┐  events   ┌────────────────┐
//! │ Bootstrapper │ ──────────► │ SessionStore │ ────────► │ Navigation     │
//! │  (spawned)   │             │ (single      │ broadcast │ Controller     │
//! └──────────────┘             │  source of   │           │  + Guard       │
//! ┌──────────────┐  set_role   │  truth)      │           └────────────────┘
//! │ RoleSelection│ ──────────► │              │
//! └──────────────┘             └──────────────┘
//! ```
//!
//! # Concurrency Model
//!
//! One logical thread of control. All store mutations and guard
//! evaluations are synchronous and run to completion; the only async
//! edges are the bootstrap fetch and the `set_role` persistence call.
//! Both resolve to exactly one observed outcome:
//!
//! - **Single-flight**: a second `set_role` while one is pending is
//!   rejected with `Busy`, never queued or raced
//! - **Discard-on-clear**: signing out while a `set_role` is in flight
//!   discards its result instead of resurrecting a stale session
//!
//! # Modules
//!
//! ## [`store`] - Session State
//!
//! - [`SessionStore`](store::SessionStore): single source of truth
//! - [`SessionEvent`](store::SessionEvent): broadcast change notifications
//! - [`BootstrapPhase`](store::BootstrapPhase): Pending/Ready/Failed
//!
//! ## [`bootstrap`] - Startup Resolution
//!
//! - [`Bootstrapper`](bootstrap::Bootstrapper): retrying fetch loop
//! - [`BackoffPolicy`](bootstrap::BackoffPolicy): capped exponential delay
//!
//! ## [`router`] - Navigation
//!
//! - [`RouteTable`](router::RouteTable): static route data
//! - [`decide`](router::decide): pure, total guard function
//! - [`NavigationController`](router::NavigationController): history +
//!   redirect side effects
//! - [`RoleSelection`](router::RoleSelection): one-screen role repair

pub mod bootstrap;
pub mod router;
pub mod store;

mod error;

// Re-exports for convenience
pub use bootstrap::{BackoffPolicy, BootstrapHandle, Bootstrapper};
pub use error::{BootstrapError, PersistError};
pub use router::{
    Decision, GuardPaths, NavOutcome, NavigationController, NavigationIntent, RoleSelection,
    RouteAction, RouteSpec, RouteTable, RoutePath, RouterState, ViewRef,
};
pub use store::{BootstrapPhase, SessionEvent, SessionStore};

// Re-export the session value and role from the layers below; they are
// part of this crate's public API surface.
pub use vestibule_auth::Session;
pub use vestibule_types::Role;
