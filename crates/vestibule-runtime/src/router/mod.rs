//! Navigation: route table, guard, controller, and role repair.
//!
//! # Decision Pipeline
//!
//! ```text
//! ┌────────────────┐ intent  ┌───────────┐ reads ┌──────────────┐
//! │ Navigation     │ ──────► │  Guard    │ ────► │ SessionStore │
//! │ Controller     │ ◄────── │ (pure fn) │       │ + RouteTable │
//! └────────────────┘ decision└───────────┘       └──────────────┘
//!        │
//!        │ RedirectTo(/select-role)
//!        ▼
//! ┌────────────────┐ set_role ┌──────────────┐
//! │ RoleSelection  │ ───────► │ SessionStore │
//! └────────────────┘          └──────────────┘
//! ```
//!
//! The guard is a pure, total function: every navigation intent maps to
//! exactly one of Allow / RedirectTo / Defer. All side effects —
//! history, redirects, sign-out — live in the controller.

mod controller;
mod guard;
mod route;
mod selection;

pub use controller::{NavOutcome, NavigationController, RouterState};
pub use guard::{decide, Decision, GuardPaths, NavigationIntent};
pub use route::{views, RouteAction, RoutePath, RouteSpec, RouteTable, ViewRef};
pub use selection::RoleSelection;
