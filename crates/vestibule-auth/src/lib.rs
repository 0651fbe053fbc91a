//! Identity primitives for Vestibule.
//!
//! This crate provides the abstract authentication layer: the session
//! value type, raw provider claims, role resolution, and the identity
//! provider boundary. It holds trait definitions and pure functions
//! only — the stateful store and the routing machinery live in
//! `vestibule-runtime`.
//!
//! # Crate Architecture
//!
//! ```text
//! vestibule-types  (UserId, Role, ErrorCode)
//!        ↑
//! vestibule-auth   (Session, Claims, IdentityProvider)  ◄── THIS CRATE
//!        ↑
//! vestibule-runtime (SessionStore, Guard, NavigationController)
//!        ↑
//! vestibule-app    (Config, AppBuilder)
//! ```
//!
//! # Design Principles
//!
//! - **Trait definitions here, implementations in consumers** — the
//!   [`IdentityProvider`] trait is defined here; real transports and
//!   the [`testing::StaticProvider`] double implement it.
//! - **Total resolution** — [`resolve_role`] maps any claim payload to
//!   a [`Role`](vestibule_types::Role), degrading to `Unknown` instead
//!   of failing. Classification failure means "ask the user", never
//!   "crash navigation".
//! - **Invariant by construction** — a [`Session`] can only be built
//!   through constructors that keep signed-out sessions unclassified.

pub mod claims;
pub mod provider;
pub mod resolve;
pub mod session;
pub mod testing;

// Re-export core types
pub use claims::Claims;
pub use provider::{IdentityProvider, MetadataPatch, ProviderError, ProviderSession};
pub use resolve::resolve_role;
pub use session::Session;

// Re-export Role from vestibule_types for convenience
pub use vestibule_types::Role;
