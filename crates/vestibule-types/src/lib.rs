//! Core types for Vestibule.
//!
//! This crate provides the foundational identity and classification types
//! for Vestibule, the session-bootstrap and role-gated routing core of the
//! interview platform client.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Foundation Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vestibule-types   : UserId, Role, ErrorCode      ◄── HERE  │
//! │  vestibule-auth    : Session, Claims, IdentityProvider      │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Runtime Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vestibule-runtime : SessionStore, Guard, Controller        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  vestibule-app     : Config, AppBuilder, event pump         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Role Design
//!
//! Roles are a closed enumeration with an explicit [`Role::Unknown`]
//! variant. "Authenticated but unclassified" is a valid, first-class
//! state that every call site must handle — never a silent default and
//! never an error. This replaces the free-form role strings (with their
//! silent `candidate` fallback) that the platform's first client used.
//!
//! # Identifier Design
//!
//! User identifiers are UUID-based:
//!
//! - **Provider compatibility**: identity providers hand out opaque
//!   subject strings; [`UserId::from_subject`] maps them to stable UUIDs
//! - **Serialization**: first-class serde support
//!
//! # Example
//!
//! ```
//! use vestibule_types::{Role, UserId};
//!
//! // Subjects map deterministically to ids
//! let a = UserId::from_subject("user_2NK9a81");
//! let b = UserId::from_subject("user_2NK9a81");
//! assert_eq!(a, b);
//!
//! // Unclassified is a state, not an error
//! let role = Role::from_claim_str("hiring-manager");
//! assert_eq!(role, Role::Unknown);
//! assert!(!role.is_assigned());
//! ```

mod error;
mod id;
mod role;

pub use error::{assert_error_code, ErrorCode};
pub use id::UserId;
pub use role::Role;
