//! Credential subsystem.
//!
//! # Data Flow
//! ```text
//! [[principals]] in config
//!     → principal.rs (immutable identity records)
//!     → store.rs (registration order, duplicate rejection)
//!     → shared via Arc with the authentication stage
//! ```
//!
//! # Design Decisions
//! - Lookup is first match in registration order
//! - Duplicate identifiers are rejected at registration
//! - Secrets never reach logs or serialized output

pub mod principal;
pub mod store;

pub use principal::{Principal, Role};
pub use store::{CredentialError, CredentialStore};
