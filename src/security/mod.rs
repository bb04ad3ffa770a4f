//! Security stages.
//!
//! # Data Flow
//! ```text
//! Request:
//!     → sanitization.rs (reject disallowed substrings)
//!     → abuse_guard.rs (reject blocked sources, count downstream failures)
//!     → authentication.rs (resolve principal from identifier/secret)
//!     → rest of the chain
//! ```
//!
//! # Design Decisions
//! - Fail closed: any stage may veto the request
//! - No trust in client input
//! - Stage state is owned by the stage instance, never global

pub mod abuse_guard;
pub mod authentication;
pub mod sanitization;

pub use abuse_guard::{AbuseGuard, LockoutPolicy};
pub use authentication::Authentication;
pub use sanitization::Sanitizer;
