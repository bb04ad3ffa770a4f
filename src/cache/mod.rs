//! Response memoization.
//!
//! # Data Flow
//! ```text
//! Request
//!     → canonical key (sorted input fields, no annotations)
//!     → hit: replay stored outcome, rest of chain skipped
//!     → miss: run rest of chain, store outcome
//! ```

pub mod memoization;

pub use memoization::Memoizer;
