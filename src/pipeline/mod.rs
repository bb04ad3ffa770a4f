//! Validation pipeline core.
//!
//! # Data Flow
//! ```text
//! Request (field map)
//!     → stage[0].check(request, next)
//!         → next.run → stage[1].check(...)
//!             → ... → end of chain (pass)
//!         ← verdict observed by each stage on the way back
//!     → Verdict (Ok or Rejection)
//! ```
//!
//! # Design Decisions
//! - The chain is an ordered slice owned by the gate; stages never hold
//!   links to each other, so cycles cannot exist
//! - A stage that fails returns without calling `next`
//! - Annotations are kept apart from the input fields

pub mod request;
pub mod stage;
pub mod verdict;

pub use request::{fields, FieldValue, Request};
pub use stage::{Next, Stage};
pub use verdict::{Rejection, Verdict};
