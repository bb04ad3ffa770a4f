//! Order management.
//!
//! # State Transitions
//! ```text
//! Pending → Confirmed: explicit confirmation
//! Confirmed → (terminal)
//! ```
//!
//! # Design Decisions
//! - Ids are assigned atomically, start at 1 and are never reused
//! - Orders are never deleted

pub mod book;
pub mod types;

pub use book::OrderBook;
pub use types::{Order, OrderError, OrderId, OrderStatus};
