//! Order admission gate: a composable validation pipeline in front of order creation.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod gate;
pub mod observability;
pub mod orders;
pub mod pipeline;
pub mod security;

pub use config::schema::GateConfig;
pub use gate::{OrderGate, Verified};
pub use pipeline::{Rejection, Request, Stage};
