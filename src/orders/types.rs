//! Order types.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::credentials::Principal;

/// Sequential order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by order operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error("order {0} is already confirmed")]
    AlreadyConfirmed(OrderId),

    /// The verified request carries no text `kind` field.
    #[error("request has no order kind")]
    MissingKind,
}

/// An order created after a successful verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub kind: String,
    pub status: OrderStatus,
    pub owner: Arc<Principal>,
}

impl Order {
    pub fn new(id: OrderId, kind: impl Into<String>, owner: Arc<Principal>) -> Self {
        Self {
            id,
            kind: kind.into(),
            status: OrderStatus::Pending,
            owner,
        }
    }

    /// Move a pending order to confirmed.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Pending => {
                self.status = OrderStatus::Confirmed;
                Ok(())
            }
            OrderStatus::Confirmed => Err(OrderError::AlreadyConfirmed(self.id)),
        }
    }
}
