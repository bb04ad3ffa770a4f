//! Order storage with atomic id assignment.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::credentials::Principal;
use crate::observability::metrics;
use crate::orders::types::{Order, OrderError, OrderId, OrderStatus};

/// Append-only store of orders.
#[derive(Debug)]
pub struct OrderBook {
    next_id: AtomicU64,
    orders: DashMap<OrderId, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            orders: DashMap::new(),
        }
    }

    /// Create a pending order with the next id.
    pub fn create(&self, kind: impl Into<String>, owner: Arc<Principal>) -> Order {
        let id = OrderId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let order = Order::new(id, kind, owner);
        self.orders.insert(id, order.clone());
        metrics::record_order(OrderStatus::Pending.as_str());
        order
    }

    /// Confirm a pending order.
    pub fn confirm(&self, id: OrderId) -> Result<Order, OrderError> {
        let mut entry = self.orders.get_mut(&id).ok_or(OrderError::NotFound(id))?;
        entry.confirm()?;
        metrics::record_order(OrderStatus::Confirmed.as_str());
        Ok(entry.value().clone())
    }

    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|r| r.value().clone())
    }

    /// All orders in ascending id order.
    pub fn all(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.iter().map(|r| r.value().clone()).collect();
        orders.sort_by_key(|o| o.id);
        orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
