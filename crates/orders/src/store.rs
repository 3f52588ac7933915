use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use invopress_core::OrderId;

use crate::order::Order;

/// Store-level failure (infrastructure, not domain).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("order store backend failure: {0}")]
    Backend(String),
}

/// Lookup seam consumed by the invoice endpoint.
///
/// `Ok(None)` means the order does not exist; `Err` is an infrastructure
/// failure and maps to a 500 at the HTTP boundary.
pub trait OrderStore: Send + Sync {
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    fn insert(&self, order: Order);
}

/// Thread-safe in-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(orders.get(&id).cloned())
    }

    fn insert(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.insert(order.order_id, order);
        }
    }
}
