use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invopress_core::OrderId;

/// A database-subscription order, the record an invoice is rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: u64,
    pub customer_email: String,
    pub db_name: String,
    pub db_engine: String,
    pub db_version: String,
    pub storage_gb: u32,
    pub region: String,
    pub price_monthly: f64,
    pub created_at: DateTime<Utc>,
}
