use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoice header: identity, billed-to party and tax parameters.
///
/// Identifier and currency are always present in rendered output (shown as
/// "-" when blank upstream, never omitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub billing_address: String,
    pub created_at: DateTime<Utc>,
    pub currency: String,
    /// Percentage in 0..=100; fractional allowed.
    pub tax_percent: f64,
    pub discount_amount: f64,
    pub notes: String,
}

/// One invoice line. The line amount is derived at render time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    /// Derived line amount: quantity × unit price, full floating precision.
    /// Rounding happens only at display-format time.
    pub fn amount(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Totals box figures. Pre-computed by the caller; the layout engine only
/// displays them and does not re-derive or enforce the relation
/// grand_total = subtotal + tax_amount - discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount: f64,
    pub grand_total: f64,
}

impl Totals {
    /// Computes totals from the item sum, a tax percentage and a flat
    /// discount. This is the dispatcher-side derivation; the render path
    /// treats the result as opaque figures.
    pub fn compute(subtotal: f64, tax_percent: f64, discount: f64) -> Self {
        let tax_amount = subtotal * tax_percent / 100.0;
        Self {
            subtotal,
            tax_amount,
            discount,
            grand_total: subtotal + tax_amount - discount,
        }
    }
}

/// Company identity block shown in the document header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    /// Email/phone contact line.
    pub contact: String,
}

/// The aggregate handed to the layout engine: one full document's content.
///
/// Constructed fresh per render call, immutable for the duration of one
/// render, discarded after the call returns. The engine receives it by
/// shared reference and holds no state across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub header: InvoiceHeader,
    pub company: CompanyInfo,
    pub items: Vec<LineItem>,
    pub totals: Totals,
}
