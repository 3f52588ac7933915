//! Action parsing and order-to-document mapping.

use serde::Deserialize;

use invopress_document::{CompanyInfo, InvoiceHeader, LineItem, RenderRequest, Totals};
use invopress_orders::Order;

use crate::app::errors::ActionError;

/// Billing defaults applied when mapping an order to a document. The order
/// record carries no currency or tax rate of its own.
const CURRENCY: &str = "INR";
const TAX_PERCENT: f64 = 18.0;

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub action: Option<String>,
}

/// The closed set of invoice delivery behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceAction {
    Preview,
    Download,
    Generate,
    SendEmail,
    Upload,
}

impl InvoiceAction {
    /// Parses the `action` query parameter: case-insensitive, trimmed,
    /// absent or blank defaults to `preview`. Unknown values are rejected
    /// with the raw input preserved for logging.
    pub fn parse(raw: Option<&str>) -> Result<Self, ActionError> {
        let raw = raw.unwrap_or("").trim();
        if raw.is_empty() {
            return Ok(Self::Preview);
        }
        match raw.to_ascii_lowercase().as_str() {
            "preview" => Ok(Self::Preview),
            "download" => Ok(Self::Download),
            "generate" => Ok(Self::Generate),
            "sendemail" => Ok(Self::SendEmail),
            "upload" => Ok(Self::Upload),
            other => Err(ActionError::UnsupportedAction(other.to_string())),
        }
    }
}

/// Builds the document to render from a fetched order plus the static
/// company identity. One line item: the monthly database subscription.
pub fn render_request_for(order: &Order, company: &CompanyInfo) -> RenderRequest {
    let header = InvoiceHeader {
        id: order.order_id.to_string(),
        customer_name: format!("Customer-{}", order.customer_id),
        customer_email: order.customer_email.clone(),
        customer_phone: String::new(),
        billing_address: String::new(),
        created_at: order.created_at,
        currency: CURRENCY.to_string(),
        tax_percent: TAX_PERCENT,
        discount_amount: 0.0,
        notes: String::new(),
    };

    let items = vec![LineItem {
        name: format!(
            "DB: {} ({} {}) {}",
            order.db_name, order.db_engine, order.db_version, order.region
        ),
        quantity: 1,
        unit_price: order.price_monthly,
    }];

    let totals = Totals::compute(order.price_monthly, TAX_PERCENT, 0.0);

    RenderRequest {
        header,
        company: company.clone(),
        items,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use invopress_core::OrderId;

    fn test_order() -> Order {
        Order {
            order_id: OrderId::new(42),
            customer_id: 7,
            customer_email: "c7@example.test".to_string(),
            db_name: "orders".to_string(),
            db_engine: "postgres".to_string(),
            db_version: "16".to_string(),
            storage_gb: 50,
            region: "ap-south-1".to_string(),
            price_monthly: 1000.0,
            created_at: Utc::now(),
        }
    }

    fn test_company() -> CompanyInfo {
        CompanyInfo {
            name: "Payment Service Pvt Ltd".to_string(),
            tax_id: "GSTIN: XX1234XXXX".to_string(),
            address: "Bengaluru, Karnataka, India".to_string(),
            contact: "support@company.com".to_string(),
        }
    }

    #[test]
    fn action_defaults_to_preview_when_absent_or_blank() {
        assert_eq!(InvoiceAction::parse(None).unwrap(), InvoiceAction::Preview);
        assert_eq!(InvoiceAction::parse(Some("")).unwrap(), InvoiceAction::Preview);
        assert_eq!(InvoiceAction::parse(Some("  ")).unwrap(), InvoiceAction::Preview);
    }

    #[test]
    fn action_parse_is_case_insensitive() {
        assert_eq!(
            InvoiceAction::parse(Some("DownLoad")).unwrap(),
            InvoiceAction::Download
        );
        assert_eq!(
            InvoiceAction::parse(Some(" SENDEMAIL ")).unwrap(),
            InvoiceAction::SendEmail
        );
    }

    #[test]
    fn unknown_action_is_rejected_with_raw_input() {
        let err = InvoiceAction::parse(Some("bogus")).unwrap_err();
        assert!(matches!(err, ActionError::UnsupportedAction(ref a) if a == "bogus"));
    }

    #[test]
    fn render_request_maps_order_fields() {
        let req = render_request_for(&test_order(), &test_company());

        assert_eq!(req.header.id, "42");
        assert_eq!(req.header.customer_name, "Customer-7");
        assert_eq!(req.header.currency, "INR");
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.items[0].name, "DB: orders (postgres 16) ap-south-1");
        assert_eq!(req.items[0].quantity, 1);
        assert_eq!(req.totals.subtotal, 1000.0);
        assert_eq!(req.totals.tax_amount, 180.0);
        assert_eq!(req.totals.grand_total, 1180.0);
    }
}
