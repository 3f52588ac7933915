//! Invoice document model.
//!
//! The in-memory representation consumed by the layout engine: header and
//! company identity, billed-to party, line items and pre-computed totals.
//! Pure data plus deterministic arithmetic: no IO, no HTTP, no rendering.

pub mod model;

pub use model::{CompanyInfo, InvoiceHeader, LineItem, RenderRequest, Totals};
