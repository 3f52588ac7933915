//! `invopress-render`: the invoice layout engine.
//!
//! Lays an [`invopress_document::RenderRequest`] out onto fixed-size A4
//! pages and produces the finished PDF bytes. The work is split in two:
//!
//! - [`layout`]: deterministic placement. Walks the document blocks in fixed
//!   order (header, meta, items table, totals, notes), threading an explicit
//!   cursor through each step, and emits plain draw operations per page.
//!   No PDF library involvement, so placement is unit-testable.
//! - [`engine`]: paints the draw operations with printpdf and buffers the
//!   whole document in memory. Callers get either the full byte vector or a
//!   [`RenderError`], never partial output.
//!
//! The engine holds no state across calls and is safe to invoke concurrently.

pub mod engine;
pub mod layout;
pub mod text;

pub use engine::{RenderError, render};
