//! Paints the layout pass onto a printpdf document.
//!
//! The whole document is assembled in memory and returned as one byte
//! vector. Callers never observe partial output: any failure while adding
//! fonts or serializing the document surfaces as a [`RenderError`] and no
//! bytes are handed out.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use thiserror::Error;

use invopress_document::RenderRequest;

use crate::layout::{self, DrawOp, PAGE_HEIGHT, PAGE_WIDTH, Page};

/// Layout engine failure. There is no partial-success state.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf document error: {0}")]
    Document(String),
}

/// Renders the request into a finished single- or multi-page PDF.
pub fn render(req: &RenderRequest) -> Result<Vec<u8>, RenderError> {
    let pages = layout::lay_out(req);
    paint(&pages)
}

fn paint(pages: &[Page]) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new("Invoice", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Document(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Document(e.to_string()))?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..pages.len() {
        let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        layers.push(doc.get_page(page_idx).get_layer(layer_idx));
    }

    for (page, layer) in pages.iter().zip(layers.iter()) {
        layer.set_outline_thickness(0.2);
        for op in &page.ops {
            paint_op(layer, &regular, &bold, op);
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| RenderError::Document(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| RenderError::Document(e.to_string()))
}

fn paint_op(
    layer: &PdfLayerReference,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    op: &DrawOp,
) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            bold: emphasized,
            text,
        } => {
            let font = if *emphasized { bold } else { regular };
            // Layout works top-down; printpdf's origin is bottom-left.
            layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT - *y), font);
        }
        DrawOp::StrokeRect { x, y, w, h } => {
            let rect = Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - y - h),
                Mm(x + w),
                Mm(PAGE_HEIGHT - y),
            )
            .with_mode(PaintMode::Stroke);
            layer.add_rect(rect);
        }
        DrawOp::FillRect { x, y, w, h, gray } => {
            layer.set_fill_color(Color::Rgb(Rgb::new(*gray, *gray, *gray, None)));
            let rect = Rect::new(
                Mm(*x),
                Mm(PAGE_HEIGHT - y - h),
                Mm(x + w),
                Mm(PAGE_HEIGHT - y),
            )
            .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invopress_document::{CompanyInfo, InvoiceHeader, LineItem, Totals};

    fn test_request() -> RenderRequest {
        RenderRequest {
            header: InvoiceHeader {
                id: "7".to_string(),
                customer_name: "Customer-1".to_string(),
                customer_email: "one@example.test".to_string(),
                customer_phone: String::new(),
                billing_address: String::new(),
                created_at: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
                currency: "INR".to_string(),
                tax_percent: 18.0,
                discount_amount: 0.0,
                notes: "Thank you.".to_string(),
            },
            company: CompanyInfo {
                name: "Payment Service Pvt Ltd".to_string(),
                tax_id: "GSTIN: XX1234XXXX".to_string(),
                address: "Bengaluru, Karnataka, India".to_string(),
                contact: "support@company.com".to_string(),
            },
            items: vec![LineItem {
                name: "DB: orders (postgres 16) ap-south-1".to_string(),
                quantity: 1,
                unit_price: 1499.0,
            }],
            totals: Totals::compute(1499.0, 18.0, 0.0),
        }
    }

    #[test]
    fn render_produces_a_pdf_byte_stream() {
        let bytes = render(&test_request()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn render_handles_empty_item_list() {
        let mut req = test_request();
        req.items.clear();
        let bytes = render(&req).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn multi_page_request_still_renders_whole() {
        let mut req = test_request();
        req.items = (0..80)
            .map(|i| LineItem {
                name: format!("item-{i}"),
                quantity: 1,
                unit_price: 5.0,
            })
            .collect();
        let bytes = render(&req).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
