//! Deterministic block placement.
//!
//! All positions are in millimeters in top-down page space (y grows toward
//! the bottom edge; the paint pass flips into PDF coordinates). A [`Cursor`]
//! is threaded through each block function: every step takes the current
//! position and returns the next one, so the engine has no mutable fields
//! and each block is testable in isolation.
//!
//! Block order is fixed and defines the visual stacking: header, meta,
//! items table, totals, notes.

use invopress_core::{blank_or, format_money};
use invopress_document::RenderRequest;

use crate::text::{text_width, wrap_text, wrap_words};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
/// Left, right and top margin.
pub const MARGIN: f32 = 12.0;
/// A page break triggers once the cursor would cross this far above the
/// bottom edge.
pub const BREAK_MARGIN: f32 = 14.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const ROW_H: f32 = 7.0;
const LINE_H: f32 = 5.5;
const BLOCK_GAP: f32 = 6.0;

const TITLE_H: f32 = 8.0;
const HEADER_LINE_H: f32 = 6.0;

/// Width of each of the two side-by-side meta boxes.
const META_BOX_W: f32 = 95.0;
const DETAIL_ROW_H: f32 = 6.0;
const DETAIL_LABEL_W: f32 = 30.0;
const BOX_PAD: f32 = 2.0;
const BOX_TEXT_INSET: f32 = 3.0;

const COL_DESC_W: f32 = 95.0;
const COL_QTY_W: f32 = 20.0;
const COL_UNIT_W: f32 = 35.0;
const COL_AMOUNT_W: f32 = 35.0;

const TOTALS_BOX_W: f32 = 80.0;

/// Helvetica at 11 pt fits roughly this many characters into a meta box
/// line (89 mm of inner width at ~2 mm per character).
const META_WRAP_CHARS: usize = 44;
/// Notes span the full content width at 10 pt.
const NOTES_WRAP_CHARS: usize = 95;

const GRID_GRAY: f32 = 0.94;

/// One drawing instruction on a page. Coordinates are top-down millimeters.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline position from the top edge.
        y: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    StrokeRect {
        x: f32,
        /// Top edge.
        y: f32,
        w: f32,
        h: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        gray: f32,
    },
}

/// Draw operations for a single page.
#[derive(Debug, Default)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Current layout position: page index plus vertical offset from the top.
/// Moves forward only, except where two blocks sit side by side and the
/// taller one decides where the next block starts.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
}

/// Page accumulator for one layout pass.
struct Sheet {
    pages: Vec<Page>,
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

impl Sheet {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
        }
    }

    fn op(&mut self, page: usize, op: DrawOp) {
        self.pages[page].ops.push(op);
    }

    /// Returns a cursor with room for `needed` more millimeters, breaking to
    /// a fresh page when the current one cannot hold them.
    fn ensure_room(&mut self, cur: Cursor, needed: f32) -> Cursor {
        if cur.y + needed > PAGE_HEIGHT - BREAK_MARGIN {
            self.pages.push(Page::default());
            Cursor {
                page: self.pages.len() - 1,
                y: MARGIN,
            }
        } else {
            cur
        }
    }

    /// Borderless single line of text with its baseline near the bottom of
    /// an `h`-high band starting at `y`.
    fn line(&mut self, cur: Cursor, x: f32, h: f32, text: &str, size: f32, bold: bool) {
        self.op(
            cur.page,
            DrawOp::Text {
                x,
                y: cur.y + h - 2.0,
                size,
                bold,
                text: text.to_string(),
            },
        );
    }

    /// Bordered table cell with aligned text and optional shading.
    #[allow(clippy::too_many_arguments)]
    fn cell(
        &mut self,
        cur: Cursor,
        x: f32,
        w: f32,
        h: f32,
        text: &str,
        size: f32,
        bold: bool,
        align: Align,
        fill: Option<f32>,
    ) {
        if let Some(gray) = fill {
            self.op(
                cur.page,
                DrawOp::FillRect {
                    x,
                    y: cur.y,
                    w,
                    h,
                    gray,
                },
            );
        }
        self.op(
            cur.page,
            DrawOp::StrokeRect {
                x,
                y: cur.y,
                w,
                h,
            },
        );

        let tx = match align {
            Align::Left => x + BOX_TEXT_INSET,
            Align::Center => x + (w - text_width(text, size)) / 2.0,
            Align::Right => x + w - text_width(text, size) - BOX_TEXT_INSET,
        };
        self.op(
            cur.page,
            DrawOp::Text {
                x: tx,
                y: cur.y + h - 2.0,
                size,
                bold,
                text: text.to_string(),
            },
        );
    }
}

/// Lays out the full document and returns the per-page draw operations.
pub fn lay_out(req: &RenderRequest) -> Vec<Page> {
    let mut sheet = Sheet::new();
    let cur = Cursor { page: 0, y: MARGIN };

    let cur = header_block(&mut sheet, cur, req);
    let cur = meta_block(&mut sheet, cur, req);
    let cur = items_table(&mut sheet, cur, req);
    let cur = totals_block(&mut sheet, cur, req);
    notes_block(&mut sheet, cur, req);

    sheet.pages
}

/// Document title and the company identity lines. Blank company fields are
/// omitted entirely, except the name which falls back to a placeholder.
fn header_block(sheet: &mut Sheet, cur: Cursor, req: &RenderRequest) -> Cursor {
    let mut cur = cur;

    sheet.line(cur, MARGIN, TITLE_H, "INVOICE", 18.0, true);
    cur.y += TITLE_H;

    let company = &req.company;
    let name = blank_or(&company.name, "Your Company Name");
    sheet.line(cur, MARGIN, HEADER_LINE_H, name, 11.0, false);
    cur.y += HEADER_LINE_H;

    for field in [&company.tax_id, &company.address, &company.contact] {
        if !field.is_empty() {
            sheet.line(cur, MARGIN, HEADER_LINE_H, field, 11.0, false);
            cur.y += HEADER_LINE_H;
        }
    }

    cur.y += BLOCK_GAP;
    cur
}

/// Two side-by-side boxes: billed-to party on the left, invoice details on
/// the right. The cursor resumes below the taller box plus a fixed gap.
fn meta_block(sheet: &mut Sheet, cur: Cursor, req: &RenderRequest) -> Cursor {
    let header = &req.header;

    let mut billed_lines: Vec<String> = Vec::new();
    for field in [
        &header.customer_name,
        &header.customer_email,
        &header.customer_phone,
        &header.billing_address,
    ] {
        let shown = blank_or(field, "-");
        billed_lines.extend(wrap_words(shown, META_WRAP_CHARS));
    }
    let left_h = billed_lines.len() as f32 * LINE_H + BOX_PAD;

    let details = [
        ("Invoice ID", blank_or(&header.id, "-").to_string()),
        (
            "Invoice Date",
            header.created_at.format("%d %b %Y").to_string(),
        ),
        ("Currency", blank_or(&header.currency, "-").to_string()),
        ("Tax %", format!("{:.2}", header.tax_percent)),
    ];
    let right_h = details.len() as f32 * DETAIL_ROW_H + BOX_PAD;

    let box_h = left_h.max(right_h);
    let cur = sheet.ensure_room(cur, ROW_H + box_h + BLOCK_GAP);

    sheet.line(cur, MARGIN, ROW_H, "Billed To", 12.0, true);
    sheet.line(cur, MARGIN + META_BOX_W, ROW_H, "Invoice Details", 12.0, true);
    let box_top = cur.y + ROW_H;

    sheet.op(
        cur.page,
        DrawOp::StrokeRect {
            x: MARGIN,
            y: box_top,
            w: META_BOX_W,
            h: left_h,
        },
    );
    for (i, line) in billed_lines.iter().enumerate() {
        sheet.op(
            cur.page,
            DrawOp::Text {
                x: MARGIN + BOX_TEXT_INSET,
                y: box_top + (i as f32 + 1.0) * LINE_H,
                size: 11.0,
                bold: false,
                text: line.clone(),
            },
        );
    }

    let right_x = MARGIN + META_BOX_W;
    sheet.op(
        cur.page,
        DrawOp::StrokeRect {
            x: right_x,
            y: box_top,
            w: META_BOX_W,
            h: right_h,
        },
    );
    for (i, (label, value)) in details.iter().enumerate() {
        let baseline = box_top + BOX_PAD + i as f32 * DETAIL_ROW_H + 4.5;
        sheet.op(
            cur.page,
            DrawOp::Text {
                x: right_x + BOX_TEXT_INSET,
                y: baseline,
                size: 10.0,
                bold: true,
                text: format!("{label}:"),
            },
        );
        sheet.op(
            cur.page,
            DrawOp::Text {
                x: right_x + BOX_TEXT_INSET + DETAIL_LABEL_W,
                y: baseline,
                size: 10.0,
                bold: false,
                text: value.clone(),
            },
        );
    }

    Cursor {
        page: cur.page,
        y: box_top + box_h + BLOCK_GAP,
    }
}

/// Four-column items table with a shaded header row. An empty item list
/// renders a single full-width placeholder row instead of item rows.
fn items_table(sheet: &mut Sheet, cur: Cursor, req: &RenderRequest) -> Cursor {
    let mut cur = sheet.ensure_room(cur, 3.0 * ROW_H);

    sheet.line(cur, MARGIN, ROW_H, "Items", 11.0, true);
    cur.y += ROW_H;

    let x_desc = MARGIN;
    let x_qty = x_desc + COL_DESC_W;
    let x_unit = x_qty + COL_QTY_W;
    let x_amount = x_unit + COL_UNIT_W;

    let head = Some(GRID_GRAY);
    sheet.cell(cur, x_desc, COL_DESC_W, ROW_H, "Description", 10.0, true, Align::Left, head);
    sheet.cell(cur, x_qty, COL_QTY_W, ROW_H, "Qty", 10.0, true, Align::Center, head);
    sheet.cell(cur, x_unit, COL_UNIT_W, ROW_H, "Unit Price", 10.0, true, Align::Right, head);
    sheet.cell(cur, x_amount, COL_AMOUNT_W, ROW_H, "Amount", 10.0, true, Align::Right, head);
    cur.y += ROW_H;

    if req.items.is_empty() {
        cur = sheet.ensure_room(cur, ROW_H);
        sheet.cell(
            cur,
            x_desc,
            CONTENT_WIDTH,
            ROW_H,
            "No items found.",
            10.0,
            false,
            Align::Left,
            None,
        );
        cur.y += ROW_H + BLOCK_GAP;
        return cur;
    }

    let currency = &req.header.currency;
    for item in &req.items {
        cur = sheet.ensure_room(cur, ROW_H);
        sheet.cell(
            cur,
            x_desc,
            COL_DESC_W,
            ROW_H,
            blank_or(&item.name, "-"),
            10.0,
            false,
            Align::Left,
            None,
        );
        sheet.cell(
            cur,
            x_qty,
            COL_QTY_W,
            ROW_H,
            &item.quantity.to_string(),
            10.0,
            false,
            Align::Center,
            None,
        );
        sheet.cell(
            cur,
            x_unit,
            COL_UNIT_W,
            ROW_H,
            &format_money(currency, item.unit_price),
            10.0,
            false,
            Align::Right,
            None,
        );
        sheet.cell(
            cur,
            x_amount,
            COL_AMOUNT_W,
            ROW_H,
            &format_money(currency, item.amount()),
            10.0,
            false,
            Align::Right,
            None,
        );
        cur.y += ROW_H;
    }

    cur.y += BLOCK_GAP;
    cur
}

/// Right-aligned totals box: Subtotal, Tax, Discount, Grand Total in fixed
/// order, the last row emphasized.
fn totals_block(sheet: &mut Sheet, cur: Cursor, req: &RenderRequest) -> Cursor {
    let totals = &req.totals;
    let currency = &req.header.currency;

    let mut cur = sheet.ensure_room(cur, 5.0 * ROW_H + BLOCK_GAP);
    let x = PAGE_WIDTH - MARGIN - TOTALS_BOX_W;

    sheet.cell(cur, x, TOTALS_BOX_W, ROW_H, "Totals", 11.0, true, Align::Left, None);
    cur.y += ROW_H;

    let rows = [
        ("Subtotal", totals.subtotal, false),
        ("Tax", totals.tax_amount, false),
        ("Discount", totals.discount, false),
        ("Grand Total", totals.grand_total, true),
    ];
    let half = TOTALS_BOX_W / 2.0;
    for (label, value, emphasized) in rows {
        let size = if emphasized { 11.0 } else { 10.0 };
        sheet.cell(cur, x, half, ROW_H, label, size, emphasized, Align::Left, None);
        sheet.cell(
            cur,
            x + half,
            half,
            ROW_H,
            &format_money(currency, value),
            size,
            emphasized,
            Align::Right,
            None,
        );
        cur.y += ROW_H;
    }

    cur.y += BLOCK_GAP;
    cur
}

/// Bordered free-text notes box; omitted entirely when the notes are empty.
/// Wrapped lines flow across page breaks, closing and reopening the border
/// at each break so no box ever spans a page edge.
fn notes_block(sheet: &mut Sheet, cur: Cursor, req: &RenderRequest) -> Cursor {
    let notes = &req.header.notes;
    if notes.is_empty() {
        return cur;
    }

    let lines = wrap_text(notes, NOTES_WRAP_CHARS);

    let mut cur = sheet.ensure_room(cur, ROW_H + LINE_H + BOX_PAD);
    sheet.line(cur, MARGIN, ROW_H, "Notes", 11.0, true);
    cur.y += ROW_H;

    let mut segment_top = cur.y;
    let mut segment_lines = 0u32;
    for line in &lines {
        let next = sheet.ensure_room(cur, LINE_H + BOX_PAD);
        if next.page != cur.page {
            // Close the border around the lines drawn on the previous page.
            sheet.op(
                cur.page,
                DrawOp::StrokeRect {
                    x: MARGIN,
                    y: segment_top,
                    w: CONTENT_WIDTH,
                    h: segment_lines as f32 * LINE_H + BOX_PAD,
                },
            );
            cur = next;
            segment_top = cur.y;
            segment_lines = 0;
        }
        sheet.op(
            cur.page,
            DrawOp::Text {
                x: MARGIN + BOX_TEXT_INSET,
                y: cur.y + LINE_H,
                size: 10.0,
                bold: false,
                text: line.clone(),
            },
        );
        cur.y += LINE_H;
        segment_lines += 1;
    }
    sheet.op(
        cur.page,
        DrawOp::StrokeRect {
            x: MARGIN,
            y: segment_top,
            w: CONTENT_WIDTH,
            h: segment_lines as f32 * LINE_H + BOX_PAD,
        },
    );
    cur.y += BOX_PAD;

    cur
}
