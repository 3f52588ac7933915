//! Text measurement and wrapping.
//!
//! The engine uses the built-in Helvetica fonts, so widths are approximated
//! from a coarse per-character advance table instead of parsed font metrics.
//! That is accurate enough for right-aligning numeric columns and for
//! choosing wrap points in free text.

const PT_TO_MM: f32 = 0.352_778;

/// Approximate advance of one character as a fraction of the font size.
fn char_advance(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | 'I' | '.' | ',' | '\'' | ':' | ';' | '|' | '!' | '(' | ')' | '['
        | ']' => 0.30,
        ' ' | 't' | 'f' | 'r' | '-' => 0.40,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.90,
        _ => 0.556,
    }
}

/// Approximate width in millimeters of `text` set at `size_pt` points.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    let units: f32 = text.chars().map(char_advance).sum();
    units * size_pt * PT_TO_MM
}

/// Greedy word wrap at a character budget. Words longer than the budget are
/// kept whole on their own line; nothing is truncated.
pub fn wrap_words(input: &str, max_chars: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in input.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Wraps multi-line text: explicit newlines are respected, each logical line
/// is then word-wrapped at the budget. Blank logical lines survive so that
/// paragraph breaks in notes stay visible.
pub fn wrap_text(input: &str, max_chars: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_words(line, max_chars));
        }
    }
    out
}
