//! Rebuild visual lines of text from unordered positioned tokens.
//!
//! Decoders hand back text fragments in content-stream order, which rarely
//! matches reading order. Tokens are banded by vertical position and joined
//! left to right, with a space wherever the estimated gap is wide enough.
//!
//! The width estimate is deliberately crude (`chars * CHAR_WIDTH`). Some
//! bank layouts are told apart purely by how many spaces end up between a
//! description and its amount, so these constants are part of the output
//! format and must not be tuned per document.

use tracing::debug;

use crate::types::Token;

/// A token whose `y` is within this distance of the previous token joins its line.
pub const LINE_TOLERANCE: f64 = 5.0;
/// A horizontal gap at least this wide becomes a single space.
pub const GAP_THRESHOLD: f64 = 10.0;
/// Assumed advance of one character.
pub const CHAR_WIDTH: f64 = 5.0;
/// Prefix of the synthetic line emitted at the top of every page.
pub const PAGE_MARKER_PREFIX: &str = "__PARSER__";

pub fn page_marker(page_number: usize) -> String {
    format!("{PAGE_MARKER_PREFIX} === Page {page_number} ===")
}

pub fn is_page_marker(line: &str) -> bool {
    line.starts_with(PAGE_MARKER_PREFIX)
}

/// Reconstruct the lines of a single page, top to bottom.
pub fn reconstruct_page(tokens: &[Token]) -> Vec<String> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x)));

    let mut lines: Vec<Vec<&Token>> = Vec::new();
    let mut last_y: Option<f64> = None;

    // Chained: each token is compared with the one sorted before it.
    for token in sorted {
        let starts_line = last_y.is_none_or(|y| (token.y - y).abs() > LINE_TOLERANCE);
        last_y = Some(token.y);
        if starts_line {
            lines.push(vec![token]);
        } else if let Some(line) = lines.last_mut() {
            line.push(token);
        }
    }

    lines
        .into_iter()
        .map(|mut line| {
            // Banding by tolerance can pull in a slightly lower token that sorted
            // after one further right.
            line.sort_by(|a, b| a.x.total_cmp(&b.x));
            render_line(&line)
        })
        .collect()
}

fn render_line(tokens: &[&Token]) -> String {
    let mut text = String::new();
    let mut right_edge: Option<f64> = None;

    for token in tokens {
        if let Some(edge) = right_edge {
            if token.x - edge >= GAP_THRESHOLD {
                text.push(' ');
            }
        }
        text.push_str(&token.text);
        right_edge = Some(token.x + token.text.chars().count() as f64 * CHAR_WIDTH);
    }

    text.trim().to_string()
}

/// Reconstruct every page in order, prefixing each with a page marker line.
pub fn reconstruct_document(pages: &[Vec<Token>]) -> Vec<String> {
    let mut out = Vec::new();
    let mut total_chars = 0usize;

    for (idx, tokens) in pages.iter().enumerate() {
        let page_lines = reconstruct_page(tokens);
        let chars: usize = page_lines.iter().map(|l| l.len()).sum();
        debug!(page = idx + 1, lines = page_lines.len(), chars, "reconstructed page");
        total_chars += chars;

        out.push(page_marker(idx + 1));
        out.extend(page_lines);
    }

    debug!(pages = pages.len(), total_chars, "reconstructed document");
    out
}
