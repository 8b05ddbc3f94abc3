//! Pure text and range utilities.
//!
//! Ranges arriving from the front-end end at the *start* of their final
//! token, so every helper that materializes text or lengths first extends the
//! boundary to the end of that token.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Position, SourceRange};

// ---------------------------------------------------------------------------
// Token boundaries
// ---------------------------------------------------------------------------

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Offset one past the end of the token starting at `offset`.
///
/// Identifier-like tokens extend over their whole spelling; any other byte is
/// a single-character token. Offsets at or past the end of `text` saturate.
pub fn token_end(text: &str, offset: usize) -> usize {
    let bytes = text.as_bytes();
    if offset >= bytes.len() {
        return bytes.len();
    }
    if !is_ident_byte(bytes[offset]) {
        return offset + 1;
    }
    let mut end = offset;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Literal text of a range, extended to the end of its final token.
pub fn range_text<'a>(text: &'a str, range: &SourceRange) -> &'a str {
    &text[range.start..token_end(text, range.end)]
}

/// Token-aware byte length of a range.
pub fn range_length(text: &str, range: &SourceRange) -> usize {
    token_end(text, range.end) - range.start
}

/// Replacement span for deleting a whole declaration: the token-extended
/// range plus the terminating `;` when one directly follows it.
pub fn replace_decl_span(text: &str, range: &SourceRange) -> (usize, usize) {
    let end = token_end(text, range.end);
    let mut length = end - range.start;
    if text.as_bytes().get(end) == Some(&b';') {
        length += 1;
    }
    (range.start, length)
}

/// Offset just past a declaration and its terminating `;`. Whitespace between
/// the final token and the `;` is skipped; without a `;` the token-extended
/// end is returned unchanged. Never exceeds the text length.
pub fn after_decl(text: &str, range: &SourceRange) -> usize {
    let end = token_end(text, range.end);
    let bytes = text.as_bytes();
    let mut cursor = end;
    while bytes.get(cursor).is_some_and(|b| b.is_ascii_whitespace()) {
        cursor += 1;
    }
    if bytes.get(cursor) == Some(&b';') {
        cursor + 1
    } else {
        end
    }
}

// ---------------------------------------------------------------------------
// Lines, columns, positions
// ---------------------------------------------------------------------------

/// Zero-based column of a byte offset.
pub fn column_of(text: &str, offset: usize) -> usize {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    offset - line_start
}

/// Indentation string matching the column of `offset`.
pub fn indentation_at(text: &str, offset: usize) -> String {
    " ".repeat(column_of(text, offset))
}

/// Byte offset of a zero-based line/character position, or `None` when the
/// position lies outside the text.
pub fn position_to_offset(text: &str, pos: Position) -> Option<usize> {
    let mut line = 0u32;
    let mut line_start = 0usize;
    if pos.line > 0 {
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line += 1;
                if line == pos.line {
                    line_start = i + 1;
                    break;
                }
            }
        }
        if line < pos.line {
            return None;
        }
    }
    let offset = line_start + pos.character as usize;
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    (offset <= line_end).then_some(offset)
}

/// Zero-based line/character position of a byte offset.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let line = text[..offset].bytes().filter(|&b| b == b'\n').count() as u32;
    Position {
        line,
        character: column_of(text, offset) as u32,
    }
}

// ---------------------------------------------------------------------------
// Include harvesting
// ---------------------------------------------------------------------------

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*#\s*include(?:_next)?\s*["<][^">]+[">]"#).unwrap());

/// All `#include`-like directive lines of `text`, trimmed, in file order.
pub fn find_includes(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| INCLUDE_RE.is_match(line))
        .map(|line| line.trim().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
