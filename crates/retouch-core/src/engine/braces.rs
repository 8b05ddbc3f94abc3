//! Brace-balanced definition scanning.
//!
//! When the symbol index reports where a definition *starts* but no reliable
//! structured range for where it ends, the span has to be recovered from raw
//! text. This is a small finite-state machine: it tracks nested `(`/`{`/`[`
//! brackets while skipping string and character literals and both comment
//! forms, and terminates at the `}` that closes the first `{` opened at
//! depth zero.

use tracing::trace;

use crate::errors::{RefactorError, RefactorResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Normal,
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
}

fn opener_for(close: u8) -> u8 {
    match close {
        b')' => b'(',
        b'}' => b'{',
        _ => b'[',
    }
}

/// Byte span `(start, length)` of the definition beginning at `start`.
///
/// Fails with [`RefactorError::MalformedSource`] on a mismatched closing
/// bracket or when the input ends before the definition's closing `}`.
pub fn find_definition_span(code: &str, start: usize) -> RefactorResult<(usize, usize)> {
    let bytes = code.as_bytes();
    let mut state = ScanState::Normal;
    let mut stack: Vec<u8> = Vec::new();
    let mut escaped = false;
    let mut i = start;

    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied().unwrap_or(0);
        match state {
            ScanState::Normal => match c {
                b'/' if next == b'*' => {
                    state = ScanState::BlockComment;
                    i += 2;
                    continue;
                }
                b'/' if next == b'/' => state = ScanState::LineComment,
                b'"' => state = ScanState::DoubleQuoted,
                b'\'' => state = ScanState::SingleQuoted,
                b'(' | b'{' | b'[' => stack.push(c),
                b')' | b'}' | b']' => {
                    if c == b'}' && stack.len() == 1 && stack[0] == b'{' {
                        trace!(start, end = i + 1, "definition span closed");
                        return Ok((start, i + 1 - start));
                    }
                    if stack.last() == Some(&opener_for(c)) {
                        stack.pop();
                    } else {
                        return Err(RefactorError::MalformedSource(format!(
                            "unbalanced '{}' at offset {i}",
                            c as char
                        )));
                    }
                }
                _ => {}
            },
            ScanState::LineComment => {
                if c == b'\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::BlockComment => {
                if c == b'*' && next == b'/' {
                    state = ScanState::Normal;
                    i += 2;
                    continue;
                }
            }
            ScanState::SingleQuoted | ScanState::DoubleQuoted => {
                if escaped {
                    escaped = false;
                } else if c == b'\\' {
                    escaped = true;
                } else if (state == ScanState::DoubleQuoted && c == b'"')
                    || (state == ScanState::SingleQuoted && c == b'\'')
                {
                    state = ScanState::Normal;
                }
            }
        }
        i += 1;
    }
    Err(RefactorError::MalformedSource(format!(
        "no closing brace for definition starting at offset {start}"
    )))
}

/// Exact text of the definition beginning at `start`.
pub fn definition_text(code: &str, start: usize) -> RefactorResult<&str> {
    let (offset, length) = find_definition_span(code, start)?;
    Ok(&code[offset..offset + length])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
