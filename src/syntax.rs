//! Cursor advancement past markdown syntax that the renderer consumed.
//!
//! The stream still contains `**`, `[label](url)`, list bullets, fences and the like, while the
//! visible text does not. To place a visible character, the cursor is advanced over such noise
//! until the stream character matches, one skip rule per step, up to a fixed number of steps.
//! Rules are tried in a fixed order and the first one that applies wins.

use crate::chars::{decode_entity, is_whitespace, matches};
use crate::cursor::SegmentCursor;

/// Longest character reference recognised, excluding `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Advance `cursor` until the stream character matches `target`.
///
/// Returns the number of stream characters that make up the match (one, or the length of a
/// character reference such as `&amp;`). The cursor is left on the first of them. Returns
/// `None` when no rule applies or `max_steps` skips did not reach a match; noise consumed on
/// the way stays consumed.
pub fn advance_to(
    cursor: &mut SegmentCursor<'_>,
    target: char,
    max_steps: usize,
) -> Option<usize> {
    advance(cursor, target, max_steps, true)
}

/// Like [`advance_to`], for text the renderer shows exactly as written.
///
/// Character references are matched character by character, since code shows `&amp;` as is.
pub fn advance_to_literal(
    cursor: &mut SegmentCursor<'_>,
    target: char,
    max_steps: usize,
) -> Option<usize> {
    advance(cursor, target, max_steps, false)
}

fn advance(
    cursor: &mut SegmentCursor<'_>,
    target: char,
    max_steps: usize,
    decode_entities: bool,
) -> Option<usize> {
    for _ in 0..=max_steps {
        let current = cursor.peek()?;
        if decode_entities {
            if let Some(width) = entity_match(cursor, target) {
                return Some(width);
            }
        }
        if matches(target, current) {
            return Some(1);
        }
        if !skip_noise(cursor) {
            return None;
        }
    }
    None
}

/// Apply the first skip rule that fits at the cursor.
fn skip_noise(cursor: &mut SegmentCursor<'_>) -> bool {
    skip_link_target(cursor)
        || (cursor.at_line_start() && skip_block_prefix(cursor))
        || skip_single(cursor, is_inline_delimiter)
        || skip_single(cursor, is_whitespace)
        || skip_single(cursor, is_residual_punctuation)
        || skip_escape(cursor)
}

fn is_inline_delimiter(c: char) -> bool {
    matches!(c, '*' | '_' | '`' | '~' | '<' | '>' | '|')
}

fn is_residual_punctuation(c: char) -> bool {
    matches!(c, '[' | ']' | '(' | ')' | '!')
}

fn skip_single(cursor: &mut SegmentCursor<'_>, applies: fn(char) -> bool) -> bool {
    match cursor.peek() {
        Some(c) if applies(c) => {
            cursor.advance(1);
            true
        }
        _ => false,
    }
}

/// A backslash before ASCII punctuation renders as the punctuation alone.
fn skip_escape(cursor: &mut SegmentCursor<'_>) -> bool {
    match (cursor.peek(), cursor.peek_n(1)) {
        (Some('\\'), Some(next)) if next.is_ascii_punctuation() => {
            cursor.advance(1);
            true
        }
        _ => false,
    }
}

/// Length of a character reference at the cursor decoding to `target`.
fn entity_match(cursor: &SegmentCursor<'_>, target: char) -> Option<usize> {
    if cursor.peek()? != '&' {
        return None;
    }
    let mut name = String::new();
    for offset in 1..=MAX_ENTITY_LEN + 1 {
        match cursor.peek_n(offset)? {
            ';' => {
                let decoded = decode_entity(&name)?;
                return matches(target, decoded).then_some(offset + 1);
            }
            c if c.is_ascii_alphanumeric() || c == '#' => name.push(c),
            _ => return None,
        }
    }
    None
}

/// Consume `](target)`, `][ref]`, or an image `![alt](target)` in one step.
fn skip_link_target(cursor: &mut SegmentCursor<'_>) -> bool {
    match (cursor.peek(), cursor.peek_n(1)) {
        (Some(']'), Some('(')) => {
            let mark = cursor.snapshot();
            cursor.advance(1);
            consume_bracketed(cursor, '(', ')') || {
                cursor.restore(mark);
                false
            }
        }
        (Some(']'), Some('[')) => {
            let mark = cursor.snapshot();
            cursor.advance(1);
            consume_bracketed(cursor, '[', ']') || {
                cursor.restore(mark);
                false
            }
        }
        (Some('!'), Some('[')) => {
            let mark = cursor.snapshot();
            cursor.advance(1);
            if !consume_bracketed(cursor, '[', ']') {
                cursor.restore(mark);
                return false;
            }
            if cursor.peek() == Some('(') {
                let after_alt = cursor.snapshot();
                if !consume_bracketed(cursor, '(', ')') {
                    cursor.restore(after_alt);
                }
            }
            true
        }
        _ => false,
    }
}

/// Consume a balanced `open ... close` group starting at the cursor, within one line.
fn consume_bracketed(cursor: &mut SegmentCursor<'_>, open: char, close: char) -> bool {
    if cursor.peek() != Some(open) {
        return false;
    }
    let mut depth = 0usize;
    let mut offset = 0usize;
    loop {
        match cursor.peek_n(offset) {
            None | Some('\n' | '\r') => return false,
            Some('\\') => offset += 1,
            Some(c) if c == open => depth += 1,
            Some(c) if c == close => {
                depth -= 1;
                if depth == 0 {
                    cursor.advance(offset + 1);
                    return true;
                }
            }
            Some(_) => {}
        }
        offset += 1;
    }
}

/// Consume a block-level prefix at the start of a line.
fn skip_block_prefix(cursor: &mut SegmentCursor<'_>) -> bool {
    let Some(first) = cursor.peek() else {
        return false;
    };
    match first {
        '`' | '~' if run_length(cursor, 0, first) >= 3 => {
            consume_line(cursor);
            true
        }
        '#' => {
            let hashes = run_length(cursor, 0, '#');
            let space = usize::from(cursor.peek_n(hashes) == Some(' '));
            cursor.advance(hashes + space);
            true
        }
        '>' => {
            let space = usize::from(cursor.peek_n(1) == Some(' '));
            cursor.advance(1 + space);
            true
        }
        '-' | '*' | '_' if is_thematic_break(cursor) => {
            consume_line(cursor);
            true
        }
        '|' | ':' | '-' if is_table_delimiter_row(cursor) => {
            consume_line(cursor);
            true
        }
        '-' | '*' | '+' if cursor.peek_n(1) == Some(' ') => {
            cursor.advance(2);
            true
        }
        c if c.is_ascii_digit() => skip_ordered_marker(cursor),
        _ => false,
    }
}

fn skip_ordered_marker(cursor: &mut SegmentCursor<'_>) -> bool {
    let mut digits = 0;
    while cursor.peek_n(digits).is_some_and(|c| c.is_ascii_digit()) {
        digits += 1;
    }
    if !matches!(cursor.peek_n(digits), Some('.' | ')')) {
        return false;
    }
    let space = usize::from(cursor.peek_n(digits + 1) == Some(' '));
    cursor.advance(digits + 1 + space);
    true
}

fn run_length(cursor: &SegmentCursor<'_>, from: usize, c: char) -> usize {
    let mut n = 0;
    while cursor.peek_n(from + n) == Some(c) {
        n += 1;
    }
    n
}

/// Characters from the cursor up to, not including, the next line break.
fn rest_of_line(cursor: &SegmentCursor<'_>) -> Vec<char> {
    let mut line = Vec::new();
    while let Some(c) = cursor.peek_n(line.len()) {
        if matches!(c, '\n' | '\r') {
            break;
        }
        line.push(c);
    }
    line
}

/// `---`, `***` or `___`, optionally spaced, alone on the line.
fn is_thematic_break(cursor: &SegmentCursor<'_>) -> bool {
    let Some(marker) = cursor.peek() else {
        return false;
    };
    let mut count = 0;
    for c in rest_of_line(cursor) {
        if c == marker {
            count += 1;
        } else if c != ' ' && c != '\t' {
            return false;
        }
    }
    count >= 3
}

/// A table delimiter row such as `|---|:---:|`.
fn is_table_delimiter_row(cursor: &SegmentCursor<'_>) -> bool {
    let mut dashes = 0;
    let mut pipes = 0;
    for c in rest_of_line(cursor) {
        match c {
            '-' => dashes += 1,
            '|' => pipes += 1,
            ':' | ' ' | '\t' => {}
            _ => return false,
        }
    }
    dashes > 0 && pipes > 0
}

/// Consume through the next line break, or to the end of the stream.
fn consume_line(cursor: &mut SegmentCursor<'_>) {
    let mut len = rest_of_line(cursor).len();
    if cursor.peek_n(len).is_some() {
        len += 1;
    }
    cursor.advance(len);
}

#[cfg(test)]
#[path = "tests/syntax.rs"]
mod tests;
