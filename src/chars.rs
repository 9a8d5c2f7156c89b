//! Character classification shared by the reconciler and the aligner.
//!
//! Renderers quietly substitute typographic characters (curly quotes, dashes, non-breaking
//! spaces) and collapse whitespace, so visible text and the source stream are compared through
//! the fixed mapping in [`normalize`] rather than for exact equality.

/// Map a character onto its comparison form.
#[must_use]
pub fn normalize(c: char) -> char {
    match c {
        '\r' => '\n',
        '\u{00A0}' => ' ',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        other => other,
    }
}

/// Whitespace as the aligner sees it: space, tab, newline, carriage return and NBSP.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{00A0}')
}

/// True when both characters compare equal after normalization.
#[must_use]
pub fn matches(visible: char, source: char) -> bool {
    normalize(visible) == normalize(source)
}

/// Decode the character named by an HTML character reference body (without `&` and `;`).
///
/// Only the references markdown renderers commonly emit for answer text are recognised.
#[must_use]
pub fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
#[path = "tests/chars.rs"]
mod tests;
