//! Read position into a [`SegmentStream`] for one alignment pass.
//!
//! The cursor only moves forward. Skip rules that need to look ahead take a [`snapshot`]
//! before consuming and [`restore`] it if the construct turns out not to be there, which is the
//! only way the position ever moves backwards.
//!
//! [`snapshot`]: SegmentCursor::snapshot
//! [`restore`]: SegmentCursor::restore

use crate::segment::{SegmentStream, TextSegment};

/// Most indentation and quote-marker characters looked back over when finding a line start.
const MAX_LINE_PREFIX: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
/// A position expressed as a segment and a character offset within it.
pub struct CursorPosition {
    /// Index of the segment under the cursor.
    pub segment_index: usize,
    /// Offset in characters into that segment.
    pub char_offset: usize,
}

/// Forward-only reader over the characters of a segment stream.
pub struct SegmentCursor<'a> {
    stream: &'a SegmentStream,
    chars: Vec<char>,
    /// Absolute character offset at which each segment starts.
    starts: Vec<usize>,
    absolute: usize,
    segment_index: usize,
}

impl<'a> SegmentCursor<'a> {
    #[must_use]
    /// Position a new cursor on the first character of `stream`.
    pub fn new(stream: &'a SegmentStream) -> Self {
        let mut chars = Vec::new();
        let mut starts = Vec::with_capacity(stream.len());
        for segment in stream {
            starts.push(chars.len());
            chars.extend(segment.text.chars());
        }
        let mut cursor = Self {
            stream,
            chars,
            starts,
            absolute: 0,
            segment_index: 0,
        };
        cursor.settle();
        cursor
    }

    #[must_use]
    /// Character under the cursor.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.absolute).copied()
    }

    #[must_use]
    /// Character `n` places ahead of the cursor; `peek_n(0)` is [`peek`](Self::peek).
    pub fn peek_n(&self, n: usize) -> Option<char> {
        self.chars.get(self.absolute.checked_add(n)?).copied()
    }

    #[must_use]
    /// Character `n` places behind the cursor, `peek_back(1)` being the previous one.
    pub fn peek_back(&self, n: usize) -> Option<char> {
        self.chars.get(self.absolute.checked_sub(n)?).copied()
    }

    /// Move forward by `n` characters, stopping at the end of the stream.
    pub fn advance(&mut self, n: usize) {
        self.absolute = self.absolute.saturating_add(n).min(self.chars.len());
        self.settle();
    }

    #[must_use]
    /// Capture the current position for a later [`restore`](Self::restore).
    pub fn snapshot(&self) -> CursorPosition {
        self.position()
    }

    /// Return to a position captured by [`snapshot`](Self::snapshot) during the same pass.
    pub fn restore(&mut self, position: CursorPosition) {
        let start = self
            .starts
            .get(position.segment_index)
            .copied()
            .unwrap_or(self.chars.len());
        self.absolute = (start + position.char_offset).min(self.chars.len());
        self.segment_index = position.segment_index;
        self.settle();
    }

    #[must_use]
    /// Current position as segment index and offset.
    pub fn position(&self) -> CursorPosition {
        let start = self
            .starts
            .get(self.segment_index)
            .copied()
            .unwrap_or(self.chars.len());
        CursorPosition {
            segment_index: self.segment_index,
            char_offset: self.absolute - start,
        }
    }

    #[must_use]
    /// Segment containing the character under the cursor.
    pub fn current_segment(&self) -> Option<&'a TextSegment> {
        if self.is_exhausted() {
            return None;
        }
        self.stream.segments().get(self.segment_index)
    }

    #[must_use]
    /// Whether every character has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.absolute >= self.chars.len()
    }

    #[must_use]
    /// Whether the cursor sits at the start of a logical line.
    ///
    /// Indentation and blockquote markers before the cursor do not count as line content, so a
    /// nested bullet such as `  - item` or `> - item` still begins a line. Prefixes longer than
    /// sixteen characters are treated as line content.
    pub fn at_line_start(&self) -> bool {
        for back in 1..=MAX_LINE_PREFIX + 1 {
            match self.peek_back(back) {
                None | Some('\n' | '\r') => return true,
                Some(' ' | '\t' | '>') => {}
                Some(_) => return false,
            }
        }
        false
    }

    /// Keep `segment_index` pointing at the segment that owns `absolute`.
    fn settle(&mut self) {
        if self.segment_index >= self.starts.len() {
            self.segment_index = self.starts.len().saturating_sub(1);
        }
        while self.segment_index > 0 && self.starts[self.segment_index] > self.absolute {
            self.segment_index -= 1;
        }
        while self.segment_index + 1 < self.starts.len()
            && self.starts[self.segment_index + 1] <= self.absolute
        {
            self.segment_index += 1;
        }
    }
}

#[cfg(test)]
#[path = "tests/cursor.rs"]
mod tests;
