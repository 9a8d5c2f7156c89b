use super::{CursorPosition, SegmentCursor};
use crate::reconcile::reconcile;
use crate::segment::{RawSegment, SegmentStream};

fn stream() -> SegmentStream {
    // Segments: "ab" (null), "cd" (kb-1), "e" (null)
    reconcile("abcde", &[RawSegment::new("cd", "kb-1")])
}

#[test]
fn test_peek_and_advance_cross_segment_boundaries() {
    let stream = stream();
    let mut cursor = SegmentCursor::new(&stream);

    assert_eq!(cursor.peek(), Some('a'));
    assert_eq!(cursor.peek_n(2), Some('c'));
    assert_eq!(cursor.peek_n(5), None);

    cursor.advance(2);
    assert_eq!(cursor.peek(), Some('c'));
    assert_eq!(
        cursor.position(),
        CursorPosition {
            segment_index: 1,
            char_offset: 0
        }
    );
    assert_eq!(
        cursor.current_segment().and_then(|s| s.source_id.as_deref()),
        Some("kb-1")
    );

    cursor.advance(1);
    assert_eq!(cursor.position().char_offset, 1);
    assert_eq!(cursor.peek_back(1), Some('c'));
}

#[test]
fn test_advance_saturates_at_end() {
    let stream = stream();
    let mut cursor = SegmentCursor::new(&stream);

    cursor.advance(100);
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.peek(), None);
    assert!(cursor.current_segment().is_none());
}

#[test]
fn test_snapshot_restore_rewinds_lookahead() {
    let stream = stream();
    let mut cursor = SegmentCursor::new(&stream);
    cursor.advance(1);

    let mark = cursor.snapshot();
    cursor.advance(3);
    assert_eq!(cursor.peek(), Some('e'));

    cursor.restore(mark);
    assert_eq!(cursor.peek(), Some('b'));
    assert_eq!(cursor.position(), mark);
}

#[test]
fn test_positions_are_ordered() {
    let stream = stream();
    let mut cursor = SegmentCursor::new(&stream);
    let mut previous = cursor.position();
    while !cursor.is_exhausted() {
        cursor.advance(1);
        assert!(cursor.position() > previous || cursor.is_exhausted());
        previous = cursor.position();
    }
}

#[test]
fn test_line_start_detection() {
    let stream = reconcile("x\n  - y\n> - z", &[]);
    let mut cursor = SegmentCursor::new(&stream);

    assert!(cursor.at_line_start(), "first character starts a line");
    cursor.advance(1);
    assert!(!cursor.at_line_start());
    cursor.advance(1);
    assert!(cursor.at_line_start(), "after newline");
    cursor.advance(2);
    assert_eq!(cursor.peek(), Some('-'));
    assert!(cursor.at_line_start(), "indentation does not count");
    cursor.advance(2);
    assert_eq!(cursor.peek(), Some('y'));
    assert!(!cursor.at_line_start());
    cursor.advance(4);
    assert_eq!(cursor.peek(), Some('-'));
    assert!(cursor.at_line_start(), "blockquote marker does not count");
}

#[test]
fn test_line_start_lookback_is_bounded() {
    let shallow = format!("x\n{}- y", " ".repeat(16));
    let stream = reconcile(&shallow, &[]);
    let mut cursor = SegmentCursor::new(&stream);
    cursor.advance(18);
    assert_eq!(cursor.peek(), Some('-'));
    assert!(cursor.at_line_start());

    let deep = format!("x\n{}- y", " ".repeat(17));
    let stream = reconcile(&deep, &[]);
    let mut cursor = SegmentCursor::new(&stream);
    cursor.advance(19);
    assert_eq!(cursor.peek(), Some('-'));
    assert!(!cursor.at_line_start());
}

#[test]
fn test_empty_stream_is_exhausted() {
    let stream = SegmentStream::default();
    let cursor = SegmentCursor::new(&stream);

    assert!(cursor.is_exhausted());
    assert_eq!(cursor.peek(), None);
    assert_eq!(cursor.position(), CursorPosition::default());
}
