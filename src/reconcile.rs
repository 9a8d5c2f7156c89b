//! Turn sparse analyzer output into a stream covering every character of the answer.
//!
//! The analyzer is untrusted: segments may not occur in the answer, may arrive out of order, or
//! may be missing entirely. Each usable segment is located at its first occurrence after the
//! previous match, gaps are filled with unattributed runs, and adjacent runs from the same source
//! are merged so that the stream carries no redundant boundaries.

use crate::segment::{RawSegment, SegmentStream, TextSegment};

/// Reconcile analyzer segments against the answer they describe.
///
/// The returned stream concatenates back to `full_text` exactly. Segments whose text cannot be
/// found at or after the end of the previous match are dropped and logged; they never abort
/// reconciliation.
#[must_use]
pub fn reconcile(full_text: &str, raw_segments: &[RawSegment]) -> SegmentStream {
    if full_text.is_empty() {
        return SegmentStream::default();
    }

    let mut output = Vec::new();
    let mut cursor = 0usize;
    let mut dropped = 0usize;

    for segment in raw_segments.iter().filter_map(normalize_raw) {
        let Some(found) = full_text[cursor..].find(segment.text.as_str()) else {
            tracing::warn!(
                segment = %segment.text,
                source_id = ?segment.source_id,
                offset = cursor,
                "dropping analyzer segment not found in answer text"
            );
            dropped += 1;
            continue;
        };

        let start = cursor + found;
        if start > cursor {
            output.push(TextSegment::unattributed(&full_text[cursor..start]));
        }
        cursor = start + segment.text.len();
        output.push(segment);
    }

    if cursor < full_text.len() {
        output.push(TextSegment::unattributed(&full_text[cursor..]));
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = output.len(), "reconciled with unmatched segments");
    }

    SegmentStream::from_segments(merge_adjacent(output))
}

/// Drop empty segments and blank out whitespace-only source fields.
fn normalize_raw(raw: &RawSegment) -> Option<TextSegment> {
    if raw.segment_text.is_empty() {
        return None;
    }
    Some(TextSegment {
        text: raw.segment_text.clone(),
        source_id: non_blank(raw.source_id.as_deref()),
        source_title: non_blank(raw.source_title.as_deref()),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn merge_adjacent(segments: Vec<TextSegment>) -> Vec<TextSegment> {
    let mut merged: Vec<TextSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.same_source(&segment) => last.text.push_str(&segment.text),
            _ => merged.push(segment),
        }
    }
    merged
}

#[cfg(test)]
#[path = "tests/reconcile.rs"]
mod tests;
