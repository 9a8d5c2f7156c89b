//! Attribution segments and the reconciled stream they form.
//!
//! A segment is a run of answer text tagged with the knowledge source it was derived from. The
//! analyzer hands us [`RawSegment`]s, which may be sparse, out of order, or plain wrong; the
//! reconciler turns them into a [`SegmentStream`] that covers the answer exactly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A run of answer text together with the knowledge source it came from.
pub struct TextSegment {
    /// Exact substring of the original answer, never empty once in a stream.
    pub text: String,
    /// Knowledge-source identifier, absent when the run is unattributed.
    #[serde(default)]
    pub source_id: Option<String>,
    /// Human-readable label for the source.
    #[serde(default)]
    pub source_title: Option<String>,
}

impl TextSegment {
    #[must_use]
    /// Build a segment carrying no attribution.
    pub fn unattributed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: None,
            source_title: None,
        }
    }

    #[must_use]
    /// Build a segment attributed to `source_id`.
    pub fn attributed(
        text: impl Into<String>,
        source_id: impl Into<String>,
        source_title: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_id: Some(source_id.into()),
            source_title,
        }
    }

    #[must_use]
    /// Whether either the id or the title is present.
    pub fn is_attributed(&self) -> bool {
        self.source_id.is_some() || self.source_title.is_some()
    }

    #[must_use]
    /// Whether both segments name the same `(source_id, source_title)` pair.
    pub fn same_source(&self, other: &Self) -> bool {
        self.source_id == other.source_id && self.source_title == other.source_title
    }

    #[must_use]
    /// The attribution of this segment, detached from its text.
    pub fn attribution(&self) -> Attribution {
        Attribution {
            source_id: self.source_id.clone(),
            source_title: self.source_title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The `(source_id, source_title)` pair a visible character resolves to.
pub struct Attribution {
    /// Knowledge-source identifier.
    pub source_id: Option<String>,
    /// Human-readable label for the source.
    pub source_title: Option<String>,
}

impl Attribution {
    #[must_use]
    /// Whether this attribution names any source at all.
    pub fn is_attributed(&self) -> bool {
        self.source_id.is_some() || self.source_title.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One record of analyzer output, as received.
pub struct RawSegment {
    /// Text the analyzer claims appears in the answer.
    #[serde(alias = "text")]
    pub segment_text: String,
    /// Source identifier, possibly blank.
    #[serde(default)]
    pub source_id: Option<String>,
    /// Source label, possibly blank.
    #[serde(default)]
    pub source_title: Option<String>,
}

impl RawSegment {
    #[must_use]
    /// Convenience constructor for an attributed analyzer record.
    pub fn new(segment_text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            segment_text: segment_text.into(),
            source_id: Some(source_id.into()),
            source_title: None,
        }
    }

    #[must_use]
    /// Attach a source title.
    pub fn with_title(mut self, source_title: impl Into<String>) -> Self {
        self.source_title = Some(source_title.into());
        self
    }
}

impl From<&TextSegment> for RawSegment {
    fn from(segment: &TextSegment) -> Self {
        Self {
            segment_text: segment.text.clone(),
            source_id: segment.source_id.clone(),
            source_title: segment.source_title.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered, gapless segments covering one answer.
///
/// Only the reconciler builds streams from analyzer output; afterwards a stream is read-only.
pub struct SegmentStream {
    segments: Vec<TextSegment>,
}

impl SegmentStream {
    pub(crate) fn from_segments(segments: Vec<TextSegment>) -> Self {
        Self { segments }
    }

    #[must_use]
    /// The segments in answer order.
    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    /// Iterate over the segments in answer order.
    pub fn iter(&self) -> std::slice::Iter<'_, TextSegment> {
        self.segments.iter()
    }

    #[must_use]
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    /// Whether the stream holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    /// Concatenated text of every segment.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[must_use]
    /// Whether any segment carries a source. A stream without one has nothing to align.
    pub fn has_attribution(&self) -> bool {
        self.segments.iter().any(TextSegment::is_attributed)
    }

    #[must_use]
    /// Convert back into analyzer-shaped records, e.g. to reconcile again.
    pub fn to_raw(&self) -> Vec<RawSegment> {
        self.segments.iter().map(RawSegment::from).collect()
    }
}

impl<'a> IntoIterator for &'a SegmentStream {
    type Item = &'a TextSegment;
    type IntoIter = std::slice::Iter<'a, TextSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
