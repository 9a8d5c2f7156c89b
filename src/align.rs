//! Assign each visible character of a render tree to the segment it came from.
//!
//! The walk is depth-first in document order and carries a single [`SegmentCursor`]. Text
//! leaves are split into runs of equal attribution, each run becoming one annotated span;
//! leaves under verbatim elements (code) only advance the cursor. When the cursor cannot be
//! aligned with the visible text the pass gives up attributing for the rest of the document
//! instead of failing.

use crate::chars::{is_whitespace, normalize};
use crate::config::AlignConfig;
use crate::cursor::SegmentCursor;
use crate::segment::{Attribution, SegmentStream, TextSegment};
use crate::syntax::{advance_to, advance_to_literal};
use crate::tree::RenderNode;

/// Annotate `tree` with the attribution in `stream`, using default settings.
///
/// Returns the tree unchanged when the stream carries no attribution at all.
#[must_use]
pub fn align(tree: RenderNode, stream: &SegmentStream) -> RenderNode {
    align_with(tree, stream, &AlignConfig::default())
}

/// Annotate `tree` with the attribution in `stream`.
#[must_use]
pub fn align_with(tree: RenderNode, stream: &SegmentStream, config: &AlignConfig) -> RenderNode {
    if !stream.has_attribution() {
        tracing::debug!(
            segments = stream.len(),
            "no attributed segments, leaving tree unchanged"
        );
        return tree;
    }

    let mut pass = AlignPass {
        cursor: SegmentCursor::new(stream),
        config,
        desynchronized: false,
    };
    match tree {
        RenderNode::Text { value } => RenderNode::root(pass.split_text(&value)),
        node => pass.rewrite(node, false),
    }
}

/// State of one alignment pass over one tree.
struct AlignPass<'a> {
    cursor: SegmentCursor<'a>,
    config: &'a AlignConfig,
    desynchronized: bool,
}

impl AlignPass<'_> {
    fn rewrite(&mut self, node: RenderNode, inside_verbatim: bool) -> RenderNode {
        match node {
            RenderNode::Root { children } => RenderNode::Root {
                children: self.rewrite_children(children, inside_verbatim),
            },
            RenderNode::Element {
                tag,
                properties,
                children,
            } => {
                let verbatim = inside_verbatim || self.config.is_verbatim(&tag);
                RenderNode::Element {
                    children: self.rewrite_children(children, verbatim),
                    tag,
                    properties,
                }
            }
            text @ RenderNode::Text { .. } => text,
        }
    }

    fn rewrite_children(
        &mut self,
        children: Vec<RenderNode>,
        inside_verbatim: bool,
    ) -> Vec<RenderNode> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                RenderNode::Text { value } if inside_verbatim => {
                    self.consume_silently(&value, true);
                    out.push(RenderNode::Text { value });
                }
                RenderNode::Text { value } if !self.desynchronized => {
                    out.extend(self.split_text(&value));
                }
                span if span.is_annotated_span() => {
                    self.consume_silently(&span.visible_text(), inside_verbatim);
                    out.push(span);
                }
                other => out.push(self.rewrite(other, inside_verbatim)),
            }
        }
        out
    }

    /// Keep the cursor in step with text that gets no new spans.
    ///
    /// `literal` text (code) shows character references as written.
    fn consume_silently(&mut self, value: &str, literal: bool) {
        if self.desynchronized {
            return;
        }
        let max_steps = self.config.max_skip_steps;
        let step: fn(&mut SegmentCursor<'_>, char, usize) -> Option<usize> = if literal {
            advance_to_literal
        } else {
            advance_to
        };
        for c in value.chars() {
            let target = normalize(c);
            if is_whitespace(target) {
                self.skip_stream_whitespace();
            } else if let Some(width) = step(&mut self.cursor, target, max_steps) {
                self.cursor.advance(width);
            } else {
                self.desynchronize(value);
                return;
            }
        }
    }

    /// Split a text leaf into annotated spans, one per run of equal attribution.
    ///
    /// Whitespace before the leaf's first aligned character is held back, so a leaf that fails
    /// to align at all carries no attribution.
    fn split_text(&mut self, value: &str) -> Vec<RenderNode> {
        let max_steps = self.config.max_skip_steps;
        let mut runs = RunBuffer::default();
        let mut leading: Vec<(char, Attribution)> = Vec::new();
        let mut anchored = false;

        for (index, c) in value.char_indices() {
            let target = normalize(c);
            if is_whitespace(target) {
                let attribution = self
                    .stream_whitespace_attribution()
                    .or_else(|| self.cursor.current_segment().map(TextSegment::attribution))
                    .or_else(|| runs.active().cloned())
                    .unwrap_or_default();
                if anchored {
                    runs.push(c, attribution);
                } else {
                    leading.push((c, attribution));
                }
                continue;
            }

            if let Some(width) = advance_to(&mut self.cursor, target, max_steps) {
                let attribution = self.cursor_attribution();
                self.cursor.advance(width);
                if !anchored {
                    anchored = true;
                    for (space, held) in leading.drain(..) {
                        runs.push(space, held);
                    }
                }
                runs.push(c, attribution);
            } else {
                self.desynchronize(value);
                let start = if leading.is_empty() { index } else { 0 };
                runs.push_str(&value[start..], Attribution::default());
                leading.clear();
                break;
            }
        }

        for (space, held) in leading {
            runs.push(space, held);
        }
        runs.into_spans()
    }

    /// Attribution of a whitespace character in the stream, consuming it.
    fn stream_whitespace_attribution(&mut self) -> Option<Attribution> {
        let c = self.cursor.peek()?;
        if !is_whitespace(c) {
            return None;
        }
        let attribution = self.cursor_attribution();
        self.cursor.advance(1);
        Some(attribution)
    }

    fn skip_stream_whitespace(&mut self) {
        if self.cursor.peek().is_some_and(is_whitespace) {
            self.cursor.advance(1);
        }
    }

    fn cursor_attribution(&self) -> Attribution {
        self.cursor
            .current_segment()
            .map(TextSegment::attribution)
            .unwrap_or_default()
    }

    fn desynchronize(&mut self, value: &str) {
        let position = self.cursor.position();
        tracing::debug!(
            segment_index = position.segment_index,
            char_offset = position.char_offset,
            leaf = %value,
            "lost alignment with segment stream, remaining text left unattributed"
        );
        self.desynchronized = true;
    }
}

/// Characters buffered by attribution until the attribution changes.
#[derive(Default)]
struct RunBuffer {
    spans: Vec<RenderNode>,
    current: Option<(Attribution, String)>,
}

impl RunBuffer {
    fn active(&self) -> Option<&Attribution> {
        self.current.as_ref().map(|(attribution, _)| attribution)
    }

    fn push(&mut self, c: char, attribution: Attribution) {
        let mut buf = [0u8; 4];
        self.push_str(c.encode_utf8(&mut buf), attribution);
    }

    fn push_str(&mut self, s: &str, attribution: Attribution) {
        if s.is_empty() {
            return;
        }
        if let Some((active, text)) = &mut self.current {
            if *active == attribution {
                text.push_str(s);
                return;
            }
        }
        self.flush();
        self.current = Some((attribution, s.to_string()));
    }

    fn flush(&mut self) {
        if let Some((attribution, text)) = self.current.take() {
            self.spans.push(RenderNode::annotated_span(text, &attribution));
        }
    }

    fn into_spans(mut self) -> Vec<RenderNode> {
        self.flush();
        self.spans
    }
}

#[cfg(test)]
#[path = "tests/align.rs"]
mod tests;
