//! Render tree exchanged with the formatter and the UI.
//!
//! Nodes follow the hast JSON shape so that trees produced by common markdown-to-HTML pipelines
//! can be passed through unchanged. The aligner replaces text leaves with annotated `span`
//! elements carrying the attribution of the characters they hold.

use crate::segment::Attribution;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag of the elements the aligner emits.
pub const SPAN_TAG: &str = "span";
/// Property marking an element as an attribution span.
pub const IS_ATTRIBUTED_SEGMENT: &str = "is_attributed_segment";
/// Property holding the knowledge-source identifier.
pub const SOURCE_ID: &str = "source_id";
/// Property holding the knowledge-source label.
pub const SOURCE_TITLE: &str = "source_title";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
/// A node of the rendered answer.
pub enum RenderNode {
    /// Document root.
    Root {
        /// Top-level nodes in document order.
        #[serde(default)]
        children: Vec<RenderNode>,
    },
    /// A formatted element such as `p`, `strong` or `code`.
    Element {
        /// Element name.
        #[serde(rename = "tagName")]
        tag: String,
        /// Element properties.
        #[serde(default)]
        properties: BTreeMap<String, Value>,
        /// Nested nodes in document order.
        #[serde(default)]
        children: Vec<RenderNode>,
    },
    /// Literal visible text.
    Text {
        /// The characters shown to the user.
        value: String,
    },
}

impl RenderNode {
    #[must_use]
    /// A root holding `children`.
    pub fn root(children: Vec<RenderNode>) -> Self {
        Self::Root { children }
    }

    #[must_use]
    /// An element without properties.
    pub fn element(tag: impl Into<String>, children: Vec<RenderNode>) -> Self {
        Self::Element {
            tag: tag.into(),
            properties: BTreeMap::new(),
            children,
        }
    }

    #[must_use]
    /// A text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    #[must_use]
    /// An attribution span wrapping `value`.
    ///
    /// Unattributed runs still become spans, with `is_attributed_segment` set to false and no
    /// source properties, so that every character of a split leaf lives in exactly one span.
    pub fn annotated_span(value: impl Into<String>, attribution: &Attribution) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            IS_ATTRIBUTED_SEGMENT.to_string(),
            Value::Bool(attribution.is_attributed()),
        );
        if let Some(id) = &attribution.source_id {
            properties.insert(SOURCE_ID.to_string(), Value::String(id.clone()));
        }
        if let Some(title) = &attribution.source_title {
            properties.insert(SOURCE_TITLE.to_string(), Value::String(title.clone()));
        }
        Self::Element {
            tag: SPAN_TAG.to_string(),
            properties,
            children: vec![Self::text(value)],
        }
    }

    #[must_use]
    /// Whether this node is a span emitted by the aligner.
    pub fn is_annotated_span(&self) -> bool {
        matches!(
            self,
            Self::Element { tag, properties, .. }
                if tag == SPAN_TAG && properties.contains_key(IS_ATTRIBUTED_SEGMENT)
        )
    }

    #[must_use]
    /// Whether this node is a span attributed to some source.
    pub fn is_attributed_span(&self) -> bool {
        match self {
            Self::Element { properties, .. } if self.is_annotated_span() => {
                properties.get(IS_ATTRIBUTED_SEGMENT) == Some(&Value::Bool(true))
            }
            _ => false,
        }
    }

    #[must_use]
    /// The source id of an annotated span.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Element { properties, .. } => properties.get(SOURCE_ID)?.as_str(),
            _ => None,
        }
    }

    #[must_use]
    /// Child nodes; text leaves have none.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Root { children } | Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    #[must_use]
    /// All visible text below this node, in document order.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } => out.push_str(value),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Count attributed spans anywhere in `node`.
#[must_use]
pub fn count_attributed_spans(node: &RenderNode) -> usize {
    let own = usize::from(node.is_attributed_span());
    own + node
        .children()
        .iter()
        .map(count_attributed_spans)
        .sum::<usize>()
}

/// Collect every annotated span in `node` in document order.
#[must_use]
pub fn annotated_spans(node: &RenderNode) -> Vec<&RenderNode> {
    let mut spans = Vec::new();
    collect_spans(node, &mut spans);
    spans
}

fn collect_spans<'a>(node: &'a RenderNode, spans: &mut Vec<&'a RenderNode>) {
    if node.is_annotated_span() {
        spans.push(node);
        return;
    }
    for child in node.children() {
        collect_spans(child, spans);
    }
}

#[cfg(test)]
#[path = "tests/tree.rs"]
mod tests;
