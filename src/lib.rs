//! sourcemark: align knowledge-source attribution with rendered markdown.
//!
//! An assistant answer is written in markdown and rendered to a tree, while an analyzer reports
//! which substrings of the *unrendered* answer came from which knowledge source. Formatting
//! syntax disappears during rendering, so the two views no longer line up character for
//! character. This crate reconciles the analyzer output into a gapless [`SegmentStream`] and then
//! walks the render tree, wrapping each run of visible text in a span that names its source.
//!
//! ```
//! use sourcemark::{annotate, count_attributed_spans, AlignConfig, RawSegment, RenderNode};
//!
//! let tree = RenderNode::root(vec![RenderNode::element(
//!     "p",
//!     vec![RenderNode::text("Paris is the capital.")],
//! )]);
//! let segments = [RawSegment::new("capital", "kb-1")];
//!
//! let annotated = annotate("Paris is the capital.", &segments, tree, &AlignConfig::default());
//! assert_eq!(count_attributed_spans(&annotated), 1);
//! ```

pub mod align;
pub mod chars;
pub mod config;
pub mod cursor;
pub mod error;
pub mod job;
pub mod reconcile;
pub mod segment;
pub mod syntax;
pub mod tree;

pub use align::{align, align_with};
pub use config::AlignConfig;
pub use error::{Error, Result};
pub use reconcile::reconcile;
pub use segment::{Attribution, RawSegment, SegmentStream, TextSegment};
pub use tree::{count_attributed_spans, RenderNode};

/// Reconcile `raw_segments` against `full_text` and annotate `tree` in one call.
#[must_use]
pub fn annotate(
    full_text: &str,
    raw_segments: &[RawSegment],
    tree: RenderNode,
    config: &AlignConfig,
) -> RenderNode {
    let stream = reconcile(full_text, raw_segments);
    align_with(tree, &stream, config)
}

#[cfg(test)]
#[path = "tests/properties.rs"]
mod tests;
